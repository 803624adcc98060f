use bytes::Bytes;

use super::{check_index, ensure_capacity};
use crate::io::{RowhouseRead, RowhouseWrite};
use crate::{Error, Result, Type, Value};

/// Column of `String` values.
///
/// Text ingestion is the identity; the wire form is a var-uint length prefix
/// followed by the raw payload. Payloads are arbitrary bytes; projection is
/// lossy UTF-8.
#[derive(Debug, Clone)]
pub struct StringColumnData {
    values: Vec<Bytes>,
    capacity: usize,
}

impl StringColumnData {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { values: Vec::with_capacity(capacity), capacity }
    }

    pub fn type_(&self) -> Type { Type::String }

    /// Every input string is a valid element, so this cannot fail past the
    /// capacity guard.
    pub fn read_from_texts<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<usize> {
        ensure_capacity(self.values.len(), self.capacity, texts.len())?;
        for text in texts {
            self.values.push(Bytes::copy_from_slice(text.as_ref().as_bytes()));
        }
        Ok(texts.len())
    }

    pub fn read_from_values(&mut self, values: &[Value]) -> Result<usize> {
        ensure_capacity(self.values.len(), self.capacity, values.len())?;
        for (index, value) in values.iter().enumerate() {
            match value {
                Value::String(bytes) => self.values.push(bytes.clone()),
                other => {
                    return Err(Error::TypeMismatch {
                        expected: "String",
                        found: other.kind(),
                        index,
                    });
                }
            }
        }
        Ok(values.len())
    }

    pub async fn write_to_encoder<W: RowhouseWrite>(&self, writer: &mut W) -> Result<()> {
        for value in &self.values {
            writer.write_string(value).await?;
        }
        Ok(())
    }

    pub async fn read_from_decoder<R: RowhouseRead>(&mut self, reader: &mut R) -> Result<()> {
        self.values.clear();
        for _ in 0..self.capacity {
            self.values.push(reader.read_string().await?);
        }
        Ok(())
    }

    pub fn get_string(&self, index: usize) -> Result<String> {
        check_index(index, self.values.len())?;
        Ok(String::from_utf8_lossy(&self.values[index]).into_owned())
    }

    pub fn get_value(&self, index: usize) -> Result<Value> {
        check_index(index, self.values.len())?;
        Ok(Value::String(self.values[index].clone()))
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn zero(&self) -> Value { Value::String(Bytes::new()) }

    pub fn zero_string(&self) -> String { String::new() }

    pub fn close(&mut self) { self.values = Vec::new(); }
}
