use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::{check_index, ensure_capacity};
use crate::io::{RowhouseRead, RowhouseWrite};
use crate::{Error, Result, Type, Value};

/// Generates the fixed-width integer column codecs.
///
/// Text ingestion uses the primitive's `FromStr`; the empty string takes the
/// type's zero value. The wire form is the primitive's little-endian bytes.
macro_rules! impl_int_column {
    ($($variant:ident: $native:ty, $read:ident, $write:ident);* $(;)?) => { paste::paste! { $(
        #[doc = concat!("Column of `", stringify!($variant), "` values.")]
        #[derive(Debug, Clone)]
        pub struct [<$variant ColumnData>] {
            values: Vec<$native>,
            capacity: usize,
        }

        impl [<$variant ColumnData>] {
            pub fn with_capacity(capacity: usize) -> Self {
                Self { values: Vec::with_capacity(capacity), capacity }
            }

            pub fn type_(&self) -> Type { Type::$variant }

            pub fn read_from_texts<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<usize> {
                ensure_capacity(self.values.len(), self.capacity, texts.len())?;
                for (index, text) in texts.iter().enumerate() {
                    let text = text.as_ref();
                    let value = if text.is_empty() {
                        <$native>::default()
                    } else {
                        text.parse::<$native>().map_err(|_| Error::TextParse {
                            type_name: stringify!($variant),
                            value: text.to_owned(),
                            index,
                        })?
                    };
                    self.values.push(value);
                }
                Ok(texts.len())
            }

            pub fn read_from_values(&mut self, values: &[Value]) -> Result<usize> {
                ensure_capacity(self.values.len(), self.capacity, values.len())?;
                for (index, value) in values.iter().enumerate() {
                    match value {
                        Value::$variant(x) => self.values.push(*x),
                        other => {
                            return Err(Error::TypeMismatch {
                                expected: stringify!($variant),
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
                    writer.$write(*value).await?;
                }
                Ok(())
            }

            pub async fn read_from_decoder<R: RowhouseRead>(&mut self, reader: &mut R) -> Result<()> {
                self.values.clear();
                for _ in 0..self.capacity {
                    self.values.push(reader.$read().await?);
                }
                Ok(())
            }

            pub fn get_string(&self, index: usize) -> Result<String> {
                check_index(index, self.values.len())?;
                Ok(self.values[index].to_string())
            }

            pub fn get_value(&self, index: usize) -> Result<Value> {
                check_index(index, self.values.len())?;
                Ok(Value::$variant(self.values[index]))
            }

            pub fn len(&self) -> usize { self.values.len() }

            pub fn is_empty(&self) -> bool { self.values.is_empty() }

            pub fn capacity(&self) -> usize { self.capacity }

            pub fn zero(&self) -> Value { Value::$variant(<$native>::default()) }

            pub fn zero_string(&self) -> String { <$native>::default().to_string() }

            pub fn close(&mut self) { self.values = Vec::new(); }
        }
    )* } };
}

/// Float columns travel as the bit pattern of the IEEE value, matching the
/// integer wire discipline.
macro_rules! impl_float_column {
    ($($variant:ident: $native:ty, $read:ident, $write:ident);* $(;)?) => { paste::paste! { $(
        #[doc = concat!("Column of `", stringify!($variant), "` values.")]
        #[derive(Debug, Clone)]
        pub struct [<$variant ColumnData>] {
            values: Vec<$native>,
            capacity: usize,
        }

        impl [<$variant ColumnData>] {
            pub fn with_capacity(capacity: usize) -> Self {
                Self { values: Vec::with_capacity(capacity), capacity }
            }

            pub fn type_(&self) -> Type { Type::$variant }

            pub fn read_from_texts<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<usize> {
                ensure_capacity(self.values.len(), self.capacity, texts.len())?;
                for (index, text) in texts.iter().enumerate() {
                    let text = text.as_ref();
                    let value = if text.is_empty() {
                        <$native>::default()
                    } else {
                        text.parse::<$native>().map_err(|_| Error::TextParse {
                            type_name: stringify!($variant),
                            value: text.to_owned(),
                            index,
                        })?
                    };
                    self.values.push(value);
                }
                Ok(texts.len())
            }

            pub fn read_from_values(&mut self, values: &[Value]) -> Result<usize> {
                ensure_capacity(self.values.len(), self.capacity, values.len())?;
                for (index, value) in values.iter().enumerate() {
                    match value {
                        Value::$variant(x) => self.values.push(*x),
                        other => {
                            return Err(Error::TypeMismatch {
                                expected: stringify!($variant),
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
                    writer.$write(value.to_bits()).await?;
                }
                Ok(())
            }

            pub async fn read_from_decoder<R: RowhouseRead>(&mut self, reader: &mut R) -> Result<()> {
                self.values.clear();
                for _ in 0..self.capacity {
                    self.values.push(<$native>::from_bits(reader.$read().await?));
                }
                Ok(())
            }

            pub fn get_string(&self, index: usize) -> Result<String> {
                check_index(index, self.values.len())?;
                Ok(self.values[index].to_string())
            }

            pub fn get_value(&self, index: usize) -> Result<Value> {
                check_index(index, self.values.len())?;
                Ok(Value::$variant(self.values[index]))
            }

            pub fn len(&self) -> usize { self.values.len() }

            pub fn is_empty(&self) -> bool { self.values.is_empty() }

            pub fn capacity(&self) -> usize { self.capacity }

            pub fn zero(&self) -> Value { Value::$variant(<$native>::default()) }

            pub fn zero_string(&self) -> String { <$native>::default().to_string() }

            pub fn close(&mut self) { self.values = Vec::new(); }
        }
    )* } };
}

impl_int_column! {
    Int8: i8, read_i8, write_i8;
    Int16: i16, read_i16_le, write_i16_le;
    Int32: i32, read_i32_le, write_i32_le;
    Int64: i64, read_i64_le, write_i64_le;
    UInt8: u8, read_u8, write_u8;
    UInt16: u16, read_u16_le, write_u16_le;
    UInt32: u32, read_u32_le, write_u32_le;
    UInt64: u64, read_u64_le, write_u64_le;
}

impl_float_column! {
    Float32: f32, read_u32_le, write_u32_le;
    Float64: f64, read_u64_le, write_u64_le;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_from_texts_with_zero_fallback() {
        let mut column = UInt64ColumnData::with_capacity(4);
        let appended = column.read_from_texts(&["12", "", "9000000000"]).unwrap();
        assert_eq!(appended, 3);
        assert_eq!(column.get_string(1).unwrap(), "0");
        assert_eq!(column.get_value(2).unwrap(), Value::UInt64(9_000_000_000));
    }

    #[test]
    fn test_read_from_texts_partial_progress() {
        let mut column = Int32ColumnData::with_capacity(4);
        let err = column.read_from_texts(&["-5", "12", "twelve"]).unwrap_err();
        assert!(
            matches!(err, Error::TextParse { type_name: "Int32", index: 2, .. }),
            "unexpected error: {err:?}"
        );
        assert_eq!(column.len(), 2);
        assert_eq!(column.get_string(0).unwrap(), "-5");
    }

    #[test]
    fn test_read_from_values_mismatch() {
        let mut column = UInt8ColumnData::with_capacity(4);
        let err = column.read_from_values(&[Value::UInt8(1), Value::Int8(-1)]).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { expected: "UInt8", found: "Int8", index: 1 }
        ));
        assert_eq!(column.len(), 1);
    }

    #[test]
    fn test_capacity_refused_up_front() {
        let mut column = UInt16ColumnData::with_capacity(1);
        let err = column.read_from_texts(&["1", "2"]).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
        assert_eq!(column.len(), 0);
    }

    #[test]
    fn test_float_text_and_zero() {
        let mut column = Float64ColumnData::with_capacity(3);
        let appended = column.read_from_texts(&["1.5", "-0.25", ""]).unwrap();
        assert_eq!(appended, 3);
        assert_eq!(column.get_string(0).unwrap(), "1.5");
        assert_eq!(column.get_value(2).unwrap(), Value::Float64(0.0));
        assert_eq!(column.zero_string(), "0");
    }

    #[test]
    fn test_out_of_range_projection() {
        let column = Int8ColumnData::with_capacity(2);
        let err = column.get_string(0).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut column = Int64ColumnData::with_capacity(2);
        let _ = column.read_from_texts(&["1", "2"]).unwrap();
        column.close();
        assert_eq!(column.len(), 0);
        column.close();
        assert!(column.is_empty());
    }
}
