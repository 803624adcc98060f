mod date;
mod datetime64;
mod numeric;
mod string;

#[cfg(test)]
mod tests;

use std::str::FromStr;

pub use date::{DateColumnData, DateTimeColumnData};
pub use datetime64::DateTime64ColumnData;
pub use numeric::{
    Float32ColumnData, Float64ColumnData, Int8ColumnData, Int16ColumnData, Int32ColumnData,
    Int64ColumnData, UInt8ColumnData, UInt16ColumnData, UInt32ColumnData, UInt64ColumnData,
};
pub use string::StringColumnData;
use tracing::debug;

use crate::io::{RowhouseRead, RowhouseWrite};
use crate::{Error, Result, Type, Value};

/// A typed, append-only column of values for one row batch.
///
/// Every supported column type is a variant of this closed enum, each
/// implementing the same contract: batch ingestion from text or native
/// values, binary encode/decode over a stream, canonical text projection,
/// and lifecycle control. A store is owned exclusively by one caller for its
/// whole lifetime; there is no internal synchronization.
///
/// Ingestion follows the partial-progress contract: on the first bad element
/// the call stops, the error names the element and its index, and everything
/// appended before it stays readable (`len()` reflects the progress).
#[derive(Debug, Clone)]
pub enum ColumnData {
    Int8(Int8ColumnData),
    Int16(Int16ColumnData),
    Int32(Int32ColumnData),
    Int64(Int64ColumnData),
    UInt8(UInt8ColumnData),
    UInt16(UInt16ColumnData),
    UInt32(UInt32ColumnData),
    UInt64(UInt64ColumnData),
    Float32(Float32ColumnData),
    Float64(Float64ColumnData),
    String(StringColumnData),
    Date(DateColumnData),
    DateTime(DateTimeColumnData),
    DateTime64(DateTime64ColumnData),
}

macro_rules! dispatch {
    ($self:expr, $inner:pat_param => $body:expr) => {
        match $self {
            ColumnData::Int8($inner) => $body,
            ColumnData::Int16($inner) => $body,
            ColumnData::Int32($inner) => $body,
            ColumnData::Int64($inner) => $body,
            ColumnData::UInt8($inner) => $body,
            ColumnData::UInt16($inner) => $body,
            ColumnData::UInt32($inner) => $body,
            ColumnData::UInt64($inner) => $body,
            ColumnData::Float32($inner) => $body,
            ColumnData::Float64($inner) => $body,
            ColumnData::String($inner) => $body,
            ColumnData::Date($inner) => $body,
            ColumnData::DateTime($inner) => $body,
            ColumnData::DateTime64($inner) => $body,
        }
    };
}

impl ColumnData {
    /// Resolves `type_name` and allocates the matching codec with room for
    /// `capacity` elements.
    ///
    /// # Errors
    /// Returns [`Error::TypeDescriptor`] for unknown or malformed type
    /// strings.
    pub fn make(type_name: &str, capacity: usize) -> Result<Self> {
        let type_ = Type::from_str(type_name)?;
        debug!(%type_, capacity, "resolved column type");
        Ok(Self::with_type(type_, capacity))
    }

    /// Infallible [`ColumnData::make`] for schema-validated call sites and
    /// test setup, where a bad type string is a programming error.
    ///
    /// # Panics
    /// Panics if the type string is unrecognized or malformed.
    pub fn must_make(type_name: &str, capacity: usize) -> Self {
        match Self::make(type_name, capacity) {
            Ok(column) => column,
            Err(err) => panic!("cannot construct column data for `{type_name}`: {err}"),
        }
    }

    /// Allocates the codec for an already-resolved [`Type`].
    pub fn with_type(type_: Type, capacity: usize) -> Self {
        match type_ {
            Type::Int8 => Self::Int8(Int8ColumnData::with_capacity(capacity)),
            Type::Int16 => Self::Int16(Int16ColumnData::with_capacity(capacity)),
            Type::Int32 => Self::Int32(Int32ColumnData::with_capacity(capacity)),
            Type::Int64 => Self::Int64(Int64ColumnData::with_capacity(capacity)),
            Type::UInt8 => Self::UInt8(UInt8ColumnData::with_capacity(capacity)),
            Type::UInt16 => Self::UInt16(UInt16ColumnData::with_capacity(capacity)),
            Type::UInt32 => Self::UInt32(UInt32ColumnData::with_capacity(capacity)),
            Type::UInt64 => Self::UInt64(UInt64ColumnData::with_capacity(capacity)),
            Type::Float32 => Self::Float32(Float32ColumnData::with_capacity(capacity)),
            Type::Float64 => Self::Float64(Float64ColumnData::with_capacity(capacity)),
            Type::String => Self::String(StringColumnData::with_capacity(capacity)),
            Type::Date => Self::Date(DateColumnData::with_capacity(capacity)),
            Type::DateTime(tz) => Self::DateTime(DateTimeColumnData::with_capacity(tz, capacity)),
            Type::DateTime64(precision, tz) => {
                Self::DateTime64(DateTime64ColumnData::with_capacity(precision, tz, capacity))
            }
        }
    }

    /// The resolved type this column was constructed with.
    pub fn type_(&self) -> Type { dispatch!(self, column => column.type_()) }

    /// Appends one element per input string, parsed by the type's text
    /// grammar. Returns the number of rows appended.
    ///
    /// # Errors
    /// Stops at the first unparseable entry; the error names it and its
    /// index, and prior rows remain appended.
    pub fn read_from_texts<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<usize> {
        dispatch!(self, column => column.read_from_texts(texts))
    }

    /// Appends one element per native value. Returns the number of rows
    /// appended.
    ///
    /// # Errors
    /// A value of the wrong native kind fails with
    /// [`Error::TypeMismatch`] at its index; prior rows remain appended.
    pub fn read_from_values(&mut self, values: &[Value]) -> Result<usize> {
        dispatch!(self, column => column.read_from_values(values))
    }

    /// Writes the current `len()` elements to the stream in element order.
    ///
    /// # Errors
    /// Propagates stream failures.
    pub async fn write_to_encoder<W: RowhouseWrite>(&self, writer: &mut W) -> Result<()> {
        dispatch!(self, column => column.write_to_encoder(writer).await)
    }

    /// Replaces the column contents with exactly `capacity` elements decoded
    /// from the stream. The element count is not self-describing on the
    /// wire; it comes from the capacity supplied at construction.
    ///
    /// # Errors
    /// A truncated stream fails with [`Error::UnexpectedEndOfStream`];
    /// elements decoded before the truncation remain valid to inspect.
    pub async fn read_from_decoder<R: RowhouseRead>(&mut self, reader: &mut R) -> Result<()> {
        dispatch!(self, column => column.read_from_decoder(reader).await)
    }

    /// Projects element `index` to its canonical text form.
    ///
    /// # Errors
    /// Fails with [`Error::OutOfRange`] when `index >= len()`.
    pub fn get_string(&self, index: usize) -> Result<String> {
        dispatch!(self, column => column.get_string(index))
    }

    /// Extracts element `index` as a native [`Value`].
    ///
    /// # Errors
    /// Fails with [`Error::OutOfRange`] when `index >= len()`.
    pub fn get_value(&self, index: usize) -> Result<Value> {
        dispatch!(self, column => column.get_value(index))
    }

    /// Number of materialized elements.
    pub fn len(&self) -> usize { dispatch!(self, column => column.len()) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Fixed element-count bound set at construction.
    pub fn capacity(&self) -> usize { dispatch!(self, column => column.capacity()) }

    /// The deterministic default substituted for empty text input.
    pub fn zero(&self) -> Value { dispatch!(self, column => column.zero()) }

    /// Canonical rendering of [`ColumnData::zero`].
    pub fn zero_string(&self) -> String { dispatch!(self, column => column.zero_string()) }

    /// Releases the backing buffer. Idempotent; the column stays valid (and
    /// empty) afterwards.
    pub fn close(&mut self) { dispatch!(self, column => column.close()); }
}

/// Coarse capacity guard: a batch that would overflow the configured row
/// capacity is refused before any element is appended.
pub(crate) fn ensure_capacity(len: usize, capacity: usize, incoming: usize) -> Result<()> {
    if len + incoming > capacity {
        return Err(Error::Protocol(format!(
            "ingesting {incoming} rows would exceed capacity {capacity} at length {len}"
        )));
    }
    Ok(())
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::OutOfRange { index, len });
    }
    Ok(())
}
