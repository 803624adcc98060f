use bytes::Bytes;
use chrono::NaiveDate;
use chrono_tz::Tz;

/// A single native value, one variant per native kind a column accepts.
///
/// Heterogeneous batch ingestion passes `&[Value]`; a mismatch between a
/// value's variant and the column's expected kind is a variant-tag check
/// reported as [`crate::Error::TypeMismatch`] with both kinds named, never a
/// reflective probe.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(Bytes),
    Date(NaiveDate),
    /// An instant with nanosecond resolution. Conversion into a timestamp
    /// column truncates the sub-second part to the column's precision.
    DateTime(chrono::DateTime<Tz>),
}

impl Value {
    /// The kind name used in mismatch reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int8(_) => "Int8",
            Self::Int16(_) => "Int16",
            Self::Int32(_) => "Int32",
            Self::Int64(_) => "Int64",
            Self::UInt8(_) => "UInt8",
            Self::UInt16(_) => "UInt16",
            Self::UInt32(_) => "UInt32",
            Self::UInt64(_) => "UInt64",
            Self::Float32(_) => "Float32",
            Self::Float64(_) => "Float64",
            Self::String(_) => "String",
            Self::Date(_) => "Date",
            Self::DateTime(_) => "DateTime",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::UInt8(1).kind(), "UInt8");
        assert_eq!(Value::String(Bytes::from_static(b"x")).kind(), "String");
        assert_eq!(Value::DateTime(Tz::UTC.timestamp_opt(0, 0).unwrap()).kind(), "DateTime");
    }
}
