use std::io::Cursor;

use super::ColumnData;
use crate::{Error, Result, Value};

/// Encodes `original`, then decodes the bytes into a freshly constructed
/// store of the same type and capacity.
async fn roundtrip(original: &ColumnData, type_name: &str, capacity: usize) -> Result<ColumnData> {
    let mut wire = Vec::new();
    original.write_to_encoder(&mut wire).await?;

    let mut decoded = ColumnData::make(type_name, capacity)?;
    let mut cursor = Cursor::new(wire);
    decoded.read_from_decoder(&mut cursor).await?;
    Ok(decoded)
}

async fn assert_text_roundtrip(type_name: &str, texts: &[&str], expected: &[&str]) {
    let mut original = ColumnData::must_make(type_name, texts.len());
    let appended = original.read_from_texts(texts).unwrap();
    assert_eq!(appended, texts.len());

    let decoded = roundtrip(&original, type_name, texts.len()).await.unwrap();
    for (index, want) in expected.iter().enumerate() {
        assert_eq!(decoded.get_string(index).unwrap(), *want, "{type_name} index {index}");
    }
    assert_eq!(decoded.len(), original.len());
    assert_eq!(decoded.zero(), original.zero());
    assert_eq!(decoded.zero_string(), original.zero_string());
}

#[tokio::test]
async fn test_datetime64_encoder_decoder() {
    let texts = ["1950-01-02 15:04:05.000", "2020-01-02 15:04:05.000", "2019-01-01 00:00:00.000"];
    assert_text_roundtrip("DateTime64(3)", &texts, &texts).await;
}

#[tokio::test]
async fn test_datetime64_encoder_decoder_format_variance() {
    assert_text_roundtrip(
        "DateTime64(3)",
        &["1950-01-02", "2020-01-02 15:04:05", "2020-01-02 15:04:05.322"],
        &["1950-01-02 00:00:00.000", "2020-01-02 15:04:05.000", "2020-01-02 15:04:05.322"],
    )
    .await;
}

#[tokio::test]
async fn test_datetime64_encoder_decoder_with_empty_text() {
    assert_text_roundtrip(
        "DateTime64(3)",
        &["", "1950-01-02 15:04:05.000", "2020-01-02 15:04:05.000"],
        &["1970-01-01 00:00:00.000", "1950-01-02 15:04:05.000", "2020-01-02 15:04:05.000"],
    )
    .await;
}

#[tokio::test]
async fn test_numeric_encoder_decoder() {
    assert_text_roundtrip("Int64", &["-9000000000", "0", "12"], &["-9000000000", "0", "12"]).await;
    assert_text_roundtrip("UInt8", &["0", "255"], &["0", "255"]).await;
    assert_text_roundtrip("Float64", &["1.5", "-0.25"], &["1.5", "-0.25"]).await;
}

#[tokio::test]
async fn test_string_encoder_decoder() {
    assert_text_roundtrip("String", &["alpha", "", "gamma"], &["alpha", "", "gamma"]).await;
}

#[tokio::test]
async fn test_date_and_datetime_encoder_decoder() {
    assert_text_roundtrip("Date", &["2020-01-02", ""], &["2020-01-02", "1970-01-01"]).await;
    assert_text_roundtrip(
        "DateTime",
        &["2020-01-02 15:04:05", ""],
        &["2020-01-02 15:04:05", "1970-01-01 00:00:00"],
    )
    .await;
}

#[tokio::test]
async fn test_truncated_decode_keeps_prefix() {
    let mut original = ColumnData::must_make("DateTime64(3)", 3);
    let _ = original
        .read_from_texts(&["2020-01-02 15:04:05.000", "2019-01-01 00:00:00.000", "1950-01-02 15:04:05.000"])
        .unwrap();
    let mut wire = Vec::new();
    original.write_to_encoder(&mut wire).await.unwrap();

    // Drop the final element's last byte: two elements decode, the third is
    // never materialized.
    wire.truncate(wire.len() - 1);
    let mut decoded = ColumnData::must_make("DateTime64(3)", 3);
    let mut cursor = Cursor::new(wire);
    let err = decoded.read_from_decoder(&mut cursor).await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedEndOfStream));
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.get_string(0).unwrap(), "2020-01-02 15:04:05.000");
    assert_eq!(decoded.get_string(1).unwrap(), "2019-01-01 00:00:00.000");
}

#[test]
fn test_make_rejects_unknown_types() {
    assert!(matches!(ColumnData::make("VarChar", 8), Err(Error::TypeDescriptor(_))));
    assert!(matches!(ColumnData::make("DateTime64(12)", 8), Err(Error::TypeDescriptor(_))));
}

#[test]
#[should_panic(expected = "cannot construct column data for `DateTime64(12)`")]
fn test_must_make_panics_on_invalid_type() {
    let _ = ColumnData::must_make("DateTime64(12)", 8);
}

#[test]
fn test_dispatch_covers_every_type() {
    for type_name in
        ["Int8", "Int16", "Int32", "Int64", "UInt8", "UInt16", "UInt32", "UInt64", "Float32",
         "Float64", "String", "Date", "DateTime", "DateTime64(3)"]
    {
        let mut column = ColumnData::must_make(type_name, 4);
        assert_eq!(column.type_().to_string(), type_name);
        assert_eq!(column.len(), 0);
        assert!(column.is_empty());
        assert_eq!(column.capacity(), 4);
        let _ = column.zero_string();
        column.close();
    }
}

#[test]
fn test_zero_matches_empty_text_ingestion() {
    let mut column = ColumnData::must_make("DateTime64(6)", 2);
    let _ = column.read_from_texts(&[""]).unwrap();
    assert_eq!(column.get_value(0).unwrap(), column.zero());
    assert_eq!(column.get_string(0).unwrap(), column.zero_string());
}

#[test]
fn test_value_extraction_matches_ingested_value() {
    let mut column = ColumnData::must_make("UInt32", 2);
    let appended = column.read_from_values(&[Value::UInt32(7), Value::UInt32(9)]).unwrap();
    assert_eq!(appended, 2);
    assert_eq!(column.get_value(1).unwrap(), Value::UInt32(9));
}
