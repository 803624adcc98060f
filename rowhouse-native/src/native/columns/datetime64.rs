use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::{check_index, ensure_capacity};
use crate::constants::{DATE_FORMAT, MAX_PRECISION, SECONDS_FORMAT, SUBSECOND_FORMAT};
use crate::io::{RowhouseRead, RowhouseWrite};
use crate::{Error, Result, Type, Value};

/// Column of `DateTime64(precision[, timezone])` values.
///
/// Each element is a signed 64-bit count of sub-second ticks since
/// 1970-01-01 00:00:00 in the column's timezone, where one tick is
/// `10^(9 - precision)` nanoseconds. The precision (0–9 fractional digits)
/// is fixed at construction and governs every element's tick arithmetic and
/// rendering for the lifetime of the column; instants before the epoch are
/// negative tick counts.
///
/// Fractional digits beyond the precision are dropped on ingestion, not
/// rounded.
#[derive(Debug, Clone)]
pub struct DateTime64ColumnData {
    precision: u32,
    tz: Tz,
    ticks: Vec<i64>,
    capacity: usize,
}

impl DateTime64ColumnData {
    pub fn with_capacity(precision: usize, tz: Tz, capacity: usize) -> Self {
        // The type parser enforces the bound; construction from a resolved
        // `Type` keeps it by construction.
        debug_assert!(precision <= MAX_PRECISION);
        #[expect(clippy::cast_possible_truncation)]
        let precision = precision as u32;
        Self { precision, tz, ticks: Vec::with_capacity(capacity), capacity }
    }

    pub fn type_(&self) -> Type { Type::DateTime64(self.precision as usize, self.tz) }

    /// Ticks per whole second.
    fn scale(&self) -> i64 { 10_i64.pow(self.precision) }

    /// Nanoseconds per tick.
    fn tick_nanos(&self) -> i64 { 10_i64.pow(9 - self.precision) }

    /// Converts floored seconds plus a non-negative sub-second part into a
    /// tick count. Sub-second nanoseconds truncate to the column precision.
    fn ticks_from_instant(&self, seconds: i64, subsec_nanos: u32) -> i64 {
        seconds * self.scale() + i64::from(subsec_nanos) / self.tick_nanos()
    }

    fn parse_text(&self, text: &str, index: usize) -> Result<i64> {
        if text.is_empty() {
            return Ok(0);
        }
        let time_parse = || Error::TimeParse { value: text.to_owned(), index };
        let naive = NaiveDateTime::parse_from_str(text, SECONDS_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(text, SUBSECOND_FORMAT))
            .or_else(|_| {
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .map(|date| date.and_hms_opt(0, 0, 0).unwrap())
            })
            .map_err(|_| time_parse())?;
        let instant = self.tz.from_local_datetime(&naive).earliest().ok_or_else(time_parse)?;
        Ok(self.ticks_from_instant(instant.timestamp(), instant.timestamp_subsec_nanos()))
    }

    pub fn read_from_texts<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<usize> {
        ensure_capacity(self.ticks.len(), self.capacity, texts.len())?;
        for (index, text) in texts.iter().enumerate() {
            let tick = self.parse_text(text.as_ref(), index)?;
            self.ticks.push(tick);
        }
        Ok(texts.len())
    }

    pub fn read_from_values(&mut self, values: &[Value]) -> Result<usize> {
        ensure_capacity(self.ticks.len(), self.capacity, values.len())?;
        for (index, value) in values.iter().enumerate() {
            match value {
                Value::DateTime(instant) => {
                    let tick = self
                        .ticks_from_instant(instant.timestamp(), instant.timestamp_subsec_nanos());
                    self.ticks.push(tick);
                }
                other => {
                    return Err(Error::TypeMismatch {
                        expected: "DateTime",
                        found: other.kind(),
                        index,
                    });
                }
            }
        }
        Ok(values.len())
    }

    pub async fn write_to_encoder<W: RowhouseWrite>(&self, writer: &mut W) -> Result<()> {
        for tick in &self.ticks {
            writer.write_i64_le(*tick).await?;
        }
        Ok(())
    }

    pub async fn read_from_decoder<R: RowhouseRead>(&mut self, reader: &mut R) -> Result<()> {
        self.ticks.clear();
        for _ in 0..self.capacity {
            self.ticks.push(reader.read_i64_le().await?);
        }
        Ok(())
    }

    /// Reconstructs the instant for a tick. The euclidean split keeps the
    /// fractional part in `[0, scale)` on both sides of the epoch.
    fn instant(&self, tick: i64) -> chrono::DateTime<Tz> {
        let seconds = tick.div_euclid(self.scale());
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nanos = (tick.rem_euclid(self.scale()) * self.tick_nanos()) as u32;
        self.tz.timestamp_opt(seconds, nanos).unwrap()
    }

    fn format_tick(&self, tick: i64) -> String {
        let base = self.instant(tick).format(SECONDS_FORMAT);
        if self.precision == 0 {
            return base.to_string();
        }
        let frac = tick.rem_euclid(self.scale());
        format!("{base}.{frac:0width$}", width = self.precision as usize)
    }

    pub fn get_string(&self, index: usize) -> Result<String> {
        check_index(index, self.ticks.len())?;
        Ok(self.format_tick(self.ticks[index]))
    }

    pub fn get_value(&self, index: usize) -> Result<Value> {
        check_index(index, self.ticks.len())?;
        Ok(Value::DateTime(self.instant(self.ticks[index])))
    }

    pub fn len(&self) -> usize { self.ticks.len() }

    pub fn is_empty(&self) -> bool { self.ticks.is_empty() }

    pub fn capacity(&self) -> usize { self.capacity }

    /// Tick 0: the reference instant.
    pub fn zero(&self) -> Value { Value::DateTime(self.instant(0)) }

    /// The reference instant rendered with exactly `precision` fractional
    /// digits.
    pub fn zero_string(&self) -> String { self.format_tick(0) }

    pub fn close(&mut self) { self.ticks = Vec::new(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(precision: usize, capacity: usize) -> DateTime64ColumnData {
        DateTime64ColumnData::with_capacity(precision, Tz::UTC, capacity)
    }

    #[test]
    fn test_read_from_texts_canonical() {
        let texts = ["1950-01-02 15:04:05.000", "2020-01-02 15:04:05.000", "2019-01-01 00:00:00.000"];
        let mut data = column(3, 1000);
        let appended = data.read_from_texts(&texts).unwrap();
        assert_eq!(appended, 3);
        for (index, text) in texts.iter().enumerate() {
            assert_eq!(data.get_string(index).unwrap(), *text);
        }
    }

    #[test]
    fn test_read_from_texts_format_variance() {
        let mut data = column(3, 1000);
        let appended = data
            .read_from_texts(&["1950-01-02", "2020-01-02 15:04:05", "2020-01-02 15:04:05.322"])
            .unwrap();
        assert_eq!(appended, 3);
        assert_eq!(data.get_string(0).unwrap(), "1950-01-02 00:00:00.000");
        assert_eq!(data.get_string(1).unwrap(), "2020-01-02 15:04:05.000");
        assert_eq!(data.get_string(2).unwrap(), "2020-01-02 15:04:05.322");
    }

    #[test]
    fn test_read_from_texts_empty_takes_zero_value() {
        let mut data = column(3, 1000);
        let appended = data
            .read_from_texts(&["", "1950-01-02 15:04:05.000", "2020-01-02 15:04:05.000"])
            .unwrap();
        assert_eq!(appended, 3);
        assert_eq!(data.get_string(0).unwrap(), "1970-01-01 00:00:00.000");
        assert_eq!(data.get_string(0).unwrap(), data.zero_string());
    }

    #[test]
    fn test_read_from_texts_partial_progress_on_invalid_format() {
        let mut data = column(3, 1000);
        let err = data
            .read_from_texts(&["1970-01-02 15:04:05", "2020-01-02pp 15:04:05"])
            .unwrap_err();
        assert!(
            matches!(&err, Error::TimeParse { value, index: 1 } if value == "2020-01-02pp 15:04:05"),
            "unexpected error: {err:?}"
        );
        assert_eq!(data.len(), 1);
        assert_eq!(data.get_string(0).unwrap(), "1970-01-02 15:04:05.000");
    }

    #[test]
    fn test_read_from_values() {
        let mut data = column(6, 1000);
        let early = Tz::UTC.timestamp_opt(-900_000_000, 0).unwrap();
        let recent = Tz::UTC.with_ymd_and_hms(2020, 1, 2, 15, 4, 5).unwrap();
        let appended = data.read_from_values(&[Value::DateTime(early), Value::DateTime(recent)]).unwrap();
        assert_eq!(appended, 2);
        assert_eq!(data.get_value(0).unwrap(), Value::DateTime(early));
        assert_eq!(data.get_value(1).unwrap(), Value::DateTime(recent));
    }

    #[test]
    fn test_read_from_values_mismatch_partial_progress() {
        let mut data = column(6, 1000);
        let now = Tz::UTC.with_ymd_and_hms(2020, 1, 2, 15, 4, 5).unwrap();
        let err = data.read_from_values(&[Value::DateTime(now), Value::Int32(123)]).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { expected: "DateTime", found: "Int32", index: 1 }
        ));
        assert_eq!(data.len(), 1);
    }

    #[tokio::test]
    async fn test_fraction_truncates_instead_of_rounding() {
        let mut data = column(3, 1);
        let _ = data.read_from_texts(&["2020-01-02 15:04:05.9996"]).unwrap();
        assert_eq!(data.get_string(0).unwrap(), "2020-01-02 15:04:05.999");

        // 2020-01-02T15:04:05Z is 1_577_977_445 seconds past the epoch.
        let mut wire = Vec::new();
        data.write_to_encoder(&mut wire).await.unwrap();
        assert_eq!(wire, (1_577_977_445_999_i64).to_le_bytes());
    }

    #[test]
    fn test_zero_string_per_precision() {
        assert_eq!(column(0, 1).zero_string(), "1970-01-01 00:00:00");
        assert_eq!(column(3, 1).zero_string(), "1970-01-01 00:00:00.000");
        assert_eq!(column(9, 1).zero_string(), "1970-01-01 00:00:00.000000000");
    }

    #[test]
    fn test_canonical_text_roundtrips_across_precisions() {
        for precision in 0..=MAX_PRECISION {
            let mut data = column(precision, 16);
            let fraction = &"123456789"[..precision];
            let mut texts = vec![
                "1950-01-02 15:04:05".to_string(),
                "1970-01-01 00:00:00".to_string(),
                "2020-01-02 15:04:05".to_string(),
            ];
            if precision > 0 {
                for text in &mut texts {
                    text.push('.');
                    text.push_str(fraction);
                }
            }
            let appended = data.read_from_texts(&texts).unwrap();
            assert_eq!(appended, texts.len());
            for (index, text) in texts.iter().enumerate() {
                assert_eq!(data.get_string(index).unwrap(), *text, "precision {precision}");
            }
        }
    }

    #[test]
    fn test_get_string_out_of_range() {
        let mut data = column(3, 4);
        let _ = data.read_from_texts(&["2020-01-02 15:04:05.322"]).unwrap();
        let err = data.get_string(1).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { index: 1, len: 1 }));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut data = column(3, 4);
        let _ = data.read_from_texts(&["2020-01-02 15:04:05.322"]).unwrap();
        data.close();
        assert_eq!(data.len(), 0);
        data.close();
        assert!(data.is_empty());
    }
}
