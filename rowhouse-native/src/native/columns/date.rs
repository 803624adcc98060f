use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::{check_index, ensure_capacity};
use crate::constants::{DATE_FORMAT, SECONDS_FORMAT};
use crate::io::{RowhouseRead, RowhouseWrite};
use crate::{Error, Result, Type, Value};

fn epoch_date() -> NaiveDate { NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() }

/// Column of `Date` values, stored as days since 1970-01-01 in a `u16`.
///
/// Text accepts `YYYY-MM-DD` or a full `YYYY-MM-DD HH:MM:SS` (truncated to
/// its date). Dates outside the `u16` day range are rejected.
#[derive(Debug, Clone)]
pub struct DateColumnData {
    days: Vec<u16>,
    capacity: usize,
}

impl DateColumnData {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { days: Vec::with_capacity(capacity), capacity }
    }

    pub fn type_(&self) -> Type { Type::Date }

    fn days_from_date(date: NaiveDate) -> Option<u16> {
        u16::try_from(date.signed_duration_since(epoch_date()).num_days()).ok()
    }

    fn parse_text(text: &str, index: usize) -> Result<u16> {
        if text.is_empty() {
            return Ok(0);
        }
        let date = NaiveDate::parse_from_str(text, DATE_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(text, SECONDS_FORMAT).map(|dt| dt.date()))
            .map_err(|_| Error::TextParse {
                type_name: "Date",
                value: text.to_owned(),
                index,
            })?;
        Self::days_from_date(date).ok_or_else(|| Error::TextParse {
            type_name: "Date",
            value: text.to_owned(),
            index,
        })
    }

    pub fn read_from_texts<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<usize> {
        ensure_capacity(self.days.len(), self.capacity, texts.len())?;
        for (index, text) in texts.iter().enumerate() {
            let days = Self::parse_text(text.as_ref(), index)?;
            self.days.push(days);
        }
        Ok(texts.len())
    }

    pub fn read_from_values(&mut self, values: &[Value]) -> Result<usize> {
        ensure_capacity(self.days.len(), self.capacity, values.len())?;
        for (index, value) in values.iter().enumerate() {
            match value {
                Value::Date(date) => {
                    let days = Self::days_from_date(*date).ok_or_else(|| {
                        Error::Protocol(format!("date out of range for Date column: {date}"))
                    })?;
                    self.days.push(days);
                }
                other => {
                    return Err(Error::TypeMismatch {
                        expected: "Date",
                        found: other.kind(),
                        index,
                    });
                }
            }
        }
        Ok(values.len())
    }

    pub async fn write_to_encoder<W: RowhouseWrite>(&self, writer: &mut W) -> Result<()> {
        for days in &self.days {
            writer.write_u16_le(*days).await?;
        }
        Ok(())
    }

    pub async fn read_from_decoder<R: RowhouseRead>(&mut self, reader: &mut R) -> Result<()> {
        self.days.clear();
        for _ in 0..self.capacity {
            self.days.push(reader.read_u16_le().await?);
        }
        Ok(())
    }

    fn format_days(days: u16) -> String {
        (epoch_date() + Duration::days(i64::from(days))).format(DATE_FORMAT).to_string()
    }

    pub fn get_string(&self, index: usize) -> Result<String> {
        check_index(index, self.days.len())?;
        Ok(Self::format_days(self.days[index]))
    }

    pub fn get_value(&self, index: usize) -> Result<Value> {
        check_index(index, self.days.len())?;
        Ok(Value::Date(epoch_date() + Duration::days(i64::from(self.days[index]))))
    }

    pub fn len(&self) -> usize { self.days.len() }

    pub fn is_empty(&self) -> bool { self.days.is_empty() }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn zero(&self) -> Value { Value::Date(epoch_date()) }

    pub fn zero_string(&self) -> String { Self::format_days(0) }

    pub fn close(&mut self) { self.days = Vec::new(); }
}

/// Column of `DateTime` values, stored as whole seconds since the epoch in a
/// `u32`, interpreted in the column's timezone (UTC unless the descriptor
/// names one).
#[derive(Debug, Clone)]
pub struct DateTimeColumnData {
    seconds: Vec<u32>,
    tz: Tz,
    capacity: usize,
}

impl DateTimeColumnData {
    pub fn with_capacity(tz: Tz, capacity: usize) -> Self {
        Self { seconds: Vec::with_capacity(capacity), tz, capacity }
    }

    pub fn type_(&self) -> Type { Type::DateTime(self.tz) }

    fn parse_text(&self, text: &str, index: usize) -> Result<u32> {
        if text.is_empty() {
            return Ok(0);
        }
        let time_parse = || Error::TimeParse { value: text.to_owned(), index };
        let naive = NaiveDateTime::parse_from_str(text, SECONDS_FORMAT)
            .or_else(|_| {
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .map(|date| date.and_hms_opt(0, 0, 0).unwrap())
            })
            .map_err(|_| time_parse())?;
        let instant = self.tz.from_local_datetime(&naive).earliest().ok_or_else(time_parse)?;
        u32::try_from(instant.timestamp()).map_err(|_| time_parse())
    }

    pub fn read_from_texts<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<usize> {
        ensure_capacity(self.seconds.len(), self.capacity, texts.len())?;
        for (index, text) in texts.iter().enumerate() {
            let seconds = self.parse_text(text.as_ref(), index)?;
            self.seconds.push(seconds);
        }
        Ok(texts.len())
    }

    pub fn read_from_values(&mut self, values: &[Value]) -> Result<usize> {
        ensure_capacity(self.seconds.len(), self.capacity, values.len())?;
        for (index, value) in values.iter().enumerate() {
            match value {
                Value::DateTime(instant) => {
                    let seconds = u32::try_from(instant.timestamp()).map_err(|_| {
                        Error::Protocol(format!(
                            "instant out of range for DateTime column: {instant}"
                        ))
                    })?;
                    self.seconds.push(seconds);
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
        for seconds in &self.seconds {
            writer.write_u32_le(*seconds).await?;
        }
        Ok(())
    }

    pub async fn read_from_decoder<R: RowhouseRead>(&mut self, reader: &mut R) -> Result<()> {
        self.seconds.clear();
        for _ in 0..self.capacity {
            self.seconds.push(reader.read_u32_le().await?);
        }
        Ok(())
    }

    fn instant(&self, seconds: u32) -> chrono::DateTime<Tz> {
        self.tz.timestamp_opt(i64::from(seconds), 0).unwrap()
    }

    pub fn get_string(&self, index: usize) -> Result<String> {
        check_index(index, self.seconds.len())?;
        Ok(self.instant(self.seconds[index]).format(SECONDS_FORMAT).to_string())
    }

    pub fn get_value(&self, index: usize) -> Result<Value> {
        check_index(index, self.seconds.len())?;
        Ok(Value::DateTime(self.instant(self.seconds[index])))
    }

    pub fn len(&self) -> usize { self.seconds.len() }

    pub fn is_empty(&self) -> bool { self.seconds.is_empty() }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn zero(&self) -> Value { Value::DateTime(self.instant(0)) }

    pub fn zero_string(&self) -> String { self.instant(0).format(SECONDS_FORMAT).to_string() }

    pub fn close(&mut self) { self.seconds = Vec::new(); }
}
