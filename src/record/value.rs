//! Scalar field values

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date formats accepted when a text field is read as a date
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Date-time formats accepted when a text field is read as a date
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A non-null field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue<'_> {
    /// The value as text, used for substring matching.
    ///
    /// Integral numbers print without a fractional part, dates as `YYYY-MM-DD`.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_ref()),
            FieldValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            FieldValue::Number(n) => Cow::Owned(format_number(*n)),
            FieldValue::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Truthiness of the value.
    ///
    /// Empty strings, `false`, zero and NaN are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Date(_) => true,
        }
    }

    /// Reads the value as a calendar date.
    ///
    /// Numbers are milliseconds since the Unix epoch.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => parse_date(s.trim()),
            FieldValue::Number(n) if n.is_finite() => {
                DateTime::from_timestamp_millis(*n as i64).map(|dt| dt.date_naive())
            }
            _ => None,
        }
    }

    /// Total order used by sorting.
    ///
    /// Values of different kinds order by kind: bool < number < date < text.
    /// Text that reads as a date sorts with the dates, chronologically;
    /// equal dates put native dates first, then order by text.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        let (a_date, b_date) = (self.sort_date(), other.sort_date());
        if let (Some(a), Some(b)) = (a_date, b_date) {
            return a
                .cmp(&b)
                .then_with(|| self.date_text().cmp(&other.date_text()));
        }

        let rank = self.rank(a_date.is_some()).cmp(&other.rank(b_date.is_some()));
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            _ => Ordering::Equal,
        }
    }

    fn sort_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => parse_date(s.trim()),
            _ => None,
        }
    }

    fn date_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    fn rank(&self, is_date: bool) -> u8 {
        match self {
            _ if is_date => 2,
            FieldValue::Bool(_) => 0,
            FieldValue::Number(_) => 1,
            FieldValue::Date(_) => 2,
            FieldValue::Text(_) => 3,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
