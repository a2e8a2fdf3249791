//! Lenient scalar wrappers for wire structs.
//!
//! The API is not consistent about scalar encodings: amounts arrive as JSON
//! numbers or decimal strings, flags as booleans or `0`/`1`, timestamps
//! under either casing. Each wrapper here deserializes any of those shapes
//! and never fails; a value it cannot interpret becomes `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A number or numeric string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Amount(pub Option<Decimal>);

impl Amount {
    /// The value, treating zero as missing.
    pub fn nonzero(self) -> Option<Decimal> {
        self.0.filter(|d| !d.is_zero())
    }

    pub fn or_zero(self) -> Decimal {
        self.0.unwrap_or(Decimal::ZERO)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(decimal_of(&Value::deserialize(deserializer)?)))
    }
}

/// An integer count; fractional values truncate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Count(pub Option<i64>);

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self(decimal_of(&value).and_then(|d| d.trunc().to_i64())))
    }
}

/// A non-empty string. Numbers are rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(pub Option<String>);

impl Text {
    pub fn or(self, other: Self) -> Self {
        if self.0.is_some() { self } else { other }
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        Ok(Self(text))
    }
}

/// A boolean, `0`/`1`, or `"true"`/`"false"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag(pub Option<bool>);

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flag = match Value::deserialize(deserializer)? {
            Value::Bool(b) => Some(b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        };
        Ok(Self(flag))
    }
}

/// An RFC 3339 timestamp, a naive `YYYY-MM-DD HH:MM:SS` (taken as UTC), or a bare date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp(pub Option<DateTime<Utc>>);

impl Timestamp {
    pub const fn or(self, other: Self) -> Self {
        if self.0.is_some() { self } else { other }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match Value::deserialize(deserializer)? {
            Value::String(s) => parse_timestamp(s.trim()),
            _ => None,
        };
        Ok(Self(parsed))
    }
}

/// A list that may arrive as an array, a JSON-encoded string, or a
/// comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList(pub Vec<String>);

impl<'de> Deserialize<'de> for StringList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(string_list_of(Value::deserialize(deserializer)?)))
    }
}

fn string_list_of(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) if s.trim_start().starts_with('[') => serde_json::from_str(&s)
            .map(string_list_of)
            .unwrap_or_default(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Interpret a JSON value as a decimal.
pub fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default)]
        amount: Amount,
        #[serde(default)]
        count: Count,
        #[serde(default)]
        text: Text,
        #[serde(default)]
        flag: Flag,
        #[serde(default)]
        at: Timestamp,
        #[serde(default)]
        list: StringList,
    }

    fn sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_amount_accepts_numbers_and_strings() {
        assert_eq!(sample(r#"{"amount": 499}"#).amount.0, Some(Decimal::new(499, 0)));
        assert_eq!(sample(r#"{"amount": "499.50"}"#).amount.0, Some(Decimal::new(49950, 2)));
        assert_eq!(sample(r#"{"amount": 12.5}"#).amount.0, Some(Decimal::new(125, 1)));
        assert_eq!(sample(r#"{"amount": null}"#).amount.0, None);
        assert_eq!(sample(r#"{"amount": "n/a"}"#).amount.0, None);
        assert_eq!(sample(r#"{"amount": 0}"#).amount.nonzero(), None);
        assert_eq!(sample("{}").amount.or_zero(), Decimal::ZERO);
    }

    #[test]
    fn test_count_truncates() {
        assert_eq!(sample(r#"{"count": "3"}"#).count.0, Some(3));
        assert_eq!(sample(r#"{"count": 2.9}"#).count.0, Some(2));
        assert_eq!(sample(r#"{"count": true}"#).count.0, None);
    }

    #[test]
    fn test_text_blank_is_missing() {
        assert_eq!(sample(r#"{"text": "  "}"#).text.0, None);
        assert_eq!(sample(r#"{"text": 42}"#).text.0.as_deref(), Some("42"));
        assert_eq!(
            Text(None).or(Text(Some("b".to_string()))).0.as_deref(),
            Some("b")
        );
    }

    #[test]
    fn test_flag_shapes() {
        assert_eq!(sample(r#"{"flag": 1}"#).flag.0, Some(true));
        assert_eq!(sample(r#"{"flag": "false"}"#).flag.0, Some(false));
        assert_eq!(sample(r#"{"flag": "maybe"}"#).flag.0, None);
    }

    #[test]
    fn test_timestamp_shapes() {
        let rfc = sample(r#"{"at": "2024-03-05T10:15:00.000Z"}"#).at.0.unwrap();
        assert_eq!(rfc.to_rfc3339(), "2024-03-05T10:15:00+00:00");

        let naive = sample(r#"{"at": "2024-03-05 10:15:00"}"#).at.0.unwrap();
        assert_eq!(naive, rfc);

        assert!(sample(r#"{"at": "2024-03-05"}"#).at.0.is_some());
        assert!(sample(r#"{"at": "yesterday"}"#).at.0.is_none());
    }

    #[test]
    fn test_string_list_shapes() {
        assert_eq!(sample(r#"{"list": ["a", " b ", ""]}"#).list.0, vec!["a", "b"]);
        assert_eq!(sample(r#"{"list": "[\"x\",\"y\"]"}"#).list.0, vec!["x", "y"]);
        assert_eq!(sample(r#"{"list": "aloe, neem"}"#).list.0, vec!["aloe", "neem"]);
        assert!(sample(r#"{"list": null}"#).list.0.is_empty());
    }
}
