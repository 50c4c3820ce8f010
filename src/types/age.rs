//! Integer timestamp wrapper used for the `age` attribute.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{BookmergeError, Result};

/// `[-2^63, 2^63)`: integral floats in this range convert to `i64` exactly.
const I64_FLOAT_MIN: f64 = -9_223_372_036_854_775_808.0;
const I64_FLOAT_END: f64 = 9_223_372_036_854_775_808.0;

/// Seconds since the Unix epoch at which a bookmark was created.
///
/// Compared by value only. Parsing accepts integers, integral floats (`1e6`), and
/// numeric strings, which covers every shape the extractor and older snapshots emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgeValue(i64);

impl AgeValue {
    #[must_use]
    pub const fn new(seconds: i64) -> Self {
        Self(seconds)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Calendar form of the timestamp; `None` when outside chrono's range.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    #[must_use]
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.timestamp())
    }

    /// `YYYY-MM-DD HH:MM:SS` rendering used by match listings.
    #[must_use]
    pub fn time_str(self) -> String {
        self.to_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| self.0.to_string())
    }

    /// Coerce a JSON scalar into an age.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Number(number) => {
                if let Some(seconds) = number.as_i64() {
                    return Ok(Self(seconds));
                }
                match number.as_f64() {
                    Some(float)
                        if float.fract() == 0.0 && (I64_FLOAT_MIN..I64_FLOAT_END).contains(&float) =>
                    {
                        Ok(Self(float as i64))
                    }
                    _ => Err(BookmergeError::InvalidAge {
                        value: number.to_string(),
                    }),
                }
            }
            Value::String(text) => text.parse(),
            other => Err(BookmergeError::InvalidAge {
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for AgeValue {
    type Err = BookmergeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| BookmergeError::InvalidAge {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for AgeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AgeValue {
    fn from(seconds: i64) -> Self {
        Self(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn compares_by_value() {
        let a = AgeValue::new(5);
        let b = AgeValue::new(5);
        assert_eq!(a, b);
        assert_eq!(a.time_str(), b.time_str());

        let later = AgeValue::from_datetime(Utc.with_ymd_and_hms(1970, 12, 31, 18, 0, 5).unwrap());
        assert_ne!(later, b);
        assert!(later > b);
        assert!(b <= later);
    }

    #[test]
    fn datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2009, 7, 24, 12, 30, 0).unwrap();
        let age = AgeValue::from_datetime(dt);
        assert_eq!(age.to_datetime(), Some(dt));
        assert_eq!(age.time_str(), "2009-07-24 12:30:00");
    }

    #[test]
    fn parses_json_shapes() {
        assert_eq!(AgeValue::from_json(&json!(100)).unwrap(), AgeValue::new(100));
        assert_eq!(AgeValue::from_json(&json!("  42 ")).unwrap(), AgeValue::new(42));
        assert_eq!(
            AgeValue::from_json(&json!(1e6)).unwrap(),
            AgeValue::new(1_000_000)
        );
        assert!(AgeValue::from_json(&json!("yesterday")).is_err());
        assert!(AgeValue::from_json(&json!(1.5)).is_err());
        assert!(AgeValue::from_json(&json!([1])).is_err());
    }

    #[test]
    fn out_of_range_floats_are_rejected() {
        let err = AgeValue::from_json(&json!(1e300)).unwrap_err();
        assert!(matches!(err, BookmergeError::InvalidAge { .. }));
        assert!(AgeValue::from_json(&json!(-1e19)).is_err());
        assert!(AgeValue::from_json(&json!(9.3e18)).is_err());
        assert_eq!(
            AgeValue::from_json(&json!(-9.0e18)).unwrap(),
            AgeValue::new(-9_000_000_000_000_000_000)
        );
    }
}
