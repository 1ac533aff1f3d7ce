//! Culture-independent number and timestamp formatting.
//!
//! Every textual representation the toolkit reads or writes goes through a
//! [`NumberFormat`] value that callers pass in explicitly.  Output always
//! uses `.` as the decimal separator and a fixed number of decimals for
//! coordinates; parsing accepts exactly that syntax and nothing
//! locale-specific.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::units::Angle;
use crate::{CoreError, CoreResult};

/// Formatting and parsing policy for persisted numeric fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberFormat {
    /// Decimal places written for latitudes and longitudes (in degrees).
    pub coordinate_decimals: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self { coordinate_decimals: 6 }
    }
}

impl NumberFormat {
    /// Degrees with the configured fixed precision, e.g. `60.000000`.
    pub fn format_degrees(&self, angle: Angle) -> String {
        format!("{:.*}", self.coordinate_decimals, angle.degrees())
    }

    /// Shortest representation that parses back to the identical `f64`.
    pub fn format_f64(&self, value: f64) -> String {
        format!("{value}")
    }

    pub fn format_bool(&self, value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    /// RFC 3339 in UTC with only as many fractional digits as needed.
    pub fn format_timestamp(&self, time: DateTime<Utc>) -> String {
        time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn parse_f64(&self, text: &str) -> CoreResult<f64> {
        text.trim()
            .parse::<f64>()
            .map_err(|_| CoreError::InvalidNumber { value: text.to_owned() })
    }

    pub fn parse_degrees(&self, text: &str) -> CoreResult<Angle> {
        self.parse_f64(text).map(Angle::from_degrees)
    }

    /// Accepts `true`/`false` and `1`/`0`.
    pub fn parse_bool(&self, text: &str) -> CoreResult<bool> {
        match text.trim() {
            "true" | "1"  => Ok(true),
            "false" | "0" => Ok(false),
            other         => Err(CoreError::InvalidNumber { value: other.to_owned() }),
        }
    }

    pub fn parse_timestamp(&self, text: &str) -> CoreResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| CoreError::InvalidTimestamp {
                value:  text.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Empty text means "never".
    pub fn parse_optional_timestamp(&self, text: &str) -> CoreResult<Option<DateTime<Utc>>> {
        if text.trim().is_empty() {
            Ok(None)
        } else {
            self.parse_timestamp(text).map(Some)
        }
    }

    pub fn format_optional_timestamp(&self, time: Option<DateTime<Utc>>) -> String {
        time.map(|t| self.format_timestamp(t)).unwrap_or_default()
    }
}
