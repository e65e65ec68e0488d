//! Time-derived file suffixes.
//!
//! A [`SuffixFormat`] maps a point in local time to the string appended to a
//! rotated file's name. Two instants that map to the same string belong to the
//! same window, so the format both names rotated files and decides when a
//! rotation is due.

use crate::error::Error;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

pub const SUFFIX_DAY: &str = "%Y%m%d";
pub const SUFFIX_HOUR: &str = "%Y%m%d%H";
pub const SUFFIX_MINUTE: &str = "%Y%m%d%H%M";
pub const SUFFIX_SECOND: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SuffixFormat {
    Day,
    Hour,
    Minute,
    Second,
    /// Any strftime pattern chrono can render. Build it with
    /// [`SuffixFormat::custom`] to have the pattern checked up front.
    Custom(String),
}

impl SuffixFormat {
    pub fn custom(pattern: impl Into<String>) -> Result<Self, Error> {
        let pattern = pattern.into();
        if pattern.trim().is_empty()
            || StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error))
        {
            return Err(Error::InvalidSuffixFormat(pattern));
        }
        Ok(SuffixFormat::Custom(pattern))
    }

    pub fn pattern(&self) -> &str {
        match self {
            SuffixFormat::Day => SUFFIX_DAY,
            SuffixFormat::Hour => SUFFIX_HOUR,
            SuffixFormat::Minute => SUFFIX_MINUTE,
            SuffixFormat::Second => SUFFIX_SECOND,
            SuffixFormat::Custom(pattern) => pattern,
        }
    }

    pub fn format(&self, time: &DateTime<Local>) -> String {
        let mut suffix = String::new();
        // An unrenderable custom pattern leaves whatever was written before the
        // failing item.
        let _ = write!(suffix, "{}", time.format(self.pattern()));
        suffix
    }
}

impl fmt::Display for SuffixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuffixFormat::Day => f.write_str("day"),
            SuffixFormat::Hour => f.write_str("hour"),
            SuffixFormat::Minute => f.write_str("minute"),
            SuffixFormat::Second => f.write_str("second"),
            SuffixFormat::Custom(pattern) => f.write_str(pattern),
        }
    }
}

impl FromStr for SuffixFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(SuffixFormat::Day),
            "hour" | "hourly" => Ok(SuffixFormat::Hour),
            "minute" | "minutely" => Ok(SuffixFormat::Minute),
            "second" | "secondly" => Ok(SuffixFormat::Second),
            _ => SuffixFormat::custom(s),
        }
    }
}

impl TryFrom<String> for SuffixFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SuffixFormat> for String {
    fn from(format: SuffixFormat) -> Self {
        format.to_string()
    }
}

/// Source of the current time for the write path.
pub(crate) trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
