//! Value objects shared across the storefront domain.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identifier in the `P`-prefixed zero-padded form assigned by the
/// id tracker: `P001`, `P042`, `P1000` once the sequence outgrows three
/// digits. Ids read back from disk are taken as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("P{seq:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reporting window measured back from a reference instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timeframe {
    Day,
    Week,
    Month,
    Year,
}

impl Timeframe {
    /// Start of the window: `now` minus 1, 7, 30 or 365 days.
    pub fn start_from(self, now: NaiveDateTime) -> NaiveDateTime {
        let days = match self {
            Timeframe::Day => 1,
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Year => 365,
        };
        now - Duration::days(days)
    }
}
