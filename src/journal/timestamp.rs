//! Timestamp parsing shared by ingestion and retrieval.
//!
//! Timestamps are `"YYYY-MM-DD HH:MM:SS"` strings in local time. Both entries
//! and range bounds go through [`parse_timestamp`], so comparisons stay
//! consistent whatever the local offset is.

use chrono::{Local, NaiveDateTime, TimeZone};

use crate::error::{JournalError, JournalResult};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a timestamp string into epoch seconds.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// nonexistent ones (DST spring-forward gap) are rejected.
pub fn parse_timestamp(value: &str) -> JournalResult<i64> {
    let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|_| JournalError::invalid_timestamp(value))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| JournalError::invalid_timestamp(value))
}

/// Format an epoch-seconds value the way entries store it.
pub fn format_timestamp(epoch: i64) -> Option<String> {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}

/// The current local time as a timestamp string.
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Inclusive range of epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn parse(start: &str, end: &str) -> JournalResult<Self> {
        Ok(Self {
            start: parse_timestamp(start)?,
            end: parse_timestamp(end)?,
        })
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}
