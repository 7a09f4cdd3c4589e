use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

pub const DEFAULT_LOOKBACK_HOURS: i64 = 7 * 24;

/// Trailing query window. `start` is always the earlier instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// `None` when `now - lookback` falls outside the representable range.
    pub fn trailing(now: DateTime<Utc>, lookback: TimeDelta) -> Option<Self> {
        let lookback = if lookback < TimeDelta::zero() { -lookback } else { lookback };
        let start = now.checked_sub_signed(lookback)?;
        Some(Self { start, end: now })
    }

    pub fn trailing_hours(now: DateTime<Utc>, hours: i64) -> Option<Self> {
        Self::trailing(now, TimeDelta::try_hours(hours)?)
    }

    pub fn start_param(&self) -> String { iso(self.start) }
    pub fn end_param(&self) -> String { iso(self.end) }

    /// `(name, value)` pairs in the order they go on the query string.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("start", self.start_param()), ("end", self.end_param())]
    }
}

// Millisecond precision with a `Z` suffix, e.g. 2024-05-01T12:00:00.000Z
fn iso(t: DateTime<Utc>) -> String { t.to_rfc3339_opts(SecondsFormat::Millis, true) }
