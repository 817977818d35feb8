// Time window domain model
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// User-selected lookback range. Drives both the upstream query and the
/// aggregation bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "1h")]
    LastHour,
    #[default]
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "all")]
    All,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::LastHour => "1h",
            TimeWindow::LastDay => "24h",
            TimeWindow::LastWeek => "7d",
            TimeWindow::All => "all",
        }
    }

    /// Lookback in hours, or `None` for the whole history.
    pub fn hours(self) -> Option<u32> {
        match self {
            TimeWindow::LastHour => Some(1),
            TimeWindow::LastDay => Some(24),
            TimeWindow::LastWeek => Some(7 * 24),
            TimeWindow::All => None,
        }
    }

    /// Query string for the upstream readings endpoint.
    pub fn query_string(self) -> String {
        match self.hours() {
            Some(hours) => format!("hours={}", hours),
            None => "all=true".to_string(),
        }
    }

    /// Bucket width for a series spanning `span_ms`. `None` means points are
    /// plotted as-is.
    pub fn bucket_width_ms(self, span_ms: i64) -> Option<i64> {
        match self {
            TimeWindow::LastHour => None,
            TimeWindow::LastDay => Some(10 * MINUTE_MS),
            TimeWindow::LastWeek => Some(2 * HOUR_MS),
            TimeWindow::All => Some(match span_ms {
                s if s > 365 * DAY_MS => 7 * DAY_MS,
                s if s > 180 * DAY_MS => 3 * DAY_MS,
                s if s > 30 * DAY_MS => DAY_MS,
                s if s > 7 * DAY_MS => 12 * HOUR_MS,
                _ => 6 * HOUR_MS,
            }),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
