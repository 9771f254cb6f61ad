use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::table::{BadgePalette, DateOrdering, DEFAULT_PAGE_SIZE};

/// Four hours.
pub const DEFAULT_FRESHNESS_THRESHOLD_SECS: u64 = 4 * 60 * 60;

/// What the board does when the initial load fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadErrorPolicy {
    /// Raise an alert in addition to the in-place error message.
    #[default]
    Alert,
    /// Only log the failure and show the in-place error message.
    LogOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub freshness_threshold_secs: u64,
    pub page_size: usize,
    pub palette: BadgePalette,
    pub date_ordering: DateOrdering,
    pub load_error_policy: LoadErrorPolicy,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            freshness_threshold_secs: DEFAULT_FRESHNESS_THRESHOLD_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            palette: BadgePalette::default(),
            date_ordering: DateOrdering::default(),
            load_error_policy: LoadErrorPolicy::default(),
        }
    }
}

impl BoardSettings {
    pub fn freshness_threshold(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.freshness_threshold_secs.min(i64::MAX as u64) as i64)
            .unwrap_or(TimeDelta::MAX)
    }
}
