use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::BoardError;

/// Placeholder substituted for missing text fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// One normalized job posting.
///
/// Every field is always populated: text columns fall back to
/// [`NOT_AVAILABLE`], `link` and `scraped_at` fall back to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub source: String,
    pub title: String,
    pub posts: String,
    pub qualification: String,
    pub last_date: String,
    pub link: String,
    pub scraped_at: String,
}

impl Default for JobRecord {
    fn default() -> Self {
        Self {
            source: NOT_AVAILABLE.to_string(),
            title: NOT_AVAILABLE.to_string(),
            posts: NOT_AVAILABLE.to_string(),
            qualification: NOT_AVAILABLE.to_string(),
            last_date: NOT_AVAILABLE.to_string(),
            link: String::new(),
            scraped_at: String::new(),
        }
    }
}

/// A batch of records plus the metadata the feed reported alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedEnvelope {
    pub jobs: Vec<JobRecord>,
    /// Count reported by the feed; trusted over `jobs.len()` for display.
    pub total_jobs: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

impl FeedEnvelope {
    /// Rejects a batch without records.
    pub fn non_empty(self) -> Result<Self, BoardError> {
        if self.jobs.is_empty() {
            Err(BoardError::EmptyResult)
        } else {
            Ok(self)
        }
    }
}
