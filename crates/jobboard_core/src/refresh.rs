use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::BoardError;

/// Where the smart-refresh flow currently is.
///
/// `AlreadyFresh` and `Failed` end a single attempt; the next click starts over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    #[default]
    Idle,
    Triggering,
    Waiting {
        /// Zero-based index of the step being waited on.
        step: usize,
        total_steps: usize,
        label: String,
    },
    Reloading,
    AlreadyFresh {
        remaining: TimeDelta,
    },
    Failed(BoardError),
}

impl RefreshPhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            RefreshPhase::Triggering | RefreshPhase::Waiting { .. } | RefreshPhase::Reloading
        )
    }

    /// Completed steps as a percentage of the schedule.
    pub fn progress_percent(&self) -> u8 {
        match self {
            RefreshPhase::Waiting {
                step, total_steps, ..
            } if *total_steps > 0 => ((step * 100) / total_steps).min(100) as u8,
            RefreshPhase::Reloading => 100,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Stale,
    Fresh { remaining: TimeDelta },
}

/// Data younger than `threshold` is fresh; unknown age is always stale.
/// A timestamp ahead of `now` counts as age zero.
pub fn check_freshness(
    last_updated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    threshold: TimeDelta,
) -> Freshness {
    let Some(updated) = last_updated else {
        return Freshness::Stale;
    };
    let age = (now - updated).max(TimeDelta::zero());
    match threshold.checked_sub(&age) {
        Some(remaining) if remaining > TimeDelta::zero() => Freshness::Fresh { remaining },
        _ => Freshness::Stale,
    }
}

/// `"3h 12m"`, `"45m"`, or `"less than a minute"`.
pub fn format_remaining(remaining: TimeDelta) -> String {
    let minutes = remaining.num_minutes().max(0);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    match (hours, minutes) {
        (0, 0) => "less than a minute".to_string(),
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshStep {
    pub label: String,
    pub wait_secs: u64,
}

impl RefreshStep {
    pub fn new(label: impl Into<String>, wait_secs: u64) -> Self {
        Self {
            label: label.into(),
            wait_secs,
        }
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }
}

/// Fixed waits walked after the remote run is triggered.
///
/// The remote run's status is never polled; the schedule only approximates
/// how long the scraper workflow usually takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshSchedule {
    pub steps: Vec<RefreshStep>,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self {
            steps: vec![
                RefreshStep::new("Starting scraper run", 10),
                RefreshStep::new("Scraping job sources", 30),
                RefreshStep::new("Publishing jobs feed", 20),
                RefreshStep::new("Waiting for deployment", 10),
            ],
        }
    }
}

impl RefreshSchedule {
    pub fn total_wait(&self) -> Duration {
        self.steps.iter().map(RefreshStep::wait).sum()
    }
}
