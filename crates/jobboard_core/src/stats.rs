use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::FeedEnvelope;

const SECONDS_PER_YEAR: i64 = 31_536_000;
const SECONDS_PER_MONTH: i64 = 2_592_000;
const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Coarse units, largest first. Months and years are fixed-length.
const UNITS: &[(i64, &str)] = &[
    (SECONDS_PER_YEAR, "y"),
    (SECONDS_PER_MONTH, "mo"),
    (SECONDS_PER_DAY, "d"),
    (SECONDS_PER_HOUR, "h"),
    (SECONDS_PER_MINUTE, "m"),
];

pub const JUST_NOW: &str = "just now";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_jobs: usize,
    pub distinct_source_count: usize,
    pub last_update_relative: Option<String>,
    pub last_update_absolute: Option<String>,
}

/// Derives the header figures for a loaded feed.
pub fn summarize(envelope: &FeedEnvelope, now: DateTime<Utc>) -> Stats {
    let distinct_source_count = envelope
        .jobs
        .iter()
        .map(|job| job.source.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let (last_update_relative, last_update_absolute) = match envelope.last_updated {
        Some(updated) => (
            Some(humanize_elapsed((now - updated).num_seconds())),
            Some(updated.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ),
        None => (None, None),
    };

    Stats {
        total_jobs: envelope.total_jobs,
        distinct_source_count,
        last_update_relative,
        last_update_absolute,
    }
}

/// Formats an elapsed duration as `"{n}{unit} ago"` using the largest unit
/// whose whole quotient exceeds one, or [`JUST_NOW`].
pub fn humanize_elapsed(elapsed_seconds: i64) -> String {
    let elapsed = elapsed_seconds.max(0);
    UNITS
        .iter()
        .find_map(|(unit_seconds, suffix)| {
            let quotient = elapsed / unit_seconds;
            (quotient > 1).then(|| format!("{quotient}{suffix} ago"))
        })
        .unwrap_or_else(|| JUST_NOW.to_string())
}
