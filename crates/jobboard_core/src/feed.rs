//! Normalization of raw feed payloads into [`FeedEnvelope`]s.
//!
//! Two payload shapes are understood: the spreadsheet "gviz" export, which is
//! JSON wrapped in a JavaScript callback, and the plain `jobs.json` document
//! written by the scraper.

use board_logging::board_warn;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{BoardError, FeedEnvelope, JobRecord, NOT_AVAILABLE};

/// Length of `/*O_o*/\ngoogle.visualization.Query.setResponse(`.
pub const SHEET_PREFIX_LEN: usize = 47;
/// Length of the trailing `);`.
pub const SHEET_SUFFIX_LEN: usize = 2;

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Zone that offset-less feed timestamps were written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampZone {
    /// The zone of the machine reading the feed.
    #[default]
    Local,
    Utc,
    /// Minutes east of UTC.
    Fixed { offset_minutes: i32 },
}

impl TimestampZone {
    /// Pins a wall-clock time to an instant. Ambiguous times take the
    /// earlier instant; times skipped by a DST jump yield `None`.
    pub fn resolve(self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            TimestampZone::Local => to_utc(&Local, naive),
            TimestampZone::Utc => Some(naive.and_utc()),
            TimestampZone::Fixed { offset_minutes } => {
                let offset = FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
                to_utc(&offset, naive)
            }
        }
    }
}

fn to_utc<Tz: TimeZone>(zone: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|instant| instant.with_timezone(&Utc))
}

#[derive(Debug, Deserialize)]
struct SheetResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<SheetIssue>,
    #[serde(default)]
    table: Option<SheetTable>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct SheetIssue {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detailed_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SheetTable {
    #[serde(default)]
    rows: Vec<SheetRow>,
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(default)]
    c: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonFeed {
    #[serde(default)]
    jobs: Vec<Value>,
    #[serde(default)]
    total_jobs: Option<Value>,
    #[serde(default)]
    last_updated: Option<String>,
}

/// Removes the fixed-length callback wrapper around a spreadsheet export.
pub fn strip_sheet_wrapper(body: &str) -> Result<&str, BoardError> {
    let wrapper_len = SHEET_PREFIX_LEN + SHEET_SUFFIX_LEN;
    if body.len() < wrapper_len {
        return Err(BoardError::Parse(format!(
            "spreadsheet response is {} bytes, shorter than its {wrapper_len}-byte wrapper",
            body.len()
        )));
    }
    body.get(SHEET_PREFIX_LEN..body.len() - SHEET_SUFFIX_LEN)
        .ok_or_else(|| BoardError::Parse("spreadsheet wrapper is not ASCII".to_string()))
}

/// Parses a wrapped spreadsheet export.
///
/// `total_jobs` is the row count because the export carries no separate
/// count, and `last_updated` comes from the first row's scrape timestamp.
pub fn parse_sheet_feed(body: &str, zone: TimestampZone) -> Result<FeedEnvelope, BoardError> {
    let payload = strip_sheet_wrapper(body)?;
    let response: SheetResponse = serde_json::from_str(payload)
        .map_err(|err| BoardError::Parse(format!("spreadsheet payload: {err}")))?;

    if response.status.as_deref() == Some("error") {
        let reason = response
            .errors
            .iter()
            .filter_map(|issue| issue.detailed_message.as_ref().or(issue.message.as_ref()))
            .cloned()
            .collect::<Vec<_>>()
            .join("; ");
        return Err(BoardError::Parse(format!("spreadsheet reported an error: {reason}")));
    }

    let table = response
        .table
        .ok_or_else(|| BoardError::Parse("spreadsheet payload has no table".to_string()))?;
    let jobs: Vec<JobRecord> = table
        .rows
        .iter()
        .map(|row| normalize_sheet_row(&row.c))
        .collect();

    let last_updated = jobs
        .first()
        .and_then(|job| parse_feed_timestamp(&job.scraped_at, "scrapedAt", zone));

    Ok(FeedEnvelope {
        total_jobs: jobs.len(),
        jobs,
        last_updated,
    })
}

/// Maps one spreadsheet row to a record by cell position.
///
/// Cells are `{ "v": value, ... }` objects or `null`.
pub fn normalize_sheet_row(cells: &[Value]) -> JobRecord {
    let cell = |index: usize| {
        cells
            .get(index)
            .and_then(|entry| entry.get("v"))
            .and_then(cell_text)
    };

    JobRecord {
        source: cell(0).unwrap_or_else(not_available),
        title: cell(1).unwrap_or_else(not_available),
        posts: cell(2).unwrap_or_else(not_available),
        qualification: cell(3).unwrap_or_else(not_available),
        last_date: cell(4).unwrap_or_else(not_available),
        link: cell(5).unwrap_or_default(),
        scraped_at: cell(6).unwrap_or_default(),
    }
}

/// Parses the `jobs.json` document produced by the scraper.
pub fn parse_json_feed(body: &str, zone: TimestampZone) -> Result<FeedEnvelope, BoardError> {
    let feed: JsonFeed = serde_json::from_str(body)
        .map_err(|err| BoardError::Parse(format!("jobs document: {err}")))?;

    let jobs: Vec<JobRecord> = feed
        .jobs
        .iter()
        .filter_map(|job| {
            if job.is_object() {
                Some(normalize_json_job(job))
            } else {
                board_warn!("Skipping non-object job entry: {}", job);
                None
            }
        })
        .collect();

    let total_jobs = feed
        .total_jobs
        .as_ref()
        .and_then(|total| match total {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .map(|total| total as usize)
        .unwrap_or(jobs.len());

    let last_updated = feed
        .last_updated
        .as_deref()
        .and_then(|raw| parse_feed_timestamp(raw, "lastUpdated", zone));

    Ok(FeedEnvelope {
        jobs,
        total_jobs,
        last_updated,
    })
}

/// Maps one `jobs.json` entry to a record by field name.
pub fn normalize_json_job(job: &Value) -> JobRecord {
    let field = |name: &str| job.get(name).and_then(cell_text);

    JobRecord {
        source: field("source").unwrap_or_else(not_available),
        title: field("title").unwrap_or_else(not_available),
        posts: field("posts").unwrap_or_else(not_available),
        qualification: field("qualification").unwrap_or_else(not_available),
        last_date: field("lastDate").unwrap_or_else(not_available),
        link: field("link").unwrap_or_default(),
        scraped_at: field("scrapedAt").unwrap_or_default(),
    }
}

/// Parses the timestamp formats the feeds are known to emit.
///
/// Values carrying an offset are exact; offset-less ones are read in `zone`.
pub fn parse_timestamp(raw: &str, zone: TimestampZone) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return zone.resolve(naive);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| zone.resolve(naive))
}

fn parse_feed_timestamp(raw: &str, field: &str, zone: TimestampZone) -> Option<DateTime<Utc>> {
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_timestamp(raw, zone);
    if parsed.is_none() {
        board_warn!("Ignoring unparseable {} timestamp {:?}", field, raw);
    }
    parsed
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(gviz_date_literal(s).unwrap_or_else(|| s.clone())),
        Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
            _ => n.to_string(),
        }),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Converts `Date(2025,0,31)` / `Date(2025,0,31,9,30,0)` (zero-based month)
/// into ISO text.
fn gviz_date_literal(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix("Date(")?.strip_suffix(')')?;
    let parts: Vec<u32> = inner
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .ok()?;

    let date = match parts.as_slice() {
        [year, month, day, ..] => NaiveDate::from_ymd_opt(*year as i32, month + 1, *day)?,
        _ => return None,
    };
    match parts.as_slice() {
        [_, _, _] => Some(date.format("%Y-%m-%d").to_string()),
        [_, _, _, hour, minute, second, ..] => Some(
            date.and_hms_opt(*hour, *minute, *second)?
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
        ),
        _ => None,
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::{cell_text, gviz_date_literal};
    use serde_json::json;

    #[test]
    fn gviz_dates_become_iso_text() {
        assert_eq!(gviz_date_literal("Date(2025,0,31)").as_deref(), Some("2025-01-31"));
        assert_eq!(
            gviz_date_literal("Date(2024,11,1,9,5,7)").as_deref(),
            Some("2024-12-01T09:05:07")
        );
        assert_eq!(gviz_date_literal("Date(2025,13,1)"), None);
        assert_eq!(gviz_date_literal("Data Entry Operator"), None);
    }

    #[test]
    fn integral_numbers_drop_the_fraction() {
        assert_eq!(cell_text(&json!(120)).as_deref(), Some("120"));
        assert_eq!(cell_text(&json!(120.0)).as_deref(), Some("120"));
        assert_eq!(cell_text(&json!(2.5)).as_deref(), Some("2.5"));
        assert_eq!(cell_text(&json!("")), None);
        assert_eq!(cell_text(&json!(null)), None);
    }
}
