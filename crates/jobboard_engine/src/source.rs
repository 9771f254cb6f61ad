use board_logging::{board_info, board_warn};
use chrono::{DateTime, Utc};
use jobboard_core::{parse_json_feed, parse_sheet_feed, BoardError, FeedEnvelope, TimestampZone};
use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::decode::decode_text;
use crate::fetch::Fetcher;
use crate::{FailureKind, FetchError};

const SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";
const CACHE_BUST_PARAM: &str = "t";

/// Where the board reads its jobs from.
///
/// `timestamps` names the zone of offset-less feed timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    /// Spreadsheet export in the wrapped "gviz" JSON format.
    Sheet {
        url: String,
        #[serde(default)]
        timestamps: TimestampZone,
    },
    /// Tab of a public spreadsheet, addressed by id and tab name.
    SheetTab {
        sheet_id: String,
        sheet_name: String,
        #[serde(default)]
        timestamps: TimestampZone,
    },
    /// Static `jobs.json` document.
    JsonDocument {
        url: String,
        #[serde(default = "default_cache_bust")]
        cache_bust: bool,
        #[serde(default)]
        timestamps: TimestampZone,
    },
}

fn default_cache_bust() -> bool {
    true
}

fn sheet_export_url(sheet_id: &str, sheet_name: &str) -> String {
    let id: String = form_urlencoded::byte_serialize(sheet_id.as_bytes()).collect();
    let name: String = form_urlencoded::byte_serialize(sheet_name.as_bytes()).collect();
    format!("{SHEETS_BASE}/{id}/gviz/tq?tqx=out:json&sheet={name}")
}

impl FeedSource {
    pub fn json_document(url: impl Into<String>) -> Self {
        FeedSource::JsonDocument {
            url: url.into(),
            cache_bust: true,
            timestamps: TimestampZone::default(),
        }
    }

    pub fn timestamps(&self) -> TimestampZone {
        match self {
            FeedSource::Sheet { timestamps, .. }
            | FeedSource::SheetTab { timestamps, .. }
            | FeedSource::JsonDocument { timestamps, .. } => *timestamps,
        }
    }

    /// The URL to request, with a timestamp parameter when cache busting.
    pub fn request_url(&self, now: DateTime<Utc>) -> Result<String, FetchError> {
        match self {
            FeedSource::Sheet { url, .. } => Ok(url.clone()),
            FeedSource::SheetTab {
                sheet_id,
                sheet_name,
                ..
            } => Ok(sheet_export_url(sheet_id, sheet_name)),
            FeedSource::JsonDocument {
                url, cache_bust, ..
            } => {
                if !cache_bust {
                    return Ok(url.clone());
                }
                let mut parsed = Url::parse(url)
                    .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
                parsed
                    .query_pairs_mut()
                    .append_pair(CACHE_BUST_PARAM, &now.timestamp_millis().to_string());
                Ok(parsed.to_string())
            }
        }
    }

    pub fn parse(&self, body: &str) -> Result<FeedEnvelope, BoardError> {
        match self {
            FeedSource::Sheet { .. } | FeedSource::SheetTab { .. } => {
                parse_sheet_feed(body, self.timestamps())
            }
            FeedSource::JsonDocument { .. } => parse_json_feed(body, self.timestamps()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            FeedSource::Sheet { .. } | FeedSource::SheetTab { .. } => "spreadsheet",
            FeedSource::JsonDocument { .. } => "json document",
        }
    }
}

/// Fetches and normalizes the configured feed.
///
/// Never panics on bad input; every failure comes back as a [`BoardError`].
pub async fn fetch_jobs(
    fetcher: &dyn Fetcher,
    source: &FeedSource,
    now: DateTime<Utc>,
) -> Result<FeedEnvelope, BoardError> {
    let url = source.request_url(now)?;
    let output = fetcher.fetch(&url).await.inspect_err(|err| {
        board_warn!("Fetching {} feed from {} failed: {}", source.kind(), url, err);
    })?;

    let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref())
        .map_err(|err| BoardError::Parse(err.to_string()))?;
    let feed = source.parse(&decoded.text)?;

    board_info!(
        "Fetched {} feed: {} records ({} bytes, {})",
        source.kind(),
        feed.jobs.len(),
        output.metadata.byte_len,
        decoded.encoding_label
    );
    feed.non_empty()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use jobboard_core::TimestampZone;

    use super::FeedSource;

    #[test]
    fn sheet_tab_url_encodes_tab_name() {
        let source = FeedSource::SheetTab {
            sheet_id: "abc123".to_string(),
            sheet_name: "Jobs List".to_string(),
            timestamps: TimestampZone::Utc,
        };
        assert_eq!(
            source.request_url(Utc::now()).unwrap(),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out:json&sheet=Jobs+List"
        );
    }

    #[test]
    fn cache_buster_is_appended_to_existing_query() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let source = FeedSource::json_document("https://example.com/jobs.json?v=2");
        assert_eq!(
            source.request_url(now).unwrap(),
            "https://example.com/jobs.json?v=2&t=1700000000123"
        );

        let plain = FeedSource::JsonDocument {
            url: "https://example.com/jobs.json".to_string(),
            cache_bust: false,
            timestamps: TimestampZone::Local,
        };
        assert_eq!(plain.request_url(now).unwrap(), "https://example.com/jobs.json");
    }

    #[test]
    fn invalid_document_url_is_reported() {
        let source = FeedSource::json_document("not a url");
        assert!(source.request_url(Utc::now()).is_err());
    }

    #[test]
    fn zone_defaults_to_local() {
        assert_eq!(
            FeedSource::json_document("https://example.com/jobs.json").timestamps(),
            TimestampZone::Local
        );
    }
}
