//! Job board core: feed normalization, filtering, table projection and the
//! pure state machine driving the board.
mod effect;
mod error;
mod feed;
mod filter;
mod msg;
mod record;
mod refresh;
mod settings;
mod state;
mod stats;
mod table;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::BoardError;
pub use feed::{
    normalize_json_job, normalize_sheet_row, parse_json_feed, parse_sheet_feed, parse_timestamp,
    strip_sheet_wrapper, TimestampZone, SHEET_PREFIX_LEN, SHEET_SUFFIX_LEN,
};
pub use filter::{filter_options, visible, FilterOptions, FilterState, Selection};
pub use msg::Msg;
pub use record::{FeedEnvelope, JobRecord, NOT_AVAILABLE};
pub use refresh::{
    check_freshness, format_remaining, Freshness, RefreshPhase, RefreshSchedule, RefreshStep,
};
pub use settings::{BoardSettings, LoadErrorPolicy, DEFAULT_FRESHNESS_THRESHOLD_SECS};
pub use state::{AppState, LoadStatus, Notice, NoticeSeverity};
pub use stats::{humanize_elapsed, summarize, Stats, JUST_NOW};
pub use table::{
    build_rows, paginate, parse_listing_date, project_row, searchable_text, sort_rows,
    BadgePalette, BadgeStyle, DateOrdering, LinkCell, SortColumn, SortDirection, SortOrder,
    TablePage, TableRow, DEFAULT_PAGE_SIZE,
};
pub use update::update;
pub use view_model::{AppViewModel, RefreshView};
