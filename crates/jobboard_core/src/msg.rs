use chrono::{DateTime, Utc};

use crate::{BoardError, FeedEnvelope, Selection, SortOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page opened, or the user asked for a plain reload.
    LoadRequested,
    /// Data source adapter finished.
    FeedLoaded(Result<FeedEnvelope, BoardError>),
    /// User picked a source in the source dropdown.
    SourceSelected(Selection),
    /// User picked a qualification in the qualification dropdown.
    QualificationSelected(Selection),
    /// User edited the free-text search box.
    SearchChanged(String),
    /// User reset every filter.
    FiltersCleared,
    /// User clicked a column header.
    SortChanged(SortOrder),
    /// User moved to another table page (zero-based).
    PageChanged(usize),
    /// User clicked the smart-refresh button.
    RefreshClicked { now: DateTime<Utc> },
    /// Remote automation trigger answered.
    RefreshTriggered(Result<(), BoardError>),
    /// A fixed wait step of the refresh schedule started.
    RefreshProgress {
        step: usize,
        total_steps: usize,
        label: String,
    },
    /// Waits are over; the feed is being fetched again.
    RefreshReloadStarted,
    /// Post-refresh fetch finished.
    RefreshReloaded(Result<FeedEnvelope, BoardError>),
    /// User closed the status message.
    NoticeDismissed,
}
