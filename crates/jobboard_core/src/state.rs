use chrono::{DateTime, Utc};

use crate::filter::{filter_options, visible, FilterState, Selection};
use crate::refresh::RefreshPhase;
use crate::stats::summarize;
use crate::table::{build_rows, paginate, SortOrder};
use crate::view_model::{AppViewModel, RefreshView};
use crate::{BoardError, BoardSettings, FeedEnvelope, JobRecord};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    NotStarted,
    Loading,
    Ready,
    Failed(BoardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            text: text.into(),
        }
    }
}

/// Everything the board knows during one session.
///
/// Owned by a single controller and only changed through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: BoardSettings,
    feed: FeedEnvelope,
    filter: FilterState,
    sort: SortOrder,
    page: usize,
    load: LoadStatus,
    refresh: RefreshPhase,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new(settings: BoardSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.feed.jobs
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.feed.last_updated
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load
    }

    pub fn refresh_phase(&self) -> &RefreshPhase {
        &self.refresh
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn has_records(&self) -> bool {
        !self.feed.jobs.is_empty()
    }

    /// True while a load or a refresh sequence is outstanding.
    pub fn is_busy(&self) -> bool {
        self.load == LoadStatus::Loading || self.refresh.is_in_flight()
    }

    /// Returns whether the state changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self, now: DateTime<Utc>) -> AppViewModel {
        let records = visible(&self.feed.jobs, &self.filter);
        let rows = build_rows(
            &records,
            &self.settings.palette,
            self.sort,
            self.settings.date_ordering,
        );
        let table = paginate(rows, self.page, self.settings.page_size);

        let stats = match self.load {
            LoadStatus::Ready => Some(summarize(&self.feed, now)),
            _ => None,
        };

        AppViewModel {
            load: self.load.clone(),
            stats,
            options: filter_options(&self.feed.jobs),
            filter: self.filter.clone(),
            sort: self.sort,
            table,
            refresh: RefreshView::from_phase(&self.refresh),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn begin_loading(&mut self) {
        self.load = LoadStatus::Loading;
        self.mark_dirty();
    }

    /// Swaps in a new record set wholesale; nothing from the old batch survives.
    pub(crate) fn install_feed(&mut self, feed: FeedEnvelope) {
        self.feed = feed;
        self.load = LoadStatus::Ready;
        self.page = 0;
        self.mark_dirty();
    }

    /// Starts over from a fresh session holding only `feed`.
    pub(crate) fn reload_with(&mut self, feed: FeedEnvelope) {
        let settings = std::mem::take(&mut self.settings);
        *self = Self::new(settings);
        self.install_feed(feed);
    }

    pub(crate) fn fail_load(&mut self, error: BoardError) {
        self.load = LoadStatus::Failed(error);
        self.mark_dirty();
    }

    pub(crate) fn finish_load_keeping_records(&mut self) {
        self.load = LoadStatus::Ready;
        self.mark_dirty();
    }

    pub(crate) fn set_source(&mut self, selection: Selection) {
        self.filter.source = selection;
        self.page = 0;
        self.mark_dirty();
    }

    pub(crate) fn set_qualification(&mut self, selection: Selection) {
        self.filter.qualification = selection;
        self.page = 0;
        self.mark_dirty();
    }

    pub(crate) fn set_query(&mut self, query: String) {
        self.filter.query = query;
        self.page = 0;
        self.mark_dirty();
    }

    pub(crate) fn clear_filters(&mut self) {
        self.filter = FilterState::default();
        self.page = 0;
        self.mark_dirty();
    }

    pub(crate) fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page = 0;
        self.mark_dirty();
    }

    pub(crate) fn set_page(&mut self, page: usize) {
        self.page = page;
        self.mark_dirty();
    }

    pub(crate) fn set_refresh(&mut self, phase: RefreshPhase) {
        self.refresh = phase;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Option<Notice>) {
        self.notice = notice;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
