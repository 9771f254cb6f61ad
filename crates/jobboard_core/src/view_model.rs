use crate::refresh::format_remaining;
use crate::{
    FilterOptions, FilterState, LoadStatus, Notice, RefreshPhase, SortOrder, Stats, TablePage,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub load: LoadStatus,
    /// Present once a feed has been installed.
    pub stats: Option<Stats>,
    pub options: FilterOptions,
    pub filter: FilterState,
    pub sort: SortOrder,
    pub table: TablePage,
    pub refresh: RefreshView,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefreshView {
    pub phase: RefreshPhase,
    pub trigger_enabled: bool,
    pub progress_percent: u8,
    pub status: Option<String>,
}

impl RefreshView {
    pub fn from_phase(phase: &RefreshPhase) -> Self {
        let status = match phase {
            RefreshPhase::Idle => None,
            RefreshPhase::Triggering => Some("Starting refresh workflow...".to_string()),
            RefreshPhase::Waiting {
                step,
                total_steps,
                label,
            } if *total_steps > 0 => Some(format!("{label} ({}/{total_steps})", step + 1)),
            RefreshPhase::Waiting { label, .. } => Some(label.clone()),
            RefreshPhase::Reloading => Some("Loading fresh data...".to_string()),
            RefreshPhase::AlreadyFresh { remaining } => Some(format!(
                "Data is already fresh. Next refresh available in {}.",
                format_remaining(*remaining)
            )),
            RefreshPhase::Failed(err) => Some(err.user_message()),
        };

        Self {
            phase: phase.clone(),
            trigger_enabled: !phase.is_in_flight(),
            progress_percent: phase.progress_percent(),
            status,
        }
    }
}
