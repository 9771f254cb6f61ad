use board_logging::{board_debug, board_error, board_info, board_warn};

use crate::refresh::{check_freshness, format_remaining, Freshness, RefreshPhase};
use crate::{AppState, BoardError, Effect, LoadErrorPolicy, Msg, Notice};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::LoadRequested => {
            if state.is_busy() {
                board_debug!("Load requested while busy; ignoring");
                return (state, Vec::new());
            }
            state.begin_loading();
            vec![Effect::LoadFeed]
        }
        Msg::FeedLoaded(result) => match result.and_then(|feed| feed.non_empty()) {
            Ok(feed) => {
                board_info!(
                    "Installed feed: {} records, total reported {}",
                    feed.jobs.len(),
                    feed.total_jobs
                );
                state.install_feed(feed);
                state.set_notice(None);
                Vec::new()
            }
            Err(err) => handle_load_failure(&mut state, err),
        },
        Msg::SourceSelected(selection) => {
            state.set_source(selection);
            Vec::new()
        }
        Msg::QualificationSelected(selection) => {
            state.set_qualification(selection);
            Vec::new()
        }
        Msg::SearchChanged(query) => {
            state.set_query(query);
            Vec::new()
        }
        Msg::FiltersCleared => {
            state.clear_filters();
            Vec::new()
        }
        Msg::SortChanged(order) => {
            state.set_sort(order);
            Vec::new()
        }
        Msg::PageChanged(page) => {
            state.set_page(page);
            Vec::new()
        }
        Msg::RefreshClicked { now } => {
            if state.is_busy() {
                board_debug!("Refresh clicked while busy; ignoring");
                return (state, Vec::new());
            }
            let threshold = state.settings().freshness_threshold();
            match check_freshness(state.last_updated(), now, threshold) {
                Freshness::Fresh { remaining } => {
                    board_info!(
                        "Refresh skipped; data is fresh for another {}",
                        format_remaining(remaining)
                    );
                    state.set_refresh(RefreshPhase::AlreadyFresh { remaining });
                    Vec::new()
                }
                Freshness::Stale => {
                    state.set_refresh(RefreshPhase::Triggering);
                    vec![Effect::TriggerRefresh]
                }
            }
        }
        Msg::RefreshTriggered(result) => {
            if *state.refresh_phase() != RefreshPhase::Triggering {
                return (state, Vec::new());
            }
            match result {
                Ok(()) => {
                    state.set_refresh(RefreshPhase::Waiting {
                        step: 0,
                        total_steps: 0,
                        label: "Refresh workflow started".to_string(),
                    });
                    Vec::new()
                }
                Err(err) => fail_refresh(&mut state, err),
            }
        }
        Msg::RefreshProgress {
            step,
            total_steps,
            label,
        } => {
            if state.refresh_phase().is_in_flight() {
                state.set_refresh(RefreshPhase::Waiting {
                    step,
                    total_steps,
                    label,
                });
            }
            Vec::new()
        }
        Msg::RefreshReloadStarted => {
            if state.refresh_phase().is_in_flight() {
                state.set_refresh(RefreshPhase::Reloading);
            }
            Vec::new()
        }
        Msg::RefreshReloaded(result) => {
            if !state.refresh_phase().is_in_flight() {
                return (state, Vec::new());
            }
            match result.and_then(|feed| feed.non_empty()) {
                Ok(feed) => {
                    board_info!(
                        "Refresh complete; reloading board with {} records",
                        feed.jobs.len()
                    );
                    state.reload_with(feed);
                    state.set_notice(Some(Notice::info("Jobs refreshed.")));
                    Vec::new()
                }
                Err(BoardError::EmptyResult) => {
                    fail_refresh(&mut state, BoardError::RefreshTimeout)
                }
                Err(err) => fail_refresh(&mut state, err),
            }
        }
        Msg::NoticeDismissed => {
            state.set_notice(None);
            Vec::new()
        }
    };

    (state, effects)
}

/// A failed first load blocks the table; a failed reload keeps what is shown.
fn handle_load_failure(state: &mut AppState, err: BoardError) -> Vec<Effect> {
    board_error!("Loading jobs failed: {}", err);
    let message = err.user_message();

    if state.has_records() {
        state.finish_load_keeping_records();
        state.set_notice(Some(Notice::warning(message)));
        return Vec::new();
    }

    state.fail_load(err);
    state.set_notice(Some(Notice::error(message.clone())));
    match state.settings().load_error_policy {
        LoadErrorPolicy::Alert => vec![Effect::Alert { message }],
        LoadErrorPolicy::LogOnly => Vec::new(),
    }
}

fn fail_refresh(state: &mut AppState, err: BoardError) -> Vec<Effect> {
    board_warn!("Refresh failed: {}", err);
    let message = err.user_message();
    state.set_refresh(RefreshPhase::Failed(err));
    state.set_notice(Some(Notice::error(message.clone())));
    vec![Effect::Alert { message }]
}
