use board_logging::{board_debug, board_info, board_warn};
use chrono::{DateTime, Utc};
use jobboard_core::{
    build_rows, update, visible, AppState, AppViewModel, BoardSettings, Effect, Msg, TableRow,
};
use jobboard_engine::{Clock, EngineEvent, EngineHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("engine worker stopped before answering")]
    EngineStopped,
}

/// Single owner of the board state. Runs effects on the engine and feeds
/// engine events back through `update`.
pub struct Controller {
    state: AppState,
    engine: EngineHandle,
    clock: Clock,
    alerts: Vec<String>,
}

impl Controller {
    pub fn new(settings: BoardSettings, engine: EngineHandle, clock: Clock) -> Self {
        Self {
            state: AppState::new(settings),
            engine,
            clock,
            alerts: Vec::new(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view(self.now())
    }

    /// Every row matching the current filters, sorted, without paging.
    pub fn all_rows(&self) -> Vec<TableRow> {
        let settings = self.state.settings();
        let records = visible(self.state.records(), self.state.filter());
        build_rows(
            &records,
            &settings.palette,
            self.state.sort(),
            settings.date_ordering,
        )
    }

    /// Alerts raised since the last call.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn dispatch(&mut self, msg: Msg) {
        board_debug!("dispatch {}", msg_name(&msg));
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.run_effects(effects);
    }

    /// Requests a load and waits for it to finish.
    pub fn load(&mut self) -> Result<(), ControllerError> {
        self.dispatch(Msg::LoadRequested);
        self.settle(|_| {})
    }

    /// Presses the refresh button and waits for the sequence to end,
    /// reporting each visible change.
    pub fn refresh(
        &mut self,
        on_change: impl FnMut(&AppViewModel),
    ) -> Result<(), ControllerError> {
        let now = self.now();
        self.dispatch(Msg::RefreshClicked { now });
        self.settle(on_change)
    }

    /// Pumps engine events until no load or refresh is outstanding.
    pub fn settle(
        &mut self,
        mut on_change: impl FnMut(&AppViewModel),
    ) -> Result<(), ControllerError> {
        if self.state.consume_dirty() {
            on_change(&self.view());
        }
        while self.state.is_busy() {
            let event = self.engine.recv().ok_or(ControllerError::EngineStopped)?;
            self.dispatch(event_to_msg(event));
            if self.state.consume_dirty() {
                on_change(&self.view());
            }
        }
        Ok(())
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadFeed => {
                    board_info!("Loading jobs feed");
                    self.engine.load_feed();
                }
                Effect::TriggerRefresh => {
                    board_info!("Starting refresh sequence");
                    self.engine.refresh();
                }
                Effect::Alert { message } => {
                    board_warn!("Alert: {}", message);
                    self.alerts.push(message);
                }
            }
        }
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::FeedLoaded(result) => Msg::FeedLoaded(result),
        EngineEvent::RefreshTriggered(result) => Msg::RefreshTriggered(result),
        EngineEvent::RefreshProgress {
            step,
            total_steps,
            label,
        } => Msg::RefreshProgress {
            step,
            total_steps,
            label,
        },
        EngineEvent::RefreshReloadStarted => Msg::RefreshReloadStarted,
        EngineEvent::RefreshReloaded(result) => Msg::RefreshReloaded(result),
    }
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::LoadRequested => "LoadRequested",
        Msg::FeedLoaded(_) => "FeedLoaded",
        Msg::SourceSelected(_) => "SourceSelected",
        Msg::QualificationSelected(_) => "QualificationSelected",
        Msg::SearchChanged(_) => "SearchChanged",
        Msg::FiltersCleared => "FiltersCleared",
        Msg::SortChanged(_) => "SortChanged",
        Msg::PageChanged(_) => "PageChanged",
        Msg::RefreshClicked { .. } => "RefreshClicked",
        Msg::RefreshTriggered(_) => "RefreshTriggered",
        Msg::RefreshProgress { .. } => "RefreshProgress",
        Msg::RefreshReloadStarted => "RefreshReloadStarted",
        Msg::RefreshReloaded(_) => "RefreshReloaded",
        Msg::NoticeDismissed => "NoticeDismissed",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use jobboard_core::{
        BoardError, BoardSettings, LoadStatus, Msg, RefreshPhase, RefreshSchedule, Selection,
    };
    use jobboard_engine::{
        EngineConfig, EngineHandle, FeedSource, FetchError, FetchMetadata, FetchOutput, Fetcher,
        WorkflowTrigger,
    };

    use super::Controller;

    fn json_output(url: &str, body: &str) -> FetchOutput {
        FetchOutput {
            bytes: body.as_bytes().to_vec(),
            metadata: FetchMetadata {
                requested_url: url.to_string(),
                final_url: url.to_string(),
                status: 200,
                redirect_count: 0,
                content_type: Some("application/json".to_string()),
                byte_len: body.len() as u64,
            },
        }
    }

    struct StaticFeed(&'static str);

    #[async_trait::async_trait]
    impl Fetcher for StaticFeed {
        async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
            Ok(json_output(url, self.0))
        }
    }

    /// Serves an empty feed on the first request and `FEED` afterwards.
    #[derive(Default)]
    struct EmptyThenFull {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Fetcher for EmptyThenFull {
        async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
            let body = match self.calls.fetch_add(1, Ordering::SeqCst) {
                0 => r#"{"jobs":[]}"#,
                _ => FEED,
            };
            Ok(json_output(url, body))
        }
    }

    struct Accepting;

    #[async_trait::async_trait]
    impl WorkflowTrigger for Accepting {
        async fn trigger(&self) -> Result<(), BoardError> {
            Ok(())
        }
    }

    const FEED: &str = r#"{"lastUpdated":"2025-06-01T06:00:00Z","jobs":[
        {"source":"CareerPower","title":"Clerk","qualification":"Graduate"},
        {"source":"SarkariResult","title":"Driver","qualification":"10th Pass"}
    ]}"#;

    fn controller_with(fetcher: Arc<dyn Fetcher>) -> Controller {
        let clock: jobboard_engine::Clock =
            Arc::new(|| Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        let config = EngineConfig {
            schedule: RefreshSchedule { steps: Vec::new() },
            clock: clock.clone(),
            ..EngineConfig::new(FeedSource::json_document("https://example.com/jobs.json"))
        };
        let engine = EngineHandle::with_parts(fetcher, Arc::new(Accepting), config);
        Controller::new(BoardSettings::default(), engine, clock)
    }

    pub(crate) fn controller() -> Controller {
        controller_with(Arc::new(StaticFeed(FEED)))
    }

    #[test]
    fn load_settles_with_records() {
        let mut controller = controller();
        controller.load().unwrap();

        let view = controller.view();
        assert_eq!(view.load, LoadStatus::Ready);
        assert_eq!(view.stats.unwrap().last_update_relative.as_deref(), Some("6h ago"));
        assert!(controller.take_alerts().is_empty());
    }

    #[test]
    fn filters_narrow_all_rows() {
        let mut controller = controller();
        controller.load().unwrap();
        controller.dispatch(Msg::SourceSelected(Selection::Only("SarkariResult".to_string())));

        let rows = controller.all_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Driver");
    }

    #[test]
    fn stale_board_refreshes_and_reports_progress() {
        let mut controller = controller();
        controller.load().unwrap();

        let mut phases = Vec::new();
        controller
            .refresh(|view| phases.push(view.refresh.phase.clone()))
            .unwrap();

        assert_eq!(phases.first(), Some(&RefreshPhase::Triggering));
        assert!(phases.contains(&RefreshPhase::Reloading));
        assert_eq!(*controller.state().refresh_phase(), RefreshPhase::Idle);
        assert_eq!(controller.state().records().len(), 2);
    }

    #[test]
    fn refresh_recovers_from_an_empty_first_load() {
        let mut controller = controller_with(Arc::new(EmptyThenFull::default()));
        controller.load().unwrap();
        assert_eq!(
            *controller.state().load_status(),
            LoadStatus::Failed(BoardError::EmptyResult)
        );

        controller.refresh(|_| {}).unwrap();

        assert_eq!(*controller.state().load_status(), LoadStatus::Ready);
        assert_eq!(*controller.state().refresh_phase(), RefreshPhase::Idle);
        assert_eq!(controller.state().records().len(), 2);
    }
}
