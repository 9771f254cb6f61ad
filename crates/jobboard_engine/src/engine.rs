use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use board_logging::{board_debug, board_error};
use chrono::{DateTime, Utc};
use jobboard_core::RefreshSchedule;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::refresh::{ChannelEventSink, EventSink, RefreshOrchestrator};
use crate::source::{fetch_jobs, FeedSource};
use crate::trigger::{DisabledTrigger, HttpWorkflowTrigger, TriggerSettings, WorkflowTrigger};
use crate::EngineEvent;

/// Source of "now" for cache busting and reload timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

#[derive(Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub source: FeedSource,
    pub trigger: Option<TriggerSettings>,
    pub schedule: RefreshSchedule,
    pub clock: Clock,
}

impl EngineConfig {
    pub fn new(source: FeedSource) -> Self {
        Self {
            fetch: FetchSettings::default(),
            source,
            trigger: None,
            schedule: RefreshSchedule::default(),
            clock: system_clock(),
        }
    }
}

enum EngineCommand {
    LoadFeed,
    Refresh,
}

/// Background worker owning the async runtime. Commands run one at a time,
/// in the order they were sent.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        let trigger: Arc<dyn WorkflowTrigger> = match config.trigger.clone() {
            Some(settings) => Arc::new(HttpWorkflowTrigger::new(settings, config.fetch.clone())),
            None => Arc::new(DisabledTrigger),
        };
        Self::with_parts(fetcher, trigger, config)
    }

    /// Like [`EngineHandle::new`] but with caller-supplied fetcher and trigger.
    pub fn with_parts(
        fetcher: Arc<dyn Fetcher>,
        trigger: Arc<dyn WorkflowTrigger>,
        config: EngineConfig,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let orchestrator = RefreshOrchestrator::new(
            trigger,
            fetcher.clone(),
            config.source.clone(),
            config.schedule,
        );
        let source = config.source;
        let clock = config.clock;

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    board_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let sink = ChannelEventSink::new(event_tx);
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::LoadFeed => {
                        board_debug!("Engine: loading feed");
                        let result =
                            runtime.block_on(fetch_jobs(fetcher.as_ref(), &source, clock()));
                        sink.emit(EngineEvent::FeedLoaded(result));
                    }
                    EngineCommand::Refresh => {
                        board_debug!("Engine: running refresh");
                        runtime.block_on(orchestrator.run(&sink, clock.as_ref()));
                    }
                }
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn load_feed(&self) {
        let _ = self.cmd_tx.send(EngineCommand::LoadFeed);
    }

    pub fn refresh(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Refresh);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the worker has stopped.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
