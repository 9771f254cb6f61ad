use std::sync::{mpsc, Arc};

use board_logging::{board_debug, board_info, board_warn};
use chrono::{DateTime, Utc};
use jobboard_core::{BoardError, RefreshSchedule};

use crate::fetch::Fetcher;
use crate::source::{fetch_jobs, FeedSource};
use crate::trigger::WorkflowTrigger;
use crate::EngineEvent;

/// Receives engine events as they happen.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    sender: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(sender: mpsc::Sender<EngineEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.sender.send(event);
    }
}

/// Trigger, wait out the schedule, then refetch.
pub struct RefreshOrchestrator {
    trigger: Arc<dyn WorkflowTrigger>,
    fetcher: Arc<dyn Fetcher>,
    source: FeedSource,
    schedule: RefreshSchedule,
}

impl RefreshOrchestrator {
    pub fn new(
        trigger: Arc<dyn WorkflowTrigger>,
        fetcher: Arc<dyn Fetcher>,
        source: FeedSource,
        schedule: RefreshSchedule,
    ) -> Self {
        Self {
            trigger,
            fetcher,
            source,
            schedule,
        }
    }

    /// Runs one refresh attempt. Every outcome is reported through `sink`;
    /// a failed trigger ends the attempt before any waiting.
    pub async fn run(
        &self,
        sink: &dyn EventSink,
        clock: &(dyn Fn() -> DateTime<Utc> + Send + Sync),
    ) {
        if let Err(err) = self.trigger.trigger().await {
            board_warn!("Refresh trigger failed: {}", err);
            sink.emit(EngineEvent::RefreshTriggered(Err(err)));
            return;
        }
        sink.emit(EngineEvent::RefreshTriggered(Ok(())));
        board_info!(
            "Refresh triggered; waiting {}s over {} steps",
            self.schedule.total_wait().as_secs(),
            self.schedule.steps.len()
        );

        let total_steps = self.schedule.steps.len();
        for (step, entry) in self.schedule.steps.iter().enumerate() {
            board_debug!("Refresh step {}/{}: {}", step + 1, total_steps, entry.label);
            sink.emit(EngineEvent::RefreshProgress {
                step,
                total_steps,
                label: entry.label.clone(),
            });
            tokio::time::sleep(entry.wait()).await;
        }

        sink.emit(EngineEvent::RefreshReloadStarted);
        let result = fetch_jobs(self.fetcher.as_ref(), &self.source, clock())
            .await
            .map_err(|err| match err {
                BoardError::EmptyResult => BoardError::RefreshTimeout,
                other => other,
            });
        sink.emit(EngineEvent::RefreshReloaded(result));
    }
}
