//! Job board engine: feed fetching, refresh orchestration and page publishing.
mod decode;
mod engine;
mod fetch;
mod publish;
mod refresh;
mod source;
mod trigger;
mod types;

pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::{system_clock, Clock, EngineConfig, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use publish::{ensure_output_dir, PublishError, SitePublisher};
pub use refresh::{ChannelEventSink, EventSink, RefreshOrchestrator};
pub use source::{fetch_jobs, FeedSource};
pub use trigger::{
    DisabledTrigger, HttpWorkflowTrigger, TriggerEndpoint, TriggerSettings, WorkflowTrigger,
};
pub use types::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};
