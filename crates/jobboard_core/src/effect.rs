#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and normalize the configured feed.
    LoadFeed,
    /// Fire the remote workflow, walk the wait schedule, then re-fetch.
    TriggerRefresh,
    /// Interrupt the user with a blocking message.
    Alert { message: String },
}
