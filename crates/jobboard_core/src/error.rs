use thiserror::Error;

/// Everything that can go wrong while loading or refreshing the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The request failed, timed out, or returned a non-success status.
    #[error("network error: {0}")]
    Network(String),
    /// The feed body could not be unwrapped or parsed.
    #[error("parse error: {0}")]
    Parse(String),
    /// The feed parsed fine but carried no job records.
    #[error("feed returned no jobs")]
    EmptyResult,
    /// The remote automation trigger rejected the request.
    #[error("refresh trigger failed: {0}")]
    Trigger(String),
    /// The re-fetch after the refresh wait still returned no jobs.
    #[error("refresh finished but the feed is still empty")]
    RefreshTimeout,
}

impl BoardError {
    /// Short message suitable for a status line or alert box.
    pub fn user_message(&self) -> String {
        match self {
            BoardError::Network(_) | BoardError::Parse(_) => {
                "Failed to load jobs. Please check the feed configuration and try again later."
                    .to_string()
            }
            BoardError::EmptyResult => "No jobs are available right now.".to_string(),
            BoardError::Trigger(reason) => format!("Could not start a refresh: {reason}"),
            BoardError::RefreshTimeout => {
                "Refresh ran but no jobs were found yet. Try again in a few minutes.".to_string()
            }
        }
    }
}
