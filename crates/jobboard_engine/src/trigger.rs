use std::fmt;

use board_logging::{board_info, board_warn};
use jobboard_core::BoardError;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::fetch::{http_client_builder, map_reqwest_error, FetchSettings};

const GITHUB_API: &str = "https://api.github.com";
const DEFAULT_GIT_REF: &str = "main";

/// Where the dispatch request goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEndpoint {
    Url(String),
    /// A GitHub Actions workflow file or id.
    Workflow {
        owner: String,
        repo: String,
        workflow: String,
    },
}

impl TriggerEndpoint {
    pub fn url(&self) -> String {
        match self {
            TriggerEndpoint::Url(url) => url.clone(),
            TriggerEndpoint::Workflow {
                owner,
                repo,
                workflow,
            } => format!(
                "{GITHUB_API}/repos/{owner}/{repo}/actions/workflows/{workflow}/dispatches"
            ),
        }
    }
}

impl From<String> for TriggerEndpoint {
    fn from(url: String) -> Self {
        TriggerEndpoint::Url(url)
    }
}

impl From<&str> for TriggerEndpoint {
    fn from(url: &str) -> Self {
        TriggerEndpoint::Url(url.to_string())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSettings {
    pub endpoint: TriggerEndpoint,
    #[serde(default = "default_git_ref")]
    pub git_ref: String,
    /// Bearer token; supplied at runtime, never read from or written to config.
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_git_ref() -> String {
    DEFAULT_GIT_REF.to_string()
}

impl TriggerSettings {
    pub fn new(endpoint: impl Into<TriggerEndpoint>) -> Self {
        Self {
            endpoint: endpoint.into(),
            git_ref: default_git_ref(),
            token: None,
        }
    }
}

impl fmt::Debug for TriggerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerSettings")
            .field("endpoint", &self.endpoint)
            .field("git_ref", &self.git_ref)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Starts the remote scraper run.
#[async_trait::async_trait]
pub trait WorkflowTrigger: Send + Sync {
    async fn trigger(&self) -> Result<(), BoardError>;
}

/// Bearer-authenticated JSON POST to a workflow-dispatch endpoint.
#[derive(Debug, Clone)]
pub struct HttpWorkflowTrigger {
    settings: TriggerSettings,
    fetch: FetchSettings,
}

impl HttpWorkflowTrigger {
    pub fn new(settings: TriggerSettings, fetch: FetchSettings) -> Self {
        Self { settings, fetch }
    }
}

#[async_trait::async_trait]
impl WorkflowTrigger for HttpWorkflowTrigger {
    async fn trigger(&self) -> Result<(), BoardError> {
        let token = self
            .settings
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| BoardError::Trigger("no trigger token configured".to_string()))?;

        let client = http_client_builder(&self.fetch)
            .build()
            .map_err(|err| BoardError::Trigger(err.to_string()))?;
        let body = json!({ "ref": self.settings.git_ref }).to_string();

        let response = client
            .post(self.settings.endpoint.url())
            .bearer_auth(token)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("jobboard/", env!("CARGO_PKG_VERSION")))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| BoardError::Trigger(map_reqwest_error(err).to_string()))?;

        let status = response.status();
        if status.is_success() {
            board_info!("Refresh workflow triggered ({})", status.as_u16());
            Ok(())
        } else {
            board_warn!("Refresh trigger rejected with {}", status);
            Err(BoardError::Trigger(format!("http status {}", status.as_u16())))
        }
    }
}

/// Stand-in used when no trigger endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTrigger;

#[async_trait::async_trait]
impl WorkflowTrigger for DisabledTrigger {
    async fn trigger(&self) -> Result<(), BoardError> {
        Err(BoardError::Trigger("refresh trigger is not configured".to_string()))
    }
}
