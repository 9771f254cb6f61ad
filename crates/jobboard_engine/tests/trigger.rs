use jobboard_core::BoardError;
use jobboard_engine::{
    DisabledTrigger, FetchSettings, HttpWorkflowTrigger, TriggerEndpoint, TriggerSettings,
    WorkflowTrigger,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer, token: Option<&str>) -> TriggerSettings {
    TriggerSettings {
        token: token.map(str::to_string),
        ..TriggerSettings::new(format!("{}/dispatch", server.uri()))
    }
}

#[test]
fn workflow_endpoint_targets_dispatch_url() {
    let endpoint = TriggerEndpoint::Workflow {
        owner: "octo".to_string(),
        repo: "jobs".to_string(),
        workflow: "scrape.yml".to_string(),
    };
    assert_eq!(
        endpoint.url(),
        "https://api.github.com/repos/octo/jobs/actions/workflows/scrape.yml/dispatches"
    );
    assert_eq!(
        TriggerEndpoint::from("https://example.com/hook").url(),
        "https://example.com/hook"
    );
}

#[test]
fn debug_output_hides_token() {
    let settings = TriggerSettings {
        token: Some("ghp_secret".to_string()),
        ..TriggerSettings::new("https://example.com")
    };
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("ghp_secret"));
    assert!(rendered.contains("<redacted>"));
}

#[tokio::test]
async fn trigger_posts_ref_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dispatch"))
        .and(header("authorization", "Bearer ghp_secret"))
        .and(header("accept", "application/vnd.github+json"))
        .and(body_json(json!({ "ref": "main" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let trigger = HttpWorkflowTrigger::new(
        settings(&server, Some("ghp_secret")),
        FetchSettings::default(),
    );
    trigger.trigger().await.expect("dispatch accepted");
}

#[tokio::test]
async fn rejected_dispatch_is_a_trigger_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dispatch"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let trigger = HttpWorkflowTrigger::new(settings(&server, Some("bad")), FetchSettings::default());
    let err = trigger.trigger().await.unwrap_err();
    assert_eq!(err, BoardError::Trigger("http status 401".to_string()));
}

#[tokio::test]
async fn missing_token_fails_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let trigger = HttpWorkflowTrigger::new(settings(&server, None), FetchSettings::default());
    assert!(matches!(
        trigger.trigger().await,
        Err(BoardError::Trigger(_))
    ));

    assert!(matches!(
        DisabledTrigger.trigger().await,
        Err(BoardError::Trigger(_))
    ));
}
