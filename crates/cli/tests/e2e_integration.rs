//! End-to-end tests for the guarded proxy.
//!
//! Each test wires the real stack from an `AppConfig`: JSON snapshot store,
//! OpenAI-compatible backend pointed at a local mock server, guard policy,
//! pipeline and HTTP router. Requests go through the router with `oneshot`.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use http_body_util::BodyExt;
use niagate_config::AppConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

// ── Mock model server ────────────────────────────────────────────────────

/// Records every prompt it receives and answers with a fixed text.
#[derive(Clone)]
struct ModelServer {
    reply: Arc<String>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ModelServer {
    fn new(reply: &str) -> Self {
        Self {
            reply: Arc::new(reply.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }

    async fn spawn(&self) -> String {
        let server = self.clone();
        let app = Router::new().route(
            "/chat/completions",
            post(move |Json(body): Json<Value>| {
                let server = server.clone();
                async move {
                    server.calls.fetch_add(1, Ordering::SeqCst);
                    let prompt = body["messages"][1]["content"].as_str().unwrap_or("").to_string();
                    server.prompts.lock().unwrap().push(prompt);
                    Json(json!({
                        "choices": [{"message": {"role": "assistant", "content": server.reply.as_str()}}]
                    }))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

// ── Harness ──────────────────────────────────────────────────────────────

const SNAPSHOT: &str = r#"{
    "program_days": [
        {
            "program_id": "wakeup_7_days",
            "day_number": 1,
            "title": "გაღვიძება",
            "focus": "სუნთქვა",
            "tea_ritual_content": "პიტნის ჩაი",
            "somatic_ref": [{"path": "SOMATIC_PRACTICES/breath_01"}, "missing_02"]
        }
    ],
    "practices": {
        "breath_01": {"name": "ოთხკუთხა სუნთქვა", "description": "4-4-4-4"}
    }
}"#;

fn write_snapshot(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("curriculum.json");
    std::fs::write(&path, SNAPSHOT).unwrap();
    path
}

async fn app(dir: &Path, model: &ModelServer) -> (Router, AppConfig) {
    let mut config = AppConfig::default();
    config.store.backend = "file".into();
    config.store.path = Some(write_snapshot(dir));
    config.completion.provider = "vllm".into();
    config.completion.api_key = None;
    config.completion.api_url = Some(model.spawn().await);
    config.completion.timeout_secs = 5;

    let pipeline = niagate_gateway::build_pipeline(&config).await.unwrap();
    let router = niagate_gateway::build_router(Arc::new(pipeline), &config.gateway);
    (router, config)
}

async fn send(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/niaProxy")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn reply_text(json: &Value) -> &str {
    json["reply"]["text"].as_str().unwrap_or_default()
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_curriculum_question_is_answered() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelServer::new("დღეს ფოკუსი სუნთქვაზეა.");
    let (app, _) = app(dir.path(), &model).await;

    let (status, json) = send(
        app,
        json!({"message": "რა არის დღის ფოკუსი?", "programId": "wakeup_7_days", "dayNumber": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(reply_text(&json), "დღეს ფოკუსი სუნთქვაზეა.");
    assert_eq!(model.calls(), 1);

    let prompt = model.last_prompt();
    assert!(prompt.starts_with("PROGRAM CONTEXT:"));
    assert!(prompt.contains("Tea Ritual: პიტნის ჩაი"));
    assert!(prompt.contains("- ოთხკუთხა სუნთქვა: 4-4-4-4"));
    assert!(prompt.ends_with("USER MESSAGE:\nრა არის დღის ფოკუსი?"));
}

#[tokio::test]
async fn e2e_hard_stop_never_reaches_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelServer::new("unused");
    let (app, config) = app(dir.path(), &model).await;

    let (status, json) = send(app, json!({"message": "მაქვს ძლიერი ტკივილი"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply_text(&json), config.policy.messages.hard_stop);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn e2e_unknown_day_is_not_available() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelServer::new("unused");
    let (app, config) = app(dir.path(), &model).await;

    let (_, json) = send(
        app,
        json!({"message": "რა არის დღეს?", "programId": "wakeup_7_days", "dayNumber": "99"}),
    )
    .await;

    assert_eq!(reply_text(&json), config.policy.messages.not_available);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn e2e_directive_and_foreign_url_are_scrubbed() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelServer::new("გირჩევ დალიო წამალი https://evil.example/x");
    let (app, config) = app(dir.path(), &model).await;

    let (_, json) = send(
        app,
        json!({"message": "რა ვქნა?", "programId": "wakeup_7_days", "dayNumber": 1}),
    )
    .await;

    let text = reply_text(&json);
    assert!(!text.contains("გირჩევ"));
    assert!(!text.contains("დალიო"));
    assert!(!text.contains("https://evil.example/x"));
    assert!(config.policy.refusals.output_fallback.iter().any(|r| r == text));
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn e2e_allowed_media_url_survives() {
    let dir = tempfile::tempdir().unwrap();
    let url = "https://media.example/breath.mp3";
    let model = ModelServer::new(&format!("აუდიო აქ არის: {url}"));
    let (app, _) = app(dir.path(), &model).await;

    let (_, json) = send(
        app,
        json!({
            "message": "სად არის აუდიო?",
            "programId": "wakeup_7_days",
            "dayNumber": 1,
            "allowedMediaUrls": [url]
        }),
    )
    .await;

    assert!(reply_text(&json).contains(url));
}

#[tokio::test]
async fn e2e_model_down_yields_server_error_refusal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.store.path = Some(write_snapshot(dir.path()));
    config.completion.provider = "vllm".into();
    config.completion.api_key = None;
    // Nothing listens on port 9 locally.
    config.completion.api_url = Some("http://127.0.0.1:9".into());
    config.completion.timeout_secs = 2;

    let pipeline = niagate_gateway::build_pipeline(&config).await.unwrap();
    let app = niagate_gateway::build_router(Arc::new(pipeline), &config.gateway);

    let (status, json) = send(
        app,
        json!({"message": "რა არის დღის ფოკუსი?", "programId": "wakeup_7_days", "dayNumber": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = reply_text(&json);
    assert!(config.policy.refusals.server_error.iter().any(|r| r == text));
}

#[tokio::test]
async fn e2e_config_file_drives_the_stack() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path());
    let config_file = dir.path().join("config.toml");
    std::fs::write(
        &config_file,
        format!(
            "[gateway]\npath = \"/chat\"\n\n[store]\nbackend = \"file\"\npath = {:?}\n\n\
             [completion]\nprovider = \"ollama\"\n\n[policy]\nblocked_terms = [\"horoscope\"]\n",
            snapshot.to_string_lossy()
        ),
    )
    .unwrap();

    let config = AppConfig::load_from(&config_file).unwrap();
    assert_eq!(config.gateway.path, "/chat");
    assert_eq!(config.policy.blocked_terms, vec!["horoscope".to_string()]);

    let pipeline = niagate_gateway::build_pipeline(&config).await.unwrap();
    assert_eq!(pipeline.store_name(), "file");
    assert_eq!(pipeline.backend_name(), "ollama");
}
