//! HTTP gateway for the guarded proxy.
//!
//! One endpoint (served at the configured path and at `/`) plus a health
//! check. Structural errors are the only non-200 replies; everything that
//! parses is answered by the pipeline with `{ ok: true, reply: { text } }`.
//!
//! Built on Axum.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::Router;
use axum::routing::{MethodRouter, get, post};
use serde::Serialize;
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};

use niagate_config::{AppConfig, GatewayConfig};
use niagate_core::error::RequestError;
use niagate_core::request::{GuardedReply, GuardedRequest};
use niagate_guard::GuardPolicy;
use niagate_pipeline::GuardPipeline;

/// Shared state for the gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<GuardPipeline>,
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the Axum router.
///
/// Layers applied:
/// - CORS headers on every response, `OPTIONS` answered with 204
/// - Request body size limit from `gateway.max_body_bytes`
/// - HTTP trace logging
pub fn build_router(pipeline: Arc<GuardPipeline>, config: &GatewayConfig) -> Router {
    let state = GatewayState { pipeline };

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/", endpoint());
    if config.path != "/" {
        router = router.route(&config.path, endpoint());
    }

    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware::from_fn(cors_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn endpoint() -> MethodRouter<GatewayState> {
    post(proxy_handler).fallback(method_not_allowed)
}

/// Build the store, backend and policy from config, then serve until
/// Ctrl-C.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(&config).await?;
    serve(Arc::new(pipeline), &config.gateway).await
}

/// Wire a pipeline from config.
pub async fn build_pipeline(config: &AppConfig) -> Result<GuardPipeline, Box<dyn std::error::Error>> {
    let policy = GuardPolicy::from_config(&config.policy)?;
    let store = niagate_store::build_from_config(&config.store).await?;
    let backend = niagate_providers::build_from_config(&config.completion)?;

    Ok(GuardPipeline::new(Arc::new(policy), store, backend).with_generation(
        config.completion.temperature,
        config.completion.max_output_tokens,
    ))
}

/// Serve an already-built pipeline.
pub async fn serve(
    pipeline: Arc<GuardPipeline>,
    config: &GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.host, config.port);
    let store = pipeline.store_name().to_string();
    let backend = pipeline.backend_name().to_string();
    let app = build_router(pipeline, config);

    info!(addr = %addr, path = %config.path, store = %store, backend = %backend, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// --- Middleware ---

/// Permissive CORS: any origin, `POST`/`OPTIONS`, two request headers.
/// Preflights never reach the handlers.
async fn cors_middleware(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct ReplyBody {
    ok: bool,
    reply: GuardedReply,
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: &'static str,
}

fn error_response(status: StatusCode, error: &RequestError) -> Response {
    (
        status,
        Json(ErrorBody {
            ok: false,
            error: error.code(),
        }),
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, &RequestError::MethodNotAllowed)
}

/// The body is read as raw bytes whatever its content type.
async fn proxy_handler(State(state): State<GatewayState>, body: Bytes) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();

    let request = match GuardedRequest::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(request_id = %request_id, code = e.code(), "Rejected request");
            return error_response(StatusCode::BAD_REQUEST, &e);
        }
    };

    let span = info_span!("guarded_request", request_id = %request_id);
    let outcome = state
        .pipeline
        .handle_with_id(&request, &request_id)
        .instrument(span)
        .await;

    let mut response = Json(ReplyBody {
        ok: true,
        reply: outcome.reply,
    })
    .into_response();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
