//! Shared HTTP plumbing for completion backends.

use niagate_core::error::CompletionError;
use std::time::Duration;
use tracing::warn;

/// Build a client whose every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, CompletionError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CompletionError::NotConfigured(format!("HTTP client: {e}")))
}

/// Classify a transport-level failure.
pub fn send_error(e: reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::Timeout(e.to_string())
    } else {
        CompletionError::Network(e.to_string())
    }
}

/// Turn any non-2xx response into an error, keeping the body for the log.
pub async fn check_status(
    backend: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, CompletionError> {
    let status = response.status().as_u16();

    if status == 401 || status == 403 {
        return Err(CompletionError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ));
    }

    if !response.status().is_success() {
        let error_body = response.text().await.unwrap_or_default();
        warn!(backend, status, body = %error_body, "Completion backend returned error");
        return Err(CompletionError::ApiError {
            status_code: status,
            message: error_body,
        });
    }

    Ok(response)
}
