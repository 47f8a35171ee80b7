//! Backend selection from configuration.

use niagate_config::CompletionConfig;
use niagate_core::completion::CompletionBackend;
use niagate_core::error::CompletionError;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::gemini::GeminiBackend;
use crate::openai_compat::OpenAiCompatBackend;

/// Build the backend named by `completion.provider`.
///
/// `gemini` gets the native backend; every other name is treated as an
/// OpenAI-compatible endpoint.
pub fn build_from_config(
    config: &CompletionConfig,
) -> Result<Arc<dyn CompletionBackend>, CompletionError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let api_key = config.api_key.clone().unwrap_or_default();

    if api_key.is_empty() && requires_key(&config.provider) {
        return Err(CompletionError::NotConfigured(format!(
            "No API key for provider '{}'",
            config.provider
        )));
    }

    let backend: Arc<dyn CompletionBackend> = match config.provider.as_str() {
        "gemini" => {
            let mut backend = GeminiBackend::new(&config.model, api_key, timeout)?;
            if let Some(url) = &config.api_url {
                backend = backend.with_base_url(url);
            }
            Arc::new(backend)
        }
        name => {
            let base_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| default_base_url(name));
            Arc::new(OpenAiCompatBackend::new(
                name,
                base_url,
                &config.model,
                api_key,
                timeout,
            )?)
        }
    };

    info!(
        provider = %config.provider,
        model = %config.model,
        timeout_secs = config.timeout_secs,
        "Completion backend ready"
    );
    Ok(backend)
}

/// Local servers run without keys; hosted APIs do not.
fn requires_key(provider: &str) -> bool {
    !matches!(provider, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

/// Default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
