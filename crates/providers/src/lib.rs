//! Completion backends for niagate.
//!
//! All backends implement `niagate_core::CompletionBackend`.
//! [`build_from_config`] picks one from the `[completion]` section.

mod http;

pub mod gemini;
pub mod openai_compat;
pub mod router;

pub use gemini::GeminiBackend;
pub use openai_compat::OpenAiCompatBackend;
pub use router::build_from_config;
