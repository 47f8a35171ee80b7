//! The guarded request pipeline.
//!
//! classify → context check → resolve → assemble → complete → sanitize.
//!
//! Every structurally valid request ends in exactly one reply. Policy hits
//! and infrastructure failures degrade to fixed or refusal text; nothing
//! here returns an error. The only state is immutable policy and shared
//! collaborator handles.

use niagate_core::completion::{CompletionBackend, CompletionRequest};
use niagate_core::request::{GuardedReply, GuardedRequest};
use niagate_core::store::CurriculumStore;
use niagate_guard::{
    AuditOutcome, Classification, GuardPolicy, PolicyEvent, RefusalCategory,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::prompt::{self, PromptInput};
use crate::resolver::{self, Resolution};

/// How a request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    HardStop,
    Blocked,
    ContextMissing,
    NotFound,
    StoreFailure,
    CompletionFailure,
    /// Model text passed sanitization untouched.
    Answered,
    /// Model text was rewritten or replaced by the sanitizer.
    Sanitized,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HardStop => "hard_stop",
            Self::Blocked => "blocked",
            Self::ContextMissing => "context_missing",
            Self::NotFound => "not_found",
            Self::StoreFailure => "store_failure",
            Self::CompletionFailure => "completion_failure",
            Self::Answered => "answered",
            Self::Sanitized => "sanitized",
        }
    }

    /// Did the completion backend produce (some of) this reply?
    pub fn reached_model(&self) -> bool {
        matches!(self, Self::Answered | Self::Sanitized)
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub reply: GuardedReply,
    pub disposition: Disposition,
}

impl PipelineOutcome {
    fn new(text: impl Into<String>, disposition: Disposition) -> Self {
        Self {
            reply: GuardedReply::new(text),
            disposition,
        }
    }
}

pub struct GuardPipeline {
    policy: Arc<GuardPolicy>,
    store: Arc<dyn CurriculumStore>,
    backend: Arc<dyn CompletionBackend>,
    temperature: f32,
    max_output_tokens: u32,
}

impl GuardPipeline {
    pub fn new(
        policy: Arc<GuardPolicy>,
        store: Arc<dyn CurriculumStore>,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        let defaults = CompletionRequest::new("", "");
        Self {
            policy,
            store,
            backend,
            temperature: defaults.temperature,
            max_output_tokens: defaults.max_output_tokens,
        }
    }

    pub fn with_generation(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Handle one request under a fresh request id.
    pub async fn handle(&self, request: &GuardedRequest) -> PipelineOutcome {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.handle_with_id(request, &request_id).await
    }

    pub async fn handle_with_id(&self, request: &GuardedRequest, request_id: &str) -> PipelineOutcome {
        let outcome = self.run(request, request_id).await;
        info!(
            request_id,
            disposition = %outcome.disposition,
            reply_chars = outcome.reply.text.chars().count(),
            "Request handled"
        );
        outcome
    }

    async fn run(&self, request: &GuardedRequest, request_id: &str) -> PipelineOutcome {
        let policy = &self.policy;

        match policy.classifier.classify(&request.message) {
            Classification::HardStop { term } => {
                policy.audit.log(
                    request_id,
                    PolicyEvent::HardStop { term },
                    AuditOutcome::Informed,
                    None,
                );
                return PipelineOutcome::new(&policy.messages.hard_stop, Disposition::HardStop);
            }
            Classification::Blocked { term } => {
                policy.audit.log(
                    request_id,
                    PolicyEvent::InputBlocked { term },
                    AuditOutcome::Refused,
                    None,
                );
                return PipelineOutcome::new(
                    policy.refusals.pick(RefusalCategory::InputBlocked),
                    Disposition::Blocked,
                );
            }
            Classification::Allowed => {}
        }

        let Some(day_key) = &request.day else {
            policy.audit.log(
                request_id,
                PolicyEvent::ContextMissing,
                AuditOutcome::Informed,
                None,
            );
            return PipelineOutcome::new(
                &policy.messages.context_missing,
                Disposition::ContextMissing,
            );
        };

        let resolved = match resolver::resolve(
            self.store.as_ref(),
            &day_key.program_id,
            day_key.day_number,
        )
        .await
        {
            Resolution::Found(resolved) => resolved,
            Resolution::NotFound => {
                policy.audit.log(
                    request_id,
                    PolicyEvent::DayNotFound {
                        day: day_key.to_string(),
                    },
                    AuditOutcome::Informed,
                    None,
                );
                return PipelineOutcome::new(
                    &policy.messages.not_available,
                    Disposition::NotFound,
                );
            }
            Resolution::StoreError(e) => {
                error!(request_id, day = %day_key, error = %e, "Curriculum store failed");
                policy.audit.log(
                    request_id,
                    PolicyEvent::StoreFailure,
                    AuditOutcome::Refused,
                    Some(e.to_string()),
                );
                return PipelineOutcome::new(
                    policy.refusals.pick(RefusalCategory::ServerError),
                    Disposition::StoreFailure,
                );
            }
        };

        let prompt = prompt::assemble(&PromptInput {
            program_id: &day_key.program_id,
            day_number: day_key.day_number,
            day: &resolved.day,
            practices: &resolved.practices,
            message: &request.message,
        });
        debug!(request_id, prompt = %prompt, "Assembled prompt");

        let completion = CompletionRequest::new(policy.system_instruction.clone(), prompt)
            .with_generation(self.temperature, self.max_output_tokens);

        let raw = match self.backend.complete(completion).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(request_id, backend = self.backend.name(), error = %e, "Completion failed");
                policy.audit.log(
                    request_id,
                    PolicyEvent::CompletionFailure,
                    AuditOutcome::Refused,
                    Some(e.to_string()),
                );
                return PipelineOutcome::new(
                    policy.refusals.pick(RefusalCategory::ServerError),
                    Disposition::CompletionFailure,
                );
            }
        };

        let sanitized = policy
            .sanitizer
            .sanitize(&raw, &request.allowed_media_urls);

        if sanitized.is_clean() {
            policy.audit.log(
                request_id,
                PolicyEvent::Answered,
                AuditOutcome::Delivered,
                None,
            );
            return PipelineOutcome::new(sanitized.text, Disposition::Answered);
        }

        let outcome = if sanitized.fallback {
            AuditOutcome::Refused
        } else {
            AuditOutcome::Delivered
        };
        policy.audit.log(
            request_id,
            PolicyEvent::OutputSanitized {
                actions: sanitized.actions,
            },
            outcome,
            None,
        );
        PipelineOutcome::new(sanitized.text, Disposition::Sanitized)
    }
}
