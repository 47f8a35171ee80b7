//! # niagate-guard
//!
//! Content policy for the guarded chat proxy: lexical matching, input
//! classification, output sanitization, refusal selection and the policy
//! audit log. Everything here is synchronous and free of I/O.

pub mod audit;
pub mod classifier;
pub mod matcher;
pub mod policy;
pub mod refusal;
pub mod sanitizer;

pub use audit::{AuditEntry, AuditLogger, AuditOutcome, AuditSink, PolicyEvent, TracingSink};
pub use classifier::{Classification, InputClassifier};
pub use matcher::PatternSet;
pub use policy::GuardPolicy;
pub use refusal::{RefusalCategory, RefusalSelector};
pub use sanitizer::{OutputSanitizer, SanitizeAction, Sanitized};

/// Errors raised while compiling a policy.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Refusal set for {0:?} is empty")]
    EmptyRefusalSet(RefusalCategory),
}
