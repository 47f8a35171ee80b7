//! Policy audit log: one structured record per terminal decision.
//!
//! Entries are forwarded to sinks as they happen. Nothing accumulates in
//! process between requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sanitizer::SanitizeAction;

/// A single audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub event: PolicyEvent,
    pub outcome: AuditOutcome,
    pub details: Option<String>,
}

/// Policy decisions worth recording.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyEvent {
    /// Acute-symptom phrase in the user message
    HardStop { term: String },
    /// Out-of-scope topic in the user message
    InputBlocked { term: String },
    /// programId/dayNumber missing or unusable
    ContextMissing,
    /// No curriculum record for the requested day
    DayNotFound { day: String },
    /// Curriculum store failed
    StoreFailure,
    /// Completion call failed
    CompletionFailure,
    /// Model output was rewritten or replaced
    OutputSanitized { actions: Vec<SanitizeAction> },
    /// Model output passed unchanged
    Answered,
}

/// What the user ended up receiving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Model text (possibly rewritten in place)
    Delivered,
    /// A fixed informational message
    Informed,
    /// A pre-authored refusal or fallback
    Refused,
}

/// Where audit entries are written.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry);
}

/// Fans entries out to its sinks.
pub struct AuditLogger {
    sinks: Vec<Box<dyn AuditSink>>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::with_sinks(vec![Box::new(TracingSink)])
    }
}

impl AuditLogger {
    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<Box<dyn AuditSink>>) -> Self {
        Self { sinks }
    }

    pub fn is_enabled(&self) -> bool {
        !self.sinks.is_empty()
    }

    /// Record a policy event.
    pub fn log(
        &self,
        request_id: &str,
        event: PolicyEvent,
        outcome: AuditOutcome,
        details: Option<String>,
    ) {
        if self.sinks.is_empty() {
            return;
        }

        let entry = AuditEntry {
            timestamp: Utc::now(),
            request_id: request_id.into(),
            event,
            outcome,
            details,
        };

        for sink in &self.sinks {
            sink.record(&entry);
        }
    }
}

/// Emits entries as `tracing` events under the `audit` target.
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, entry: &AuditEntry) {
        let event = serde_json::to_string(&entry.event).unwrap_or_default();
        tracing::info!(
            target: "audit",
            request_id = %entry.request_id,
            event = %event,
            outcome = ?entry.outcome,
            details = ?entry.details,
            "AUDIT"
        );
    }
}
