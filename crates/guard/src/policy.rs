//! The compiled policy: everything the pipeline needs to make decisions,
//! built once from configuration and shared read-only.

use crate::GuardError;
use crate::audit::AuditLogger;
use crate::classifier::InputClassifier;
use crate::refusal::RefusalSelector;
use crate::sanitizer::OutputSanitizer;
use niagate_config::{MessagesConfig, PolicyConfig};

#[derive(Debug)]
pub struct GuardPolicy {
    pub classifier: InputClassifier,
    pub sanitizer: OutputSanitizer,
    pub refusals: RefusalSelector,
    pub messages: MessagesConfig,
    pub system_instruction: String,
    pub audit: AuditLogger,
}

impl GuardPolicy {
    /// Compile patterns and check refusal sets. Audit goes to `tracing`
    /// unless the policy turns it off.
    pub fn from_config(policy: &PolicyConfig) -> Result<Self, GuardError> {
        let audit = if policy.audit {
            AuditLogger::default()
        } else {
            AuditLogger::disabled()
        };
        Self::with_audit(policy, audit)
    }

    pub fn with_audit(policy: &PolicyConfig, audit: AuditLogger) -> Result<Self, GuardError> {
        let refusals = RefusalSelector::new(&policy.refusals)?;
        Ok(Self {
            classifier: InputClassifier::from_config(policy),
            sanitizer: OutputSanitizer::from_config(policy, refusals.clone())?,
            refusals,
            messages: policy.messages.clone(),
            system_instruction: policy.system_instruction.clone(),
            audit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refusal::RefusalCategory;

    #[test]
    fn default_policy_compiles() {
        let policy = GuardPolicy::from_config(&PolicyConfig::default()).unwrap();
        assert!(policy.audit.is_enabled());
        assert!(!policy.refusals.set(RefusalCategory::ServerError).is_empty());
        assert!(!policy.system_instruction.is_empty());
    }

    #[test]
    fn audit_can_be_disabled() {
        let config = PolicyConfig {
            audit: false,
            ..PolicyConfig::default()
        };
        let policy = GuardPolicy::from_config(&config).unwrap();
        assert!(!policy.audit.is_enabled());
    }

    #[test]
    fn bad_softening_pattern_is_rejected() {
        let mut config = PolicyConfig::default();
        config.softening_rules = vec![niagate_config::SofteningRule {
            pattern: "[".into(),
            replacement: "x".into(),
        }];
        let err = GuardPolicy::from_config(&config).unwrap_err();
        assert!(matches!(err, GuardError::InvalidPattern { .. }));
    }
}
