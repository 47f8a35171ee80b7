//! Input classification: hard-stop, blocked topic, or pass.
//!
//! Evaluated in strict priority order. A hard-stop is a safety signal and
//! wins over everything, including a missing day context.

use serde::{Deserialize, Serialize};

use crate::matcher;
use niagate_config::PolicyConfig;

/// The outcome of classifying a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// Acute-symptom phrase present; answer with the fixed stop text.
    HardStop { term: String },
    /// Out-of-scope topic present; answer with an input-blocked refusal.
    Blocked { term: String },
    /// Nothing matched; the pipeline may continue.
    Allowed,
}

impl Classification {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Classifies user messages against configured term lists.
#[derive(Debug, Clone)]
pub struct InputClassifier {
    hard_stop_terms: Vec<String>,
    blocked_terms: Vec<String>,
}

impl InputClassifier {
    pub fn new(hard_stop_terms: Vec<String>, blocked_terms: Vec<String>) -> Self {
        Self {
            hard_stop_terms,
            blocked_terms,
        }
    }

    pub fn from_config(policy: &PolicyConfig) -> Self {
        Self::new(policy.hard_stop_terms.clone(), policy.blocked_terms.clone())
    }

    pub fn classify(&self, message: &str) -> Classification {
        if let Some(term) = matcher::first_match(message, &self.hard_stop_terms) {
            return Classification::HardStop {
                term: term.to_string(),
            };
        }

        if let Some(term) = matcher::first_match(message, &self.blocked_terms) {
            return Classification::Blocked {
                term: term.to_string(),
            };
        }

        Classification::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_classifier() -> InputClassifier {
        InputClassifier::from_config(&PolicyConfig::default())
    }

    #[test]
    fn hard_stop_detected() {
        let c = default_classifier().classify("მაქვს ძლიერი ტკივილი");
        assert_eq!(
            c,
            Classification::HardStop {
                term: "ძლიერი ტკივილი".into()
            }
        );
    }

    #[test]
    fn hard_stop_outranks_blocked_topic() {
        // Contains both a blocked term (წამალი) and a hard-stop term.
        let c = default_classifier().classify("წამალი დავლიე და გულმკერდის ტკივილი მაქვს");
        assert!(matches!(c, Classification::HardStop { .. }));
    }

    #[test]
    fn blocked_topic_detected() {
        let c = default_classifier().classify("რა წამალი დავლიო?");
        assert_eq!(
            c,
            Classification::Blocked {
                term: "წამალი".into()
            }
        );
    }

    #[test]
    fn blocked_term_inside_longer_word() {
        // Substring containment, not whole-word: inflected forms still hit.
        let c = default_classifier().classify("ფსიქიატრისთან ვიყავი");
        assert!(matches!(c, Classification::Blocked { .. }));
    }

    #[test]
    fn curriculum_question_allowed() {
        let c = default_classifier().classify("რას ნიშნავს დღევანდელი ჩაის რიტუალი?");
        assert!(c.is_allowed());
    }

    #[test]
    fn custom_lists_are_honored() {
        let c = InputClassifier::new(vec!["Chest Pain".into()], vec!["horoscope".into()]);
        assert!(matches!(
            c.classify("sudden chest pain"),
            Classification::HardStop { .. }
        ));
        assert!(matches!(
            c.classify("my HOROSCOPE says"),
            Classification::Blocked { .. }
        ));
        assert!(c.classify("what is today's focus?").is_allowed());
    }
}
