//! Refusal selection: pre-vetted fallback texts keyed by failure category.
//!
//! Every text a category can produce is authored ahead of time, so any
//! pick is policy-compliant by construction. Selection is uniform.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::GuardError;
use niagate_config::RefusalConfig;

/// Why the pipeline is falling back to a pre-authored reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefusalCategory {
    /// The user message hit a blocked topic.
    InputBlocked,
    /// The model output failed sanitization.
    OutputFallback,
    /// A store or completion failure.
    ServerError,
}

impl RefusalCategory {
    pub const ALL: [RefusalCategory; 3] = [
        RefusalCategory::InputBlocked,
        RefusalCategory::OutputFallback,
        RefusalCategory::ServerError,
    ];
}

/// Picks a refusal text for a category.
#[derive(Debug, Clone)]
pub struct RefusalSelector {
    input_blocked: Vec<String>,
    output_fallback: Vec<String>,
    server_error: Vec<String>,
}

impl RefusalSelector {
    /// Build a selector; every category must have at least one non-blank text.
    pub fn new(config: &RefusalConfig) -> Result<Self, GuardError> {
        let selector = Self {
            input_blocked: non_blank(&config.input_blocked),
            output_fallback: non_blank(&config.output_fallback),
            server_error: non_blank(&config.server_error),
        };
        for category in RefusalCategory::ALL {
            if selector.set(category).is_empty() {
                return Err(GuardError::EmptyRefusalSet(category));
            }
        }
        Ok(selector)
    }

    /// All texts a category can produce.
    pub fn set(&self, category: RefusalCategory) -> &[String] {
        match category {
            RefusalCategory::InputBlocked => &self.input_blocked,
            RefusalCategory::OutputFallback => &self.output_fallback,
            RefusalCategory::ServerError => &self.server_error,
        }
    }

    /// Uniform pick using the thread-local RNG.
    pub fn pick(&self, category: RefusalCategory) -> String {
        self.pick_with(category, &mut rand::rng())
    }

    /// Uniform pick with a caller-supplied RNG.
    pub fn pick_with<R: Rng + ?Sized>(&self, category: RefusalCategory, rng: &mut R) -> String {
        // Sets are non-empty by construction.
        self.set(category).choose(rng).cloned().unwrap_or_default()
    }
}

fn non_blank(list: &[String]) -> Vec<String> {
    list.iter()
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .collect()
}
