//! Lexical matching over normalized text.
//!
//! Two primitives back every policy decision: case-insensitive substring
//! containment against a term list, and case-insensitive regex search
//! against a compiled pattern set. Both are pure.

use regex::{Regex, RegexBuilder};

use crate::GuardError;

/// True if any term occurs anywhere in the lowercased text.
///
/// Blank terms are ignored so a stray `""` in a config list cannot turn
/// into a match-everything rule.
pub fn matches(text: &str, terms: &[String]) -> bool {
    first_match(text, terms).is_some()
}

/// The first term (in list order) found in the text.
pub fn first_match<'a>(text: &str, terms: &'a [String]) -> Option<&'a str> {
    let lower = text.to_lowercase();
    terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .find(|t| lower.contains(&t.to_lowercase()))
}

/// Every term found in the text, in list order.
pub fn find_terms<'a>(text: &str, terms: &'a [String]) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty() && lower.contains(&t.to_lowercase()))
        .collect()
}

/// True if any pattern matches anywhere in the text.
pub fn matches_pattern(text: &str, patterns: &PatternSet) -> bool {
    patterns.is_match(text)
}

/// A compiled, ordered set of case-insensitive patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compile regex sources. Word boundaries are Unicode-aware, so `\b`
    /// works around Georgian words the same as around English ones.
    pub fn compile<S: AsRef<str>>(sources: &[S]) -> Result<Self, GuardError> {
        let patterns = sources
            .iter()
            .map(|s| compile_pattern(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Source of the first pattern that matches, for audit details.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.is_match(text))
            .map(|p| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

pub(crate) fn compile_pattern(source: &str) -> Result<Regex, GuardError> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| GuardError::InvalidPattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        })
}
