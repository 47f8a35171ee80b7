//! Output sanitization: URL containment and directive-language containment.
//!
//! Raw model text is checked in two independent passes. Each pass has a
//! configurable strategy (replace the whole reply, or rewrite in place);
//! the strategies are selectors on this one code path. Whatever the
//! strategy, the returned text never contains an unapproved URL, never
//! matches a forbidden directive pattern, and is never empty.

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::GuardError;
use crate::matcher::{PatternSet, compile_pattern};
use crate::refusal::{RefusalCategory, RefusalSelector};
use niagate_config::{DirectiveStrategy, PolicyConfig, UrlStrategy};

/// `http(s)://` tokens, up to whitespace or a closing parenthesis.
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://[^\s)]+").expect("URL pattern compiles"));

/// Something the sanitizer did to the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SanitizeAction {
    /// Unapproved URLs found; whole reply replaced.
    UrlReplaced { urls: Vec<String> },
    /// Unapproved URLs removed in place.
    UrlStripped { urls: Vec<String> },
    /// Directive language found; whole reply replaced.
    DirectiveReplaced { pattern: String },
    /// Directive phrases rewritten with hedged equivalents.
    DirectiveSoftened { rules_applied: usize },
    /// Nothing usable left; fallback substituted.
    EmptyReplaced,
}

/// The sanitized reply and an account of how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    pub actions: Vec<SanitizeAction>,
    /// True when `text` is a pre-authored fallback, not model output.
    pub fallback: bool,
}

impl Sanitized {
    /// The raw text passed through untouched (apart from trimming).
    pub fn is_clean(&self) -> bool {
        self.actions.is_empty()
    }
}

#[derive(Debug)]
struct SofteningRule {
    pattern: Regex,
    replacement: String,
}

/// Validates and rewrites model output against the configured policy.
#[derive(Debug)]
pub struct OutputSanitizer {
    directive_patterns: PatternSet,
    softening: Vec<SofteningRule>,
    url_strategy: UrlStrategy,
    directive_strategy: DirectiveStrategy,
    refusals: RefusalSelector,
}

impl OutputSanitizer {
    pub fn from_config(policy: &PolicyConfig, refusals: RefusalSelector) -> Result<Self, GuardError> {
        let softening = policy
            .softening_rules
            .iter()
            .map(|rule| {
                Ok(SofteningRule {
                    pattern: compile_pattern(&rule.pattern)?,
                    replacement: rule.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>, GuardError>>()?;

        Ok(Self {
            directive_patterns: PatternSet::compile(&policy.directive_patterns)?,
            softening,
            url_strategy: policy.url_strategy,
            directive_strategy: policy.directive_strategy,
            refusals,
        })
    }

    pub fn url_strategy(&self) -> UrlStrategy {
        self.url_strategy
    }

    pub fn directive_strategy(&self) -> DirectiveStrategy {
        self.directive_strategy
    }

    /// Run both checks over `raw` and return a compliant, non-empty reply.
    pub fn sanitize(&self, raw: &str, allowed_urls: &BTreeSet<String>) -> Sanitized {
        let mut text = raw.trim().to_string();
        let mut actions = Vec::new();

        let foreign = foreign_urls(&text, allowed_urls);
        if !foreign.is_empty() {
            match self.url_strategy {
                UrlStrategy::ReplaceReply => {
                    actions.push(SanitizeAction::UrlReplaced { urls: foreign });
                    return self.fallback(actions);
                }
                UrlStrategy::StripUrls => {
                    text = strip_foreign_urls(&text, allowed_urls).trim().to_string();
                    actions.push(SanitizeAction::UrlStripped { urls: foreign });
                }
            }
        }

        if let Some(pattern) = self.directive_patterns.first_match(&text) {
            let pattern = pattern.to_string();
            match self.directive_strategy {
                DirectiveStrategy::ReplaceReply => {
                    actions.push(SanitizeAction::DirectiveReplaced { pattern });
                    return self.fallback(actions);
                }
                DirectiveStrategy::Soften => {
                    let (softened, rules_applied) = self.soften(&text);
                    match self.directive_patterns.first_match(&softened) {
                        // Softening could not cover every phrase.
                        Some(remaining) => {
                            actions.push(SanitizeAction::DirectiveReplaced {
                                pattern: remaining.to_string(),
                            });
                            return self.fallback(actions);
                        }
                        None => {
                            text = softened.trim().to_string();
                            actions.push(SanitizeAction::DirectiveSoftened { rules_applied });
                        }
                    }
                }
            }
        }

        // Rewrites come from config; re-check before anything leaves.
        let leaked = foreign_urls(&text, allowed_urls);
        if !leaked.is_empty() {
            actions.push(SanitizeAction::UrlReplaced { urls: leaked });
            return self.fallback(actions);
        }

        if text.is_empty() {
            actions.push(SanitizeAction::EmptyReplaced);
            return self.fallback(actions);
        }

        Sanitized {
            text,
            actions,
            fallback: false,
        }
    }

    fn soften(&self, text: &str) -> (String, usize) {
        let mut out = text.to_string();
        let mut applied = 0;
        for rule in &self.softening {
            if rule.pattern.is_match(&out) {
                out = rule
                    .pattern
                    .replace_all(&out, NoExpand(&rule.replacement))
                    .into_owned();
                applied += 1;
            }
        }
        (out, applied)
    }

    fn fallback(&self, actions: Vec<SanitizeAction>) -> Sanitized {
        Sanitized {
            text: self.refusals.pick(RefusalCategory::OutputFallback),
            actions,
            fallback: true,
        }
    }
}

/// Sentence punctuation that may trail a URL in prose.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Every `http(s)://` token in the text, in order of appearance, with
/// trailing sentence punctuation removed.
pub fn extract_urls(text: &str) -> Vec<&str> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| trim_url(m.as_str()))
        .collect()
}

/// URLs in the text that are not members of the allowed set.
pub fn foreign_urls(text: &str, allowed: &BTreeSet<String>) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|raw| !is_allowed(raw, allowed))
        .map(|raw| trim_url(raw).to_string())
        .collect()
}

fn trim_url(raw: &str) -> &str {
    raw.trim_end_matches(TRAILING_PUNCTUATION)
}

/// Exact membership, either as matched or without trailing punctuation.
fn is_allowed(raw: &str, allowed: &BTreeSet<String>) -> bool {
    allowed.contains(raw) || allowed.contains(trim_url(raw))
}

fn strip_foreign_urls(text: &str, allowed: &BTreeSet<String>) -> String {
    URL_PATTERN
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let raw = &caps[0];
            if is_allowed(raw, allowed) {
                raw.to_string()
            } else {
                // Keep the punctuation, drop the URL.
                raw[trim_url(raw).len()..].to_string()
            }
        })
        .into_owned()
}
