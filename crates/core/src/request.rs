//! Inbound request and outbound reply shapes.
//!
//! [`GuardedRequest::from_value`] performs the structural validation only.
//! A missing or unusable day context is *not* a structural error: it is
//! carried as `day: None` and answered by the pipeline after input
//! classification has had its chance to fire.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::error::RequestError;

/// The `(programId, dayNumber)` pair a request is scoped to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayKey {
    pub program_id: String,
    pub day_number: f64,
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.program_id, self.day_number)
    }
}

/// A structurally valid request. Constructed once per call, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardedRequest {
    /// Trimmed, non-empty user message.
    pub message: String,
    /// The curriculum day, when both parts were supplied and usable.
    pub day: Option<DayKey>,
    /// URLs the model output may mention verbatim.
    pub allowed_media_urls: BTreeSet<String>,
}

impl GuardedRequest {
    /// Build a request directly (tests, CLI).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into().trim().to_string(),
            day: None,
            allowed_media_urls: BTreeSet::new(),
        }
    }

    pub fn with_day(mut self, program_id: impl Into<String>, day_number: f64) -> Self {
        let program_id = program_id.into().trim().to_string();
        self.day = (!program_id.is_empty() && day_number.is_finite()).then_some(DayKey {
            program_id,
            day_number,
        });
        self
    }

    pub fn with_allowed_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_media_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a request body from raw bytes.
    ///
    /// Some clients double-encode the body as a JSON string holding the
    /// JSON object; that one extra layer is unwrapped.
    pub fn from_slice(body: &[u8]) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| RequestError::InvalidJson)?;
        let value = match value {
            Value::String(inner) => {
                serde_json::from_str(&inner).map_err(|_| RequestError::InvalidJson)?
            }
            other => other,
        };
        Self::from_value(&value)
    }

    /// Validate an already-decoded JSON body.
    pub fn from_value(value: &Value) -> Result<Self, RequestError> {
        let body = value.as_object().ok_or(RequestError::InvalidBody)?;

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if message.is_empty() {
            return Err(RequestError::EmptyMessage);
        }

        let program_id = body
            .get("programId")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        let day_number = body.get("dayNumber").and_then(parse_day_number);

        let day = match day_number {
            Some(day_number) if !program_id.is_empty() => Some(DayKey {
                program_id: program_id.to_string(),
                day_number,
            }),
            _ => None,
        };

        // Non-string entries are ignored; a non-array field means "none allowed".
        let allowed_media_urls = body
            .get("allowedMediaUrls")
            .and_then(Value::as_array)
            .map(|urls| {
                urls.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            message: message.to_string(),
            day,
            allowed_media_urls,
        })
    }
}

/// Coerce a `dayNumber` field: finite JSON numbers, or numeric strings.
pub fn parse_day_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// The single reply shape every policy branch funnels into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardedReply {
    pub text: String,
}

impl GuardedReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
