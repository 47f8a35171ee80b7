//! Curriculum records: the only content the model is ever allowed to see.
//!
//! A [`CurriculumDay`] is owned by the data store and is immutable from the
//! proxy's perspective. Its practice references come in two schema
//! generations (bare string ids and embedded document references, single
//! or list); both normalize to [`PracticeRef`] lookup keys.

use serde::{Deserialize, Serialize};

/// One day of a curriculum program, keyed by `(program_id, day_number)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurriculumDay {
    pub program_id: String,
    pub day_number: u32,

    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub mental_content: Option<String>,
    #[serde(default)]
    pub somatic_content: Option<String>,
    #[serde(default)]
    pub tea_ritual_content: Option<String>,
    #[serde(default)]
    pub morning_elixir: Option<String>,
    #[serde(default)]
    pub seed_protocol: Option<String>,
    #[serde(default)]
    pub journaling_question: Option<String>,

    /// Linked practices, in either schema shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub somatic_ref: Option<PracticeRefs>,
}

impl CurriculumDay {
    /// Does this record match the requested key exactly?
    ///
    /// Day numbers arrive as `f64` from the wire; a fractional or
    /// out-of-range request never matches.
    pub fn matches(&self, program_id: &str, day_number: f64) -> bool {
        self.program_id == program_id && f64::from(self.day_number) == day_number
    }

    /// The practice references as a flat list, in declaration order.
    pub fn practice_refs(&self) -> Vec<PracticeRef> {
        match &self.somatic_ref {
            None => Vec::new(),
            Some(PracticeRefs::One(r)) => vec![r.clone()],
            Some(PracticeRefs::Many(list)) => list.clone(),
        }
    }
}

/// The `somatic_ref` field: a single reference or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PracticeRefs {
    One(PracticeRef),
    Many(Vec<PracticeRef>),
}

/// A reference to a practice record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PracticeRef {
    /// Bare identifier (`"breath_01"`).
    Id(String),
    /// Embedded document reference (`{"path": "SOMATIC_PRACTICES/breath_01"}`).
    Document { path: String },
}

impl PracticeRef {
    /// The key used for point lookups in the practices collection.
    ///
    /// Document paths resolve to their last non-empty segment. Returns
    /// `None` for references that cannot name any record.
    pub fn key(&self) -> Option<&str> {
        let raw = match self {
            Self::Id(id) => id.as_str(),
            Self::Document { path } => path.rsplit('/').find(|s| !s.trim().is_empty())?,
        };
        let key = raw.trim();
        if key.is_empty() { None } else { Some(key) }
    }
}

impl std::fmt::Display for PracticeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Document { path } => write!(f, "{path}"),
        }
    }
}

/// A resolved practice: just a name and a description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practice {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}
