//! The JSON snapshot format shared by the file store and SQLite import.
//!
//! ```json
//! {
//!   "program_days": [ { "program_id": "wakeup_7_days", "day_number": 1, ... } ],
//!   "practices": { "breath_01": { "name": "...", "description": "..." } }
//! }
//! ```

use niagate_core::curriculum::{CurriculumDay, Practice};
use niagate_core::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurriculumSnapshot {
    #[serde(default)]
    pub program_days: Vec<CurriculumDay>,

    #[serde(default)]
    pub practices: HashMap<String, Practice>,
}

impl CurriculumSnapshot {
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json)
            .map_err(|e| StoreError::Unavailable(format!("Invalid curriculum snapshot: {e}")))
    }

    pub fn read(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }
}
