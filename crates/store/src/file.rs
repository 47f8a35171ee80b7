//! File-backed curriculum store: a JSON snapshot loaded once at startup.
//!
//! Storage location: `~/.niagate/curriculum.json` unless configured.
//! The proxy never writes curriculum data, so the file is read-only here.

use async_trait::async_trait;
use niagate_core::curriculum::{CurriculumDay, Practice, PracticeRef};
use niagate_core::error::StoreError;
use niagate_core::store::CurriculumStore;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::in_memory::InMemoryStore;
use crate::snapshot::CurriculumSnapshot;

pub struct FileStore {
    path: PathBuf,
    inner: InMemoryStore,
}

impl FileStore {
    /// Load the snapshot at `path`.
    ///
    /// A missing file yields an empty store (every day is then "not
    /// available"); an unreadable or malformed file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = if path.exists() {
            CurriculumSnapshot::read(&path)?
        } else {
            warn!(path = %path.display(), "Curriculum snapshot not found, starting empty");
            CurriculumSnapshot::default()
        };

        let inner = InMemoryStore::from_snapshot(snapshot);
        debug!(
            path = %path.display(),
            days = inner.day_count(),
            practices = inner.practice_count(),
            "File curriculum store loaded"
        );
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn day_count(&self) -> usize {
        self.inner.day_count()
    }
}

#[async_trait]
impl CurriculumStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn find_day(
        &self,
        program_id: &str,
        day_number: f64,
    ) -> Result<Option<CurriculumDay>, StoreError> {
        self.inner.find_day(program_id, day_number).await
    }

    async fn get_practice(&self, reference: &PracticeRef) -> Result<Option<Practice>, StoreError> {
        self.inner.get_practice(reference).await
    }
}
