//! CurriculumStore trait: the data-store collaborator.
//!
//! The proxy never writes curriculum data; it issues one equality query
//! for the day record and one point lookup per practice reference.

use async_trait::async_trait;

use crate::curriculum::{CurriculumDay, Practice, PracticeRef};
use crate::error::StoreError;

/// Read-only access to curriculum days and practices.
///
/// Implementations: JSON snapshot file, SQLite, in-memory (for testing).
#[async_trait]
pub trait CurriculumStore: Send + Sync {
    /// The backend name (e.g., "file", "sqlite", "memory").
    fn name(&self) -> &str;

    /// Exact-match lookup on both key fields. `Ok(None)` means no record.
    async fn find_day(
        &self,
        program_id: &str,
        day_number: f64,
    ) -> std::result::Result<Option<CurriculumDay>, StoreError>;

    /// Point lookup of a single practice. `Ok(None)` means it does not exist.
    async fn get_practice(
        &self,
        reference: &PracticeRef,
    ) -> std::result::Result<Option<Practice>, StoreError>;
}
