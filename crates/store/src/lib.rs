//! Curriculum store adapters for niagate.

pub mod file;
pub mod in_memory;
pub mod snapshot;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::FileStore;
pub use in_memory::InMemoryStore;
pub use snapshot::CurriculumSnapshot;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use niagate_config::StoreConfig;
use niagate_core::error::StoreError;
use niagate_core::store::CurriculumStore;
use std::sync::Arc;

/// Build the store named by `store.backend`.
pub async fn build_from_config(
    config: &StoreConfig,
) -> Result<Arc<dyn CurriculumStore>, StoreError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryStore::new())),
        "file" => Ok(Arc::new(FileStore::open(config.resolved_path())?)),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = config.resolved_path();
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!("{}: {e}", parent.display()))
                })?;
            }
            let store = SqliteStore::new(&path.to_string_lossy()).await?;
            Ok(Arc::new(store))
        }
        other => Err(StoreError::Unavailable(format!(
            "Unknown store backend '{other}'"
        ))),
    }
}
