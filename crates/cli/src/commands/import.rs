//! `niagate import`: seed the SQLite store from a JSON snapshot.

use niagate_config::AppConfig;
use niagate_store::{CurriculumSnapshot, SqliteStore};
use std::path::{Path, PathBuf};

pub async fn run(config_path: Option<&Path>, snapshot: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let db_path = target_db(&config);

    println!("📥 Importing {}", snapshot.display());
    let snapshot = CurriculumSnapshot::read(snapshot)?;

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::new(&db_path.to_string_lossy()).await?;
    let (days, practices) = store.import(&snapshot).await?;

    println!("   ✅ {days} day(s), {practices} practice(s) → {}", db_path.display());
    if config.store.backend != "sqlite" {
        println!("   ⚠️  store.backend is '{}'; set it to \"sqlite\" to serve this database", config.store.backend);
    }
    Ok(())
}

/// The configured SQLite path, or the default one when another backend is active.
fn target_db(config: &AppConfig) -> PathBuf {
    if config.store.backend == "sqlite" {
        config.store.resolved_path()
    } else {
        AppConfig::config_dir().join("curriculum.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use niagate_core::store::CurriculumStore;

    #[test]
    fn sqlite_backend_uses_configured_path() {
        let mut config = AppConfig::default();
        config.store.backend = "sqlite".into();
        config.store.path = Some(PathBuf::from("/data/nia.db"));
        assert_eq!(target_db(&config), PathBuf::from("/data/nia.db"));
    }

    #[test]
    fn other_backends_use_default_db() {
        let config = AppConfig::default();
        assert!(target_db(&config).ends_with("curriculum.db"));
    }

    #[tokio::test]
    async fn imports_snapshot_into_configured_db() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested/curriculum.db");
        let config_file = dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            format!("[store]\nbackend = \"sqlite\"\npath = {:?}\n", db.to_string_lossy()),
        )
        .unwrap();

        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(
            &snapshot,
            r#"{
                "program_days": [
                    {"program_id": "wakeup_7_days", "day_number": 1, "title": "გაღვიძება"}
                ],
                "practices": {}
            }"#,
        )
        .unwrap();

        run(Some(config_file.as_path()), &snapshot).await.unwrap();

        let store = SqliteStore::new(&db.to_string_lossy()).await.unwrap();
        let day = store.find_day("wakeup_7_days", 1.0).await.unwrap();
        assert_eq!(day.unwrap().title.as_deref(), Some("გაღვიძება"));
    }
}
