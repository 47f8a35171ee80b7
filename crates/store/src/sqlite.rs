//! SQLite curriculum store.
//!
//! Two tables:
//! - `program_days`: one row per `(program_id, day_number)`, content
//!   columns, and `somatic_ref` stored as JSON text in either shape
//! - `practices`: practice records keyed by id
//!
//! The proxy only reads; the `seed_*`/`import` helpers exist for loading
//! a snapshot ahead of time.

use async_trait::async_trait;
use niagate_core::curriculum::{CurriculumDay, Practice, PracticeRef, PracticeRefs};
use niagate_core::error::StoreError;
use niagate_core::store::CurriculumStore;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

use crate::snapshot::CurriculumSnapshot;

const DAY_COLUMNS: &str = "program_id, day_number, title, focus, description, mental_content, \
     somatic_content, tea_ritual_content, morning_elixir, seed_protocol, journaling_question, \
     somatic_ref";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and run migrations.
    ///
    /// Pass `":memory:"` for an ephemeral database.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Unavailable(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite curriculum store initialized at {path}");
        Ok(store)
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS program_days (
                program_id          TEXT NOT NULL,
                day_number          INTEGER NOT NULL,
                title               TEXT,
                focus               TEXT,
                description         TEXT,
                mental_content      TEXT,
                somatic_content     TEXT,
                tea_ritual_content  TEXT,
                morning_elixir      TEXT,
                seed_protocol       TEXT,
                journaling_question TEXT,
                somatic_ref         TEXT,
                PRIMARY KEY (program_id, day_number)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("program_days table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS practices (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("practices table: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Insert or replace one day record.
    pub async fn seed_day(&self, day: &CurriculumDay) -> Result<(), StoreError> {
        let somatic_ref = day
            .somatic_ref
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::QueryFailed(format!("somatic_ref: {e}")))?;

        sqlx::query(&format!(
            "INSERT OR REPLACE INTO program_days ({DAY_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&day.program_id)
        .bind(i64::from(day.day_number))
        .bind(&day.title)
        .bind(&day.focus)
        .bind(&day.description)
        .bind(&day.mental_content)
        .bind(&day.somatic_content)
        .bind(&day.tea_ritual_content)
        .bind(&day.morning_elixir)
        .bind(&day.seed_protocol)
        .bind(&day.journaling_question)
        .bind(somatic_ref)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("Insert day failed: {e}")))?;
        Ok(())
    }

    /// Insert or replace one practice record.
    pub async fn seed_practice(&self, id: &str, practice: &Practice) -> Result<(), StoreError> {
        sqlx::query("INSERT OR REPLACE INTO practices (id, name, description) VALUES (?, ?, ?)")
            .bind(id)
            .bind(&practice.name)
            .bind(&practice.description)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Insert practice failed: {e}")))?;
        Ok(())
    }

    /// Load a whole snapshot. Returns `(days, practices)` written.
    pub async fn import(&self, snapshot: &CurriculumSnapshot) -> Result<(usize, usize), StoreError> {
        for day in &snapshot.program_days {
            self.seed_day(day).await?;
        }
        for (id, practice) in &snapshot.practices {
            self.seed_practice(id, practice).await?;
        }
        info!(
            days = snapshot.program_days.len(),
            practices = snapshot.practices.len(),
            "Curriculum snapshot imported"
        );
        Ok((snapshot.program_days.len(), snapshot.practices.len()))
    }

    pub async fn day_count(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM program_days")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Count failed: {e}")))?;
        row.try_get("n")
            .map_err(|e| StoreError::QueryFailed(format!("count column: {e}")))
    }

    fn row_to_day(row: &sqlx::sqlite::SqliteRow) -> Result<CurriculumDay, StoreError> {
        let col = |name: &str| -> Result<Option<String>, StoreError> {
            row.try_get(name)
                .map_err(|e| StoreError::QueryFailed(format!("{name} column: {e}")))
        };

        let program_id: String = row
            .try_get("program_id")
            .map_err(|e| StoreError::QueryFailed(format!("program_id column: {e}")))?;
        let day_number: i64 = row
            .try_get("day_number")
            .map_err(|e| StoreError::QueryFailed(format!("day_number column: {e}")))?;
        let key = format!("{program_id}/{day_number}");

        let day_number = u32::try_from(day_number).map_err(|e| StoreError::CorruptRecord {
            key: key.clone(),
            reason: format!("day_number: {e}"),
        })?;

        let somatic_ref = col("somatic_ref")?
            .map(|json| serde_json::from_str::<PracticeRefs>(&json))
            .transpose()
            .map_err(|e| StoreError::CorruptRecord {
                key,
                reason: format!("somatic_ref: {e}"),
            })?;

        Ok(CurriculumDay {
            program_id,
            day_number,
            title: col("title")?,
            focus: col("focus")?,
            description: col("description")?,
            mental_content: col("mental_content")?,
            somatic_content: col("somatic_content")?,
            tea_ritual_content: col("tea_ritual_content")?,
            morning_elixir: col("morning_elixir")?,
            seed_protocol: col("seed_protocol")?,
            journaling_question: col("journaling_question")?,
            somatic_ref,
        })
    }
}

/// Only whole, non-negative day numbers in `u32` range can name a row.
fn integral_day(day_number: f64) -> Option<i64> {
    (day_number.fract() == 0.0 && day_number >= 0.0 && day_number <= f64::from(u32::MAX))
        .then_some(day_number as i64)
}

#[async_trait]
impl CurriculumStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn find_day(
        &self,
        program_id: &str,
        day_number: f64,
    ) -> Result<Option<CurriculumDay>, StoreError> {
        let Some(day_number) = integral_day(day_number) else {
            return Ok(None);
        };

        let row = sqlx::query(&format!(
            "SELECT {DAY_COLUMNS} FROM program_days \
             WHERE program_id = ? AND day_number = ? LIMIT 1"
        ))
        .bind(program_id)
        .bind(day_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("Day lookup failed: {e}")))?;

        row.as_ref().map(Self::row_to_day).transpose()
    }

    async fn get_practice(&self, reference: &PracticeRef) -> Result<Option<Practice>, StoreError> {
        let Some(key) = reference.key() else {
            return Ok(None);
        };

        let row = sqlx::query("SELECT name, description FROM practices WHERE id = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Practice lookup failed: {e}")))?;

        row.map(|row| {
            Ok(Practice {
                name: row
                    .try_get("name")
                    .map_err(|e| StoreError::QueryFailed(format!("name column: {e}")))?,
                description: row
                    .try_get("description")
                    .map_err(|e| StoreError::QueryFailed(format!("description column: {e}")))?,
            })
        })
        .transpose()
    }
}
