//! In-memory curriculum store, for tests and ephemeral runs.

use async_trait::async_trait;
use niagate_core::curriculum::{CurriculumDay, Practice, PracticeRef};
use niagate_core::error::StoreError;
use niagate_core::store::CurriculumStore;
use std::collections::HashMap;

use crate::snapshot::CurriculumSnapshot;

/// Holds every day and practice in memory. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    days: Vec<CurriculumDay>,
    practices: HashMap<String, Practice>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CurriculumSnapshot) -> Self {
        Self {
            days: snapshot.program_days,
            practices: snapshot.practices,
        }
    }

    pub fn with_day(mut self, day: CurriculumDay) -> Self {
        self.days.push(day);
        self
    }

    pub fn with_practice(mut self, key: impl Into<String>, practice: Practice) -> Self {
        self.practices.insert(key.into(), practice);
        self
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn practice_count(&self) -> usize {
        self.practices.len()
    }
}

#[async_trait]
impl CurriculumStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find_day(
        &self,
        program_id: &str,
        day_number: f64,
    ) -> Result<Option<CurriculumDay>, StoreError> {
        Ok(self
            .days
            .iter()
            .find(|d| d.matches(program_id, day_number))
            .cloned())
    }

    async fn get_practice(&self, reference: &PracticeRef) -> Result<Option<Practice>, StoreError> {
        Ok(reference
            .key()
            .and_then(|key| self.practices.get(key))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(program_id: &str, day_number: u32) -> CurriculumDay {
        CurriculumDay {
            program_id: program_id.into(),
            day_number,
            title: Some(format!("{program_id} day {day_number}")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn finds_exact_day() {
        let store = InMemoryStore::new()
            .with_day(day("wakeup_7_days", 1))
            .with_day(day("wakeup_7_days", 2));

        let found = store.find_day("wakeup_7_days", 2.0).await.unwrap().unwrap();
        assert_eq!(found.day_number, 2);
        assert!(store.find_day("wakeup_7_days", 99.0).await.unwrap().is_none());
        assert!(store.find_day("other", 1.0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fractional_day_never_matches() {
        let store = InMemoryStore::new().with_day(day("p", 1));
        assert!(store.find_day("p", 1.5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn first_duplicate_wins() {
        let mut second = day("p", 1);
        second.title = Some("second".into());
        let store = InMemoryStore::new().with_day(day("p", 1)).with_day(second);
        let found = store.find_day("p", 1.0).await.unwrap().unwrap();
        assert_eq!(found.title.as_deref(), Some("p day 1"));
    }

    #[tokio::test]
    async fn practice_lookup_by_id_or_path() {
        let store = InMemoryStore::new().with_practice(
            "breath_01",
            Practice {
                name: "Box breathing".into(),
                description: "4-4-4-4".into(),
            },
        );

        let by_id = store
            .get_practice(&PracticeRef::Id("breath_01".into()))
            .await
            .unwrap();
        assert_eq!(by_id.unwrap().name, "Box breathing");

        let by_path = store
            .get_practice(&PracticeRef::Document {
                path: "SOMATIC_PRACTICES/breath_01".into(),
            })
            .await
            .unwrap();
        assert!(by_path.is_some());

        let missing = store
            .get_practice(&PracticeRef::Id("nope".into()))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
