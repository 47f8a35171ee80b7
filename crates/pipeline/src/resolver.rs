//! Context resolution: the day record plus its linked practices.
//!
//! One equality query for the day, then one point lookup per practice
//! reference, fanned out concurrently. A failing or missing practice is
//! dropped on its own; it never fails the day.

use futures::future::join_all;
use niagate_core::curriculum::{CurriculumDay, Practice};
use niagate_core::error::StoreError;
use niagate_core::store::CurriculumStore;
use tracing::{debug, warn};

/// A day record with its practices resolved, in reference order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDay {
    pub day: CurriculumDay,
    pub practices: Vec<Practice>,
}

#[derive(Debug)]
pub enum Resolution {
    Found(ResolvedDay),
    NotFound,
    StoreError(StoreError),
}

pub async fn resolve(store: &dyn CurriculumStore, program_id: &str, day_number: f64) -> Resolution {
    let day = match store.find_day(program_id, day_number).await {
        Ok(Some(day)) => day,
        Ok(None) => return Resolution::NotFound,
        Err(e) => return Resolution::StoreError(e),
    };

    let refs = day.practice_refs();
    let lookups = refs.iter().map(|r| store.get_practice(r));
    let results = join_all(lookups).await;

    let practices = refs
        .iter()
        .zip(results)
        .filter_map(|(reference, result)| match result {
            Ok(Some(practice)) => Some(practice),
            Ok(None) => {
                warn!(reference = %reference, "Practice not found, skipping");
                None
            }
            Err(e) => {
                warn!(reference = %reference, error = %e, "Practice lookup failed, skipping");
                None
            }
        })
        .collect::<Vec<_>>();

    debug!(
        store = store.name(),
        program_id,
        day_number,
        references = refs.len(),
        resolved = practices.len(),
        "Curriculum day resolved"
    );

    Resolution::Found(ResolvedDay { day, practices })
}
