//! Interact Use Case

use crate::domain::entities::MoodRecord;
use crate::domain::repository::MoodRepository;
use crate::domain::services::apply_interaction;
use crate::domain::value_objects::UserIdentity;
use crate::error::{PetError, PetResult};
use std::sync::Arc;

/// Interact ("pet") Use Case
///
/// Decays to `now`, applies the boost and stores the result with `now` as
/// the new reference point.
pub struct InteractUseCase<R>
where
    R: MoodRepository,
{
    mood_repo: Arc<R>,
}

impl<R> InteractUseCase<R>
where
    R: MoodRepository,
{
    pub fn new(mood_repo: Arc<R>) -> Self {
        Self { mood_repo }
    }

    pub async fn execute(&self, identity: &UserIdentity, now: f64) -> PetResult<MoodRecord> {
        let result = self
            .mood_repo
            .update(identity, |current| {
                let record = current.unwrap_or_else(|| MoodRecord::fresh(now));
                apply_interaction(&record, now)
            })
            .await;

        let record = match result {
            Ok(record) => record,
            Err(PetError::Storage(msg)) => {
                // Serve the interaction from defaults; nothing is persisted.
                tracing::warn!(
                    identity = %identity,
                    error = %msg,
                    "Mood store unavailable, interaction not persisted"
                );
                apply_interaction(&MoodRecord::fresh(now), now)
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            identity = %identity,
            happiness = record.happiness.value(),
            "Pet interaction recorded"
        );

        Ok(record)
    }
}
