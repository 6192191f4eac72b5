//! Read State Use Case

use crate::domain::entities::MoodRecord;
use crate::domain::repository::MoodRepository;
use crate::domain::services::apply_decay;
use crate::domain::value_objects::UserIdentity;
use crate::error::{PetError, PetResult};
use std::sync::Arc;

/// Read State Use Case
///
/// Reports decayed happiness without writing anything back.
pub struct ReadStateUseCase<R>
where
    R: MoodRepository,
{
    mood_repo: Arc<R>,
}

impl<R> ReadStateUseCase<R>
where
    R: MoodRepository,
{
    pub fn new(mood_repo: Arc<R>) -> Self {
        Self { mood_repo }
    }

    pub async fn execute(&self, identity: &UserIdentity, now: f64) -> PetResult<MoodRecord> {
        let stored = match self.mood_repo.find(identity).await {
            Ok(stored) => stored,
            Err(PetError::Storage(msg)) => {
                tracing::warn!(
                    identity = %identity,
                    error = %msg,
                    "Mood store unreadable, reporting default state"
                );
                None
            }
            Err(e) => return Err(e),
        };

        let record = stored.unwrap_or_else(|| MoodRecord::fresh(now));
        let projected = apply_decay(&record, now);

        tracing::debug!(
            identity = %identity,
            happiness = projected.happiness.value(),
            "Read mood state"
        );

        Ok(projected)
    }
}
