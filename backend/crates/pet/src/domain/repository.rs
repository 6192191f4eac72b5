//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entities::MoodRecord;
use crate::domain::value_objects::UserIdentity;
use crate::error::PetResult;

/// Mood record repository trait
#[trait_variant::make(MoodRepository: Send)]
pub trait LocalMoodRepository {
    /// Find the stored record for an identity
    async fn find(&self, identity: &UserIdentity) -> PetResult<Option<MoodRecord>>;

    /// Replace the record with `f(current)` and return what was stored
    ///
    /// Implementations must run read, `f`, and write as one step per
    /// identity so that concurrent interactions are never lost.
    async fn update<F>(&self, identity: &UserIdentity, f: F) -> PetResult<MoodRecord>
    where
        F: FnOnce(Option<MoodRecord>) -> MoodRecord + Send;
}
