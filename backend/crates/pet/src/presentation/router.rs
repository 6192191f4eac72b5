//! Pet Router

use crate::application::config::PetConfig;
use crate::domain::repository::MoodRepository;
use crate::infra::json_file::JsonFileMoodRepository;
use crate::presentation::handlers::{self, PetAppState};
use axum::{Router, routing::post};
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitStore};

/// Create the pet router with the JSON file repository and an in-process
/// rate limiter
pub fn pet_router(repo: JsonFileMoodRepository, config: PetConfig) -> Router {
    pet_router_generic(repo, InMemoryRateLimitStore::new(), config)
}

/// Create a generic pet router for any repository and limiter implementation
pub fn pet_router_generic<R, L>(repo: R, limiter: L, config: PetConfig) -> Router
where
    R: MoodRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let state = PetAppState::new(repo, limiter, config);

    Router::new()
        .route("/state", post(handlers::read_state::<R, L>))
        .route("/pet", post(handlers::pet::<R, L>))
        .route("/webhook", post(handlers::webhook))
        .with_state(state)
}
