//! Pet Backend Module
//!
//! Virtual-pet mood service for a chat-platform mini-app.
//!
//! Clean Architecture structure:
//! - `domain/` - Mood record, decay/boost transitions, repository trait
//! - `application/` - initData verification and use cases
//! - `infra/` - JSON file repository
//! - `presentation/` - HTTP handlers, request guard, router
//!
//! ## Security Model
//! - Identity comes only from initData whose HMAC verifies against the bot token
//! - Forged and expired tokens get the same 403; the reason is only logged
//! - Throttled callers are answered before their token is acted on or any
//!   state is read
//! - Decay is projected from the last interaction and never persisted on reads

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::PetConfig;
pub use application::init_data::{InitDataVerdict, InitDataVerifier};
pub use domain::entities::MoodRecord;
pub use domain::value_objects::{Happiness, UserIdentity};
pub use error::{PetError, PetResult};
pub use infra::json_file::JsonFileMoodRepository;
pub use presentation::router::{pet_router, pet_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};
