//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod init_data;
pub mod interact;
pub mod read_state;

// Re-exports
pub use config::PetConfig;
pub use init_data::{InitDataVerdict, InitDataVerifier, VerifiedInitData, WebAppUser};
pub use interact::InteractUseCase;
pub use read_state::ReadStateUseCase;
