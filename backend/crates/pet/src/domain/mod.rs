//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (MoodRecord)
//! - Domain value objects (UserIdentity, Happiness)
//! - Domain services (decay and boost transitions)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
