//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the vocabulary every other crate agrees on:
//! - The unified application error and its classification
//! - RFC 7807 rendering of that error (feature `axum`)
//!
//! Only things that are "hard to change" and mean the same thing in every
//! bounded context belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
