//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC-SHA256, hex)
//! - Client address extraction
//! - Rate limiting infrastructure

pub mod client;
pub mod crypto;
pub mod rate_limit;
