//! Infrastructure Layer
//!
//! Durable storage for mood records.

pub mod json_file;

pub use json_file::JsonFileMoodRepository;
