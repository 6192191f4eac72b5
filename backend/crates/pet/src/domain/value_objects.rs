//! Domain Value Objects
//!
//! Immutable value types for the pet domain.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable platform-issued user identifier
///
/// Opaque: only equality and use as a lookup key are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserIdentity(String);

impl UserIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Identity of a chat-platform user id
    pub fn from_user_id(id: i64) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rate-limit key once the caller has been authenticated
    pub fn limiter_key(&self) -> String {
        format!("user:{}", self.0)
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mood value, always within `[MIN, MAX]`
///
/// Construction clamps, so an out-of-range value can never be held at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Happiness(u8);

impl Happiness {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn saturating_sub(self, points: u8) -> Self {
        Self(self.0.saturating_sub(points))
    }

    pub fn saturating_add(self, points: u8) -> Self {
        Self(self.0.saturating_add(points).min(Self::MAX))
    }
}

impl From<i64> for Happiness {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Happiness> for u8 {
    fn from(h: Happiness) -> Self {
        h.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happiness_clamps() {
        assert_eq!(Happiness::new(-5).value(), 0);
        assert_eq!(Happiness::new(0).value(), 0);
        assert_eq!(Happiness::new(55).value(), 55);
        assert_eq!(Happiness::new(100).value(), 100);
        assert_eq!(Happiness::new(1_000).value(), 100);
    }

    #[test]
    fn test_happiness_saturating_ops() {
        assert_eq!(Happiness::new(98).saturating_add(5).value(), 100);
        assert_eq!(Happiness::new(3).saturating_sub(12).value(), 0);
        assert_eq!(Happiness::new(250).saturating_add(255).value(), 100);
    }

    #[test]
    fn test_happiness_serde_clamps_on_read() {
        let h: Happiness = serde_json::from_str("140").unwrap();
        assert_eq!(h.value(), 100);
        assert_eq!(serde_json::to_string(&h).unwrap(), "100");
    }

    #[test]
    fn test_identity() {
        let id = UserIdentity::from_user_id(279058397);
        assert_eq!(id.as_str(), "279058397");
        assert_eq!(id.limiter_key(), "user:279058397");
        assert_eq!(id, UserIdentity::new("279058397"));
    }
}
