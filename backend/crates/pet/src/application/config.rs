//! Application Configuration
//!
//! Configuration for the pet application layer.

use std::fmt;
use std::time::Duration;

pub use platform::rate_limit::RateLimitConfig;

/// Default initData lifetime
pub const DEFAULT_INIT_DATA_LIFETIME: Duration = Duration::from_secs(3600);

/// Pet application configuration
#[derive(Clone)]
pub struct PetConfig {
    /// Bot token shared with the chat platform; signs initData
    pub bot_token: String,
    /// How long a signed initData stays acceptable after `auth_date`
    pub init_data_lifetime: Duration,
    /// Per-caller request quota
    pub rate_limit: RateLimitConfig,
    /// Key anonymous callers by `X-Forwarded-For` instead of the socket
    /// peer; only safe behind a proxy that overwrites the header
    pub trust_forwarded_for: bool,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            init_data_lifetime: DEFAULT_INIT_DATA_LIFETIME,
            rate_limit: RateLimitConfig::default(),
            trust_forwarded_for: false,
        }
    }
}

impl PetConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            ..Default::default()
        }
    }

    pub fn with_init_data_lifetime(mut self, lifetime: Duration) -> Self {
        self.init_data_lifetime = lifetime;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}

impl fmt::Debug for PetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PetConfig")
            .field("bot_token", &"[REDACTED]")
            .field("init_data_lifetime", &self.init_data_lifetime)
            .field("rate_limit", &self.rate_limit)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish()
    }
}
