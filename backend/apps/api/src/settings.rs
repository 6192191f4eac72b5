//! Process settings read from the environment

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use pet::PetConfig;
use pet::application::config::{DEFAULT_INIT_DATA_LIFETIME, RateLimitConfig};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://akrpnk.github.io";
pub const DEFAULT_STATE_FILE: &str = "state.json";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Settings {
    pub pet: PetConfig,
    /// The only origin allowed to call the API from a browser
    pub allowed_origin: String,
    pub state_file: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let Some(bot_token) = var("BOT_TOKEN") else {
            bail!("BOT_TOKEN must be set in environment");
        };

        let allowed_origin =
            var("ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());

        let state_file = PathBuf::from(
            var("STATE_FILE").unwrap_or_else(|| DEFAULT_STATE_FILE.to_string()),
        );

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be host:port")?;

        let init_data_lifetime = match var("INIT_DATA_LIFETIME_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .context("INIT_DATA_LIFETIME_SECS must be a whole number of seconds")?,
            ),
            None => DEFAULT_INIT_DATA_LIFETIME,
        };

        let rate_limit = match var("RATE_LIMIT_PER_SECOND") {
            Some(raw) => {
                let per_second: u32 = raw
                    .trim()
                    .parse()
                    .context("RATE_LIMIT_PER_SECOND must be a positive integer")?;
                if per_second == 0 {
                    bail!("RATE_LIMIT_PER_SECOND must be a positive integer");
                }
                RateLimitConfig::new(per_second, 1)
            }
            None => RateLimitConfig::default(),
        };

        let trust_forwarded_for = match var("TRUST_FORWARDED_FOR") {
            Some(raw) => parse_flag(&raw).context("TRUST_FORWARDED_FOR must be true or false")?,
            None => false,
        };

        Ok(Self {
            pet: PetConfig::new(bot_token.trim())
                .with_init_data_lifetime(init_data_lifetime)
                .with_rate_limit(rate_limit)
                .with_trust_forwarded_for(trust_forwarded_for),
            allowed_origin: allowed_origin.trim().to_string(),
            state_file,
            bind_addr,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
