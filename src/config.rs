use std::time::Duration;

use anyhow::{bail, Context};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:batepapo.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Upper bound for every duration setting.
pub const MAX_DURATION_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// sqlx connection string, or `memory`.
    pub database_url: String,
    pub bind_addr: String,
    pub reap_interval: Duration,
    pub inactivity_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            reap_interval: Duration::from_secs(15),
            inactivity_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Config::default();

        let secs = |key: &str, default: Duration| -> anyhow::Result<Duration> {
            let Some(raw) = lookup(key) else {
                return Ok(default);
            };
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{key}={raw:?} is not a number of seconds"))?;
            if secs == 0 {
                bail!("{key} must be at least 1 second");
            }
            if secs > MAX_DURATION_SECS {
                bail!("{key} must be at most {MAX_DURATION_SECS} seconds");
            }
            Ok(Duration::from_secs(secs))
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            reap_interval: secs("REAP_INTERVAL_SECS", defaults.reap_interval)?,
            inactivity_timeout: secs("INACTIVITY_TIMEOUT_SECS", defaults.inactivity_timeout)?,
        })
    }
}
