use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::error::{Result, YorigoError};

pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    /// Directory holding one recommender table per user
    pub agent_dir: String,
}

impl Config {
    /// Read settings from `YORIGO_*` environment variables, defaulting what is unset
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            database_url: try_load(&lookup, "YORIGO_DATABASE_URL", "sqlite://yorigo.db")?,
            max_connections: try_load(&lookup, "YORIGO_MAX_CONNECTIONS", "5")?,
            agent_dir: try_load(&lookup, "YORIGO_AGENT_DIR", "agents")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            YorigoError::InvalidArgument(format!("{key}: {e}"))
        })
}
