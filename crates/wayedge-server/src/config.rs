//! Environment-driven server configuration.

use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};
use wayedge_console::ConsoleConfig;
use wayedge_console::config::DEFAULT_WEBSITE_QUOTA;
use wayedge_db::DbConfig;

pub struct Config {
    pub db: DbConfig,
    pub console: ConsoleConfig,
}

impl Config {
    pub fn load() -> Result<Self, String> {
        let defaults = DbConfig::default();
        let quota = DEFAULT_WEBSITE_QUOTA.to_string();
        Ok(Self {
            db: DbConfig {
                url: try_load("WAYEDGE_DB_URL", &defaults.url)?,
                namespace: try_load("WAYEDGE_DB_NAMESPACE", &defaults.namespace)?,
                database: try_load("WAYEDGE_DB_DATABASE", &defaults.database)?,
                username: try_load("WAYEDGE_DB_USER", &defaults.username)?,
                password: try_load("WAYEDGE_DB_PASSWORD", &defaults.password)?,
            },
            console: ConsoleConfig {
                website_quota: try_load("WAYEDGE_WEBSITE_QUOTA", &quota)?,
                pepper: env::var("WAYEDGE_PASSWORD_PEPPER").ok(),
            },
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, String>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            format!("invalid {key}: {e}")
        })
}
