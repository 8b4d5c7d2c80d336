//! Configuration for the outreach console.
//!
//! Defaults, then `config.toml` from the platform config directory, then
//! `OUTREACH_*` environment variables (`__` separates nested keys, e.g.
//! `OUTREACH_CACHE__STALE_SECS`). `OUTREACH_API_URL` is accepted as a
//! shorthand for `backend.url`. The result translates into
//! `outreach_core::ConsoleConfig` and the client's `TransportConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use outreach_core::{CacheConfig, ConsoleConfig, TransportConfig};

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "OUTREACH_API_URL";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub leads: LeadSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackendSettings {
    /// Backend base URL (e.g. "http://localhost:3000"). Checked on first use.
    pub url: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Extra PEM root certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout(),
            ca_cert: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Seconds a fetched result is served without refetching.
    #[serde(default = "default_stale")]
    pub stale_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_secs: default_stale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeadSettings {
    /// Scrape runs read for the leads table.
    #[serde(default = "default_latest_limit")]
    pub latest_limit: u32,

    /// Results requested per search; unset lets the backend decide.
    pub default_count: Option<u32>,
}

impl Default for LeadSettings {
    fn default() -> Self {
        Self {
            latest_limit: default_latest_limit(),
            default_count: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_stale() -> u64 {
    30
}
fn default_latest_limit() -> u32 {
    outreach_core::config::DEFAULT_LATEST_LIMIT
}

impl Config {
    /// Reject values the console cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "backend.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.leads.latest_limit == 0 {
            return Err(ConfigError::Validation {
                field: "leads.latest_limit".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.leads.default_count == Some(0) {
            return Err(ConfigError::Validation {
                field: "leads.default_count".into(),
                reason: "must be greater than zero when set".into(),
            });
        }
        Ok(())
    }

    /// Translate into the core's runtime configuration.
    pub fn to_console_config(&self) -> ConsoleConfig {
        ConsoleConfig {
            cache: CacheConfig {
                stale_time: Duration::from_secs(self.cache.stale_secs),
            },
            latest_limit: self.leads.latest_limit,
            default_search_count: self.leads.default_count,
        }
    }

    /// HTTP transport settings for the backend client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.backend.timeout_secs),
            ca_cert: self.backend.ca_cert.clone(),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "campaignconnect", "outreach").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("outreach");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment. A missing file is not an
/// error; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("OUTREACH_").split("__").ignore(&["api_url"]))
        .merge(Env::raw().only(&[API_URL_ENV]).map(|_| "backend.url".into()));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|jail| {
            let config = load_config_from(&jail.directory().join("missing.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            assert_eq!(config.backend.timeout_secs, 30);
            assert_eq!(config.leads.latest_limit, 10);
            Ok(())
        });
    }

    #[test]
    fn file_values_are_read() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [backend]
                url = "http://localhost:3000"
                timeout_secs = 5

                [cache]
                stale_secs = 60

                [leads]
                latest_limit = 3
                default_count = 25
                "#,
            )?;

            let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.backend.url.as_deref(), Some("http://localhost:3000"));

            let console = config.to_console_config();
            assert_eq!(console.cache.stale_time, Duration::from_secs(60));
            assert_eq!(console.latest_limit, 3);
            assert_eq!(console.default_search_count, Some(25));
            assert_eq!(config.transport().timeout, Duration::from_secs(5));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [backend]
                url = "http://from-file:3000"

                [cache]
                stale_secs = 60
                "#,
            )?;
            jail.set_env("OUTREACH_API_URL", "http://from-env:4000");
            jail.set_env("OUTREACH_CACHE__STALE_SECS", "5");

            let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.backend.url.as_deref(), Some("http://from-env:4000"));
            assert_eq!(config.cache.stale_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn zero_limit_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[leads]\nlatest_limit = 0\n")?;
            let err = load_config_from(Path::new("config.toml")).unwrap_err();
            assert!(err.to_string().contains("leads.latest_limit"));
            Ok(())
        });
    }
}
