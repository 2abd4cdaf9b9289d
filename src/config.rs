// src/config.rs

use crate::core::error::ReconError;
use crate::logging::{get_data_dir, PROJECT_NAME};
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

lazy_static! {
    pub static ref API_URL_ENV: String = format!("{}_API_URL", PROJECT_NAME.clone());
    pub static ref TIMEOUT_ENV: String = format!("{}_TIMEOUT_SECS", PROJECT_NAME.clone());
    pub static ref PROBE_UPLINK_ENV: String = format!("{}_PROBE_UPLINK", PROJECT_NAME.clone());
    pub static ref REPORT_DIR_ENV: String = format!("{}_REPORT_DIR", PROJECT_NAME.clone());
}

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the engine and its HTTP uplink.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the intelligence backend.
    pub api_base: Url,
    /// Per-source query timeout. A timeout is just another source failure.
    pub source_timeout: Duration,
    /// Probe the backend health endpoint before each fan-out.
    pub probe_uplink: bool,
    /// Where exported audit documents are written.
    pub report_dir: PathBuf,
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            source_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            probe_uplink: false,
            report_dir: get_data_dir().join("reports"),
            user_agent: format!("ReconGuard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EngineConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ReconError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset keys keep
    /// their defaults; set-but-invalid keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReconError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(&API_URL_ENV) {
            let url = Url::parse(raw.trim())
                .map_err(|e| ReconError::Config(format!("{} '{}': {}", *API_URL_ENV, raw, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ReconError::Config(format!("{} must be an http(s) URL, got '{}'", *API_URL_ENV, raw)));
            }
            config.api_base = url;
        }

        if let Some(raw) = lookup(&TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse()
                .map_err(|e| ReconError::Config(format!("{} '{}': {}", *TIMEOUT_ENV, raw, e)))?;
            if secs == 0 {
                return Err(ReconError::Config(format!("{} must be greater than zero", *TIMEOUT_ENV)));
            }
            config.source_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(&PROBE_UPLINK_ENV) {
            config.probe_uplink = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(ReconError::Config(format!("{} '{}' is not a boolean", *PROBE_UPLINK_ENV, raw))),
            };
        }

        if let Some(raw) = lookup(&REPORT_DIR_ENV) {
            config.report_dir = PathBuf::from(raw);
        }

        Ok(config)
    }
}
