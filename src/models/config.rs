//! Configuration module for the `contract-risk` binary
//!
//! The classifier itself never reads configuration; this only shapes
//! logging and report output. Precedence: defaults < environment < CLI flags.

use crate::models::errors::{AppError, AppResult};

/// Log filter environment variable (EnvFilter syntax)
pub const ENV_LOG: &str = "CONTRACT_RISK_LOG";
/// `true`/`false`: pretty-print JSON reports
pub const ENV_PRETTY: &str = "CONTRACT_RISK_PRETTY";
/// `true`/`false`: print a batch summary after all snapshots
pub const ENV_SUMMARY: &str = "CONTRACT_RISK_SUMMARY";

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::config(format!("Unknown output format: {}", other))),
        }
    }
}

/// Output and logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub format: OutputFormat,
    pub pretty: bool,
    pub batch_summary: bool,
    pub log_filter: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            pretty: false,
            batch_summary: false,
            log_filter: "warn".to_string(),
        }
    }
}

impl ReportConfig {
    /// Defaults overridden by environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }
        if let Some(value) = lookup(ENV_PRETTY) {
            config.pretty = parse_bool(ENV_PRETTY, &value)?;
        }
        if let Some(value) = lookup(ENV_SUMMARY) {
            config.batch_summary = parse_bool(ENV_SUMMARY, &value)?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::config(format!("{} must be a boolean, got {:?}", key, other))),
    }
}
