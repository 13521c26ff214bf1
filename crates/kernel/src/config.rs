//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Directory of `*.module.toml` manifests. When None, only built-in
    /// modules are registered.
    pub modules_dir: Option<PathBuf>,

    /// Module ids to force-disable (from DISABLED_MODULES env var).
    pub disabled_modules: Vec<String>,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Include diagnostic `detail` in error responses (default: false).
    pub expose_error_detail: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            modules_dir: None,
            disabled_modules: Vec::new(),
            cors_allowed_origins: vec!["*".to_string()],
            expose_error_detail: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let modules_dir = env::var("MODULES_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let disabled_modules = env::var("DISABLED_MODULES")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| split_list(&v))
            .ok()
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec!["*".to_string()]);

        let expose_error_detail = match env::var("EXPOSE_ERROR_DETAIL") {
            Ok(v) => parse_bool(&v).context("EXPOSE_ERROR_DETAIL must be true or false")?,
            Err(_) => false,
        };

        Ok(Self {
            port,
            modules_dir,
            disabled_modules,
            cors_allowed_origins,
            expose_error_detail,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognized boolean '{other}'"),
    }
}
