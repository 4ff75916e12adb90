//! Typed configuration from environment variables.
//!
//! Loads once at startup. Nothing is required; the assignment policy falls
//! back to "any match" when no policy file is configured.

pub mod policy;

pub use policy::AssignmentPolicy;

use std::path::PathBuf;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Config {
    pub otel_endpoint: Option<String>,
    pub log_level: String,
    /// Path to a TOML policy file (`TASKMATCH_POLICY`).
    pub policy_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            otel_endpoint: optional_var("OTEL_ENDPOINT"),
            log_level: optional_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            policy_path: optional_var("TASKMATCH_POLICY").map(PathBuf::from),
        })
    }

    /// Resolve the assignment policy, reading the policy file if one is set.
    pub fn policy(&self) -> Result<AssignmentPolicy> {
        match self.policy_path {
            Some(ref path) => AssignmentPolicy::load(path),
            None => Ok(AssignmentPolicy::default()),
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
