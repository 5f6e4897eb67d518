//! Process configuration from the environment.
//!
//! `DATABASE_URL` and `AGENT_BASE_URL` are required: the relational store
//! and the agent are both hard dependencies, so their absence is a fatal
//! startup configuration error, never a workflow error.

use crate::defaults::{ENV_AGENT_BASE_URL, ENV_DATABASE_URL, ENV_HOST, ENV_PORT, SERVER_HOST, SERVER_PORT};
use crate::error::{Error, Result};

/// Application configuration resolved at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Base URL of the external indexing agent.
    pub agent_base_url: String,
    /// HTTP server bind host.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
}

impl AppConfig {
    /// Resolve configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database_url = require_var(ENV_DATABASE_URL)?;
        let agent_base_url = require_var(ENV_AGENT_BASE_URL)?;

        let host = std::env::var(ENV_HOST).unwrap_or_else(|_| SERVER_HOST.to_string());
        let port = std::env::var(ENV_PORT)
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(SERVER_PORT);

        Ok(Self {
            database_url,
            agent_base_url: agent_base_url.trim_end_matches('/').to_string(),
            host,
            port,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Config(format!("{} is not set", name))),
    }
}
