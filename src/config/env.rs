//! Server settings read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};

/// Default listen address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
/// Default reference data directory.
pub const DEFAULT_CONFIG_DIR: &str = "./config/default";

/// Process-level settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to (`LEDGER_ADDR`).
    pub addr: SocketAddr,
    /// Directory holding the YAML reference data (`LEDGER_CONFIG_DIR`).
    pub config_dir: PathBuf,
}

impl ServerConfig {
    /// Loads settings from the process environment, reading a `.env` file first
    /// if one exists.
    pub fn from_env() -> LedgerResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_vars(
            std::env::var("LEDGER_ADDR").ok(),
            std::env::var("LEDGER_CONFIG_DIR").ok(),
        )
    }

    /// Builds settings from optional raw values, applying defaults for unset
    /// or empty ones.
    pub fn from_vars(addr: Option<String>, config_dir: Option<String>) -> LedgerResult<Self> {
        let addr = addr
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .map_err(|e| LedgerError::validation("LEDGER_ADDR", format!("'{}': {}", addr, e)))?;

        let config_dir = config_dir
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string())
            .into();

        Ok(Self { addr, config_dir })
    }
}
