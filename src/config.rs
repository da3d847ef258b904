//! Binary configuration
//!
//! Settings come from an optional JSON file named by `FERRUM_LITE_CONFIG`,
//! then environment variables, then the positional address argument, each
//! overriding the one before.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const CONFIG_ENV: &str = "FERRUM_LITE_CONFIG";
pub const ADDR_ENV: &str = "FERRUM_LITE_ADDR";
pub const PASSWORD_ENV: &str = "FERRUM_LITE_PASSWORD";

/// Server settings for the binary
///
/// The default address is loopback only, `127.0.0.1:6300`, so a test
/// server is not reachable from other hosts. Use `0.0.0.0:6300` to listen
/// on every interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: String,
    /// Shared secret clients must AUTH with; None leaves the server open
    pub password: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: "127.0.0.1:6300".to_string(),
            password: None,
        }
    }
}

impl ServerConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse config")
    }

    /// Read a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_json(&text)
    }

    /// Build the config from the environment and the optional address
    /// argument
    pub fn from_env(addr_arg: Option<String>) -> Result<Self> {
        let config = match env::var(CONFIG_ENV) {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        Ok(config
            .with_overrides(env::var(ADDR_ENV).ok(), env::var(PASSWORD_ENV).ok())
            .with_overrides(addr_arg, None))
    }

    /// Replace fields that have a non-empty override
    pub fn with_overrides(mut self, addr: Option<String>, password: Option<String>) -> Self {
        if let Some(addr) = addr.filter(|a| !a.is_empty()) {
            self.addr = addr;
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.password = Some(password);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "127.0.0.1:6300");
        assert_eq!(config.password, None);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = ServerConfig::from_json(r#"{"password": "s3cret"}"#).unwrap();
        assert_eq!(config.addr, "127.0.0.1:6300");
        assert_eq!(config.password.as_deref(), Some("s3cret"));
        assert!(ServerConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::default()
            .with_overrides(Some("0.0.0.0:7000".to_string()), Some(String::new()))
            .with_overrides(None, Some("pw".to_string()));
        assert_eq!(config.addr, "0.0.0.0:7000");
        assert_eq!(config.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(ServerConfig::load("/nonexistent/ferrum-lite.json").is_err());
    }
}
