use std::env;

use tracing::info;

use crate::error::{ChainGraphError, Result};

pub const DEFAULT_DATABASE_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_DATABASE_USER: &str = "neo4j";
pub const DEFAULT_DATABASE_PASSWORD: &str = "password";
pub const DEFAULT_DEV_CHAIN: &str = "https://rpc.sepolia.org/";

/// Graph store connection settings.
///
/// Each field comes from the command line, then the environment
/// (`NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`), then the local
/// development default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl GraphConfig {
    pub fn resolve(uri: Option<String>, user: Option<String>, password: Option<String>) -> Self {
        Self {
            uri: uri
                .or_else(|| optional_env("NEO4J_URI"))
                .unwrap_or_else(|| DEFAULT_DATABASE_URI.to_string()),
            user: user
                .or_else(|| optional_env("NEO4J_USER"))
                .unwrap_or_else(|| DEFAULT_DATABASE_USER.to_string()),
            password: password
                .or_else(|| optional_env("NEO4J_PASSWORD"))
                .unwrap_or_else(|| DEFAULT_DATABASE_PASSWORD.to_string()),
        }
    }

    /// Log the config with the password masked.
    pub fn log_redacted(&self) {
        info!(
            uri = self.uri.as_str(),
            user = self.user.as_str(),
            password = "[redacted]",
            "Graph store config"
        );
    }
}

/// Chain node connection settings: command line, then `CHAIN_RPC_URL`, then
/// the caller's fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub rpc_url: String,
}

impl ChainConfig {
    pub fn resolve(rpc_url: Option<String>, fallback: Option<&str>) -> Result<Self> {
        let rpc_url = rpc_url
            .or_else(|| optional_env("CHAIN_RPC_URL"))
            .or_else(|| fallback.map(str::to_string))
            .ok_or_else(|| {
                ChainGraphError::Config(
                    "a chain RPC url is required (--chain or CHAIN_RPC_URL)".to_string(),
                )
            })?;
        Ok(Self { rpc_url })
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
