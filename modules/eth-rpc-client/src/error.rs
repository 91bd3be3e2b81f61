use alloy::transports::{RpcError, TransportError, TransportErrorKind};
use chaingraph_common::ChainGraphError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EthRpcError>;

#[derive(Debug, Error)]
pub enum EthRpcError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("RPC {method} error {code}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    #[error("RPC {method} returned nothing for {target}")]
    NotFound { method: String, target: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid endpoint: {0}")]
    Endpoint(String),
}

impl EthRpcError {
    /// Classify a provider failure for `method`.
    pub fn from_transport(method: &str, err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => EthRpcError::Rpc {
                method: method.to_string(),
                code: payload.code,
                message: payload.message.to_string(),
            },
            RpcError::NullResp => EthRpcError::NotFound {
                method: method.to_string(),
                target: "null response".to_string(),
            },
            RpcError::DeserError { err, .. } => {
                EthRpcError::Decode(format!("{method} response: {err}"))
            }
            RpcError::SerError(err) => EthRpcError::Decode(format!("{method} request: {err}")),
            RpcError::Transport(TransportErrorKind::HttpError(http)) => EthRpcError::Http {
                status: http.status,
                message: http.body,
            },
            other => EthRpcError::Network(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for EthRpcError {
    fn from(err: reqwest::Error) -> Self {
        EthRpcError::Network(err.to_string())
    }
}

impl From<EthRpcError> for ChainGraphError {
    fn from(err: EthRpcError) -> Self {
        match err {
            EthRpcError::Network(_) | EthRpcError::Http { .. } => {
                ChainGraphError::Connection(err.to_string())
            }
            EthRpcError::NotFound { .. } => ChainGraphError::NotFound(err.to_string()),
            EthRpcError::Rpc { .. } | EthRpcError::Decode(_) => ChainGraphError::Rpc(err.to_string()),
            EthRpcError::Endpoint(_) => ChainGraphError::Config(err.to_string()),
        }
    }
}
