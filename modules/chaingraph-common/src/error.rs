use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChainGraphError>;

#[derive(Error, Debug)]
pub enum ChainGraphError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid block range: start {start} is greater than end {end}")]
    Range { start: u64, end: u64 },

    #[error("Invalid block spec: {0}")]
    InvalidBlockSpec(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Statement rejected by graph store: {0}")]
    Statement(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
