pub mod blocks;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use blocks::parse_block_spec;
pub use config::{ChainConfig, GraphConfig};
pub use error::{ChainGraphError, Result};
pub use traits::ChainReader;
pub use types::*;
pub use alloy_primitives::U256;
