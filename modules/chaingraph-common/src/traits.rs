use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BlockRecord, Receipt};

/// Read access to a chain node.
///
/// The JSON-RPC client implements this for real runs; tests substitute an
/// in-memory chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Fetch a block with full transaction bodies.
    async fn block(&self, number: u64) -> Result<BlockRecord>;

    /// Fetch the receipt of a mined transaction.
    async fn receipt(&self, tx_hash: &str) -> Result<Receipt>;
}
