pub mod error;

pub use error::{EthRpcError, Result};

use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::B256;
use alloy::providers::{Provider as _, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::transports::http::{reqwest::Url, Http};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use chaingraph_common::{BlockRecord, ChainReader, Receipt};

/// Ethereum JSON-RPC client backed by an alloy provider. Requests go out one
/// at a time, unbatched.
pub struct EthRpcClient {
    provider: RootProvider,
    endpoint: String,
}

impl EthRpcClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let url: Url = endpoint
            .parse()
            .map_err(|e| EthRpcError::Endpoint(format!("{endpoint}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let provider = RootProvider::new(RpcClient::new(Http::with_client(http, url), false));

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
        })
    }

    /// Build a client and check the node answers before handing it out.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let client = Self::new(endpoint)?;
        let chain_id = client.chain_id().await?;
        info!(endpoint, chain_id, "Connected to chain");
        Ok(client)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| EthRpcError::from_transport("eth_chainId", e))
    }

    /// Number of the most recent block.
    pub async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| EthRpcError::from_transport("eth_blockNumber", e))
    }

    /// Fetch a block with full transaction bodies.
    pub async fn get_block(&self, number: u64) -> Result<BlockRecord> {
        const METHOD: &str = "eth_getBlockByNumber";
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .full()
            .await
            .map_err(|e| EthRpcError::from_transport(METHOD, e))?
            .ok_or_else(|| EthRpcError::NotFound {
                method: METHOD.to_string(),
                target: format!("block {number}"),
            })?;

        let record = BlockRecord::from_json(&to_json(METHOD, &block)?)
            .map_err(|e| EthRpcError::Decode(e.to_string()))?;
        debug!(number, transactions = record.transactions.len(), "Fetched block");
        Ok(record)
    }

    pub async fn get_receipt(&self, tx_hash: &str) -> Result<Receipt> {
        const METHOD: &str = "eth_getTransactionReceipt";
        let hash: B256 = tx_hash
            .parse()
            .map_err(|e| EthRpcError::Decode(format!("{tx_hash:?} is not a transaction hash: {e}")))?;
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| EthRpcError::from_transport(METHOD, e))?
            .ok_or_else(|| EthRpcError::NotFound {
                method: METHOD.to_string(),
                target: format!("transaction {tx_hash}"),
            })?;

        serde_json::from_value(to_json(METHOD, &receipt)?)
            .map_err(|e| EthRpcError::Decode(format!("{METHOD} response: {e}")))
    }
}

#[async_trait]
impl ChainReader for EthRpcClient {
    async fn block(&self, number: u64) -> chaingraph_common::Result<BlockRecord> {
        Ok(self.get_block(number).await?)
    }

    async fn receipt(&self, tx_hash: &str) -> chaingraph_common::Result<Receipt> {
        Ok(self.get_receipt(tx_hash).await?)
    }
}

/// Records are normalized from the wire JSON shape, so typed responses are
/// serialized back to it.
fn to_json<T: Serialize>(method: &str, value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| EthRpcError::Decode(format!("{method} response: {e}")))
}
