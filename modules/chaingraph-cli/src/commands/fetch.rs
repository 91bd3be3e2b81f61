use anyhow::Result;
use tracing::info;

use chaingraph_common::{parse_block_spec, snapshot, BlockRecord, ChainConfig, ChainReader};
use eth_rpc_client::EthRpcClient;

use crate::cli::FetchArgs;

pub async fn fetch(args: FetchArgs) -> Result<()> {
    // Reject a bad block list before touching the network.
    let numbers = parse_block_spec(&args.blocks)?;
    let chain = ChainConfig::resolve(args.chain, None)?;

    let client = EthRpcClient::connect(&chain.rpc_url).await?;

    info!(blocks = numbers.len(), "Fetching blocks");
    let blocks = fetch_blocks(&client, &numbers).await?;
    let transactions: usize = blocks.iter().map(|b| b.transactions.len()).sum();

    let bytes = snapshot::save(client.endpoint(), &blocks)?;
    let path = snapshot::write_temp(&bytes)?;

    println!(
        "Wrote {} blocks ({transactions} transactions) to {}",
        blocks.len(),
        path.display()
    );
    Ok(())
}

/// Fetch blocks one at a time, in the order given.
async fn fetch_blocks(
    reader: &dyn ChainReader,
    numbers: &[u64],
) -> chaingraph_common::Result<Vec<BlockRecord>> {
    let mut blocks = Vec::with_capacity(numbers.len());
    for (i, &number) in numbers.iter().enumerate() {
        let block = reader.block(number).await?;
        info!(
            number,
            transactions = block.transactions.len(),
            progress = %format!("{}/{}", i + 1, numbers.len()),
            "Fetched block"
        );
        blocks.push(block);
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use chaingraph_common::{ChainGraphError, Receipt};

    use super::*;

    /// Chain whose blocks exist up to `head`; records every request.
    struct FakeChain {
        head: u64,
        requested: Mutex<Vec<u64>>,
    }

    impl FakeChain {
        fn new(head: u64) -> Self {
            Self {
                head,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChainReader for FakeChain {
        async fn block(&self, number: u64) -> chaingraph_common::Result<BlockRecord> {
            self.requested.lock().unwrap().push(number);
            if number > self.head {
                return Err(ChainGraphError::NotFound(format!("block {number}")));
            }
            BlockRecord::from_json(&json!({
                "number": format!("{number:#x}"),
                "miner": "0xMM",
                "transactions": []
            }))
        }

        async fn receipt(&self, tx_hash: &str) -> chaingraph_common::Result<Receipt> {
            Err(ChainGraphError::NotFound(tx_hash.to_string()))
        }
    }

    #[tokio::test]
    async fn fetches_in_listed_order() {
        let chain = FakeChain::new(100);
        let numbers = parse_block_spec("7-9,2,5-5").unwrap();
        let blocks = fetch_blocks(&chain, &numbers).await.unwrap();

        let fetched: Vec<u64> = blocks.iter().map(|b| b.number).collect();
        assert_eq!(fetched, vec![7, 8, 9, 2, 5]);
        assert_eq!(*chain.requested.lock().unwrap(), vec![7, 8, 9, 2, 5]);
    }

    #[tokio::test]
    async fn missing_block_aborts_the_fetch() {
        let chain = FakeChain::new(3);
        let err = fetch_blocks(&chain, &[2, 3, 4, 5]).await.unwrap_err();
        assert!(matches!(err, ChainGraphError::NotFound(_)));
        assert_eq!(*chain.requested.lock().unwrap(), vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn reversed_range_fails_before_any_network_call() {
        let args = FetchArgs {
            chain: Some("http://127.0.0.1:1".to_string()),
            blocks: "5-3".to_string(),
        };
        let err = fetch(args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChainGraphError>(),
            Some(ChainGraphError::Range { start: 5, end: 3 })
        ));
    }
}
