use anyhow::Result;
use tracing::warn;

use chaingraph_common::config::DEFAULT_DEV_CHAIN;
use chaingraph_common::ChainConfig;
use chaingraph_graph::{GraphClient, GraphWriter};
use eth_rpc_client::EthRpcClient;

use crate::cli::DevArgs;

/// Operator hook for ad-hoc work against the graph and chain handles.
/// Today it reports what is in the graph and where the chain head is.
pub async fn dev(args: DevArgs) -> Result<()> {
    let config = args.database.config();
    config.log_redacted();
    let writer = GraphWriter::new(GraphClient::from_config(&config).await?);

    let counts = writer.counts().await?;
    println!("Nodes:");
    for (label, count) in &counts.nodes {
        println!("  {label}: {count}");
    }
    println!("Relationships:");
    for (rel_type, count) in &counts.relationships {
        println!("  {rel_type}: {count}");
    }

    let chain = ChainConfig::resolve(args.chain, Some(DEFAULT_DEV_CHAIN))?;
    match EthRpcClient::connect(&chain.rpc_url).await {
        Ok(client) => println!("Chain head at {}: {}", chain.rpc_url, client.block_number().await?),
        Err(e) => warn!(error = %e, rpc_url = chain.rpc_url.as_str(), "Chain unreachable"),
    }

    Ok(())
}
