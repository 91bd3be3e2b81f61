use anyhow::Result;
use tracing::info;

use chaingraph_common::{snapshot, ChainReader};
use chaingraph_graph::{GraphClient, ImportOptions, Importer};
use eth_rpc_client::EthRpcClient;

use crate::cli::ImportArgs;

pub async fn import(args: ImportArgs) -> Result<()> {
    let (endpoint, blocks) = snapshot::read_file(&args.file)?;
    info!(
        file = %args.file.display(),
        endpoint = endpoint.as_str(),
        blocks = blocks.len(),
        "Loaded snapshot"
    );

    let config = args.database.config();
    config.log_redacted();
    let client = GraphClient::from_config(&config).await?;
    println!("Connected to {}", config.uri);

    // Remediation re-queries the chain the snapshot was fetched from.
    let chain = if args.contract {
        Some(EthRpcClient::connect(&endpoint).await?)
    } else {
        None
    };

    let options = ImportOptions {
        wipe: args.wipe,
        resolve_contracts: args.contract,
    };
    let importer = Importer::new(client);
    let stats = importer
        .run(
            &blocks,
            options,
            chain.as_ref().map(|c| c as &dyn ChainReader),
        )
        .await?;

    println!("Imported {stats}");
    Ok(())
}
