use anyhow::Result;

use chaingraph_graph::{GraphClient, GraphWriter};

use crate::cli::DatabaseArgs;

pub async fn delete(args: DatabaseArgs) -> Result<()> {
    let config = args.config();
    config.log_redacted();

    let writer = GraphWriter::new(GraphClient::from_config(&config).await?);
    writer.wipe().await?;

    println!("Deleted every node in {}", config.uri);
    Ok(())
}
