use neo4rs::query;
use tracing::info;

use chaingraph_common::{ChainGraphError, Result};

use crate::projection::{ADDRESS, ADDRESS_KEY};
use crate::GraphClient;

pub const ADDRESS_CONSTRAINT: &str = "address_addr";

/// Idempotent schema setup. Runs outside any write transaction since Neo4j
/// refuses schema changes mixed with data writes.
pub async fn migrate(client: &GraphClient) -> Result<()> {
    // One node per address. Also backs every MERGE on `addr` with an index.
    // The contract-creation placeholder has no `addr` and is unaffected.
    let constraints = [format!(
        "CREATE CONSTRAINT {ADDRESS_CONSTRAINT} IF NOT EXISTS \
         FOR (n:{ADDRESS}) REQUIRE n.{ADDRESS_KEY} IS UNIQUE"
    )];

    for c in &constraints {
        client
            .graph
            .run(query(c))
            .await
            .map_err(|e| ChainGraphError::Statement(format!("{e}\n{c}")))?;
    }
    info!("Schema constraints in place");

    Ok(())
}
