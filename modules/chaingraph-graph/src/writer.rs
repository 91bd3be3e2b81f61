use std::collections::BTreeMap;

use neo4rs::query;
use tracing::{debug, info};

use chaingraph_common::{BlockRecord, ChainGraphError, Result, TransactionRecord};

use crate::projection::{
    block_statement, contract_creation_statement, pending_creations_query,
    remove_placeholder_statement, transaction_statement, wipe_statement, PendingCreation,
};
use crate::GraphClient;

/// Write-side wrapper for the graph. Every method that mutates the store is
/// one write transaction.
pub struct GraphWriter {
    client: GraphClient,
}

/// Node counts per label and relationship counts per type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: BTreeMap<String, i64>,
    pub relationships: BTreeMap<String, i64>,
}

impl GraphCounts {
    pub fn nodes_labeled(&self, label: &str) -> i64 {
        self.nodes.get(label).copied().unwrap_or(0)
    }

    pub fn relationships_typed(&self, rel_type: &str) -> i64 {
        self.relationships.get(rel_type).copied().unwrap_or(0)
    }
}

impl GraphWriter {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GraphClient {
        &self.client
    }

    /// Detach-delete every node in the graph.
    pub async fn wipe(&self) -> Result<()> {
        self.client.write(&wipe_statement()).await?;
        info!("Graph wiped");
        Ok(())
    }

    /// Block node + MINED edge from its miner.
    pub async fn write_block(&self, block: &BlockRecord) -> Result<()> {
        self.client.write(&block_statement(block)).await
    }

    /// Sender, recipient (or placeholder) and the INTERACTED_WITH edge.
    pub async fn write_transaction(&self, tx: &TransactionRecord) -> Result<()> {
        debug!(hash = tx.hash.as_str(), "Writing transaction");
        self.client.write(&transaction_statement(tx)).await
    }

    /// Deployments whose INTERACTED_WITH edge still targets the placeholder.
    pub async fn pending_creations(&self) -> Result<Vec<PendingCreation>> {
        let mut stream = self
            .client
            .graph
            .execute(query(&pending_creations_query()))
            .await
            .map_err(|e| ChainGraphError::Statement(e.to_string()))?;

        let mut pending = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| ChainGraphError::Statement(e.to_string()))?
        {
            let field = |key: &str| {
                row.get::<String>(key)
                    .map_err(|e| ChainGraphError::Statement(format!("{key}: {e}")))
            };
            pending.push(PendingCreation {
                hash: field("hash")?,
                from: field("sender")?,
                input: field("input")?,
            });
        }

        Ok(pending)
    }

    /// Attach a resolved contract address to a pending deployment.
    pub async fn resolve_creation(
        &self,
        pending: &PendingCreation,
        contract_address: &str,
    ) -> Result<()> {
        debug!(
            hash = pending.hash.as_str(),
            contract = contract_address,
            "Resolving contract creation"
        );
        self.client
            .write(&contract_creation_statement(pending, contract_address))
            .await
    }

    /// Delete the placeholder node and whatever still points at it.
    pub async fn remove_placeholder(&self) -> Result<()> {
        self.client.write(&remove_placeholder_statement()).await
    }

    pub async fn counts(&self) -> Result<GraphCounts> {
        let nodes = self
            .count_rows("MATCH (n) UNWIND labels(n) AS name RETURN name, count(*) AS count")
            .await?;
        let relationships = self
            .count_rows("MATCH ()-[r]->() RETURN type(r) AS name, count(*) AS count")
            .await?;
        Ok(GraphCounts {
            nodes,
            relationships,
        })
    }

    async fn count_rows(&self, cypher: &str) -> Result<BTreeMap<String, i64>> {
        let mut stream = self
            .client
            .graph
            .execute(query(cypher))
            .await
            .map_err(|e| ChainGraphError::Statement(e.to_string()))?;

        let mut counts = BTreeMap::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| ChainGraphError::Statement(e.to_string()))?
        {
            let name: String = row
                .get("name")
                .map_err(|e| ChainGraphError::Statement(e.to_string()))?;
            let count: i64 = row
                .get("count")
                .map_err(|e| ChainGraphError::Statement(e.to_string()))?;
            counts.insert(name, count);
        }
        Ok(counts)
    }
}
