use neo4rs::{query, ConfigBuilder, Graph};
use tracing::{debug, warn};

use chaingraph_common::{ChainGraphError, GraphConfig, Result};

use crate::statement::Statement;

/// Thin wrapper around neo4rs::Graph providing connection setup and
/// single-statement write transactions.
#[derive(Clone)]
pub struct GraphClient {
    pub(crate) graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given credentials and check the server answers.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self> {
        let config = ConfigBuilder::default()
            .uri(uri)
            .user(user)
            .password(password)
            .fetch_size(500)
            .max_connections(10)
            .build()
            .map_err(|e| ChainGraphError::Config(e.to_string()))?;
        let graph = Graph::connect(config)
            .await
            .map_err(|e| ChainGraphError::Connection(format!("{uri}: {e}")))?;

        let client = Self { graph };
        client.ping().await.map_err(|e| ChainGraphError::Connection(format!("{uri}: {e}")))?;
        Ok(client)
    }

    pub async fn from_config(config: &GraphConfig) -> Result<Self> {
        Self::connect(&config.uri, &config.user, &config.password).await
    }

    /// Get a reference to the underlying neo4rs Graph.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }

    async fn ping(&self) -> std::result::Result<(), neo4rs::Error> {
        let mut result = self.graph.execute(query("RETURN 1 AS ping")).await?;
        while result.next().await?.is_some() {}
        Ok(())
    }

    /// Run one statement inside its own write transaction.
    pub async fn write(&self, statement: &Statement) -> Result<()> {
        let cypher = statement.to_cypher();
        debug!(cypher = cypher.as_str(), "Running write statement");

        let mut txn = self
            .graph
            .start_txn()
            .await
            .map_err(|e| ChainGraphError::Connection(e.to_string()))?;

        let result = txn.run(query(&cypher)).await;
        if let Err(e) = result {
            warn!(error = %e, "Statement rejected, rolling back");
            if let Err(rollback) = txn.rollback().await {
                warn!(error = %rollback, "Rollback failed");
            }
            return Err(ChainGraphError::Statement(format!("{e}\n{cypher}")));
        }

        txn.commit()
            .await
            .map_err(|e| ChainGraphError::Statement(e.to_string()))
    }
}
