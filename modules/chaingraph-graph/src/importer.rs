use std::fmt;

use tracing::{info, warn};

use chaingraph_common::{BlockRecord, ChainGraphError, ChainReader, Result};

use crate::{migrate, GraphClient, GraphWriter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Clear the whole graph before importing.
    pub wipe: bool,
    /// Re-query the chain to replace the contract-creation placeholder with
    /// real contract addresses.
    pub resolve_contracts: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub blocks: usize,
    pub transactions: usize,
    pub contract_creations: usize,
    pub contracts_resolved: usize,
}

impl fmt::Display for ImportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocks, {} transactions ({} contract creations, {} resolved)",
            self.blocks, self.transactions, self.contract_creations, self.contracts_resolved
        )
    }
}

/// Drives an import: schema migration, optional wipe, bulk import, optional
/// contract remediation and placeholder cleanup.
///
/// Each block and each transaction is its own store transaction. The first
/// failure aborts the run and leaves whatever was already written; re-running
/// without a wipe duplicates Block nodes and relationships.
pub struct Importer {
    writer: GraphWriter,
}

impl Importer {
    pub fn new(client: GraphClient) -> Self {
        Self {
            writer: GraphWriter::new(client),
        }
    }

    pub fn writer(&self) -> &GraphWriter {
        &self.writer
    }

    pub async fn run(
        &self,
        blocks: &[BlockRecord],
        options: ImportOptions,
        chain: Option<&dyn ChainReader>,
    ) -> Result<ImportStats> {
        let chain = match (options.resolve_contracts, chain) {
            (true, None) => {
                return Err(ChainGraphError::Config(
                    "contract resolution needs a chain reader".to_string(),
                ))
            }
            (true, Some(chain)) => Some(chain),
            (false, _) => None,
        };

        migrate(self.writer.client()).await?;

        if options.wipe {
            self.writer.wipe().await?;
        }

        let mut stats = self.bulk_import(blocks).await?;

        if let Some(chain) = chain {
            stats.contracts_resolved = self.resolve_contracts(chain).await?;
        }

        info!(%stats, "Import complete");
        Ok(stats)
    }

    /// Write every block, then its transactions, in snapshot order.
    pub async fn bulk_import(&self, blocks: &[BlockRecord]) -> Result<ImportStats> {
        let total: usize = blocks.iter().map(|b| b.transactions.len()).sum();
        info!(blocks = blocks.len(), transactions = total, "Importing snapshot");

        let mut stats = ImportStats::default();
        for block in blocks {
            self.writer.write_block(block).await?;
            stats.blocks += 1;

            for tx in &block.transactions {
                self.writer.write_transaction(tx).await?;
                stats.transactions += 1;
                if tx.is_contract_creation() {
                    stats.contract_creations += 1;
                }
            }

            info!(
                number = block.number,
                transactions = block.transactions.len(),
                imported = stats.transactions,
                total,
                "Block imported"
            );
        }

        Ok(stats)
    }

    /// Resolve every pending deployment through its receipt, then delete the
    /// placeholder. Returns the number of deployments resolved.
    pub async fn resolve_contracts(&self, chain: &dyn ChainReader) -> Result<usize> {
        let pending = self.writer.pending_creations().await?;
        info!(pending = pending.len(), "Resolving contract creations");

        for creation in &pending {
            let receipt = chain.receipt(&creation.hash).await?;
            let address = receipt.contract_address.ok_or_else(|| {
                ChainGraphError::NotFound(format!(
                    "receipt of {} has no contract address",
                    creation.hash
                ))
            })?;
            self.writer.resolve_creation(creation, &address).await?;
        }

        if pending.is_empty() {
            warn!("No pending contract creations found");
        }
        self.writer.remove_placeholder().await?;

        Ok(pending.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_summary() {
        let stats = ImportStats {
            blocks: 1,
            transactions: 2,
            contract_creations: 1,
            contracts_resolved: 0,
        };
        assert_eq!(
            stats.to_string(),
            "1 blocks, 2 transactions (1 contract creations, 0 resolved)"
        );
    }
}
