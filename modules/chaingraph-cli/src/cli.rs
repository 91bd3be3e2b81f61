use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use chaingraph_common::GraphConfig;

/// A tool to visualize Ethereum transactions using a graph database.
#[derive(Parser, Debug)]
#[command(name = "chaingraph", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch blocks from a chain node into a snapshot file.
    Fetch(FetchArgs),

    /// Import a snapshot file into the graph database.
    Import(ImportArgs),

    /// Delete every node and relationship in the graph database.
    Delete(DatabaseArgs),

    /// Run ad-hoc inspection against the graph database and chain.
    Dev(DevArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Neo4j url. Default: $NEO4J_URI or bolt://localhost:7687
    #[arg(short, long)]
    pub database: Option<String>,

    /// Neo4j user. Default: $NEO4J_USER or neo4j
    #[arg(long)]
    pub user: Option<String>,

    /// Neo4j password. Default: $NEO4J_PASSWORD or password
    #[arg(long)]
    pub password: Option<String>,
}

impl DatabaseArgs {
    pub fn config(&self) -> GraphConfig {
        GraphConfig::resolve(
            self.database.clone(),
            self.user.clone(),
            self.password.clone(),
        )
    }
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Chain RPC url. Default: $CHAIN_RPC_URL
    #[arg(short, long)]
    pub chain: Option<String>,

    /// Blocks to fetch, inclusive ranges and single numbers, e.g.
    /// 3529374-3529377,25,26,55-57
    #[arg(short, long)]
    pub blocks: String,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Snapshot file written by `fetch`.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Query the chain again to resolve the address of every created contract.
    #[arg(short, long)]
    pub contract: bool,

    /// Delete the whole graph before importing.
    #[arg(long)]
    pub wipe: bool,
}

#[derive(Args, Debug)]
pub struct DevArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Chain RPC url. Default: $CHAIN_RPC_URL or https://rpc.sepolia.org/
    #[arg(short, long)]
    pub chain: Option<String>,
}
