pub mod client;
pub mod importer;
pub mod migrate;
pub mod projection;
pub mod statement;
pub mod writer;

#[cfg(feature = "test-utils")]
pub mod testutil;

pub use client::GraphClient;
pub use importer::{ImportOptions, ImportStats, Importer};
pub use migrate::migrate;
pub use neo4rs::query;
pub use projection::PendingCreation;
pub use statement::Statement;
pub use writer::{GraphCounts, GraphWriter};
