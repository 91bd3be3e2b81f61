//! Snapshot codec: the file handed from `fetch` to `import`.
//!
//! A snapshot is JSON holding a format version, the RPC endpoint the blocks
//! came from and the blocks themselves in fetch order. The format is internal;
//! a version mismatch is reported as a corrupt snapshot.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChainGraphError, Result};
use crate::types::BlockRecord;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    endpoint: &'a str,
    blocks: &'a [BlockRecord],
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    endpoint: String,
    blocks: Vec<BlockRecord>,
}

pub fn save(endpoint: &str, blocks: &[BlockRecord]) -> Result<Vec<u8>> {
    serde_json::to_vec(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        endpoint,
        blocks,
    })
    .map_err(|e| ChainGraphError::CorruptSnapshot(e.to_string()))
}

pub fn load(bytes: &[u8]) -> Result<(String, Vec<BlockRecord>)> {
    let snapshot: Snapshot = serde_json::from_slice(bytes)
        .map_err(|e| ChainGraphError::CorruptSnapshot(e.to_string()))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(ChainGraphError::CorruptSnapshot(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            snapshot.version
        )));
    }

    Ok((snapshot.endpoint, snapshot.blocks))
}

/// Persist a snapshot under a generated temporary path that outlives the process.
pub fn write_temp(bytes: &[u8]) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("chaingraph-")
        .suffix(".snapshot")
        .tempfile()?;
    file.write_all(bytes)?;
    let (_, path) = file.keep().map_err(|e| ChainGraphError::Io(e.error))?;
    Ok(path)
}

pub fn read_file(path: &Path) -> Result<(String, Vec<BlockRecord>)> {
    let bytes = std::fs::read(path)?;
    load(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(number: u64) -> BlockRecord {
        BlockRecord::from_json(&json!({
            "number": format!("{number:#x}"),
            "miner": "0xMiner",
            "hash": "0xabcdef",
            "totalDifficulty": "0xc70d815d562d3cfa955",
            "transactions": [{
                "hash": "0x01",
                "from": "0xAA",
                "to": "0xBB",
                "value": "0x64",
                "accessList": [{"address": "0xCC", "storageKeys": ["0x00"]}]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn round_trip_preserves_endpoint_and_order() {
        let blocks = vec![block(7), block(3), block(5)];
        let bytes = save("http://node:8545", &blocks).unwrap();
        let (endpoint, loaded) = load(&bytes).unwrap();
        assert_eq!(endpoint, "http://node:8545");
        assert_eq!(loaded, blocks);
    }

    #[test]
    fn round_trip_of_empty_snapshot() {
        let bytes = save("http://node:8545", &[]).unwrap();
        let (endpoint, loaded) = load(&bytes).unwrap();
        assert_eq!(endpoint, "http://node:8545");
        assert!(loaded.is_empty());
    }

    #[test]
    fn garbage_is_corrupt() {
        let err = load(b"\x80\x04not json").unwrap_err();
        assert!(matches!(err, ChainGraphError::CorruptSnapshot(_)));
    }

    #[test]
    fn other_version_is_corrupt() {
        let bytes = serde_json::to_vec(&json!({
            "version": SNAPSHOT_VERSION + 1,
            "endpoint": "http://node:8545",
            "blocks": []
        }))
        .unwrap();
        let err = load(&bytes).unwrap_err();
        assert!(matches!(err, ChainGraphError::CorruptSnapshot(msg) if msg.contains("version")));
    }

    #[test]
    fn temp_file_round_trip() {
        let blocks = vec![block(1)];
        let path = write_temp(&save("http://node:8545", &blocks).unwrap()).unwrap();
        let (_, loaded) = read_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, blocks);
    }
}
