use std::collections::BTreeMap;
use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChainGraphError, Result};

/// Property map of a node or relationship, keyed by property name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A normalized property value.
///
/// Raw JSON-RPC payloads are classified once, when a block is fetched, so the
/// statement builder never has to guess what a field means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Integer(#[serde(with = "decimal")] U256),
    Text(String),
    Bytes(#[serde(with = "hex::serde")] Vec<u8>),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<U256> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Integers travel as decimal strings so snapshots read the same way the
/// graph renders them.
mod decimal {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        U256::from_str_radix(&s, 10).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A fetched block with its full transaction bodies.
///
/// `properties` holds every block field except `transactions` and
/// `withdrawals`; it is what lands on the Block node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub number: u64,
    pub miner: String,
    pub properties: Properties,
    pub transactions: Vec<TransactionRecord>,
}

/// A transaction as carried on an INTERACTED_WITH relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub from: String,
    /// `None` for contract deployments.
    pub to: Option<String>,
    pub properties: Properties,
}

/// The part of a transaction receipt needed to resolve contract deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub contract_address: Option<String>,
}

impl BlockRecord {
    /// Normalize an `eth_getBlockByNumber(_, true)` result.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ChainGraphError::Rpc("block payload is not an object".to_string()))?;

        let mut properties = Properties::new();
        let mut transactions = Vec::new();
        for (key, field) in object {
            match key.as_str() {
                "transactions" => {
                    for tx in field.as_array().into_iter().flatten() {
                        transactions.push(TransactionRecord::from_json(tx)?);
                    }
                }
                "withdrawals" => {}
                _ => {
                    if let Some(v) = normalize_value(RecordKind::Block, key, field) {
                        properties.insert(key.clone(), v);
                    }
                }
            }
        }

        let number = properties
            .get("number")
            .and_then(PropertyValue::as_integer)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| ChainGraphError::Rpc("block payload has no number".to_string()))?;
        let miner = properties
            .get("miner")
            .and_then(PropertyValue::as_text)
            .ok_or_else(|| ChainGraphError::Rpc(format!("block {number} has no miner")))?
            .to_string();

        Ok(Self {
            number,
            miner,
            properties,
            transactions,
        })
    }
}

impl TransactionRecord {
    /// Normalize one entry of a full-transaction block payload.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            ChainGraphError::Rpc("transaction payload is not an object".to_string())
        })?;

        let raw = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        let hash = raw("hash")
            .ok_or_else(|| ChainGraphError::Rpc("transaction payload has no hash".to_string()))?;
        let from = raw("from")
            .ok_or_else(|| ChainGraphError::Rpc(format!("transaction {hash} has no sender")))?;
        let to = raw("to").filter(|to| !to.is_empty());

        let properties = object
            .iter()
            .filter_map(|(key, field)| {
                normalize_value(RecordKind::Transaction, key, field).map(|v| (key.clone(), v))
            })
            .collect();

        Ok(Self {
            hash,
            from,
            to,
            properties,
        })
    }

    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

// ---------------------------------------------------------------------------
// Field classification
// ---------------------------------------------------------------------------

/// Hex quantities (`0x1b4`) that decode to 256-bit integers.
const QUANTITY_FIELDS: &[&str] = &[
    "number",
    "gasUsed",
    "gasLimit",
    "timestamp",
    "baseFeePerGas",
    "difficulty",
    "totalDifficulty",
    "size",
    "blobGasUsed",
    "excessBlobGas",
    "value",
    "gas",
    "gasPrice",
    "maxFeePerGas",
    "maxPriorityFeePerGas",
    "maxFeePerBlobGas",
    "chainId",
    "v",
    "yParity",
    "type",
    "transactionIndex",
    "blockNumber",
];

/// Addresses keep the exact string received; they are graph identity keys.
const ADDRESS_FIELDS: &[&str] = &["from", "to", "miner", "address", "contractAddress"];

#[derive(Debug, Clone, Copy)]
enum RecordKind {
    Block,
    Transaction,
}

fn is_quantity(kind: RecordKind, key: &str) -> bool {
    match (kind, key) {
        // Block nonce is 8 bytes of PoW data, transaction nonce is a counter.
        (RecordKind::Block, "nonce") => false,
        (RecordKind::Transaction, "nonce") => true,
        _ => QUANTITY_FIELDS.contains(&key),
    }
}

fn normalize_value(kind: RecordKind, key: &str, value: &Value) -> Option<PropertyValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(PropertyValue::Text(b.to_string())),
        Value::Number(n) => Some(
            n.as_u64()
                .map(|v| PropertyValue::Integer(U256::from(v)))
                .unwrap_or_else(|| PropertyValue::Text(n.to_string())),
        ),
        Value::String(s) => Some(normalize_string(kind, key, s)),
        Value::Array(items) => Some(PropertyValue::List(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(_) => Some(PropertyValue::Text(item.to_string())),
                    other => normalize_value(kind, key, other),
                })
                .collect(),
        )),
        Value::Object(_) => Some(PropertyValue::Text(value.to_string())),
    }
}

fn normalize_string(kind: RecordKind, key: &str, s: &str) -> PropertyValue {
    if ADDRESS_FIELDS.contains(&key) {
        return PropertyValue::text(s);
    }
    let Some(digits) = s.strip_prefix("0x") else {
        return PropertyValue::text(s);
    };
    if is_quantity(kind, key) && !digits.is_empty() {
        return U256::from_str_radix(digits, 16)
            .map(PropertyValue::Integer)
            .unwrap_or_else(|_| PropertyValue::text(s));
    }
    hex::decode(digits)
        .map(PropertyValue::Bytes)
        .unwrap_or_else(|_| PropertyValue::text(s))
}
