//! Projection rules: how blocks and transactions become graph entities.
//!
//! Address nodes are upserted on `addr`. Block nodes and every relationship are
//! created unconditionally, so importing the same snapshot twice duplicates
//! them. Deployments point at a single placeholder node until the remediation
//! pass swaps in the real contract address.

use chaingraph_common::{BlockRecord, Properties, PropertyValue, TransactionRecord};

use crate::statement::{
    create_node, create_relationship, merge_node, render_labels, render_map, set_labels,
    set_properties, Statement,
};

pub const ADDRESS: &str = "Address";
pub const BLOCK: &str = "Block";
pub const CONTRACT: &str = "Contract";
/// Marker label of the contract-creation placeholder.
pub const CONTRACT_CREATION: &str = "ContractCreation";

pub const MINED: &str = "MINED";
pub const INTERACTED_WITH: &str = "INTERACTED_WITH";
pub const CREATED: &str = "CREATED";

pub const ADDRESS_KEY: &str = "addr";
pub const TOMBSTONE_KEY: &str = "tombstone";
pub const CONTRACT_CREATION_TOMBSTONE: &str = "contract-creation";

/// A deployment still pointing at the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCreation {
    pub hash: String,
    pub from: String,
    /// Deployment input data as stored on the relationship (`0x` hex).
    pub input: String,
}

pub fn address_key(addr: &str) -> Properties {
    Properties::from([(ADDRESS_KEY.to_string(), PropertyValue::text(addr))])
}

/// Identity of the placeholder. It has no `addr`, so it can never collide
/// with a real address.
pub fn placeholder_key() -> Properties {
    Properties::from([(
        TOMBSTONE_KEY.to_string(),
        PropertyValue::text(CONTRACT_CREATION_TOMBSTONE),
    )])
}

/// Block node, miner upsert and MINED edge as one write.
pub fn block_statement(block: &BlockRecord) -> Statement {
    Statement::new()
        .push(create_node("b", &[BLOCK], &block.properties))
        .push(merge_node("m", &[ADDRESS], &address_key(&block.miner)))
        .push(create_relationship("m", MINED, &Properties::new(), "b"))
}

/// Sender upsert, recipient (or placeholder) upsert and INTERACTED_WITH edge
/// as one write.
pub fn transaction_statement(tx: &TransactionRecord) -> Statement {
    let recipient = match &tx.to {
        Some(to) => merge_node("t", &[ADDRESS], &address_key(to)),
        None => merge_node("t", &[ADDRESS, CONTRACT_CREATION], &placeholder_key()),
    };

    Statement::new()
        .push(merge_node("f", &[ADDRESS], &address_key(&tx.from)))
        .push(recipient)
        .push(create_relationship("f", INTERACTED_WITH, &tx.properties, "t"))
}

/// Every deployment edge still targeting the placeholder, one row per hash.
pub fn pending_creations_query() -> String {
    format!(
        "MATCH (f{address})-[r:{INTERACTED_WITH}]->(p{marker} {key})
         RETURN DISTINCT r.hash AS hash, f.{ADDRESS_KEY} AS sender, coalesce(r.input, '0x') AS input
         ORDER BY hash",
        address = render_labels(&[ADDRESS]),
        marker = render_labels(&[CONTRACT_CREATION]),
        key = render_map(&placeholder_key()),
    )
}

/// Resolve one deployment: label the real contract, record who created it and
/// move the INTERACTED_WITH edge off the placeholder.
pub fn contract_creation_statement(pending: &PendingCreation, contract_address: &str) -> Statement {
    let hash_key = Properties::from([("hash".to_string(), PropertyValue::text(&pending.hash))]);
    let code = Properties::from([("code".to_string(), PropertyValue::text(&pending.input))]);

    Statement::new()
        .push(format!(
            "MATCH (f{address} {from})-[r:{INTERACTED_WITH} {hash}]->(p{marker} {key})",
            address = render_labels(&[ADDRESS]),
            from = render_map(&address_key(&pending.from)),
            hash = render_map(&hash_key),
            marker = render_labels(&[CONTRACT_CREATION]),
            key = render_map(&placeholder_key()),
        ))
        .push(merge_node("c", &[ADDRESS], &address_key(contract_address)))
        .push(set_labels("c", &[CONTRACT]))
        .push(set_properties("c", &code))
        .push(create_relationship("f", CREATED, &Properties::new(), "c"))
        .push(format!("CREATE (f)-[moved:{INTERACTED_WITH}]->(c)"))
        .push("SET moved = properties(r)")
        .push("DELETE r")
}

/// Drop the marker label and the placeholder itself, with any edge left on it.
pub fn remove_placeholder_statement() -> Statement {
    Statement::new()
        .push(format!(
            "MATCH (p{} {})",
            render_labels(&[CONTRACT_CREATION]),
            render_map(&placeholder_key())
        ))
        .push(format!("REMOVE p{}", render_labels(&[CONTRACT_CREATION])))
        .push("DETACH DELETE p")
}

pub fn wipe_statement() -> Statement {
    Statement::new().push("MATCH (n)").push("DETACH DELETE n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(hash: &str, from: &str, to: Option<&str>) -> TransactionRecord {
        TransactionRecord::from_json(&json!({
            "hash": hash,
            "from": from,
            "to": to,
            "value": "0x64",
            "input": "0x6080"
        }))
        .unwrap()
    }

    fn merged_keys(statement: &Statement) -> Vec<String> {
        statement
            .clauses()
            .iter()
            .filter(|c| c.starts_with("MERGE"))
            .cloned()
            .collect()
    }

    #[test]
    fn shared_addresses_render_identical_merge_keys() {
        let a = transaction_statement(&tx("0x01", "0xAA", Some("0xBB")));
        let b = transaction_statement(&tx("0x02", "0xBB", Some("0xAA")));

        let a_merges = merged_keys(&a);
        let b_merges = merged_keys(&b);
        assert!(a_merges[0].ends_with("{addr: '0xAA'})"));
        assert!(b_merges[1].ends_with("{addr: '0xAA'})"));
        assert_eq!(
            a_merges[0].split_once(':').unwrap().1,
            b_merges[1].split_once(':').unwrap().1
        );
    }

    #[test]
    fn merge_key_is_only_the_address() {
        let statement = transaction_statement(&tx("0x01", "0xAA", Some("0xBB")));
        for merge in merged_keys(&statement) {
            assert!(!merge.contains("value"), "{merge}");
            assert!(!merge.contains("hash"), "{merge}");
        }
    }

    #[test]
    fn deployments_always_target_the_placeholder() {
        let first = transaction_statement(&tx("0x01", "0xAA", None));
        let second = transaction_statement(&tx("0x02", "0xCC", None));
        let expected =
            "MERGE (t:Address:ContractCreation {tombstone: 'contract-creation'})".to_string();
        assert_eq!(first.clauses()[1], expected);
        assert_eq!(second.clauses()[1], expected);
        assert!(!first.to_cypher().contains("'None'"));
    }

    #[test]
    fn transaction_statement_is_sender_recipient_edge() {
        let statement = transaction_statement(&tx("0x01", "0xAA", Some("0xBB")));
        let clauses = statement.clauses();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0], "MERGE (f:Address {addr: '0xAA'})");
        assert_eq!(clauses[1], "MERGE (t:Address {addr: '0xBB'})");
        assert!(clauses[2].starts_with("CREATE (f)-[:INTERACTED_WITH {"));
        assert!(clauses[2].contains("value: '100'"));
        assert!(clauses[2].contains("input: '0x6080'"));
        assert!(clauses[2].ends_with("]->(t)"));
    }

    #[test]
    fn block_statement_excludes_transactions() {
        let block = BlockRecord::from_json(&json!({
            "number": "0x5",
            "miner": "0xMM",
            "gasUsed": "0x5208",
            "transactions": [{"hash": "0x01", "from": "0xAA", "to": "0xBB"}],
            "withdrawals": []
        }))
        .unwrap();

        let statement = block_statement(&block);
        let clauses = statement.clauses();
        assert_eq!(
            clauses[0],
            "CREATE (b:Block {gasUsed: '21000', miner: '0xMM', number: '5'})"
        );
        assert_eq!(clauses[1], "MERGE (m:Address {addr: '0xMM'})");
        assert_eq!(clauses[2], "CREATE (m)-[:MINED]->(b)");
    }

    #[test]
    fn contract_creation_moves_the_edge() {
        let pending = PendingCreation {
            hash: "0x01".to_string(),
            from: "0xAA".to_string(),
            input: "0x6080".to_string(),
        };
        let cypher = contract_creation_statement(&pending, "0xDD").to_cypher();
        assert!(cypher.starts_with(
            "MATCH (f:Address {addr: '0xAA'})-[r:INTERACTED_WITH {hash: '0x01'}]->(p:ContractCreation {tombstone: 'contract-creation'})"
        ));
        assert!(cypher.contains("MERGE (c:Address {addr: '0xDD'})"));
        assert!(cypher.contains("SET c:Contract"));
        assert!(cypher.contains("SET c.code = '0x6080'"));
        assert!(cypher.contains("CREATE (f)-[:CREATED]->(c)"));
        assert!(cypher.ends_with("DELETE r"));
    }

    #[test]
    fn placeholder_removal_drops_label_then_node() {
        let cypher = remove_placeholder_statement().to_cypher();
        assert_eq!(
            cypher,
            "MATCH (p:ContractCreation {tombstone: 'contract-creation'})\nREMOVE p:ContractCreation\nDETACH DELETE p"
        );
    }
}
