//! Cypher statement builder.
//!
//! Every label, relationship type, property key and property value that ends up
//! in a statement passes through the renderers here. Nothing in this module
//! touches the network or the store.

use std::fmt;

use chaingraph_common::{Properties, PropertyValue};

/// An ordered list of clauses executed as one atomic write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    clauses: Vec<String>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause. Empty clauses are dropped.
    pub fn push(mut self, clause: impl Into<String>) -> Self {
        let clause = clause.into();
        if !clause.is_empty() {
            self.clauses.push(clause);
        }
        self
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub fn to_cypher(&self) -> String {
        self.clauses.join("\n")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cypher())
    }
}

/// Upsert a node. Only `key` takes part in the match, so it must be the
/// minimal identity of the node.
pub fn merge_node(alias: &str, labels: &[&str], key: &Properties) -> String {
    format!(
        "MERGE ({}{} {})",
        render_identifier(alias),
        render_labels(labels),
        render_map(key)
    )
}

/// Create a node unconditionally.
pub fn create_node(alias: &str, labels: &[&str], properties: &Properties) -> String {
    format!(
        "CREATE ({}{} {})",
        render_identifier(alias),
        render_labels(labels),
        render_map(properties)
    )
}

/// Create a directed edge between two aliases bound earlier in the statement.
pub fn create_relationship(
    from_alias: &str,
    rel_type: &str,
    properties: &Properties,
    to_alias: &str,
) -> String {
    let props = if properties.is_empty() {
        String::new()
    } else {
        format!(" {}", render_map(properties))
    };
    format!(
        "CREATE ({})-[:{}{props}]->({})",
        render_identifier(from_alias),
        render_identifier(rel_type),
        render_identifier(to_alias)
    )
}

pub fn set_labels(alias: &str, labels: &[&str]) -> String {
    if labels.is_empty() {
        return String::new();
    }
    format!("SET {}{}", render_identifier(alias), render_labels(labels))
}

pub fn set_properties(alias: &str, properties: &Properties) -> String {
    if properties.is_empty() {
        return String::new();
    }
    let alias = render_identifier(alias);
    let assignments: Vec<String> = properties
        .iter()
        .map(|(key, value)| format!("{alias}.{} = {}", render_identifier(key), render_literal(value)))
        .collect();
    format!("SET {}", assignments.join(", "))
}

/// `:A:B` for a label list.
pub fn render_labels(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|label| format!(":{}", render_identifier(label)))
        .collect()
}

/// `{key: 'value', ...}`; keys in map order.
pub fn render_map(properties: &Properties) -> String {
    let entries: Vec<String> = properties
        .iter()
        .map(|(key, value)| format!("{}: {}", render_identifier(key), render_literal(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Render one property value as a Cypher literal.
///
/// Byte sequences become quoted `0x` hex, lists become list literals of their
/// rendered elements, everything else (integers included) becomes a quoted
/// string of its textual form.
pub fn render_literal(value: &PropertyValue) -> String {
    match value {
        PropertyValue::List(items) => {
            let rendered: Vec<String> = items.iter().map(render_literal).collect();
            format!("[{}]", rendered.join(", "))
        }
        other => quote(&other.to_string()),
    }
}

/// Single-quoted string literal with `\` and `'` escaped.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Plain identifiers pass through; anything else is backtick-quoted.
pub fn render_identifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaingraph_common::U256;

    fn props(entries: &[(&str, PropertyValue)]) -> Properties {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn integers_render_as_quoted_strings() {
        assert_eq!(render_literal(&PropertyValue::Integer(U256::from(100u64))), "'100'");
    }

    #[test]
    fn bytes_render_as_quoted_hex() {
        assert_eq!(
            render_literal(&PropertyValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef])),
            "'0xdeadbeef'"
        );
        assert_eq!(render_literal(&PropertyValue::Bytes(vec![])), "'0x'");
    }

    #[test]
    fn lists_render_as_list_literals() {
        let value = PropertyValue::List(vec![
            PropertyValue::Bytes(vec![0x01]),
            PropertyValue::List(vec![PropertyValue::Integer(U256::from(2u64))]),
        ]);
        assert_eq!(render_literal(&value), "['0x01', ['2']]");
        assert_eq!(render_literal(&PropertyValue::List(vec![])), "[]");
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(render_literal(&PropertyValue::text("it's")), r"'it\'s'");
        assert_eq!(render_literal(&PropertyValue::text(r"a\b")), r"'a\\b'");
        assert_eq!(
            render_literal(&PropertyValue::text(r"x\' RETURN 1 //")),
            r"'x\\\' RETURN 1 //'"
        );
    }

    #[test]
    fn identifiers_are_quoted_only_when_needed() {
        assert_eq!(render_identifier("Address"), "Address");
        assert_eq!(render_identifier("gas_used2"), "gas_used2");
        assert_eq!(render_identifier("Contract Creation"), "`Contract Creation`");
        assert_eq!(render_identifier("9lives"), "`9lives`");
        assert_eq!(render_identifier("a`b"), "`a``b`");
        assert_eq!(render_identifier(""), "``");
    }

    #[test]
    fn merge_node_matches_on_key_only() {
        let key = props(&[("addr", PropertyValue::text("0xAA"))]);
        assert_eq!(
            merge_node("f", &["Address"], &key),
            "MERGE (f:Address {addr: '0xAA'})"
        );
    }

    #[test]
    fn create_node_renders_all_properties() {
        let properties = props(&[
            ("number", PropertyValue::Integer(U256::from(5u64))),
            ("hash", PropertyValue::Bytes(vec![0xab])),
        ]);
        assert_eq!(
            create_node("b", &["Block"], &properties),
            "CREATE (b:Block {hash: '0xab', number: '5'})"
        );
    }

    #[test]
    fn relationship_without_properties_has_no_map() {
        assert_eq!(
            create_relationship("m", "MINED", &Properties::new(), "b"),
            "CREATE (m)-[:MINED]->(b)"
        );
    }

    #[test]
    fn relationship_with_properties() {
        let properties = props(&[("value", PropertyValue::Integer(U256::from(100u64)))]);
        assert_eq!(
            create_relationship("f", "INTERACTED_WITH", &properties, "t"),
            "CREATE (f)-[:INTERACTED_WITH {value: '100'}]->(t)"
        );
    }

    #[test]
    fn set_clauses() {
        assert_eq!(set_labels("c", &["Contract"]), "SET c:Contract");
        assert_eq!(set_labels("c", &[]), "");
        let code = props(&[("code", PropertyValue::Bytes(vec![0x60, 0x80]))]);
        assert_eq!(set_properties("c", &code), "SET c.code = '0x6080'");
        assert_eq!(set_properties("c", &Properties::new()), "");
    }

    #[test]
    fn statement_joins_clauses_and_skips_empty_ones() {
        let statement = Statement::new()
            .push("MATCH (n)")
            .push(set_labels("n", &[]))
            .push("DETACH DELETE n");
        assert_eq!(statement.clauses().len(), 2);
        assert_eq!(statement.to_cypher(), "MATCH (n)\nDETACH DELETE n");
    }
}
