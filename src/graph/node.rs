//! Graph nodes
//!
//! A node stands for exactly one record and carries a copy of its fields so
//! presentation can show them without going back to the record store.
//!
//! Labels are for display and may repeat (two repositories both named
//! `pipeline`). The `key` is unique within a graph and is what exports use
//! to name endpoints.

use super::types::NodeId;
use crate::record::{FieldValue, RecordId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// Record this node was built from
    pub record_id: RecordId,
    /// Display label
    pub label: String,
    /// Unique name within the graph: the label, or `label (n)` when an
    /// earlier node already took it
    pub key: String,
    /// Record fields, for tooltips
    pub fields: IndexMap<String, FieldValue>,
}

impl GraphNode {
    pub fn new(id: NodeId, record_id: RecordId, label: impl Into<String>) -> Self {
        let label = label.into();
        GraphNode {
            id,
            record_id,
            key: label.clone(),
            label,
            fields: IndexMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Hover text: the label followed by one `name: value` line per
    /// non-empty field, values cut to `max_chars` characters.
    pub fn tooltip(&self, max_chars: usize) -> String {
        let mut lines = vec![self.label.clone()];
        for (name, value) in &self.fields {
            if value.is_empty() {
                continue;
            }
            let text = value.to_string();
            let shown: String = text.chars().take(max_chars).collect();
            let ellipsis = if text.chars().count() > max_chars { "..." } else { "" };
            lines.push(format!("{}: {}{}", name, shown, ellipsis));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn test_node_fields_and_tooltip() {
        let record = Record::new(RecordId::new(9))
            .with_field("Study Name", "ADNI")
            .with_field("Abstract", "A long description of the study")
            .with_field("Abbreviation", FieldValue::Empty);
        let mut node = GraphNode::new(NodeId::new(0), record.id, "ADNI");
        node.fields = record.fields;

        assert_eq!(node.record_id, RecordId::new(9));
        assert_eq!(node.key, "ADNI");
        assert_eq!(node.field("Study Name"), Some(&FieldValue::from("ADNI")));
        assert_eq!(node.tooltip(6), "ADNI\nStudy Name: ADNI\nAbstract: A long...");
    }
}
