//! Undirected weighted edges
//!
//! An edge joins two distinct nodes and records which values they share,
//! grouped per connection field.

use super::types::NodeId;
use serde::{Deserialize, Serialize};

/// Values two records share in one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedField {
    pub field: String,
    pub values: Vec<String>,
}

impl SharedField {
    pub fn new(field: impl Into<String>, values: Vec<String>) -> Self {
        SharedField {
            field: field.into(),
            values,
        }
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }
}

/// An undirected edge. `source` is always the smaller node id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    /// Number of shared values across all connection fields
    pub weight: u32,
    /// Shared values in connection-field order
    pub shared: Vec<SharedField>,
}

impl GraphEdge {
    pub fn new(a: NodeId, b: NodeId, weight: u32) -> Self {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        GraphEdge {
            source,
            target,
            weight,
            shared: Vec::new(),
        }
    }

    pub fn with_shared(mut self, shared: Vec<SharedField>) -> Self {
        self.shared = shared;
        self
    }

    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    /// The endpoint opposite `node`, if `node` is an endpoint
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.source {
            Some(self.target)
        } else if node == self.target {
            Some(self.source)
        } else {
            None
        }
    }

    /// Shared values as `field: v1, v2; field2: v3`. Meant for display;
    /// values containing the separators are not escaped.
    pub fn shared_summary(&self) -> String {
        self.shared
            .iter()
            .map(|s| format!("{}: {}", s.field, s.values.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
