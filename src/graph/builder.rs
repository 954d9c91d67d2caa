//! Similarity graph construction
//!
//! Every unordered pair of records is scored field by field: list fields
//! contribute the size of their intersection, atomic fields contribute 1
//! when equal. Comparison ignores case and surrounding whitespace, and an
//! atomic value compared against a list behaves as a one-element list.
//! Pairs whose total reaches `min_shared_weight` become edges.

use super::store::SimilarityGraph;
use super::types::NodeId;
use super::{GraphError, GraphResult, SharedField};
use crate::record::normalize::is_stopword;
use crate::record::{EntityKind, EntitySchema, Record};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Free-text fields whose stopwords are ignored when filtering is enabled
pub const FREE_TEXT_FIELDS: [&str; 10] = [
    "Code Summary",
    "Summary",
    "Description",
    "Abstract",
    "Languages",
    "Tools/Packages",
    "Tooling",
    "Data Types",
    "FAIR Issues",
    "Biomedical Relevance",
];

/// Build a similarity graph with default options.
///
/// Labels come from the name field of whichever entity kind the records
/// look like (see [`GraphBuilder::build`]).
pub fn build_graph<S: AsRef<str>>(
    records: &[Record],
    connection_fields: &[S],
    min_shared_weight: u32,
) -> GraphResult<SimilarityGraph> {
    GraphBuilder::new(connection_fields)
        .min_shared_weight(min_shared_weight)
        .build(records)
}

/// How node labels are chosen
#[derive(Debug, Clone)]
enum Labeling {
    /// Guess the entity kind from the records' columns
    Infer,
    Schema(EntitySchema),
    Field(String),
}

/// Configurable graph builder
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    connection_fields: Vec<String>,
    min_shared_weight: u32,
    filter_stopwords: bool,
    labeling: Labeling,
}

/// One record's comparable values for one field: lowercase key -> display form,
/// plus the keys in first-seen order
#[derive(Default)]
struct FieldValues {
    order: Vec<String>,
    display: FxHashMap<String, String>,
}

impl FieldValues {
    fn insert(&mut self, item: &str) {
        let key = item.trim().to_lowercase();
        if key.is_empty() || self.display.contains_key(&key) {
            return;
        }
        self.display.insert(key.clone(), item.trim().to_string());
        self.order.push(key);
    }

    fn keys(&self) -> FxHashSet<&str> {
        self.order.iter().map(String::as_str).collect()
    }
}

impl GraphBuilder {
    pub fn new<S: AsRef<str>>(connection_fields: &[S]) -> Self {
        Self {
            connection_fields: connection_fields.iter().map(|f| f.as_ref().to_string()).collect(),
            min_shared_weight: 1,
            filter_stopwords: false,
            labeling: Labeling::Infer,
        }
    }

    /// Builder for `kind` using its default connection fields
    pub fn for_kind(kind: EntityKind) -> Self {
        let schema = kind.schema();
        let mut builder = Self::new(schema.default_connections);
        builder.labeling = Labeling::Schema(schema);
        builder
    }

    pub fn min_shared_weight(mut self, weight: u32) -> Self {
        self.min_shared_weight = weight;
        self
    }

    pub fn filter_stopwords(mut self, enabled: bool) -> Self {
        self.filter_stopwords = enabled;
        self
    }

    /// Label nodes with the name field of `kind`
    pub fn kind(mut self, kind: EntityKind) -> Self {
        self.labeling = Labeling::Schema(kind.schema());
        self
    }

    /// Label nodes with an arbitrary field
    pub fn name_field(mut self, field: impl Into<String>) -> Self {
        self.labeling = Labeling::Field(field.into());
        self
    }

    pub fn connection_fields(&self) -> &[String] {
        &self.connection_fields
    }

    fn validate(&self, records: &[Record]) -> GraphResult<()> {
        if self.connection_fields.is_empty() {
            return Err(GraphError::InvalidInput("at least one connection field is required".to_string()));
        }
        if self.min_shared_weight == 0 {
            return Err(GraphError::InvalidInput("min_shared_weight must be at least 1".to_string()));
        }
        if records.is_empty() {
            return Ok(());
        }
        for field in &self.connection_fields {
            if !records.iter().any(|r| r.has_field(field)) {
                return Err(GraphError::InvalidInput(format!(
                    "connection field '{}' is not present in any record",
                    field
                )));
            }
        }
        Ok(())
    }

    fn label(&self, schema: Option<&EntitySchema>, record: &Record) -> String {
        match (&self.labeling, schema) {
            (Labeling::Field(field), _) => {
                let text = record.text(field);
                if text.trim().is_empty() {
                    format!("Item_{}", record.id)
                } else {
                    text.trim().to_string()
                }
            }
            (_, Some(schema)) => schema.label_for(record),
            _ => format!("Item_{}", record.id),
        }
    }

    fn resolve_schema(&self, records: &[Record]) -> Option<EntitySchema> {
        match &self.labeling {
            Labeling::Schema(schema) => Some(*schema),
            Labeling::Field(_) => None,
            Labeling::Infer => EntityKind::ALL
                .iter()
                .map(EntityKind::schema)
                .find(|schema| records.iter().any(|r| r.has_field(schema.name_field))),
        }
    }

    fn field_values(&self, record: &Record, field: &str) -> FieldValues {
        let mut values = FieldValues::default();
        let Some(value) = record.get(field) else {
            return values;
        };
        let skip_stopwords = self.filter_stopwords && FREE_TEXT_FIELDS.contains(&field);
        for item in value.items() {
            if skip_stopwords && is_stopword(&item) {
                continue;
            }
            values.insert(&item);
        }
        values
    }

    /// Build the graph. Records are not modified.
    ///
    /// Runs in O(n^2 * f) for n records and f connection fields.
    pub fn build(&self, records: &[Record]) -> GraphResult<SimilarityGraph> {
        self.validate(records)?;

        let schema = self.resolve_schema(records);
        let mut graph = SimilarityGraph::new();
        for record in records {
            graph.add_node(record.id, self.label(schema.as_ref(), record), record.fields.clone());
        }

        // values[record][field]
        let values: Vec<Vec<FieldValues>> = records
            .iter()
            .map(|r| self.connection_fields.iter().map(|f| self.field_values(r, f)).collect())
            .collect();
        let key_sets: Vec<Vec<FxHashSet<&str>>> = values
            .iter()
            .map(|per_field| per_field.iter().map(FieldValues::keys).collect())
            .collect();

        for i in 0..records.len() {
            for j in (i + 1)..records.len() {
                let mut weight = 0u32;
                let mut shared = Vec::new();

                for (f, field) in self.connection_fields.iter().enumerate() {
                    let ours = &values[i][f];
                    let theirs = &key_sets[j][f];
                    let mut common: Vec<(&str, &str)> = ours
                        .order
                        .iter()
                        .filter(|key| theirs.contains(key.as_str()))
                        .map(|key| (key.as_str(), ours.display[key].as_str()))
                        .collect();
                    if common.is_empty() {
                        continue;
                    }
                    common.sort();
                    weight += common.len() as u32;
                    shared.push(SharedField::new(
                        field.clone(),
                        common.into_iter().map(|(_, display)| display.to_string()).collect(),
                    ));
                }

                if weight >= self.min_shared_weight {
                    graph.add_edge(NodeId::from(i), NodeId::from(j), weight, shared)?;
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            fields = ?self.connection_fields,
            min_shared_weight = self.min_shared_weight,
            "Built similarity graph"
        );
        Ok(graph)
    }
}
