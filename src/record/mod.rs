//! Catalog records
//!
//! A record is one entity (dataset, publication, code repository, cell line)
//! as a mapping from field name to value. Records are immutable once a
//! [`RecordStore`] has been built by the loader.

pub mod cache;
pub mod loader;
pub mod normalize;
pub mod schema;
pub mod value;

pub use cache::{CacheEntry, RecordCache};
pub use loader::{DataLoader, LoadError, LoadResult};
pub use schema::{EntityKind, EntitySchema};
pub use value::FieldValue;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a record within its store (row index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn new(id: u64) -> Self {
        RecordId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

/// One catalog entity with its fields in column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: RecordId) -> Self {
        Record {
            id,
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field value as display text, empty when absent
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(|v| v.to_string()).unwrap_or_default()
    }
}

/// Ordered, read-only collection of records of one kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordStore {
    pub kind: EntityKind,
    /// Column names in table order
    pub columns: Vec<String>,
    records: Vec<Record>,
    pub loaded_at: DateTime<Utc>,
}

impl RecordStore {
    pub fn new(kind: EntityKind, columns: Vec<String>, records: Vec<Record>) -> Self {
        RecordStore {
            kind,
            columns,
            records,
            loaded_at: Utc::now(),
        }
    }

    /// Build a store from records, deriving the column list from field order
    pub fn from_records(kind: EntityKind, records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for name in record.fields.keys() {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }
        Self::new(kind, columns, records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn schema(&self) -> EntitySchema {
        self.kind.schema()
    }
}
