//! Record filtering ahead of graph construction
//!
//! Column filters, cross-column keyword search, unique-value listing and the
//! node cap. All functions preserve the input order, which is what makes the
//! cap's truncation deterministic.

use crate::graph::{GraphError, GraphResult};
use crate::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Condition on one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFilter {
    /// Keep records holding any of these values (case-insensitive). For list
    /// fields any item may match.
    AnyOf(Vec<String>),
    /// Keep records whose text contains this substring (case-insensitive)
    Contains(String),
}

impl ColumnFilter {
    pub fn matches(&self, record: &Record, column: &str) -> bool {
        let Some(value) = record.get(column) else {
            return false;
        };
        match self {
            ColumnFilter::AnyOf(wanted) => {
                if wanted.is_empty() {
                    return true;
                }
                let wanted: Vec<String> = wanted.iter().map(|w| w.trim().to_lowercase()).collect();
                value.items().iter().any(|item| wanted.contains(&item.to_lowercase()))
            }
            ColumnFilter::Contains(needle) => {
                let needle = needle.trim().to_lowercase();
                needle.is_empty() || value.to_string().to_lowercase().contains(&needle)
            }
        }
    }
}

/// A conjunction of column filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub columns: IndexMap<String, ColumnFilter>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn any_of<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .insert(column.into(), ColumnFilter::AnyOf(values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn contains(mut self, column: impl Into<String>, needle: impl Into<String>) -> Self {
        self.columns.insert(column.into(), ColumnFilter::Contains(needle.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Records satisfying every filter, in input order.
///
/// Filters on a column that no record carries are skipped with a warning,
/// so a mistyped column name does not empty the selection.
pub fn filter_records(records: &[Record], spec: &FilterSpec) -> Vec<Record> {
    let active: Vec<(&String, &ColumnFilter)> = spec
        .columns
        .iter()
        .filter(|(column, _)| {
            let known = records.iter().any(|r| r.has_field(column));
            if !known && !records.is_empty() {
                warn!(column = %column, "Ignoring filter on unknown column");
            }
            known
        })
        .collect();

    records
        .iter()
        .filter(|record| active.iter().all(|(column, filter)| filter.matches(record, column)))
        .cloned()
        .collect()
}

/// Records where any of `columns` contains `term` (case-insensitive).
/// An empty `columns` searches every field; a blank term keeps everything.
pub fn search_records(records: &[Record], term: &str, columns: &[&str]) -> Vec<Record> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| {
            let mut values = record
                .fields
                .iter()
                .filter(|(name, _)| columns.is_empty() || columns.contains(&name.as_str()))
                .map(|(_, value)| value);
            values.any(|value| value.to_string().to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

/// Distinct non-empty values of `column`, list items counted individually,
/// sorted with their occurrence counts
pub fn unique_values(records: &[Record], column: &str) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(value) = record.get(column) {
            for item in value.items() {
                *counts.entry(item).or_insert(0) += 1;
            }
        }
    }
    counts.into_iter().collect()
}

/// Keep the first `cap` records. Returns the kept records and how many were
/// dropped.
pub fn cap_records(records: Vec<Record>, cap: usize) -> (Vec<Record>, usize) {
    let dropped = records.len().saturating_sub(cap);
    let mut records = records;
    records.truncate(cap);
    (records, dropped)
}

/// Fail with `CapacityExceeded` when more than `cap` records are given
pub fn enforce_capacity(records: &[Record], cap: usize) -> GraphResult<()> {
    if records.len() > cap {
        return Err(GraphError::CapacityExceeded {
            count: records.len(),
            cap,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldValue, RecordId};

    fn records() -> Vec<Record> {
        vec![
            Record::new(RecordId::new(0))
                .with_field("Study Name", "ADNI")
                .with_field("Diseases Included", vec!["Alzheimer's Disease", "MCI"])
                .with_field("Abstract", "Longitudinal imaging cohort"),
            Record::new(RecordId::new(1))
                .with_field("Study Name", "PPMI")
                .with_field("Diseases Included", vec!["Parkinson's Disease"])
                .with_field("Abstract", FieldValue::Empty),
            Record::new(RecordId::new(2))
                .with_field("Study Name", "AMP-AD")
                .with_field("Diseases Included", vec!["Alzheimer's Disease"])
                .with_field("Abstract", "Multi-omic profiling"),
        ]
    }

    fn names(records: &[Record]) -> Vec<String> {
        records.iter().map(|r| r.text("Study Name")).collect()
    }

    #[test]
    fn test_any_of_filter_matches_list_items() {
        let spec = FilterSpec::new().any_of("Diseases Included", ["alzheimer's disease"]);
        assert_eq!(names(&filter_records(&records(), &spec)), vec!["ADNI", "AMP-AD"]);

        let both = spec.contains("Abstract", "IMAGING");
        assert_eq!(names(&filter_records(&records(), &both)), vec!["ADNI"]);

    }

    #[test]
    fn test_filter_on_unknown_column_is_skipped() {
        let unknown = FilterSpec::new().any_of("Sample Size", ["10"]);
        assert_eq!(filter_records(&records(), &unknown).len(), 3);

        // Remaining filters still apply
        let mixed = unknown.any_of("Diseases Included", ["MCI"]);
        assert_eq!(names(&filter_records(&records(), &mixed)), vec!["ADNI"]);

        // A column some records carry still excludes the ones without it
        let mut partial = records();
        partial[2].fields.shift_remove("Abstract");
        let spec = FilterSpec::new().contains("Abstract", "");
        assert_eq!(names(&filter_records(&partial, &spec)), vec!["ADNI", "PPMI"]);
    }

    #[test]
    fn test_search_records() {
        assert_eq!(names(&search_records(&records(), "omic", &[])), vec!["AMP-AD"]);
        assert_eq!(names(&search_records(&records(), "ad", &["Study Name"])), vec!["ADNI", "AMP-AD"]);
        assert_eq!(search_records(&records(), "  ", &[]).len(), 3);
    }

    #[test]
    fn test_unique_values() {
        let values = unique_values(&records(), "Diseases Included");
        assert_eq!(
            values,
            vec![
                ("Alzheimer's Disease".to_string(), 2),
                ("MCI".to_string(), 1),
                ("Parkinson's Disease".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_cap_records() {
        let (kept, dropped) = cap_records(records(), 2);
        assert_eq!(names(&kept), vec!["ADNI", "PPMI"]);
        assert_eq!(dropped, 1);

        let (kept, dropped) = cap_records(records(), 10);
        assert_eq!(kept.len(), 3);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_enforce_capacity() {
        assert!(enforce_capacity(&records(), 3).is_ok());
        assert_eq!(
            enforce_capacity(&records(), 2),
            Err(GraphError::CapacityExceeded { count: 3, cap: 2 })
        );
    }
}
