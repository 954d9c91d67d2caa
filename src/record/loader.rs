//! Tab-separated table loading
//!
//! Reads the catalog tables into [`RecordStore`]s, validating the header
//! against the entity schema and normalizing list fields on the way in.

use super::normalize::{fix_pmc_link, normalize_author_names, normalize_list_field, split_data_modalities};
use super::{EntityKind, FieldValue, Record, RecordId, RecordStore};
use crate::config::DataConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Publication fields counted towards `Data Completeness`
const COMPLETENESS_FIELDS: [&str; 5] = ["PubMed Central Link", "Abstract", "Keywords", "Authors", "Affiliations"];

/// Errors raised while loading tables
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{kind} table is missing required column '{column}'")]
    MissingColumn { kind: EntityKind, column: String },

    #[error("Table file not found: {0}")]
    FileNotFound(PathBuf),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// One row of a FAIR compliance log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairIssue {
    #[serde(rename = "Repository")]
    pub repository: String,
    #[serde(rename = "Study", default)]
    pub study: String,
    #[serde(rename = "Issue Type")]
    pub issue_type: String,
    #[serde(rename = "Details", default)]
    pub details: String,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: String,
}

/// Loads catalog tables from the configured directories
pub struct DataLoader {
    config: DataConfig,
}

impl DataLoader {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }

    /// Path of the table backing `kind`
    pub fn table_path(&self, kind: EntityKind) -> PathBuf {
        self.config.tables_dir.join(self.config.file_for(kind))
    }

    /// Load and normalize the table for `kind`.
    ///
    /// Code repositories are merged with the FAIR compliance logs when any
    /// are present.
    pub fn load(&self, kind: EntityKind) -> LoadResult<RecordStore> {
        let path = self.table_path(kind);
        if !path.exists() {
            return Err(LoadError::FileNotFound(path));
        }

        let file = std::fs::File::open(&path)?;
        let store = parse_table(kind, file)?;
        info!(kind = %kind, records = store.len(), path = %path.display(), "Loaded table");

        if kind == EntityKind::CodeRepos {
            let issues = self.load_fair_compliance()?;
            return Ok(merge_fair_compliance(store, &issues));
        }
        Ok(store)
    }

    /// Read every FAIR compliance log under the scrapers directory.
    ///
    /// Duplicate `(Repository, Study, Issue Type)` rows keep the most recent
    /// timestamp. Unreadable logs are skipped with a warning.
    pub fn load_fair_compliance(&self) -> LoadResult<Vec<FairIssue>> {
        let dir = &self.config.scrapers_dir;
        if !dir.exists() {
            debug!(dir = %dir.display(), "No scrapers directory; skipping FAIR logs");
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| self.is_fair_log(p))
            .collect();
        paths.sort();

        if paths.is_empty() {
            warn!(dir = %dir.display(), "No FAIR compliance log files found");
            return Ok(Vec::new());
        }

        let mut issues = Vec::new();
        for path in paths {
            match std::fs::File::open(&path).map_err(LoadError::from).and_then(parse_fair_log) {
                Ok(mut rows) => issues.append(&mut rows),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable FAIR log"),
            }
        }

        Ok(dedupe_fair_issues(issues))
    }

    fn is_fair_log(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with(&self.config.fair_log_prefix) && n.ends_with(".tsv"))
            .unwrap_or(false)
    }
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

/// Parse a tab-separated table into a record store for `kind`.
pub fn parse_table<R: Read>(kind: EntityKind, reader: R) -> LoadResult<RecordStore> {
    let schema = kind.schema();
    let mut rdr = tsv_reader(reader);

    let header: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if let Some(column) = schema.missing_required(header.iter().map(String::as_str)) {
        return Err(LoadError::MissingColumn {
            kind,
            column: column.to_string(),
        });
    }

    let mut records = Vec::new();
    for (row_idx, row) in rdr.records().enumerate() {
        let row = row?;
        let mut fields: IndexMap<String, FieldValue> = IndexMap::with_capacity(header.len() + 2);

        for (col_idx, name) in header.iter().enumerate() {
            let cell = row.get(col_idx).unwrap_or("").trim();

            if name == "Data Modalities" && matches!(kind, EntityKind::Datasets | EntityKind::Publications) {
                // `[coarse] granular`: the modality list itself is the granular part
                let (coarse, granular) = split_data_modalities(cell);
                fields.insert(name.clone(), list_value(&granular, ';'));
                fields.insert("Coarse Data Types".to_string(), list_value(&coarse, ','));
                fields.insert("Granular Data Types".to_string(), list_value(&granular, ';'));
                continue;
            }

            fields.insert(name.clone(), normalize_cell(kind, name, cell));
        }

        if kind == EntityKind::Publications {
            let completeness = publication_completeness(&fields);
            fields.insert("Data Completeness".to_string(), FieldValue::Float(completeness));
        }

        records.push(Record {
            id: RecordId::new(row_idx as u64),
            fields,
        });
    }

    Ok(RecordStore::from_records(kind, records))
}

fn list_value(cell: &str, delimiter: char) -> FieldValue {
    let items = normalize_list_field(cell, delimiter);
    if items.is_empty() {
        FieldValue::Empty
    } else {
        FieldValue::List(items)
    }
}

fn normalize_cell(kind: EntityKind, name: &str, cell: &str) -> FieldValue {
    if cell.is_empty() {
        return FieldValue::Empty;
    }

    if kind == EntityKind::Publications {
        match name {
            "PubMed Central Link" => return FieldValue::Text(fix_pmc_link(cell)),
            "Authors" => return FieldValue::List(normalize_author_names(cell)),
            _ => {}
        }
    }

    if let Some(delimiter) = kind.schema().delimiter(name) {
        return list_value(cell, delimiter);
    }

    if let Ok(i) = cell.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    if cell.chars().any(|c| c.is_ascii_digit())
        && cell.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
    {
        if let Ok(f) = cell.parse::<f64>() {
            return FieldValue::Float(f);
        }
    }

    FieldValue::Text(cell.to_string())
}

fn publication_completeness(fields: &IndexMap<String, FieldValue>) -> f64 {
    let completed = COMPLETENESS_FIELDS
        .iter()
        .filter(|name| fields.get(**name).map(|v| !v.is_empty()).unwrap_or(false))
        .count();
    completed as f64 * 100.0 / COMPLETENESS_FIELDS.len() as f64
}

fn parse_fair_log<R: Read>(reader: R) -> LoadResult<Vec<FairIssue>> {
    let mut rdr = tsv_reader(reader);
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

fn dedupe_fair_issues(mut issues: Vec<FairIssue>) -> Vec<FairIssue> {
    issues.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let mut seen = std::collections::HashSet::new();
    issues.retain(|i| seen.insert((i.repository.clone(), i.study.clone(), i.issue_type.clone())));
    issues
}

/// Attach `FAIR Issues` and `FAIR Score` to code repository records.
///
/// Score is `max(0, 10 - issue rows)` for repositories with logged issues
/// and 10 for repositories without. With no logs at all every repository
/// gets an empty issue list and a score of 0.
pub fn merge_fair_compliance(store: RecordStore, issues: &[FairIssue]) -> RecordStore {
    let kind = store.kind;
    let mut columns = store.columns.clone();
    for extra in ["FAIR Issues", "FAIR Score"] {
        if !columns.iter().any(|c| c == extra) {
            columns.push(extra.to_string());
        }
    }

    let mut by_repo: HashMap<&str, Vec<&FairIssue>> = HashMap::new();
    for issue in issues {
        by_repo.entry(issue.repository.as_str()).or_default().push(issue);
    }

    let records = store
        .into_records()
        .into_iter()
        .map(|mut record| {
            let link = record.text("Repository Link");
            let (types, score) = if issues.is_empty() {
                (Vec::new(), 0)
            } else {
                match by_repo.get(link.as_str()) {
                    Some(rows) => {
                        let mut types: Vec<String> = Vec::new();
                        for row in rows {
                            if !types.contains(&row.issue_type) {
                                types.push(row.issue_type.clone());
                            }
                        }
                        (types, (10 - rows.len() as i64).max(0))
                    }
                    None => (Vec::new(), 10),
                }
            };
            let issue_value = if types.is_empty() { FieldValue::Empty } else { FieldValue::List(types) };
            record.fields.insert("FAIR Issues".to_string(), issue_value);
            record.fields.insert("FAIR Score".to_string(), FieldValue::Integer(score));
            record
        })
        .collect();

    RecordStore::new(kind, columns, records)
}
