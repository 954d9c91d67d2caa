//! Per-entity field schemas
//!
//! Each catalog table has a designated name field, a set of required columns
//! and a set of list-valued (delimited) columns.

use super::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of entity the catalog holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Datasets,
    Publications,
    CodeRepos,
    CellLines,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Datasets,
        EntityKind::Publications,
        EntityKind::CodeRepos,
        EntityKind::CellLines,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Datasets => "datasets",
            EntityKind::Publications => "publications",
            EntityKind::CodeRepos => "code_repos",
            EntityKind::CellLines => "cell_lines",
        }
    }

    /// Schema for this kind
    pub fn schema(&self) -> EntitySchema {
        match self {
            EntityKind::Datasets => EntitySchema {
                kind: *self,
                name_field: "Study Name",
                required: &["Study Name"],
                list_fields: &[
                    ("Diseases Included", ';'),
                    ("Data Modalities", ';'),
                    ("Coarse Data Types", ','),
                    ("Granular Data Types", ';'),
                ],
                default_connections: &["Diseases Included", "Data Modalities"],
            },
            EntityKind::Publications => EntitySchema {
                kind: *self,
                name_field: "Title",
                required: &["Title"],
                list_fields: &[
                    ("Diseases Included", ';'),
                    ("Data Modalities", ';'),
                    ("Coarse Data Types", ','),
                    ("Granular Data Types", ';'),
                    ("Authors", ';'),
                    ("Keywords", ';'),
                    ("Affiliations", ';'),
                ],
                default_connections: &["Diseases Included", "Keywords"],
            },
            EntityKind::CodeRepos => EntitySchema {
                kind: *self,
                name_field: "Repository Link",
                required: &["Repository Link"],
                list_fields: &[
                    ("Diseases Included", ';'),
                    ("Languages", ','),
                    ("Data Types", ','),
                    ("Tooling", ','),
                    ("Contributors", ','),
                    ("FAIR Issues", ','),
                ],
                default_connections: &["Languages", "Data Types", "Tooling", "FAIR Issues", "Diseases Included"],
            },
            EntityKind::CellLines => EntitySchema {
                kind: *self,
                name_field: "Product Code",
                required: &["Product Code"],
                list_fields: &[],
                default_connections: &["Gene", "Condition", "Parental Line"],
            },
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "datasets" | "dataset" => Ok(EntityKind::Datasets),
            "publications" | "publication" => Ok(EntityKind::Publications),
            "code_repos" | "code" | "repos" => Ok(EntityKind::CodeRepos),
            "cell_lines" | "cells" | "indi" => Ok(EntityKind::CellLines),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

/// Field layout of one entity table
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    pub kind: EntityKind,
    /// Column used for node labels
    pub name_field: &'static str,
    /// Columns that must be present in the table header
    pub required: &'static [&'static str],
    /// Delimited columns and their delimiter
    pub list_fields: &'static [(&'static str, char)],
    /// Connection fields offered when the caller picks none
    pub default_connections: &'static [&'static str],
}

impl EntitySchema {
    /// Delimiter of a list-valued field, `None` for atomic fields
    pub fn delimiter(&self, field: &str) -> Option<char> {
        self.list_fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, d)| *d)
    }

    /// First required column absent from `header`
    pub fn missing_required<'a>(&self, header: impl IntoIterator<Item = &'a str> + Clone) -> Option<&'static str> {
        self.required
            .iter()
            .find(|req| !header.clone().into_iter().any(|h| h == **req))
            .copied()
    }

    /// Display label for a record of this kind.
    ///
    /// Code repositories are labelled by the last path segment of their
    /// link. Empty names fall back to `Item_<id>`.
    pub fn label_for(&self, record: &Record) -> String {
        let raw = record
            .get(self.name_field)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let raw = raw.trim();

        let label = match self.kind {
            EntityKind::CodeRepos => raw.trim_end_matches('/').rsplit('/').next().unwrap_or(raw),
            _ => raw,
        };

        if label.is_empty() {
            format!("Item_{}", record.id)
        } else {
            label.to_string()
        }
    }
}
