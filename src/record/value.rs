//! Field value types for catalog records
//!
//! A field holds either a single atomic value or a list of values parsed from
//! a delimited column (e.g. `Diseases Included`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of one record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
    Empty,
}

impl FieldValue {
    /// Check if value carries nothing (empty cell, blank text, empty list)
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Check if value is list-valued
    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }

    /// Get text value if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get list value if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get a numeric value from integers and floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The individual values this field contributes to similarity scoring.
    ///
    /// Atomic values become a single item; lists yield their items. Items
    /// are trimmed and blanks dropped.
    pub fn items(&self) -> Vec<String> {
        match self {
            FieldValue::Empty => Vec::new(),
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Vec::new()
                } else {
                    vec![trimmed.to_string()]
                }
            }
            FieldValue::Integer(i) => vec![i.to_string()],
            FieldValue::Float(f) => vec![f.to_string()],
            FieldValue::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Integer(_) => "Integer",
            FieldValue::Float(_) => "Float",
            FieldValue::Text(_) => "Text",
            FieldValue::List(_) => "List",
            FieldValue::Empty => "Empty",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "{}", items.join("; ")),
            FieldValue::Empty => Ok(()),
        }
    }
}

// Convenience conversions
impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_from_each_kind() {
        assert!(FieldValue::Empty.items().is_empty());
        assert!(FieldValue::from("   ").items().is_empty());
        assert_eq!(FieldValue::from(" MRI ").items(), vec!["MRI"]);
        assert_eq!(FieldValue::from(42i64).items(), vec!["42"]);
        assert_eq!(
            FieldValue::from(vec!["AD", " ", " PD "]).items(),
            vec!["AD".to_string(), "PD".to_string()]
        );
    }

    #[test]
    fn test_emptiness_and_accessors() {
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::from(0i64).is_empty());
        assert_eq!(FieldValue::from(3i64).as_float(), Some(3.0));
        assert_eq!(FieldValue::from("x").as_text(), Some("x"));
        assert!(FieldValue::from(vec!["a"]).is_list());
        assert_eq!(FieldValue::Float(1.5).type_name(), "Float");
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from(vec!["AD", "PD"]).to_string(), "AD; PD");
        assert_eq!(FieldValue::Empty.to_string(), "");
    }

    #[test]
    fn test_json_shape() {
        let values = vec![
            FieldValue::from(7i64),
            FieldValue::Float(2.5),
            FieldValue::from("ADNI"),
            FieldValue::from(vec!["AD", "PD"]),
            FieldValue::Empty,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[7,2.5,"ADNI",["AD","PD"],null]"#);

        let back: Vec<FieldValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
