//! Catalog configuration
//!
//! Every section has a `Default` carrying the production constants, so a
//! YAML file only needs to name what it changes. Environment variables
//! override the file for secrets and deployment paths.

use crate::record::EntityKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the Anthropic API key
pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
/// Environment variable overriding the tables directory
pub const ENV_TABLES_DIR: &str = "CARD_TABLES_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl CatalogConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: CatalogConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Apply `ANTHROPIC_API_KEY` and `CARD_TABLES_DIR` from the process
    /// environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (the environment in
    /// production, a map in tests). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = present(ENV_API_KEY) {
            if self.llm.provider == LlmProvider::Anthropic {
                self.llm.api_key = Some(key);
            }
        }
        if let Some(dir) = present(ENV_TABLES_DIR) {
            self.data.tables_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.graph.max_nodes == 0 {
            return Err(ConfigError::Invalid("graph.max_nodes must be positive".to_string()));
        }
        if self.graph.min_shared_weight == 0 {
            return Err(ConfigError::Invalid("graph.min_shared_weight must be positive".to_string()));
        }
        if !(self.graph.layout.k.is_finite() && self.graph.layout.k >= 0.0) {
            return Err(ConfigError::Invalid("graph.layout.k must be a non-negative number".to_string()));
        }
        if !(self.graph.layout.scale.is_finite() && self.graph.layout.scale > 0.0) {
            return Err(ConfigError::Invalid("graph.layout.scale must be positive".to_string()));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid("cache.capacity must be positive".to_string()));
        }
        if self.llm.max_input_tokens == 0 {
            return Err(ConfigError::Invalid("llm.max_input_tokens must be positive".to_string()));
        }
        Ok(())
    }
}

/// Where the catalog tables live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_tables_dir")]
    pub tables_dir: PathBuf,
    /// Directory scanned for FAIR compliance logs
    #[serde(default = "default_scrapers_dir")]
    pub scrapers_dir: PathBuf,
    #[serde(default = "default_fair_log_prefix")]
    pub fair_log_prefix: String,
    #[serde(default)]
    pub files: TableFiles,
}

fn default_tables_dir() -> PathBuf {
    PathBuf::from("tables")
}
fn default_scrapers_dir() -> PathBuf {
    PathBuf::from("scrapers")
}
fn default_fair_log_prefix() -> String {
    "fair_compliance_log_".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            tables_dir: default_tables_dir(),
            scrapers_dir: default_scrapers_dir(),
            fair_log_prefix: default_fair_log_prefix(),
            files: TableFiles::default(),
        }
    }
}

impl DataConfig {
    /// File name of the table backing `kind`
    pub fn file_for(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Datasets => &self.files.datasets,
            EntityKind::Publications => &self.files.publications,
            EntityKind::CodeRepos => &self.files.code_repos,
            EntityKind::CellLines => &self.files.cell_lines,
        }
    }
}

/// Table file names, relative to `tables_dir`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub datasets: String,
    pub publications: String,
    pub code_repos: String,
    pub cell_lines: String,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            datasets: "dataset-inventory-Dec_02_2025.tab".to_string(),
            publications: "pubmed_central_20251128_124602.tsv".to_string(),
            code_repos: "gits_to_reannotate_completed_20251202_121816.tsv".to_string(),
            cell_lines: "iNDI_inventory_20250620_122423.tsv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            capacity: EntityKind::ALL.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Node cap; larger record sets are truncated or rejected
    pub max_nodes: usize,
    pub min_shared_weight: u32,
    pub filter_stopwords: bool,
    pub layout: LayoutConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_nodes: 100,
            min_shared_weight: 1,
            filter_stopwords: false,
            layout: LayoutConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub k: f64,
    pub iterations: usize,
    pub scale: f64,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            k: 2.5,
            iterations: 50,
            scale: 1000.0,
            seed: 42,
        }
    }
}

/// Hosted LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Anthropic,
    OpenAI,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// API key (loaded from the environment when absent)
    pub api_key: Option<String>,
    /// Base URL override; provider default when `None`
    pub api_base_url: Option<String>,
    pub max_tokens: u32,
    /// Largest estimated prompt size accepted before the request is sent
    pub max_input_tokens: usize,
    pub temperature: f32,
    pub system_prompt: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            model: "claude-sonnet-4-5-20250929".to_string(),
            api_key: None,
            api_base_url: None,
            max_tokens: 4000,
            max_input_tokens: 180_000,
            temperature: 0.7,
            system_prompt: None,
            timeout_secs: 60,
        }
    }
}
