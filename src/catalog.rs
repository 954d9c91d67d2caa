//! Catalog facade
//!
//! Wires the loader, the record cache and the graph builder together the way
//! the front end uses them: resolve records (cached), filter, cap, build,
//! lay out.

use crate::config::CatalogConfig;
use crate::filter::{cap_records, enforce_capacity, filter_records, FilterSpec};
use crate::graph::{compute_layout_with, GraphBuilder, GraphError, Layout, SimilarityGraph};
use crate::record::{DataLoader, EntityKind, LoadError, Record, RecordCache, RecordStore};
use catalog_graph_algorithms::SpringLayoutConfig;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// What to do when more records than the node cap reach the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapPolicy {
    /// Keep the first `max_nodes` records
    #[default]
    Truncate,
    /// Fail with `CapacityExceeded`
    Reject,
}

/// Parameters of one graph request
#[derive(Debug, Clone)]
pub struct GraphRequest {
    pub kind: EntityKind,
    /// Connection fields; the kind's defaults when empty
    pub fields: Vec<String>,
    pub filter: FilterSpec,
    pub min_shared_weight: u32,
    pub cap_policy: CapPolicy,
}

impl GraphRequest {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            filter: FilterSpec::default(),
            min_shared_weight: 1,
            cap_policy: CapPolicy::default(),
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, filter: FilterSpec) -> Self {
        self.filter = filter;
        self
    }

    pub fn min_shared_weight(mut self, weight: u32) -> Self {
        self.min_shared_weight = weight;
        self
    }

    pub fn cap_policy(mut self, policy: CapPolicy) -> Self {
        self.cap_policy = policy;
        self
    }
}

/// A built graph, its layout and how many records the cap dropped
#[derive(Debug, Clone)]
pub struct CatalogGraph {
    pub graph: SimilarityGraph,
    pub layout: Option<Layout>,
    pub dropped: usize,
}

pub struct Catalog {
    config: CatalogConfig,
    loader: DataLoader,
    cache: RecordCache,
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        let loader = DataLoader::new(config.data.clone());
        let cache = RecordCache::new(Duration::from_secs(config.cache.ttl_secs), config.cache.capacity);
        Self { config, loader, cache }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Records of `kind`, from the cache while fresh
    pub fn records(&self, kind: EntityKind) -> CatalogResult<Arc<RecordStore>> {
        Ok(self.cache.get_or_load(kind, || self.loader.load(kind))?)
    }

    /// Drop all cached stores so the next access reloads from disk
    pub fn invalidate(&self) {
        self.cache.invalidate();
        info!("Record cache invalidated");
    }

    /// Spring layout parameters from the graph config
    pub fn layout_config(&self) -> SpringLayoutConfig {
        let layout = &self.config.graph.layout;
        SpringLayoutConfig {
            k: layout.k,
            iterations: layout.iterations,
            scale: layout.scale,
            ..Default::default()
        }
    }

    /// Filter, cap and build a graph from already-resolved records.
    ///
    /// The layout is skipped for an empty graph.
    pub fn build_from_records(&self, records: &[Record], request: &GraphRequest) -> CatalogResult<CatalogGraph> {
        let filtered = filter_records(records, &request.filter);
        let cap = self.config.graph.max_nodes;

        let (kept, dropped) = match request.cap_policy {
            CapPolicy::Reject => {
                enforce_capacity(&filtered, cap)?;
                (filtered, 0)
            }
            CapPolicy::Truncate => cap_records(filtered, cap),
        };
        if dropped > 0 {
            warn!(kind = %request.kind, kept = kept.len(), dropped, cap, "Record set truncated to node cap");
        }

        let mut builder = if request.fields.is_empty() {
            GraphBuilder::for_kind(request.kind)
        } else {
            GraphBuilder::new(request.fields.as_slice()).kind(request.kind)
        };
        builder = builder
            .min_shared_weight(request.min_shared_weight)
            .filter_stopwords(self.config.graph.filter_stopwords);

        let graph = builder.build(&kept)?;
        let layout = if graph.is_empty() {
            None
        } else {
            Some(compute_layout_with(&graph, &self.layout_config(), self.config.graph.layout.seed)?)
        };

        Ok(CatalogGraph { graph, layout, dropped })
    }

    /// Load (or reuse) the records of `request.kind` and build a graph
    pub fn build(&self, request: &GraphRequest) -> CatalogResult<CatalogGraph> {
        let store = self.records(request.kind)?;
        self.build_from_records(store.records(), request)
    }
}
