pub mod common;
pub mod centrality;
pub mod community;
pub mod layout;

pub use common::{GraphView, NodeId};
pub use centrality::{betweenness_centrality, top_betweenness, CentralityScore};
pub use community::{connected_components, ComponentsResult};
pub use layout::{spring_layout, Position, SpringLayoutConfig};
