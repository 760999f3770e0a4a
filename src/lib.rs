pub mod config;
pub mod error;
pub mod lineage;
pub mod reports;
pub mod resolver;
pub mod types;

pub use error::{GraphError, ResolveError, TraversalError};
pub use lineage::{GenealogyGraph, GraphTraversal, Node};
pub use types::{PersonRecord, Record, TraversalDirections};
