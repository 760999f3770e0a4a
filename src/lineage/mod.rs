pub mod graph;
pub mod node;
pub mod traversal;

pub use graph::GenealogyGraph;
pub use node::Node;
pub use traversal::GraphTraversal;
