use crate::error::GraphError;
use crate::lineage::node::Node;
use crate::reports::{DotFormatter, ReportFormatter};
use crate::types::Record;
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Owns every node of a genealogy, keyed by record id, plus the seed nodes
/// a traversal started from.
///
/// The graph never fetches anything itself; it only accepts nodes and links
/// handed to it.
#[derive(Debug, Clone, Default)]
pub struct GenealogyGraph {
    nodes: BTreeMap<u64, Node>,
    seeds: Vec<u64>,
}

impl GenealogyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph whose initial nodes are all seeds.
    pub fn with_seeds(nodes: Vec<Node>) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for node in nodes {
            graph.insert(node, true)?;
        }
        Ok(graph)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of distinct advisor -> advisee links between nodes that
    /// are both present
    pub fn edge_count(&self) -> usize {
        let mut edges = BTreeSet::new();
        for (&id, node) in &self.nodes {
            for &ancestor in node.ancestors() {
                if self.has_node(ancestor) {
                    edges.insert((ancestor, id));
                }
            }
            for &descendant in node.descendants() {
                if self.has_node(descendant) {
                    edges.insert((id, descendant));
                }
            }
        }
        edges.len()
    }

    pub fn has_node(&self, id: u64) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get_node(&self, id: u64) -> Result<&Node, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// All node ids, highest first.
    pub fn get_node_list(&self) -> Vec<u64> {
        self.nodes.keys().rev().copied().collect()
    }

    /// Nodes in the same order as [`get_node_list`](Self::get_node_list).
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().rev()
    }

    /// Seed nodes in the order they were marked, or `None` before any node
    /// has been added.
    pub fn seeds(&self) -> Option<Vec<&Node>> {
        if self.seeds.is_empty() {
            return None;
        }
        Some(self.seeds.iter().filter_map(|id| self.nodes.get(id)).collect())
    }

    pub fn seed_ids(&self) -> &[u64] {
        &self.seeds
    }

    pub fn is_seed(&self, id: u64) -> bool {
        self.seeds.contains(&id)
    }

    /// Build a node from record fields and insert it.
    ///
    /// The first node of an empty graph always becomes a seed; later nodes
    /// only when `is_seed` is set.
    #[allow(clippy::too_many_arguments)]
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        institution: Option<String>,
        year: Option<i32>,
        id: u64,
        ancestors: BTreeSet<u64>,
        descendants: BTreeSet<u64>,
        is_seed: bool,
    ) -> Result<&Node, GraphError> {
        if self.has_node(id) {
            return Err(GraphError::DuplicateNode(id));
        }

        let record = Record::new(name, institution, year, id)?;
        self.insert(Node::new(record, ancestors, descendants), is_seed)
    }

    /// Insert a prebuilt node under the same duplicate and seeding rules as
    /// [`add_node`](Self::add_node), never requesting seed status itself.
    pub fn add_node_object(&mut self, node: Node) -> Result<&Node, GraphError> {
        self.insert(node, false)
    }

    /// Record that `advisor` advised `advisee` on both nodes.
    ///
    /// Returns whether either side changed.
    pub fn link(&mut self, advisor: u64, advisee: u64) -> Result<bool, GraphError> {
        if !self.has_node(advisee) {
            return Err(GraphError::NodeNotFound(advisee));
        }

        let added_descendant = self
            .nodes
            .get_mut(&advisor)
            .ok_or(GraphError::NodeNotFound(advisor))?
            .add_descendant(advisee);

        let added_ancestor = self
            .nodes
            .get_mut(&advisee)
            .ok_or(GraphError::NodeNotFound(advisee))?
            .add_ancestor(advisor);

        if added_descendant || added_ancestor {
            debug!("Linked {} -> {}", advisor, advisee);
        }

        Ok(added_descendant || added_ancestor)
    }

    /// Render the graph as a Graphviz `digraph genealogy` description.
    pub fn generate_dot_file(&self, show_ancestors: bool, show_descendants: bool) -> Result<String> {
        DotFormatter::new(show_ancestors, show_descendants).format(self)
    }

    fn insert(&mut self, node: Node, is_seed: bool) -> Result<&Node, GraphError> {
        let id = node.get_id();
        if self.has_node(id) {
            return Err(GraphError::DuplicateNode(id));
        }

        if self.is_empty() || is_seed {
            self.seeds.push(id);
        }

        debug!("Added node {} ({} total)", id, self.nodes.len() + 1);
        Ok(&*self.nodes.entry(id).or_insert(node))
    }
}
