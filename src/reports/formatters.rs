use crate::lineage::{GenealogyGraph, Node};
use anyhow::Result;
use std::collections::HashSet;
use std::fmt::Write;

const DOT_HEADER: &str = "digraph genealogy {
    graph [charset=\"utf-8\"];
    node [shape=plaintext];
    edge [style=bold];

";

/// Trait for graph formatters
pub trait ReportFormatter {
    fn format(&self, graph: &GenealogyGraph) -> Result<String>;
}

/// Order in which nodes are written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeOrder {
    /// Every node, highest id first
    #[default]
    Descending,
    /// Depth-first from the seeds along the shown relations, first seed
    /// first and lower ids before higher ones. Unreachable nodes are left out.
    FromSeeds,
}

/// Graphviz DOT formatter
///
/// Labels come first, then edges. Within one node, ancestor edges precede
/// descendant edges and each set is walked in ascending id order. An edge is
/// written only when both ends are written nodes, and at most once even if
/// both ends record it.
#[derive(Debug, Clone, Copy)]
pub struct DotFormatter {
    show_ancestors: bool,
    show_descendants: bool,
    order: NodeOrder,
}

impl DotFormatter {
    pub fn new(show_ancestors: bool, show_descendants: bool) -> Self {
        Self {
            show_ancestors,
            show_descendants,
            order: NodeOrder::default(),
        }
    }

    pub fn with_order(mut self, order: NodeOrder) -> Self {
        self.order = order;
        self
    }

    fn ordered_nodes<'a>(&self, graph: &'a GenealogyGraph) -> Vec<&'a Node> {
        match self.order {
            NodeOrder::Descending => graph.iter().collect(),
            NodeOrder::FromSeeds => self.walk_from_seeds(graph),
        }
    }

    fn walk_from_seeds<'a>(&self, graph: &'a GenealogyGraph) -> Vec<&'a Node> {
        let mut visited = HashSet::new();
        let mut ordered = Vec::new();
        let mut stack: Vec<u64> = graph.seed_ids().iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let Ok(node) = graph.get_node(id) else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }

            let mut next = Vec::new();
            if self.show_ancestors {
                next.extend(node.ancestors().iter().copied());
            }
            if self.show_descendants {
                next.extend(node.descendants().iter().copied());
            }
            stack.extend(next.into_iter().rev());

            ordered.push(node);
        }

        ordered
    }
}

impl ReportFormatter for DotFormatter {
    fn format(&self, graph: &GenealogyGraph) -> Result<String> {
        let nodes = self.ordered_nodes(graph);
        let written: HashSet<u64> = nodes.iter().map(|node| node.get_id()).collect();

        let mut labels = String::new();
        let mut edges = String::new();
        let mut seen_edges = HashSet::new();

        for node in &nodes {
            let id = node.get_id();
            writeln!(labels, "    {} [label=\"{}\"];", id, node.label())?;

            let mut node_edges = Vec::new();
            if self.show_ancestors {
                node_edges.extend(node.ancestors().iter().map(|&ancestor| (ancestor, id)));
            }
            if self.show_descendants {
                node_edges.extend(node.descendants().iter().map(|&descendant| (id, descendant)));
            }

            for (from, to) in node_edges {
                if from == to || !written.contains(&from) || !written.contains(&to) {
                    continue;
                }
                if seen_edges.insert((from, to)) {
                    writeln!(edges, "    {} -> {};", from, to)?;
                }
            }
        }

        let mut dot = String::from(DOT_HEADER);
        dot.push_str(&labels);
        dot.push('\n');
        if !edges.is_empty() {
            dot.push_str(&edges);
        }
        dot.push_str("}\n");
        Ok(dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn single_node_graph() -> GenealogyGraph {
        let mut graph = GenealogyGraph::new();
        graph
            .add_node(
                "Carl Friedrich Gauss",
                Some("Universitaet Helmstedt".to_string()),
                Some(1799),
                18231,
                BTreeSet::new(),
                BTreeSet::new(),
                false,
            )
            .unwrap();
        graph
    }

    /// Gauss and five generations of advisors, each listing only its advisor.
    fn ancestor_chain_graph() -> GenealogyGraph {
        let chain = [
            ("Carl Friedrich Gauss", "Universitaet Helmstedt", 1799, 18231, Some(18230)),
            ("Johann Friedrich Pfaff", "Georg-August-Universitaet Goettingen", 1786, 18230, Some(66476)),
            ("Abraham Gotthelf Kaestner", "Universitaet Leipzig", 1739, 66476, Some(57670)),
            ("Christian August Hausen", "Martin-Luther-Universitaet Halle-Wittenberg", 1713, 57670, Some(72669)),
            ("Johann Christoph Wichmannshausen", "Universitaet Leipzig", 1685, 72669, Some(21235)),
            ("Otto Mencke", "Universitaet Leipzig", 1665, 21235, None),
        ];

        let mut graph = GenealogyGraph::new();
        for (name, institution, year, id, advisor) in chain {
            graph
                .add_node(
                    name,
                    Some(institution.to_string()),
                    Some(year),
                    id,
                    advisor.into_iter().collect(),
                    BTreeSet::new(),
                    false,
                )
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_single_node() {
        let expected = "digraph genealogy {
    graph [charset=\"utf-8\"];
    node [shape=plaintext];
    edge [style=bold];

    18231 [label=\"Carl Friedrich Gauss \\nUniversitaet Helmstedt (1799)\"];

}
";
        let graph = single_node_graph();
        assert_eq!(graph.generate_dot_file(true, true).unwrap(), expected);
        assert_eq!(graph.generate_dot_file(true, false).unwrap(), expected);
    }

    #[test]
    fn test_non_ascii_label_passes_through() {
        let mut graph = GenealogyGraph::new();
        graph
            .add_node(
                "Carl Friedrich Gau\u{df}",
                Some("Universit\u{e4}t Helmstedt".to_string()),
                Some(1799),
                18231,
                BTreeSet::new(),
                BTreeSet::new(),
                false,
            )
            .unwrap();

        let dot = graph.generate_dot_file(true, false).unwrap();
        assert!(dot.contains("    18231 [label=\"Carl Friedrich Gau\u{df} \\nUniversit\u{e4}t Helmstedt (1799)\"];\n"));
    }

    #[test]
    fn test_ancestor_chain_descending() {
        let expected = "digraph genealogy {
    graph [charset=\"utf-8\"];
    node [shape=plaintext];
    edge [style=bold];

    72669 [label=\"Johann Christoph Wichmannshausen \\nUniversitaet Leipzig (1685)\"];
    66476 [label=\"Abraham Gotthelf Kaestner \\nUniversitaet Leipzig (1739)\"];
    57670 [label=\"Christian August Hausen \\nMartin-Luther-Universitaet Halle-Wittenberg (1713)\"];
    21235 [label=\"Otto Mencke \\nUniversitaet Leipzig (1665)\"];
    18231 [label=\"Carl Friedrich Gauss \\nUniversitaet Helmstedt (1799)\"];
    18230 [label=\"Johann Friedrich Pfaff \\nGeorg-August-Universitaet Goettingen (1786)\"];

    21235 -> 72669;
    57670 -> 66476;
    72669 -> 57670;
    18230 -> 18231;
    66476 -> 18230;
}
";
        let graph = ancestor_chain_graph();
        assert_eq!(graph.generate_dot_file(true, false).unwrap(), expected);
    }

    #[test]
    fn test_ancestor_chain_from_seeds() {
        let expected = "digraph genealogy {
    graph [charset=\"utf-8\"];
    node [shape=plaintext];
    edge [style=bold];

    18231 [label=\"Carl Friedrich Gauss \\nUniversitaet Helmstedt (1799)\"];
    18230 [label=\"Johann Friedrich Pfaff \\nGeorg-August-Universitaet Goettingen (1786)\"];
    66476 [label=\"Abraham Gotthelf Kaestner \\nUniversitaet Leipzig (1739)\"];
    57670 [label=\"Christian August Hausen \\nMartin-Luther-Universitaet Halle-Wittenberg (1713)\"];
    72669 [label=\"Johann Christoph Wichmannshausen \\nUniversitaet Leipzig (1685)\"];
    21235 [label=\"Otto Mencke \\nUniversitaet Leipzig (1665)\"];

    18230 -> 18231;
    66476 -> 18230;
    57670 -> 66476;
    72669 -> 57670;
    21235 -> 72669;
}
";
        let graph = ancestor_chain_graph();
        let dot = DotFormatter::new(true, false)
            .with_order(NodeOrder::FromSeeds)
            .format(&graph)
            .unwrap();
        assert_eq!(dot, expected);
    }

    #[test]
    fn test_hidden_directions_emit_no_edges() {
        let graph = ancestor_chain_graph();
        let dot = graph.generate_dot_file(false, true).unwrap();
        assert!(!dot.contains("->"));
        assert!(dot.ends_with(";\n\n}\n"));
    }

    #[test]
    fn test_descendant_edges() {
        let mut graph = GenealogyGraph::new();
        graph
            .add_node("Advisor", None, None, 10, BTreeSet::new(), BTreeSet::from([30, 20]), false)
            .unwrap();
        graph
            .add_node("Student A", None, Some(1900), 20, BTreeSet::new(), BTreeSet::new(), false)
            .unwrap();
        graph
            .add_node("Student B", None, None, 30, BTreeSet::new(), BTreeSet::new(), false)
            .unwrap();

        let dot = graph.generate_dot_file(false, true).unwrap();
        assert!(dot.contains("    20 [label=\"Student A \\n(1900)\"];\n"));
        assert!(dot.ends_with("\n    10 -> 20;\n    10 -> 30;\n}\n"));
    }

    #[test]
    fn test_reciprocal_links_emit_each_edge_once() {
        let mut graph = GenealogyGraph::new();
        graph
            .add_node("Advisor", None, None, 10, BTreeSet::new(), BTreeSet::new(), false)
            .unwrap();
        graph
            .add_node("Student", None, None, 20, BTreeSet::new(), BTreeSet::new(), false)
            .unwrap();
        graph.link(10, 20).unwrap();

        let dot = graph.generate_dot_file(true, true).unwrap();
        assert_eq!(dot.matches("10 -> 20;").count(), 1);
    }

    #[test]
    fn test_dangling_ids_emit_no_edges() {
        let mut graph = GenealogyGraph::new();
        graph
            .add_node("Lonely", None, None, 5, BTreeSet::from([4]), BTreeSet::from([6]), false)
            .unwrap();

        let dot = graph.generate_dot_file(true, true).unwrap();
        assert!(!dot.contains("->"));
    }

    #[test]
    fn test_from_seeds_skips_unreachable_nodes() {
        let mut graph = ancestor_chain_graph();
        graph
            .add_node("Stranger", None, None, 99999, BTreeSet::new(), BTreeSet::new(), false)
            .unwrap();

        let dot = DotFormatter::new(true, false)
            .with_order(NodeOrder::FromSeeds)
            .format(&graph)
            .unwrap();
        assert!(!dot.contains("99999"));
        assert!(graph.generate_dot_file(true, false).unwrap().contains("99999 [label=\"Stranger\"];"));
    }

    #[test]
    fn test_empty_graph() {
        let graph = GenealogyGraph::new();
        assert_eq!(graph.generate_dot_file(true, true).unwrap(), format!("{}\n}}\n", DOT_HEADER));
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let graph = ancestor_chain_graph();
        assert_eq!(
            graph.generate_dot_file(true, true).unwrap(),
            graph.generate_dot_file(true, true).unwrap()
        );
    }
}
