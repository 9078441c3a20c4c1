//! Semantic Graph
//!
//! The `SemanticGraph` capability consumed by agents, the planner, and the
//! prompt builder, plus `CodeGraph`, a lightweight in-memory implementation
//! built from workspace symbols.
//!
//! All collections are ordered so fingerprints and churn rankings are
//! deterministic across runs.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ============================================================================
// SemanticGraph Trait
// ============================================================================

/// Read-only view over workspace knowledge.
pub trait SemanticGraph: Send + Sync {
    /// Short textual summary of the graph for planners and prompts.
    fn pattern_fingerprint(&self) -> String;

    /// Simple cycles, each given as the ordered list of node names.
    fn find_cycles(&self) -> Vec<Vec<String>>;

    /// Per-module churn score (number of defined functions and classes).
    fn module_churn(&self) -> BTreeMap<String, usize>;

    /// Module import adjacency: module -> imported modules.
    fn module_map(&self) -> BTreeMap<String, BTreeSet<String>>;
}

/// Rank modules by churn, highest first, ties broken by module name.
///
/// Returns at most `limit` entries.
pub fn churn_hotspots(graph: &dyn SemanticGraph, limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = graph.module_churn().into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

// ============================================================================
// Graph Data Types
// ============================================================================

/// Node inside the semantic graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    /// Symbol kind: "module", "function", "class", ...
    pub kind: String,
    pub file: PathBuf,
}

impl GraphNode {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            file: file.into(),
        }
    }

    /// Module name derived from the file stem.
    pub fn module(&self) -> String {
        file_stem(&self.file)
    }
}

/// Edge connecting two nodes with a semantic relationship.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: GraphNode,
    pub target: GraphNode,
    /// "defines", "imports", "calls", ...
    pub relation: String,
}

impl GraphEdge {
    pub fn new(source: GraphNode, target: GraphNode, relation: impl Into<String>) -> Self {
        Self {
            source,
            target,
            relation: relation.into(),
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ============================================================================
// CodeGraph
// ============================================================================

/// In-memory knowledge graph built from workspace symbols.
#[derive(Debug, Clone, Default)]
pub struct CodeGraph {
    nodes: BTreeSet<GraphNode>,
    edges: BTreeSet<GraphEdge>,
}

impl CodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.insert(node);
    }

    /// Add an edge, registering either endpoint that is not yet known.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        self.nodes.insert(edge.source.clone());
        self.nodes.insert(edge.target.clone());
        self.edges.insert(edge);
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    /// All nodes carrying the given symbol name.
    pub fn references(&self, symbol: &str) -> Vec<&GraphNode> {
        self.nodes.iter().filter(|n| n.name == symbol).collect()
    }

    /// Outgoing neighbours of `node`, optionally restricted to one relation.
    pub fn neighbours(&self, node: &GraphNode, relation: Option<&str>) -> Vec<&GraphNode> {
        self.edges
            .iter()
            .filter(|e| &e.source == node && relation.map_or(true, |r| e.relation == r))
            .map(|e| &e.target)
            .collect()
    }

    fn import_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(|e| e.relation == "imports")
    }

    /// Outgoing targets per source, built in one pass over the edges.
    fn adjacency(&self) -> BTreeMap<&GraphNode, Vec<&GraphNode>> {
        let mut adjacency: BTreeMap<&GraphNode, Vec<&GraphNode>> = BTreeMap::new();
        for edge in &self.edges {
            adjacency.entry(&edge.source).or_default().push(&edge.target);
        }
        adjacency
    }
}

impl SemanticGraph for CodeGraph {
    fn pattern_fingerprint(&self) -> String {
        let modules: Vec<String> = self.module_map().into_keys().collect();
        let imports: BTreeSet<&str> = self.import_edges().map(|e| e.target.name.as_str()).collect();
        let cycles: Vec<String> = self
            .find_cycles()
            .iter()
            .map(|cycle| cycle.join("->"))
            .collect();

        let cycles_line = if cycles.is_empty() {
            "Cycles: none".to_string()
        } else {
            format!("Cycles: {}", cycles.join(", "))
        };

        [
            format!("Modules: {}", modules.join(", ")),
            format!("Imports: {}", imports.into_iter().collect::<Vec<_>>().join(", ")),
            cycles_line,
        ]
        .join("\n")
    }

    fn find_cycles(&self) -> Vec<Vec<String>> {
        let adjacency = self.adjacency();
        let mut visited: HashSet<&GraphNode> = HashSet::new();
        // Position of each node on the current path
        let mut on_path: HashMap<&GraphNode, usize> = HashMap::new();
        // Current path with the index of the next neighbour to visit
        let mut path: Vec<(&GraphNode, usize)> = Vec::new();
        let mut cycles = Vec::new();

        for root in &self.nodes {
            if !visited.insert(root) {
                continue;
            }
            on_path.insert(root, 0);
            path.push((root, 0));

            while let Some(&(node, next)) = path.last() {
                let neighbours = adjacency.get(node).map(Vec::as_slice).unwrap_or_default();
                let Some(&neighbour) = neighbours.get(next) else {
                    path.pop();
                    on_path.remove(node);
                    continue;
                };
                if let Some(top) = path.last_mut() {
                    top.1 += 1;
                }

                if visited.insert(neighbour) {
                    on_path.insert(neighbour, path.len());
                    path.push((neighbour, 0));
                } else if let Some(&index) = on_path.get(neighbour) {
                    cycles.push(path[index..].iter().map(|(n, _)| n.name.clone()).collect());
                }
            }
        }
        cycles
    }

    fn module_churn(&self) -> BTreeMap<String, usize> {
        let mut churn = BTreeMap::new();
        for node in &self.nodes {
            if node.kind == "function" || node.kind == "class" {
                *churn.entry(node.module()).or_insert(0) += 1;
            }
        }
        churn
    }

    fn module_map(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut modules: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for edge in self.import_edges() {
            modules
                .entry(edge.source.module())
                .or_default()
                .insert(edge.target.module());
        }
        modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> GraphNode {
        GraphNode::new(name, "module", format!("{}.py", name))
    }

    fn function(name: &str, file: &str) -> GraphNode {
        GraphNode::new(name, "function", file)
    }

    #[test]
    fn test_empty_graph_fingerprint() {
        let graph = CodeGraph::new();
        assert_eq!(
            graph.pattern_fingerprint(),
            "Modules: \nImports: \nCycles: none"
        );
        assert!(graph.find_cycles().is_empty());
    }

    #[test]
    fn test_module_churn_counts_functions_and_classes() {
        let mut graph = CodeGraph::new();
        graph.add_node(function("load", "io.py"));
        graph.add_node(function("save", "io.py"));
        graph.add_node(GraphNode::new("Reader", "class", "io.py"));
        graph.add_node(function("main", "app.py"));
        graph.add_node(module("util"));

        let churn = graph.module_churn();
        assert_eq!(churn.get("io"), Some(&3));
        assert_eq!(churn.get("app"), Some(&1));
        assert_eq!(churn.get("util"), None);
    }

    #[test]
    fn test_add_edge_registers_endpoints() {
        let mut graph = CodeGraph::new();
        graph.add_edge(GraphEdge::new(module("a"), module("b"), "imports"));
        assert_eq!(graph.nodes().count(), 2);
        assert_eq!(graph.neighbours(&module("a"), Some("imports")).len(), 1);
        assert!(graph.neighbours(&module("a"), Some("calls")).is_empty());
    }

    #[test]
    fn test_cycle_detection_and_fingerprint() {
        let mut graph = CodeGraph::new();
        graph.add_edge(GraphEdge::new(module("a"), module("b"), "imports"));
        graph.add_edge(GraphEdge::new(module("b"), module("a"), "imports"));

        let cycles = graph.find_cycles();
        assert_eq!(cycles, vec![vec!["a".to_string(), "b".to_string()]]);

        let fingerprint = graph.pattern_fingerprint();
        assert!(fingerprint.contains("Modules: a, b"));
        assert!(fingerprint.contains("Imports: a, b"));
        assert!(fingerprint.contains("Cycles: a->b"));
    }

    #[test]
    fn test_cycles_in_visit_order() {
        let mut graph = CodeGraph::new();
        graph.add_edge(GraphEdge::new(module("a"), module("b"), "imports"));
        graph.add_edge(GraphEdge::new(module("b"), module("c"), "imports"));
        graph.add_edge(GraphEdge::new(module("c"), module("a"), "imports"));
        graph.add_edge(GraphEdge::new(module("c"), module("b"), "imports"));
        graph.add_edge(GraphEdge::new(module("d"), module("a"), "imports"));

        assert_eq!(
            graph.find_cycles(),
            vec![vec!["a", "b", "c"], vec!["b", "c"]]
        );
    }

    #[test]
    fn test_deep_import_chain() {
        let mut graph = CodeGraph::new();
        let depth = 100_000;
        for i in 0..depth {
            graph.add_edge(GraphEdge::new(
                module(&format!("m{:06}", i)),
                module(&format!("m{:06}", i + 1)),
                "imports",
            ));
        }
        assert!(graph.find_cycles().is_empty());

        graph.add_edge(GraphEdge::new(
            module(&format!("m{:06}", depth)),
            module("m000000"),
            "imports",
        ));
        let cycles = graph.find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), depth + 1);
        assert_eq!(cycles[0][0], "m000000");
    }

    #[test]
    fn test_module_map() {
        let mut graph = CodeGraph::new();
        graph.add_edge(GraphEdge::new(module("app"), module("io"), "imports"));
        graph.add_edge(GraphEdge::new(module("app"), module("util"), "imports"));
        graph.add_edge(GraphEdge::new(module("io"), function("f", "io.py"), "defines"));

        let map = graph.module_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["app"].len(), 2);
    }

    #[test]
    fn test_churn_hotspots_tie_break_by_name() {
        let mut graph = CodeGraph::new();
        graph.add_node(function("f1", "zeta.py"));
        graph.add_node(function("f1", "alpha.py"));
        graph.add_node(function("f1", "beta.py"));
        graph.add_node(function("f2", "beta.py"));
        graph.add_node(function("f1", "gamma.py"));

        let ranked = churn_hotspots(&graph, 3);
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["beta", "alpha", "gamma"]);
    }
}
