//! File-level dependency graph backed by petgraph::DiGraph.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::config::{ImportEdge, SourceFile};

/// Files as nodes, resolved imports as edges. Each edge keeps the specifier
/// that first produced it.
pub struct DependencyGraph {
    graph: DiGraph<String, String>,
    /// O(1) path → NodeIndex lookup.
    path_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            path_index: HashMap::new(),
        }
    }

    /// Build the graph from the document's files and resolved imports.
    ///
    /// Nodes are added in path order and edges in sorted (from, specifier, to)
    /// order, so the specifier kept for a repeated edge is the smallest one.
    pub fn build(files: &[SourceFile], imports: &[ImportEdge]) -> Self {
        let mut paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        paths.sort_unstable();

        let mut graph = Self::new();
        for path in paths {
            graph.add_file(path);
        }

        let mut sorted: Vec<&ImportEdge> = imports.iter().collect();
        sorted.sort();
        for edge in sorted {
            if let Some(ref to) = edge.to_file {
                graph.add_import(&edge.from_file, to, &edge.specifier);
            }
        }
        graph
    }

    /// Get or create the node for `path`.
    pub fn add_file(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.path_index.get(path) {
            idx
        } else {
            let idx = self.graph.add_node(path.to_string());
            self.path_index.insert(path.to_string(), idx);
            idx
        }
    }

    /// Add `from → to`. Self edges, unknown files and repeats are ignored;
    /// returns whether an edge was added.
    pub fn add_import(&mut self, from: &str, to: &str, specifier: &str) -> bool {
        if from == to {
            return false;
        }
        let (Some(&from_idx), Some(&to_idx)) = (self.path_index.get(from), self.path_index.get(to))
        else {
            return false;
        };
        if self.graph.find_edge(from_idx, to_idx).is_some() {
            return false;
        }
        self.graph.add_edge(from_idx, to_idx, specifier.to_string());
        true
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.path_index.contains_key(path)
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.path_index.get(from), self.path_index.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All files, sorted.
    pub fn files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = self.graph.node_weights().map(|s| s.as_str()).collect();
        files.sort_unstable();
        files
    }

    /// All edges as (from, to, specifier), sorted by (from, to).
    pub fn edges(&self) -> Vec<(&str, &str, &str)> {
        let mut edges: Vec<(&str, &str, &str)> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    self.graph[e.target()].as_str(),
                    e.weight().as_str(),
                )
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Files `path` imports directly, sorted.
    pub fn successors(&self, path: &str) -> Vec<&str> {
        let Some(&idx) = self.path_index.get(path) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out
    }

    /// Node indices in path order.
    pub(crate) fn ordered_nodes(&self) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        nodes.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        nodes
    }

    /// Successor indices of `idx` in path order.
    pub(crate) fn ordered_successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        next.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        next
    }

    pub(crate) fn path(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Access the underlying petgraph for algorithms that need it.
    pub fn inner_graph(&self) -> &DiGraph<String, String> {
        &self.graph
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
