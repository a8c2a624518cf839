use log::warn;
use petgraph::{
    algo::dijkstra,
    graph::{DiGraph, NodeIndex},
    Direction,
};
use std::collections::HashMap;
use trophinet_schemas::{
    network::{EdgeKind, EdgeRecord},
    path::{NodeKind, PathNode},
};

/// Directed compound/model graph. Node kinds are fixed when the node is first added.
#[derive(Debug, Clone, Default)]
pub struct TrophicGraph {
    graph: DiGraph<PathNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl TrophicGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from an edge list.
    ///
    /// Edges carrying a kind are typed from it. Untyped edges fall back to
    /// `model_prefix`: an endpoint whose id starts with it is a model.
    pub fn from_edges(edges: &[EdgeRecord], model_prefix: &str) -> Self {
        let mut graph = Self::new();
        let kind_by_prefix = |id: &str| {
            if !model_prefix.is_empty() && id.starts_with(model_prefix) {
                NodeKind::Model
            } else {
                NodeKind::Compound
            }
        };
        for edge in edges {
            let (from_kind, to_kind) = match edge.kind {
                Some(EdgeKind::Uptake) => (NodeKind::Compound, NodeKind::Model),
                Some(EdgeKind::Secretion) => (NodeKind::Model, NodeKind::Compound),
                None => (kind_by_prefix(&edge.from), kind_by_prefix(&edge.to)),
            };
            graph.add_edge((&edge.from, from_kind), (&edge.to, to_kind));
        }
        graph
    }

    /// Adds a node, or returns the existing one with the same id.
    pub fn add_node(&mut self, id: &str, kind: NodeKind) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            if self.graph[idx].kind != kind {
                warn!(
                    "Node '{}' already typed as {:?}, ignoring {:?}",
                    id, self.graph[idx].kind, kind
                );
            }
            return idx;
        }
        let idx = self.graph.add_node(PathNode {
            id: id.to_string(),
            kind,
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Adds an edge between existing or new nodes. Repeated edges are collapsed.
    pub fn add_edge(&mut self, from: (&str, NodeKind), to: (&str, NodeKind)) {
        let from = self.add_node(from.0, from.1);
        let to = self.add_node(to.0, to.1);
        self.graph.update_edge(from, to, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: &str) -> Option<&PathNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &PathNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Unweighted distances from `root`, or `None` if `root` is not in the graph.
    pub fn shortest_paths_from(&self, root: &str) -> Option<ShortestPaths<'_>> {
        let root = *self.index.get(root)?;
        let distance = dijkstra(&self.graph, root, None, |_| 1usize);
        Some(ShortestPaths {
            graph: self,
            root,
            distance,
        })
    }
}

/// All shortest paths leaving one root.
pub struct ShortestPaths<'a> {
    graph: &'a TrophicGraph,
    root: NodeIndex,
    distance: HashMap<NodeIndex, usize>,
}

impl<'a> ShortestPaths<'a> {
    pub fn distance_to(&self, target: &str) -> Option<usize> {
        let idx = self.graph.index.get(target)?;
        self.distance.get(idx).copied()
    }

    /// Every shortest path from the root to `target`, as node sequences that
    /// include both ends. Empty when `target` is unknown or unreachable.
    pub fn paths_to(&self, target: &str) -> Vec<Vec<PathNode>> {
        let Some(&target) = self.graph.index.get(target) else {
            return Vec::new();
        };
        if !self.distance.contains_key(&target) {
            return Vec::new();
        }

        let mut found = Vec::new();
        let mut suffix = Vec::new();
        self.walk_back(target, &mut suffix, &mut found);

        let mut paths: Vec<Vec<PathNode>> = found
            .into_iter()
            .map(|indices| {
                indices
                    .into_iter()
                    .rev()
                    .map(|idx| self.graph.graph[idx].clone())
                    .collect()
            })
            .collect();
        paths.sort_by(|a, b| {
            a.iter()
                .map(|n| n.id.as_str())
                .cmp(b.iter().map(|n| n.id.as_str()))
        });
        paths
    }

    // Follows predecessors that sit exactly one step closer to the root.
    fn walk_back(
        &self,
        node: NodeIndex,
        suffix: &mut Vec<NodeIndex>,
        found: &mut Vec<Vec<NodeIndex>>,
    ) {
        suffix.push(node);
        if node == self.root {
            found.push(suffix.clone());
        } else {
            let depth = self.distance[&node];
            for pred in self
                .graph
                .graph
                .neighbors_directed(node, Direction::Incoming)
            {
                if self.distance.get(&pred).map_or(false, |&d| d + 1 == depth) {
                    self.walk_back(pred, suffix, found);
                }
            }
        }
        suffix.pop();
    }
}
