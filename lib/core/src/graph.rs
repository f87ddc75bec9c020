// Citation graph - papers as nodes, citations as directed edges
use crate::{Error, FeatureVector, IndexMap, ItemCollection, Result};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type NodeId = usize;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// External identifier (the paper's PMID)
    pub key: String,
    pub features: FeatureVector,
    pub label: Option<i64>,
    pub time: Option<i64>,
}

/// `source` cites `target`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub time: Option<i64>,
}

impl Node {
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>, features: FeatureVector) -> Self {
        Self {
            key: key.into(),
            features,
            label: None,
            time: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: i64) -> Self {
        self.label = Some(label);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }
}

impl Edge {
    #[inline]
    #[must_use]
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            time: None,
        }
    }

    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Directed graph with per-node feature vectors.
///
/// Neighbor counts are taken over the undirected view: a pair cited in both
/// directions counts once, and a node is never its own neighbor.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    edge_set: AHashSet<(NodeId, NodeId)>,
    neighbors: Vec<AHashSet<NodeId>>,
    keys: AHashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            edge_set: AHashSet::with_capacity(edges),
            neighbors: Vec::with_capacity(nodes),
            keys: AHashMap::with_capacity(nodes),
        }
    }

    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        if self.keys.contains_key(&node.key) {
            return Err(Error::NodeExists(node.key));
        }
        let id = self.nodes.len();
        self.keys.insert(node.key.clone(), id);
        self.nodes.push(node);
        self.neighbors.push(AHashSet::new());
        Ok(id)
    }

    /// Returns `false` when the edge was already present
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<bool> {
        self.insert_edge(Edge::new(source, target))
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) -> Result<bool> {
        for id in [edge.source, edge.target] {
            if id >= self.nodes.len() {
                return Err(Error::NodeNotFound(id));
            }
        }
        if !self.edge_set.insert((edge.source, edge.target)) {
            return Ok(false);
        }
        if !edge.is_self_loop() {
            self.neighbors[edge.source].insert(edge.target);
            self.neighbors[edge.target].insert(edge.source);
        }
        self.edges.push(edge);
        Ok(true)
    }

    /// Drops every edge from a node to itself, returning how many were removed
    pub fn remove_self_loops(&mut self) -> usize {
        let before = self.edges.len();
        let edge_set = &mut self.edge_set;
        self.edges.retain(|e| {
            if e.is_self_loop() {
                edge_set.remove(&(e.source, e.target));
                false
            } else {
                true
            }
        });
        before - self.edges.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.keys.get(key).copied()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edge_set.contains(&(source, target))
    }

    /// Unordered node pairs joined by at least one edge, as sorted `(low, high)`
    pub fn undirected_edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs: Vec<(NodeId, NodeId)> = self
            .edges
            .iter()
            .map(|e| (e.source.min(e.target), e.source.max(e.target)))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    /// Rewrites class labels; a label with no mapping is an error
    pub fn remap_labels(&mut self, mapping: &BTreeMap<i64, i64>) -> Result<()> {
        if let Some(label) = self
            .nodes
            .iter()
            .filter_map(|n| n.label)
            .find(|label| !mapping.contains_key(label))
        {
            return Err(Error::UnknownLabel(label));
        }
        for node in &mut self.nodes {
            node.label = node.label.and_then(|label| mapping.get(&label).copied());
        }
        Ok(())
    }

    /// Moves every node `i` to position `map[i]`.
    ///
    /// The map must be a permutation of `0..node_count`.
    pub fn relabel(&self, map: &IndexMap) -> Result<Graph> {
        let n = self.node_count();
        if map.len() != n {
            return Err(Error::LengthMismatch {
                what: "index map",
                expected: n,
                actual: map.len(),
            });
        }

        let inverse = map.inverse(n)?;
        let mut graph = Graph::with_capacity(n, self.edges.len());
        for slot in inverse {
            let old = slot.ok_or_else(|| {
                Error::InvalidIndexMap("index map does not cover every position".to_string())
            })?;
            graph.add_node(self.nodes[old].clone())?;
        }

        for edge in &self.edges {
            graph.insert_edge(Edge {
                source: map.as_slice()[edge.source],
                target: map.as_slice()[edge.target],
                time: edge.time,
            })?;
        }
        Ok(graph)
    }
}

impl ItemCollection for Graph {
    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn features(&self, index: usize) -> &FeatureVector {
        &self.nodes[index].features
    }

    #[inline]
    fn neighbor_count(&self, index: usize) -> usize {
        self.neighbors[index].len()
    }
}
