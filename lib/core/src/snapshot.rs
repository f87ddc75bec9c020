// Time-window snapshots of a citation graph
use crate::graph::{Edge, Graph, NodeId};
use crate::{Error, Result};
use tracing::debug;

/// Which time attribute a window filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAttr {
    Node,
    Edge,
}

/// Node and edge selection over a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub node_mask: Vec<bool>,
    pub edge_mask: Vec<bool>,
}

impl Snapshot {
    /// Keeps the nodes or edges whose time lies in `[start, end]`.
    ///
    /// Items without a time are outside every window. With `filter_all`,
    /// the other side is filtered too: an edge window keeps only nodes
    /// touched by a kept edge, a node window keeps only edges touching a
    /// kept node.
    pub fn by_time(graph: &Graph, start: i64, end: i64, attr: TimeAttr, filter_all: bool) -> Self {
        let in_window = |t: Option<i64>| t.map_or(false, |t| t >= start && t <= end);
        match attr {
            TimeAttr::Node => {
                let mask = graph.nodes().iter().map(|n| in_window(n.time)).collect();
                Self::with_node_mask(graph, mask, filter_all)
            }
            TimeAttr::Edge => {
                let mask = graph.edges().iter().map(|e| in_window(e.time)).collect();
                Self::with_edge_mask(graph, mask, filter_all)
            }
        }
    }

    pub fn from_edge_mask(graph: &Graph, mask: &[bool], filter_all: bool) -> Result<Self> {
        if mask.len() != graph.edge_count() {
            return Err(Error::LengthMismatch {
                what: "edge mask",
                expected: graph.edge_count(),
                actual: mask.len(),
            });
        }
        Ok(Self::with_edge_mask(graph, mask.to_vec(), filter_all))
    }

    pub fn from_node_mask(graph: &Graph, mask: &[bool], filter_all: bool) -> Result<Self> {
        if mask.len() != graph.node_count() {
            return Err(Error::LengthMismatch {
                what: "node mask",
                expected: graph.node_count(),
                actual: mask.len(),
            });
        }
        Ok(Self::with_node_mask(graph, mask.to_vec(), filter_all))
    }

    fn with_edge_mask(graph: &Graph, edge_mask: Vec<bool>, filter_all: bool) -> Self {
        let node_mask = if filter_all {
            let mut touched = vec![false; graph.node_count()];
            for (edge, _) in graph.edges().iter().zip(&edge_mask).filter(|&(_, &keep)| keep) {
                touched[edge.source] = true;
                touched[edge.target] = true;
            }
            touched
        } else {
            vec![true; graph.node_count()]
        };
        Self {
            node_mask,
            edge_mask,
        }
    }

    fn with_node_mask(graph: &Graph, node_mask: Vec<bool>, filter_all: bool) -> Self {
        let edge_mask = if filter_all {
            graph
                .edges()
                .iter()
                .map(|e| node_mask[e.source] || node_mask[e.target])
                .collect()
        } else {
            vec![true; graph.edge_count()]
        };
        Self {
            node_mask,
            edge_mask,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_mask.iter().filter(|&&b| b).count()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_mask.iter().filter(|&&b| b).count()
    }
}

impl Graph {
    /// Materializes a snapshot. Kept nodes are renumbered in their original
    /// order; kept edges with a dropped endpoint are discarded.
    pub fn subgraph(&self, snapshot: &Snapshot) -> Result<Graph> {
        let mut positions: Vec<Option<NodeId>> = vec![None; self.node_count()];
        let mut graph = Graph::with_capacity(snapshot.node_count(), snapshot.edge_count());

        for (id, node) in self.nodes().iter().enumerate() {
            if snapshot.node_mask.get(id).copied().unwrap_or(false) {
                positions[id] = Some(graph.add_node(node.clone())?);
            }
        }

        let mut dangling = 0;
        for (edge, _) in self
            .edges()
            .iter()
            .zip(&snapshot.edge_mask)
            .filter(|&(_, &keep)| keep)
        {
            match (positions[edge.source], positions[edge.target]) {
                (Some(source), Some(target)) => {
                    graph.insert_edge(Edge {
                        source,
                        target,
                        time: edge.time,
                    })?;
                }
                _ => dangling += 1,
            }
        }
        if dangling > 0 {
            debug!("Dropped {} edges with an endpoint outside the snapshot", dangling);
        }
        Ok(graph)
    }
}
