use crate::graph::{Graph, NodeId};
use crate::snapshot::Snapshot;
use crate::temporal::{SplitMasks, SplitPart, TemporalSplit};
use crate::{Error, ItemCollection, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Checks a relabeled graph against the reference benchmark: identical
/// feature vectors and labels position by position, and the same number of
/// undirected edges.
pub fn verify_against(built: &Graph, reference: &Graph) -> Result<()> {
    if built.node_count() != reference.node_count() {
        return Err(Error::DatasetMismatch(format!(
            "{} nodes built, {} in reference",
            built.node_count(),
            reference.node_count()
        )));
    }

    for i in 0..built.node_count() {
        if !built.features(i).exact_eq(reference.features(i)) {
            return Err(Error::DatasetMismatch(format!("feature vector of node {} differs", i)));
        }
        let (a, b) = (built.nodes()[i].label, reference.nodes()[i].label);
        if a != b {
            return Err(Error::DatasetMismatch(format!(
                "label of node {} differs: {:?} vs {:?}",
                i, a, b
            )));
        }
    }

    let (built_edges, reference_edges) = (
        built.undirected_edges().len(),
        reference.undirected_edges().len(),
    );
    if built_edges != reference_edges {
        return Err(Error::DatasetMismatch(format!(
            "{} undirected edges built, {} in reference",
            built_edges, reference_edges
        )));
    }
    Ok(())
}

/// Temporal attributes of a graph in the reference node order.
///
/// The edge index is symmetric: every citing pair appears in both
/// orientations, sorted lexicographically. Each entry carries the time of
/// the earliest citation between the pair and whether that orientation is
/// an actual citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalDataset {
    pub node_time: Vec<i64>,
    pub edge_index: Vec<(NodeId, NodeId)>,
    pub edge_time: Vec<i64>,
    pub edge_directed: Vec<bool>,
    pub split: TemporalSplit,
    pub masks: SplitMasks,
}

/// Directed subgraphs holding the citations of each split part
#[derive(Debug, Clone)]
pub struct SplitGraphs {
    pub train: Graph,
    pub val: Graph,
    pub test: Graph,
}

impl TemporalDataset {
    pub fn build(graph: &Graph, split: TemporalSplit) -> Result<Self> {
        let node_time = graph
            .nodes()
            .iter()
            .map(|n| n.time.ok_or_else(|| Error::MissingTime(n.key.clone())))
            .collect::<Result<Vec<i64>>>()?;

        let mut pair_time: AHashMap<(NodeId, NodeId), i64> = AHashMap::new();
        for edge in graph.edges() {
            let time = edge
                .time
                .ok_or_else(|| Error::MissingTime(graph.nodes()[edge.source].key.clone()))?;
            let pair = (edge.source.min(edge.target), edge.source.max(edge.target));
            // a reciprocal pair keeps the citation made by its higher-indexed paper
            let entry = pair_time.entry(pair).or_insert(time);
            if edge.source >= edge.target {
                *entry = time;
            }
        }

        let mut entries: Vec<(NodeId, NodeId, i64)> = Vec::with_capacity(pair_time.len() * 2);
        for (&(a, b), &time) in &pair_time {
            entries.push((a, b, time));
            if a != b {
                entries.push((b, a, time));
            }
        }
        entries.sort_unstable();

        let edge_index: Vec<(NodeId, NodeId)> = entries.iter().map(|&(a, b, _)| (a, b)).collect();
        let edge_time: Vec<i64> = entries.iter().map(|&(_, _, t)| t).collect();
        let edge_directed = edge_index.iter().map(|&(a, b)| graph.has_edge(a, b)).collect();
        let masks = split.masks(&edge_time);

        let (train, val, test) = masks.counts();
        info!(
            "Temporal dataset: {} nodes, {} edge entries (train: {}, val: {}, test: {})",
            node_time.len(),
            edge_index.len(),
            train,
            val,
            test
        );

        Ok(Self {
            node_time,
            edge_index,
            edge_time,
            edge_directed,
            split,
            masks,
        })
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.node_time.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edge_index.len()
    }

    /// Edge mask over `graph`'s directed edges for one split part
    pub fn directed_mask(&self, graph: &Graph, part: SplitPart) -> Result<Vec<bool>> {
        let position: AHashMap<(NodeId, NodeId), usize> = self
            .edge_index
            .iter()
            .enumerate()
            .map(|(i, &pair)| (pair, i))
            .collect();
        let mask = self.masks.mask(part);

        graph
            .edges()
            .iter()
            .map(|e| {
                position
                    .get(&(e.source, e.target))
                    .map(|&i| mask[i])
                    .ok_or_else(|| {
                        Error::DatasetMismatch(format!(
                            "edge {} -> {} is not in the dataset",
                            e.source, e.target
                        ))
                    })
            })
            .collect()
    }

    /// Train, validation and test citation graphs, each keeping only the
    /// nodes its citations touch.
    pub fn split_graphs(&self, graph: &Graph) -> Result<SplitGraphs> {
        let part_graph = |part| -> Result<Graph> {
            let mask = self.directed_mask(graph, part)?;
            graph.subgraph(&Snapshot::from_edge_mask(graph, &mask, true)?)
        };
        Ok(SplitGraphs {
            train: part_graph(SplitPart::Train)?,
            val: part_graph(SplitPart::Validation)?,
            test: part_graph(SplitPart::Test)?,
        })
    }
}
