//! # pubmed-temporal
//!
//! Builds a temporally split citation-graph dataset that is a drop-in
//! replacement for a static benchmark graph.
//!
//! The raw citation graph and the benchmark index the same papers in
//! different orders. Nodes are matched by their feature vectors, with
//! neighbor counts breaking ties between papers that share a vector; any
//! ambiguity left over is an error. Publication years from scraped
//! metadata then give every node and citation a time step, and citations
//! are split into train (`t < 37`), validation (`37 <= t <= 40`) and test
//! (`t > 40`).
//!
//! ## Crate Structure
//!
//! - [`pubmed-temporal-core`](pubmed_temporal_core) - feature vectors,
//!   graph, reconciliation, temporal split
//! - [`pubmed-temporal-storage`](pubmed_temporal_storage) - gzip JSON
//!   artifacts, persistence gate, dataset layout
//!
//! ## Example
//!
//! ```rust,no_run
//! use pubmed_temporal::prelude::*;
//!
//! # fn load_graphs() -> (Graph, Graph) { unimplemented!() }
//! let (source, reference) = load_graphs();
//! let layout = DatasetLayout::open("./data")?;
//! let options = PipelineOptions {
//!     reconcile: ReconcileConfig {
//!         matcher: MatcherConfig::parallel(8),
//!         ..ReconcileConfig::default()
//!     },
//!     ..PipelineOptions::default()
//! };
//! let output = build_temporal_dataset(&layout, source, &reference, &options)?;
//! println!("{} edge entries", output.dataset.num_edges());
//! # Ok::<(), pubmed_temporal::Error>(())
//! ```

pub mod pipeline;

// Re-export core types
pub use pubmed_temporal_core::{
    verify_against, AmbiguousMatch, CandidateMatcher, CandidateSet, Edge, Error, FeatureVector,
    Graph, IndexMap, ItemCollection, MatchStrategy, MatcherConfig, Node, NodeId,
    ReconcileConfig, Reconciler, Result, Snapshot, SplitMasks, SplitPart, TemporalDataset,
    TemporalSplit, TimeAttr, VectorCollection,
};

// Re-export storage
pub use pubmed_temporal_storage::{ArtifactStore, DatasetLayout, FsStore, MemoryStore, PersistenceGate};

pub use pipeline::{build_temporal_dataset, pubmed_label_map, BuildOutput, PipelineOptions};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_temporal_dataset, DatasetLayout, Error, FeatureVector, Graph, IndexMap,
        ItemCollection, MatcherConfig, Node, PipelineOptions, ReconcileConfig, Reconciler,
        Result, TemporalDataset, TemporalSplit, VectorCollection,
    };
}
