//! # pubmed-temporal Core
//!
//! Core library for building a temporal citation-graph dataset that is a
//! drop-in replacement for a static benchmark.
//!
//! This crate provides:
//!
//! - [`FeatureVector`] - per-node feature vector with exact equality and a hashable key
//! - [`ItemCollection`] - positions with feature vectors and neighbor counts
//! - [`Graph`] - directed citation graph with node and edge times
//! - [`Reconciler`] - matches every source node to its reference position,
//!   producing an [`IndexMap`]
//! - [`TemporalSplit`] and [`TemporalDataset`] - time-based train/val/test split
//!
//! ## Example
//!
//! ```rust
//! use pubmed_temporal_core::{Reconciler, VectorCollection};
//!
//! // Two papers share a feature vector; their neighbor counts tell them apart.
//! let source = VectorCollection::from_rows(
//!     vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]],
//!     vec![2, 3, 1],
//! ).unwrap();
//! let reference = VectorCollection::from_rows(
//!     vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]],
//!     vec![1, 3, 2],
//! ).unwrap();
//!
//! let map = Reconciler::default().reconcile(&source, &reference).unwrap();
//! assert_eq!(map.as_slice(), &[2, 1, 0]);
//! ```

pub mod collection;
pub mod vector;
pub mod error;
pub mod graph;
pub mod index_map;
pub mod matcher;
pub mod disambiguate;
pub mod reconcile;
pub mod temporal;
pub mod snapshot;
pub mod dataset;

pub use collection::{ItemCollection, VectorCollection};
pub use vector::{FeatureVector, VectorKey};
pub use error::{AmbiguousMatch, Error, Result};
pub use graph::{Edge, Graph, Node, NodeId};
pub use index_map::IndexMap;
pub use matcher::{CandidateMatcher, CandidateSet, CandidateStats, MatchStrategy, MatcherConfig};
pub use reconcile::{ReconcileConfig, Reconciler};
pub use temporal::{SplitMasks, SplitPart, TemporalSplit};
pub use snapshot::{Snapshot, TimeAttr};
pub use dataset::{verify_against, SplitGraphs, TemporalDataset};
