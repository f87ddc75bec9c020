//! Candidate matching: for every source item, the reference positions whose
//! feature vector is exactly equal to its own.
//!
//! Two strategies produce identical output:
//!
//! - [`MatchStrategy::Scan`] compares each source vector against the whole
//!   reference collection, O(n·m·d).
//! - [`MatchStrategy::Bucketed`] groups reference positions by
//!   [`VectorKey`] once and looks each source vector up, O((n + m)·d).
//!
//! With more than one worker, source items are split into contiguous
//! batches and processed on a dedicated rayon pool. Batches are reassembled
//! in source order, so parallelism never changes the result.

use crate::{Error, FeatureVector, ItemCollection, Result, VectorKey};
use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Reference positions matching one source item, ascending
pub type CandidateSet = SmallVec<[usize; 2]>;

const PROGRESS_EVERY: usize = 1000;
/// Upper bound on matcher pool threads
pub const MAX_WORKERS: usize = 4096;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Brute-force comparison against every reference vector
    Scan,
    /// Hash grouping of identical reference vectors
    #[default]
    Bucketed,
}

/// Matcher tuning. Defaults to sequential bucketed matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub strategy: MatchStrategy,
    /// `None`, `0` and `1` all mean sequential
    pub workers: Option<usize>,
    /// Overrides the derived batch size when parallel
    pub batch_size: Option<usize>,
}

impl MatcherConfig {
    #[must_use]
    pub fn parallel(workers: usize) -> Self {
        Self {
            workers: Some(workers),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Worker count, or `None` when matching runs sequentially
    pub fn effective_workers(&self) -> Option<usize> {
        self.workers.filter(|&w| w > 1)
    }

    /// `max(n / (workers + 2), 1)` unless overridden
    pub fn batch_size_for(&self, n: usize, workers: usize) -> usize {
        self.batch_size
            .unwrap_or_else(|| (n / workers.saturating_add(2)).max(1))
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == Some(0) {
            return Err(Error::InvalidConfig("batch size must be positive".to_string()));
        }
        if let Some(workers) = self.workers.filter(|&w| w > MAX_WORKERS) {
            return Err(Error::InvalidConfig(format!(
                "{} workers requested, at most {} allowed",
                workers, MAX_WORKERS
            )));
        }
        Ok(())
    }
}

/// Counts of candidate set sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateStats {
    pub unique: usize,
    pub ambiguous: usize,
    pub unmatched: usize,
}

impl CandidateStats {
    pub fn from_candidates(candidates: &[CandidateSet]) -> Self {
        let mut stats = Self::default();
        for set in candidates {
            match set.len() {
                0 => stats.unmatched += 1,
                1 => stats.unique += 1,
                _ => stats.ambiguous += 1,
            }
        }
        stats
    }
}

/// Reference positions whose vector equals `vector`
pub fn matching_positions<R>(reference: &R, vector: &FeatureVector) -> CandidateSet
where
    R: ItemCollection + ?Sized,
{
    (0..reference.len())
        .filter(|&j| vector.exact_eq(reference.features(j)))
        .collect()
}

fn bucket_reference<R>(reference: &R) -> AHashMap<VectorKey, CandidateSet>
where
    R: ItemCollection + ?Sized,
{
    let mut buckets: AHashMap<VectorKey, CandidateSet> = AHashMap::with_capacity(reference.len());
    for j in 0..reference.len() {
        if let Some(key) = reference.features(j).key() {
            buckets.entry(key).or_default().push(j);
        }
    }
    buckets
}

pub struct CandidateMatcher {
    config: MatcherConfig,
}

impl CandidateMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Candidate sets for every source item, in source order.
    ///
    /// Empty and multi-element sets are normal here; resolving them is the
    /// disambiguator's job.
    pub fn candidates<S, R>(&self, source: &S, reference: &R) -> Result<Vec<CandidateSet>>
    where
        S: ItemCollection + ?Sized,
        R: ItemCollection + ?Sized,
    {
        self.config.validate()?;

        match self.config.strategy {
            MatchStrategy::Scan => {
                self.run(source.len(), |i| matching_positions(reference, source.features(i)))
            }
            MatchStrategy::Bucketed => {
                let buckets = bucket_reference(reference);
                debug!(
                    "Grouped {} reference vectors into {} buckets",
                    reference.len(),
                    buckets.len()
                );
                self.run(source.len(), |i| {
                    source
                        .features(i)
                        .key()
                        .and_then(|key| buckets.get(&key))
                        .cloned()
                        .unwrap_or_default()
                })
            }
        }
    }

    fn run<F>(&self, n: usize, lookup: F) -> Result<Vec<CandidateSet>>
    where
        F: Fn(usize) -> CandidateSet + Sync,
    {
        let Some(workers) = self.config.effective_workers() else {
            info!(
                "Comparing feature vectors ({:?}, sequential, {} items)",
                self.config.strategy, n
            );
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                out.push(lookup(i));
                if (i + 1) % PROGRESS_EVERY == 0 {
                    debug!("Comparing feature vectors: {}/{}", i + 1, n);
                }
            }
            return Ok(out);
        };

        let batch_size = self.config.batch_size_for(n, workers);
        info!(
            "Comparing feature vectors ({:?}, workers: {}, batch size: {}, {} items)",
            self.config.strategy, workers, batch_size, n
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("matcher-{}", i))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build matcher pool: {}", e)))?;

        let done = AtomicUsize::new(0);
        let batches: Vec<Vec<CandidateSet>> = pool.install(|| {
            (0..n)
                .into_par_iter()
                .chunks(batch_size)
                .map(|batch| {
                    let out: Vec<CandidateSet> = batch.into_iter().map(&lookup).collect();
                    let finished = done.fetch_add(out.len(), Ordering::Relaxed) + out.len();
                    debug!("Comparing feature vectors: {}/{}", finished, n);
                    out
                })
                .collect()
        });

        Ok(batches.into_iter().flatten().collect())
    }
}

impl Default for CandidateMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}
