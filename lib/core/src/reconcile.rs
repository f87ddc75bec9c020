use crate::disambiguate;
use crate::matcher::{CandidateMatcher, CandidateStats, MatcherConfig};
use crate::{IndexMap, ItemCollection, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configuration for a reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub matcher: MatcherConfig,
    /// Reject maps that send two source items to the same reference item
    pub require_injective: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherConfig::default(),
            require_injective: true,
        }
    }
}

/// Matches every source item to exactly one reference item with an
/// identical feature vector.
pub struct Reconciler {
    config: ReconcileConfig,
    matcher: CandidateMatcher,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config,
            matcher: CandidateMatcher::new(config.matcher),
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn reconcile<S, R>(&self, source: &S, reference: &R) -> Result<IndexMap>
    where
        S: ItemCollection + ?Sized,
        R: ItemCollection + ?Sized,
    {
        info!(
            "Reconciling {} source items against {} reference items",
            source.len(),
            reference.len()
        );

        let candidates = self.matcher.candidates(source, reference)?;
        let stats = CandidateStats::from_candidates(&candidates);
        info!(
            "Candidates: {} unique, {} ambiguous, {} unmatched",
            stats.unique, stats.ambiguous, stats.unmatched
        );

        let map = disambiguate::resolve(candidates, source, reference)?;
        if self.config.require_injective {
            map.ensure_injective()?;
        }
        Ok(map)
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}
