use crate::gate::PersistenceGate;
use crate::store::{ArtifactStore, FsStore};
use pubmed_temporal_core::temporal::{node_years, year_value};
use pubmed_temporal_core::{Error, IndexMap, ItemCollection, Reconciler, Result, TemporalDataset};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub const INDEX_MAP: &str = "input/planetoid-index-map.json.gz";
pub const METADATA: &str = "input/pubmed-metadata.json.gz";
pub const NODE_TIMES: &str = "input/pubmed-times.json.gz";
pub const DATASET: &str = "pubmed/temporal/raw/temporal-dataset.json.gz";

/// Artifacts of a dataset build under one root
pub struct DatasetLayout<S: ArtifactStore = FsStore> {
    store: S,
}

impl DatasetLayout<FsStore> {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        Ok(Self::with_store(FsStore::new(root)?))
    }
}

impl<S: ArtifactStore> DatasetLayout<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn gate(&self) -> PersistenceGate<'_, S> {
        PersistenceGate::new(&self.store)
    }

    /// Source -> reference index map, reconciled on first use and cached
    pub fn index_map<A, B>(&self, reconciler: &Reconciler, source: &A, reference: &B) -> Result<IndexMap>
    where
        A: ItemCollection + ?Sized,
        B: ItemCollection + ?Sized,
    {
        self.gate().load_or_compute(INDEX_MAP, || {
            info!("Building index map...");
            reconciler.reconcile(source, reference)
        })
    }

    /// Deposits scraped metadata records, keyed by paper id
    pub fn save_metadata(&self, metadata: &BTreeMap<String, Value>) -> Result<()> {
        self.gate().save(METADATA, metadata)
    }

    /// Publication year per paper.
    ///
    /// Read from the cached times if present, otherwise extracted from the
    /// scraped metadata and cached.
    pub fn node_times(&self) -> Result<BTreeMap<String, Option<i64>>> {
        let gate = self.gate();
        if let Some(cached) = gate.load::<BTreeMap<String, Value>>(NODE_TIMES)? {
            return Ok(cached
                .iter()
                .map(|(key, value)| (key.clone(), year_value(value)))
                .collect());
        }

        let metadata: BTreeMap<String, Value> = gate
            .load(METADATA)?
            .ok_or_else(|| Error::missing("PubMed metadata", "get_pubmed_metadata"))?;

        let times = node_years(&metadata);
        let missing = times.values().filter(|t| t.is_none()).count();
        info!(
            "Extracted publication years for {} papers ({} without a date)",
            times.len(),
            missing
        );
        // years are cached as strings, null when unknown
        let cached: BTreeMap<&str, Option<String>> = times
            .iter()
            .map(|(key, year)| (key.as_str(), year.map(|y| y.to_string())))
            .collect();
        gate.save(NODE_TIMES, &cached)?;
        Ok(times)
    }

    pub fn save_dataset(&self, dataset: &TemporalDataset) -> Result<()> {
        self.gate().save(DATASET, dataset)
    }

    pub fn load_dataset(&self) -> Result<TemporalDataset> {
        self.gate()
            .load(DATASET)?
            .ok_or_else(|| Error::missing("Temporal dataset", "build_temporal_dataset"))
    }
}
