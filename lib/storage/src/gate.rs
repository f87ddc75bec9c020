use crate::codec;
use crate::store::ArtifactStore;
use pubmed_temporal_core::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

/// Load-or-compute memoization over an [`ArtifactStore`].
///
/// A stored artifact is returned as-is: it is never re-validated and never
/// expires, so it is only correct while the inputs it was computed from do
/// not change. Delete the artifact to force a rebuild.
pub struct PersistenceGate<'a, S: ArtifactStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ArtifactStore + ?Sized> PersistenceGate<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.store.read(name)? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let bytes = codec::encode(value)?;
        self.store.write(name, &bytes)?;
        info!("File saved to '{}'", self.store.location(name));
        Ok(())
    }

    /// Returns the stored artifact, or computes, stores and returns it.
    /// Nothing is written when `compute` fails.
    pub fn load_or_compute<T, F>(&self, name: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.load(name)? {
            info!("Loaded '{}' from cache", self.store.location(name));
            return Ok(value);
        }

        info!("Building '{}'...", name);
        let value = compute()?;
        self.save(name, &value)?;
        Ok(value)
    }
}
