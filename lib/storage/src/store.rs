use atomicwrites::{AllowOverwrite, AtomicFile};
use parking_lot::RwLock;
use pubmed_temporal_core::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Named blobs that outlive a run.
///
/// Names are relative slash-separated paths such as
/// `input/planetoid-index-map.json.gz`.
pub trait ArtifactStore: Send + Sync {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>>;

    fn write(&self, name: &str, bytes: &[u8]) -> Result<()>;

    fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.read(name)?.is_some())
    }

    /// Human-readable location, for logs
    fn location(&self, name: &str) -> String {
        name.to_string()
    }
}

fn check_name(name: &str) -> Result<()> {
    let path = Path::new(name);
    if name.is_empty() || !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(Error::Storage(format!("invalid artifact name '{}'", name)));
    }
    Ok(())
}

/// Artifacts as files under a root directory
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl ArtifactStore for FsStore {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        check_name(name)?;
        match fs::read(self.path(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        check_name(name)?;
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Written to a temporary file and renamed into place
        AtomicFile::new(&path, AllowOverwrite)
            .write(|f| f.write_all(bytes))
            .map_err(|e| Error::Storage(format!("failed to write {:?}: {}", path, e)))
    }

    fn contains(&self, name: &str) -> Result<bool> {
        check_name(name)?;
        Ok(self.path(name).is_file())
    }

    fn location(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }
}

/// In-process store, mainly for tests
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Total number of successful writes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Acquire)
    }
}

impl ArtifactStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        check_name(name)?;
        Ok(self.entries.read().get(name).cloned())
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        check_name(name)?;
        self.entries.write().insert(name.to_string(), bytes.to_vec());
        self.writes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn contains(&self, name: &str) -> Result<bool> {
        check_name(name)?;
        Ok(self.entries.read().contains_key(name))
    }
}
