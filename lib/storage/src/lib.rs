//! Storage layer: gzip-compressed JSON artifacts, a load-or-compute
//! persistence gate, and the on-disk layout of a dataset build.

pub mod codec;
pub mod store;
pub mod gate;
pub mod layout;

pub use store::{ArtifactStore, FsStore, MemoryStore};
pub use gate::PersistenceGate;
pub use layout::DatasetLayout;
