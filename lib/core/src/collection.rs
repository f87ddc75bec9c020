use crate::{Error, FeatureVector, Result};

/// An indexed collection of items that can be reconciled against another.
///
/// Items are addressed by position. Every item exposes its feature vector
/// and the number of distinct neighbors it has in its own graph, which is
/// the only structural signal used to break feature-vector collisions.
pub trait ItemCollection: Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn features(&self, index: usize) -> &FeatureVector;

    fn neighbor_count(&self, index: usize) -> usize;
}

/// Feature vectors with precomputed neighbor counts
#[derive(Debug, Clone, Default)]
pub struct VectorCollection {
    vectors: Vec<FeatureVector>,
    neighbor_counts: Vec<usize>,
}

impl VectorCollection {
    pub fn new(vectors: Vec<FeatureVector>, neighbor_counts: Vec<usize>) -> Result<Self> {
        if vectors.len() != neighbor_counts.len() {
            return Err(Error::LengthMismatch {
                what: "neighbor counts",
                expected: vectors.len(),
                actual: neighbor_counts.len(),
            });
        }

        if let Some(first) = vectors.first() {
            let expected = first.dim();
            if let Some(bad) = vectors.iter().find(|v| v.dim() != expected) {
                return Err(Error::InvalidDimension {
                    expected,
                    actual: bad.dim(),
                });
            }
        }

        Ok(Self {
            vectors,
            neighbor_counts,
        })
    }

    /// Convenience constructor from raw rows
    pub fn from_rows(rows: Vec<Vec<f32>>, neighbor_counts: Vec<usize>) -> Result<Self> {
        Self::new(
            rows.into_iter().map(FeatureVector::new).collect(),
            neighbor_counts,
        )
    }

    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }
}

impl ItemCollection for VectorCollection {
    #[inline]
    fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    fn features(&self, index: usize) -> &FeatureVector {
        &self.vectors[index]
    }

    #[inline]
    fn neighbor_count(&self, index: usize) -> usize {
        self.neighbor_counts[index]
    }
}
