use serde::{Deserialize, Serialize};

/// Feature vector attached to an item (tf-idf weights for a paper node)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FeatureVector {
    data: Vec<f32>,
}

/// Hashable identity of a feature vector.
///
/// Built from the bit pattern of every component with `-0.0` folded into
/// `0.0`, so two NaN-free vectors share a key exactly when they are
/// [`FeatureVector::exact_eq`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VectorKey(Vec<u32>);

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Elementwise IEEE equality: `0.0 == -0.0`, NaN equals nothing.
    #[inline]
    pub fn exact_eq(&self, other: &FeatureVector) -> bool {
        self.dim() == other.dim()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a == b)
    }

    /// `None` when any component is NaN, since such a vector cannot be
    /// equal to anything.
    pub fn key(&self) -> Option<VectorKey> {
        let mut bits = Vec::with_capacity(self.data.len());
        for x in &self.data {
            if x.is_nan() {
                return None;
            }
            bits.push(if *x == 0.0 { 0 } else { x.to_bits() });
        }
        Some(VectorKey(bits))
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_eq() {
        let a = FeatureVector::new(vec![1.0, 0.0, 0.25]);
        let b = FeatureVector::new(vec![1.0, 0.0, 0.25]);
        let c = FeatureVector::new(vec![1.0, 0.0, 0.250_001]);
        assert!(a.exact_eq(&b));
        assert!(!a.exact_eq(&c));
        assert!(!a.exact_eq(&FeatureVector::new(vec![1.0, 0.0])));
    }

    #[test]
    fn test_signed_zero_and_nan() {
        let pos = FeatureVector::new(vec![0.0, 1.0]);
        let neg = FeatureVector::new(vec![-0.0, 1.0]);
        assert!(pos.exact_eq(&neg));
        assert_eq!(pos.key(), neg.key());

        let nan = FeatureVector::new(vec![f32::NAN, 1.0]);
        assert!(!nan.exact_eq(&nan));
        assert!(nan.key().is_none());
    }

    #[test]
    fn test_key_tracks_equality() {
        let a = FeatureVector::new(vec![0.5, 2.0]);
        let b = FeatureVector::new(vec![2.0, 0.5]);
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), a.clone().key());
    }
}
