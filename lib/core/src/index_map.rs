use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Correspondence from source positions to reference positions.
///
/// Entry `i` is the reference position matched to source item `i`. Serializes
/// as a plain JSON array of integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexMap(Vec<usize>);

impl IndexMap {
    #[inline]
    #[must_use]
    pub fn new(entries: Vec<usize>) -> Self {
        Self(entries)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, source: usize) -> Option<usize> {
        self.0.get(source).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }

    /// Reference positions hit by more than one source item, ascending
    pub fn duplicates(&self) -> Vec<usize> {
        let mut sorted = self.0.clone();
        sorted.sort_unstable();
        let mut dups: Vec<usize> = sorted
            .windows(2)
            .filter(|w| w[0] == w[1])
            .map(|w| w[0])
            .collect();
        dups.dedup();
        dups
    }

    pub fn is_injective(&self) -> bool {
        self.duplicates().is_empty()
    }

    pub fn ensure_injective(&self) -> Result<()> {
        let duplicates = self.duplicates();
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(Error::NotInjective { duplicates })
        }
    }

    /// True when the map is a permutation of `0..reference_len`
    pub fn is_permutation_of(&self, reference_len: usize) -> bool {
        self.len() == reference_len
            && self.0.iter().all(|&j| j < reference_len)
            && self.is_injective()
    }

    /// Reference position -> source position, for an injective map
    pub fn inverse(&self, reference_len: usize) -> Result<Vec<Option<usize>>> {
        let mut inverse = vec![None; reference_len];
        for (i, j) in self.iter().enumerate() {
            let slot = inverse.get_mut(j).ok_or_else(|| {
                Error::InvalidIndexMap(format!(
                    "reference position {} out of range for {} items",
                    j, reference_len
                ))
            })?;
            if slot.is_some() {
                return Err(Error::NotInjective {
                    duplicates: self.duplicates(),
                });
            }
            *slot = Some(i);
        }
        Ok(inverse)
    }
}

impl From<Vec<usize>> for IndexMap {
    fn from(entries: Vec<usize>) -> Self {
        Self::new(entries)
    }
}
