//! Structural tie-breaking for feature-vector collisions.
//!
//! Several papers can share an identical tf-idf vector. Among the reference
//! candidates of such a paper, only those with the same number of distinct
//! neighbors are kept. This is a heuristic: nothing guarantees that degree
//! separates every collision, so the result is checked and any leftover
//! ambiguity is an error rather than an arbitrary pick.

use crate::error::AmbiguousMatch;
use crate::matcher::CandidateSet;
use crate::{Error, IndexMap, ItemCollection, Result};
use tracing::debug;

/// Keeps, for every multi-element set, only the candidates whose neighbor
/// count equals the source item's. Returns how many sets were narrowed.
pub fn narrow_by_neighbor_count<S, R>(
    candidates: &mut [CandidateSet],
    source: &S,
    reference: &R,
) -> usize
where
    S: ItemCollection + ?Sized,
    R: ItemCollection + ?Sized,
{
    let mut narrowed = 0;
    for (i, set) in candidates.iter_mut().enumerate() {
        if set.len() <= 1 {
            continue;
        }
        let n_neighbors = source.neighbor_count(i);
        set.retain(|j| reference.neighbor_count(*j) == n_neighbors);
        narrowed += 1;
    }
    narrowed
}

/// Narrows the candidate sets and flattens them into an [`IndexMap`].
///
/// Fails with [`Error::Ambiguous`] when any set does not end up with exactly
/// one candidate, and with [`Error::VectorMismatch`] when a matched pair's
/// vectors are not exactly equal.
pub fn resolve<S, R>(
    mut candidates: Vec<CandidateSet>,
    source: &S,
    reference: &R,
) -> Result<IndexMap>
where
    S: ItemCollection + ?Sized,
    R: ItemCollection + ?Sized,
{
    if candidates.len() != source.len() {
        return Err(Error::LengthMismatch {
            what: "candidate sets",
            expected: source.len(),
            actual: candidates.len(),
        });
    }

    let narrowed = narrow_by_neighbor_count(&mut candidates, source, reference);
    debug!("Disambiguated {} colliding items by neighbor count", narrowed);

    let unresolved: Vec<AmbiguousMatch> = candidates
        .iter()
        .enumerate()
        .filter(|(_, set)| set.len() != 1)
        .map(|(i, set)| AmbiguousMatch {
            source: i,
            candidates: set.to_vec(),
        })
        .collect();
    if !unresolved.is_empty() {
        return Err(Error::Ambiguous(unresolved));
    }

    let map: Vec<usize> = candidates.iter().map(|set| set[0]).collect();

    for (i, &j) in map.iter().enumerate() {
        if !source.features(i).exact_eq(reference.features(j)) {
            return Err(Error::VectorMismatch {
                source_index: i,
                reference_index: j,
            });
        }
    }

    Ok(IndexMap::new(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VectorCollection;
    use smallvec::smallvec;

    fn collection(rows: Vec<Vec<f32>>, counts: Vec<usize>) -> VectorCollection {
        VectorCollection::from_rows(rows, counts).unwrap()
    }

    #[test]
    fn test_narrow_keeps_structural_match() {
        let source = collection(vec![vec![1.0], vec![1.0]], vec![2, 3]);
        let reference = collection(vec![vec![1.0], vec![1.0]], vec![3, 2]);
        let mut candidates: Vec<CandidateSet> = vec![smallvec![0, 1], smallvec![0, 1]];

        assert_eq!(narrow_by_neighbor_count(&mut candidates, &source, &reference), 2);
        assert_eq!(candidates[0].as_slice(), &[1]);
        assert_eq!(candidates[1].as_slice(), &[0]);
    }

    #[test]
    fn test_unique_sets_are_not_narrowed() {
        // degree differs but the feature match is unique, so it stands
        let source = collection(vec![vec![1.0]], vec![5]);
        let reference = collection(vec![vec![1.0]], vec![1]);
        let map = resolve(vec![smallvec![0]], &source, &reference).unwrap();
        assert_eq!(map.as_slice(), &[0]);
    }

    #[test]
    fn test_same_degree_collision_is_ambiguous() {
        let source = collection(vec![vec![1.0]], vec![2]);
        let reference = collection(vec![vec![1.0], vec![1.0]], vec![2, 2]);
        let err = resolve(vec![smallvec![0, 1]], &source, &reference).unwrap_err();
        match err {
            Error::Ambiguous(unresolved) => {
                assert_eq!(
                    unresolved,
                    vec![AmbiguousMatch {
                        source: 0,
                        candidates: vec![0, 1]
                    }]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unmatched_item_is_ambiguous() {
        let source = collection(vec![vec![1.0], vec![2.0]], vec![0, 0]);
        let reference = collection(vec![vec![1.0]], vec![0]);
        let err = resolve(vec![smallvec![0], smallvec![]], &source, &reference).unwrap_err();
        assert!(matches!(err, Error::Ambiguous(ref u) if u.len() == 1 && u[0].source == 1));
    }

    #[test]
    fn test_vector_mismatch_detected() {
        let source = collection(vec![vec![1.0], vec![2.0]], vec![0, 0]);
        let reference = collection(vec![vec![1.0], vec![3.0]], vec![0, 0]);
        let err = resolve(vec![smallvec![0], smallvec![1]], &source, &reference).unwrap_err();
        assert!(matches!(
            err,
            Error::VectorMismatch {
                source_index: 1,
                reference_index: 1
            }
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let source = collection(vec![vec![1.0]], vec![0]);
        let err = resolve(vec![], &source, &source).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }
}
