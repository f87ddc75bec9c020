// Integration tests for pubmed-temporal
use pubmed_temporal::prelude::*;
use pubmed_temporal::{MatchStrategy, MemoryStore};
use pubmed_temporal_storage::layout::{DATASET, INDEX_MAP, NODE_TIMES};
use pubmed_temporal_storage::{codec, ArtifactStore};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn paper(key: &str, x: [f32; 3], label: i64) -> Node {
    Node::new(key, FeatureVector::new(x.to_vec())).with_label(label)
}

/// Raw citation graph in PMID order. Papers 100 and 200 share a feature
/// vector and differ only in their number of neighbors.
fn source_graph() -> Graph {
    let mut g = Graph::new();
    g.add_node(paper("100", [1.0, 0.0, 0.0], 1)).unwrap();
    g.add_node(paper("200", [1.0, 0.0, 0.0], 3)).unwrap();
    g.add_node(paper("300", [0.0, 1.0, 0.0], 2)).unwrap();
    g.add_node(paper("400", [0.0, 0.0, 1.0], 1)).unwrap();
    g.add_node(paper("500", [0.0, 1.0, 1.0], 3)).unwrap();
    for (s, t) in [(0, 2), (1, 2), (1, 3), (2, 4), (3, 4), (3, 3)] {
        g.add_edge(s, t).unwrap();
    }
    g
}

/// Benchmark graph: same papers at positions [3, 0, 4, 1, 2], benchmark
/// class ids, one undirected edge per citation.
fn reference_graph() -> Graph {
    let mut g = Graph::new();
    g.add_node(paper("r0", [1.0, 0.0, 0.0], 1)).unwrap();
    g.add_node(paper("r1", [0.0, 0.0, 1.0], 0)).unwrap();
    g.add_node(paper("r2", [0.0, 1.0, 1.0], 1)).unwrap();
    g.add_node(paper("r3", [1.0, 0.0, 0.0], 0)).unwrap();
    g.add_node(paper("r4", [0.0, 1.0, 0.0], 2)).unwrap();
    for (s, t) in [(3, 4), (0, 4), (0, 1), (4, 2), (1, 2)] {
        g.add_edge(s, t).unwrap();
    }
    g
}

fn metadata() -> BTreeMap<String, Value> {
    BTreeMap::from([
        ("100".to_string(), json!({"date": "1990 Jan"})),
        ("200".to_string(), json!({"date": "2001"})),
        ("300".to_string(), json!({"date": "1995 Mar 3"})),
        ("400".to_string(), json!({"date": "2010:06"})),
        ("500".to_string(), json!({"title": "no longer indexed"})),
    ])
}

fn options() -> PipelineOptions {
    PipelineOptions {
        split: TemporalSplit::new(1, 2).unwrap(),
        ..PipelineOptions::default()
    }
}

#[test]
fn test_build_temporal_dataset_end_to_end() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let layout = DatasetLayout::open(dir.path()).unwrap();
    layout.save_metadata(&metadata()).unwrap();

    let reference = reference_graph();
    let output = build_temporal_dataset(&layout, source_graph(), &reference, &options()).unwrap();

    assert_eq!(output.index_map.as_slice(), &[3, 0, 4, 1, 2]);
    assert!(output.index_map.is_permutation_of(reference.node_count()));

    let ds = &output.dataset;
    // years 1990, 1995, 2001, 2010 -> steps 0..=3; paper 500 inherits 1995
    assert_eq!(ds.node_time, vec![2, 3, 1, 0, 1]);
    assert_eq!(
        ds.edge_index,
        vec![(0, 1), (0, 4), (1, 0), (1, 2), (2, 1), (2, 4), (3, 4), (4, 0), (4, 2), (4, 3)]
    );
    assert_eq!(ds.edge_time, vec![2, 2, 2, 3, 3, 1, 0, 2, 1, 0]);
    assert_eq!(ds.edge_directed.iter().filter(|&&d| d).count(), 5);
    assert_eq!(ds.masks.counts(), (2, 6, 2));
    assert_eq!(output.graph.edge_count(), 5);

    for name in [INDEX_MAP, NODE_TIMES, DATASET] {
        assert!(dir.path().join(name).is_file(), "{} missing", name);
    }
    assert_eq!(&layout.load_dataset().unwrap(), ds);

    let bytes = layout.store().read(INDEX_MAP).unwrap().unwrap();
    let stored: Vec<usize> = codec::decode(&bytes).unwrap();
    assert_eq!(stored, vec![3, 0, 4, 1, 2]);
}

#[test]
fn test_second_run_uses_cached_index_map() {
    let dir = TempDir::new().unwrap();
    let layout = DatasetLayout::open(dir.path()).unwrap();
    layout.save_metadata(&metadata()).unwrap();

    let first = build_temporal_dataset(&layout, source_graph(), &reference_graph(), &options())
        .unwrap();

    // A reconciliation against an empty reference would fail; the cached
    // map is returned instead.
    let empty = VectorCollection::default();
    let cached = layout
        .index_map(&Reconciler::default(), &source_graph(), &empty)
        .unwrap();
    assert_eq!(cached, first.index_map);

    let second = build_temporal_dataset(&layout, source_graph(), &reference_graph(), &options())
        .unwrap();
    assert_eq!(second.index_map, first.index_map);
    assert_eq!(second.dataset, first.dataset);
}

#[test]
fn test_missing_metadata_is_reported() {
    let layout = DatasetLayout::with_store(MemoryStore::new());
    let err = build_temporal_dataset(&layout, source_graph(), &reference_graph(), &options())
        .unwrap_err();
    assert!(matches!(err, Error::MissingPrerequisite { .. }));
    assert!(layout.store().is_empty());
}

#[test]
fn test_ambiguous_reference_aborts_without_caching() {
    let layout = DatasetLayout::with_store(MemoryStore::new());
    layout.save_metadata(&metadata()).unwrap();

    // r3 loses its only edge and gains one to r2, so r0 and r3 now share
    // both vector and neighbor count.
    let mut reference = Graph::new();
    for node in reference_graph().nodes() {
        reference.add_node(node.clone()).unwrap();
    }
    for (s, t) in [(3, 2), (0, 4), (0, 1), (4, 2), (1, 2), (3, 4)] {
        reference.add_edge(s, t).unwrap();
    }

    let err = build_temporal_dataset(&layout, source_graph(), &reference, &options()).unwrap_err();
    match err {
        Error::Ambiguous(unresolved) => {
            assert!(unresolved.iter().all(|m| m.candidates.is_empty() || m.candidates.len() > 1));
            assert!(err_message_is_distinct(&Error::Ambiguous(unresolved)));
        }
        other => panic!("expected ambiguity, got {other}"),
    }
    assert!(!layout.store().contains(INDEX_MAP).unwrap());
    assert!(!layout.store().contains(DATASET).unwrap());
}

fn err_message_is_distinct(err: &Error) -> bool {
    let msg = err.to_string();
    msg.contains("number of matches differ") && !msg.contains("weight vectors differ")
}

#[test]
fn test_reconcile_scenario() {
    let source = VectorCollection::from_rows(
        vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]],
        vec![2, 3, 1],
    )
    .unwrap();
    let reference = VectorCollection::from_rows(
        vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]],
        vec![1, 3, 2],
    )
    .unwrap();

    let map = Reconciler::default().reconcile(&source, &reference).unwrap();
    assert_eq!(map.as_slice(), &[2, 1, 0]);
}

#[test]
fn test_parallel_and_sequential_maps_agree() {
    init_tracing();
    let n = 500;
    // every vector appears twice in the source; degrees separate the pair
    let rows: Vec<Vec<f32>> = (0..n).map(|i| vec![(i / 2) as f32, 0.5]).collect();
    let degrees: Vec<usize> = (0..n).map(|i| i % 2).collect();
    let source = VectorCollection::from_rows(rows.clone(), degrees.clone()).unwrap();

    // reference holds the same items in reverse order
    let reference = VectorCollection::from_rows(
        rows.into_iter().rev().collect(),
        degrees.into_iter().rev().collect(),
    )
    .unwrap();

    let expected = Reconciler::new(ReconcileConfig {
        matcher: MatcherConfig::default().with_strategy(MatchStrategy::Scan),
        ..ReconcileConfig::default()
    })
    .reconcile(&source, &reference)
    .unwrap();

    assert!(expected.is_permutation_of(n));
    for (i, j) in expected.iter().enumerate() {
        assert!(source.vectors()[i].exact_eq(&reference.vectors()[j]));
        assert_eq!(j, n - 1 - i);
    }

    for matcher in [
        MatcherConfig::default(),
        MatcherConfig::parallel(4),
        MatcherConfig::parallel(3).with_strategy(MatchStrategy::Scan),
        MatcherConfig::parallel(8).with_batch_size(7),
    ] {
        let map = Reconciler::new(ReconcileConfig {
            matcher,
            ..ReconcileConfig::default()
        })
        .reconcile(&source, &reference)
        .unwrap();
        assert_eq!(map, expected);
    }
}

#[test]
fn test_split_graphs_follow_masks() {
    let layout = DatasetLayout::with_store(MemoryStore::new());
    layout.save_metadata(&metadata()).unwrap();
    let output =
        build_temporal_dataset(&layout, source_graph(), &reference_graph(), &options()).unwrap();

    let parts = output.dataset.split_graphs(&output.graph).unwrap();
    assert_eq!(parts.train.edge_count(), 1);
    assert_eq!(parts.val.edge_count(), 3);
    assert_eq!(parts.test.edge_count(), 1);
    assert_eq!(
        parts.train.edge_count() + parts.val.edge_count() + parts.test.edge_count(),
        output.graph.edge_count()
    );
}
