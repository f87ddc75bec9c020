//! Publication times for papers and citations, and the time-based
//! train/validation/test split.

use crate::graph::Graph;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Year from a metadata date such as `"2009 Jan 12"` or `"2009:01:12"`
pub fn extract_year(date: &str) -> Option<i64> {
    date.split_whitespace()
        .next()?
        .split(':')
        .next()?
        .parse()
        .ok()
}

/// Publication year per paper key from scraped metadata records.
///
/// A record without a usable `date` field maps to `None`.
pub fn node_years(metadata: &BTreeMap<String, Value>) -> BTreeMap<String, Option<i64>> {
    metadata
        .iter()
        .map(|(key, record)| {
            let year = record
                .get("date")
                .and_then(Value::as_str)
                .and_then(extract_year);
            (key.clone(), year)
        })
        .collect()
}

/// Year of one cached times entry: a year string (`"2009"`), a bare
/// integer or null.
pub fn year_value(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => extract_year(s),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Replaces every present value by its rank among the sorted distinct
/// present values, e.g. years `1964..=2010` become steps `0..=46`.
pub fn factorize(values: &[Option<i64>]) -> Vec<Option<i64>> {
    let distinct: Vec<i64> = values
        .iter()
        .flatten()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    values
        .iter()
        .map(|v| v.and_then(|v| distinct.binary_search(&v).ok().map(|rank| rank as i64)))
        .collect()
}

/// Same as [`factorize`], keyed by paper
pub fn factorize_map(times: &BTreeMap<String, Option<i64>>) -> BTreeMap<String, Option<i64>> {
    let values: Vec<Option<i64>> = times.values().copied().collect();
    times.keys().cloned().zip(factorize(&values)).collect()
}

impl Graph {
    /// Sets node times by key; nodes without an entry keep their time.
    /// Returns how many nodes received a time.
    pub fn assign_node_times(&mut self, times: &BTreeMap<String, Option<i64>>) -> usize {
        let mut assigned = 0;
        for node in &mut self.nodes {
            if let Some(time) = times.get(&node.key) {
                node.time = *time;
                assigned += time.is_some() as usize;
            }
        }
        assigned
    }

    /// Gives each node without a time the time of the first paper citing
    /// it. Returns how many nodes were filled.
    pub fn fill_missing_node_times(&mut self) -> Result<usize> {
        let mut fills = Vec::new();
        for (id, node) in self.nodes.iter().enumerate() {
            if node.time.is_some() {
                continue;
            }
            let inferred = self
                .edges
                .iter()
                .filter(|e| e.target == id && !e.is_self_loop())
                .find_map(|e| self.nodes[e.source].time)
                .ok_or_else(|| Error::MissingTime(node.key.clone()))?;
            fills.push((id, inferred));
        }

        for &(id, time) in &fills {
            warn!(
                "Node '{}' has no time; inferred {} from a citing paper",
                self.nodes[id].key, time
            );
            self.nodes[id].time = Some(time);
        }
        Ok(fills.len())
    }

    /// Edge time is the time of the citing paper
    pub fn assign_edge_times(&mut self) -> Result<()> {
        for edge in &mut self.edges {
            let node = &self.nodes[edge.source];
            edge.time = Some(node.time.ok_or_else(|| Error::MissingTime(node.key.clone()))?);
        }
        debug!("Assigned times to {} edges", self.edges.len());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPart {
    Train,
    Validation,
    Test,
}

/// Time-based split: train `t < train_end`, validation
/// `train_end <= t <= val_end`, test `t > val_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalSplit {
    pub train_end: i64,
    pub val_end: i64,
}

impl Default for TemporalSplit {
    fn default() -> Self {
        Self {
            train_end: 37,
            val_end: 40,
        }
    }
}

impl TemporalSplit {
    pub fn new(train_end: i64, val_end: i64) -> Result<Self> {
        if train_end > val_end + 1 {
            return Err(Error::InvalidConfig(format!(
                "train end {} is past validation end {}",
                train_end, val_end
            )));
        }
        Ok(Self { train_end, val_end })
    }

    #[inline]
    pub fn part(&self, time: i64) -> SplitPart {
        if time < self.train_end {
            SplitPart::Train
        } else if time <= self.val_end {
            SplitPart::Validation
        } else {
            SplitPart::Test
        }
    }

    pub fn masks(&self, times: &[i64]) -> SplitMasks {
        let mut masks = SplitMasks {
            train: vec![false; times.len()],
            val: vec![false; times.len()],
            test: vec![false; times.len()],
        };
        for (i, &t) in times.iter().enumerate() {
            match self.part(t) {
                SplitPart::Train => masks.train[i] = true,
                SplitPart::Validation => masks.val[i] = true,
                SplitPart::Test => masks.test[i] = true,
            }
        }
        masks
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitMasks {
    pub train: Vec<bool>,
    pub val: Vec<bool>,
    pub test: Vec<bool>,
}

impl SplitMasks {
    pub fn mask(&self, part: SplitPart) -> &[bool] {
        match part {
            SplitPart::Train => &self.train,
            SplitPart::Validation => &self.val,
            SplitPart::Test => &self.test,
        }
    }

    /// Number of entries in each part
    pub fn counts(&self) -> (usize, usize, usize) {
        let count = |m: &[bool]| m.iter().filter(|&&b| b).count();
        (count(&self.train), count(&self.val), count(&self.test))
    }
}
