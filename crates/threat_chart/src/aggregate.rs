use std::{collections::BTreeMap, fmt};

use crate::record::{DimValue, Dimension, ThreatRecord};

/// Identity of a grouped row (and of the bar bound to it) across renders
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(Vec<(Dimension, DimValue)>);

impl CompositeKey {
    pub fn new(parts: Vec<(Dimension, DimValue)>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[(Dimension, DimValue)] {
        &self.0
    }

    pub fn get(&self, dim: Dimension) -> Option<&DimValue> {
        self.0.iter().find(|(d, _)| *d == dim).map(|(_, v)| v)
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("_")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Number of records sharing one key tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupedRow {
    pub key: CompositeKey,
    pub count: u64,
}

impl GroupedRow {
    pub fn value(&self, dim: Dimension) -> Option<&DimValue> {
        self.key.get(dim)
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub dims: Vec<Dimension>,
    /// rows sorted by key
    pub rows: Vec<GroupedRow>,
    /// records missing one of `dims`
    pub dropped: usize,
}

impl Aggregation {
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Rows whose `dim` equals `value`, e.g. one severity facet
    pub fn rows_where(&self, dim: Dimension, value: &DimValue) -> Vec<GroupedRow> {
        self.rows
            .iter()
            .filter(|r| r.value(dim) == Some(value))
            .cloned()
            .collect()
    }
}

/// Counts records per tuple of `dims`.
pub fn aggregate(records: &[ThreatRecord], dims: &[Dimension]) -> Vec<GroupedRow> {
    aggregate_with_report(records, dims).rows
}

/// Same as [`aggregate`] but also reports how many records were dropped.
pub fn aggregate_with_report(records: &[ThreatRecord], dims: &[Dimension]) -> Aggregation {
    let mut counts: BTreeMap<CompositeKey, u64> = BTreeMap::new();
    let mut dropped = 0usize;

    for rec in records {
        let parts: Option<Vec<_>> = dims
            .iter()
            .map(|&dim| rec.value(dim).map(|v| (dim, v)))
            .collect();
        match parts {
            Some(parts) => *counts.entry(CompositeKey(parts)).or_insert(0) += 1,
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::warn!(
            "dropped {} of {} records missing one of {:?}",
            dropped,
            records.len(),
            dims
        );
    }

    Aggregation {
        dims: dims.to_vec(),
        rows: counts
            .into_iter()
            .map(|(key, count)| GroupedRow { key, count })
            .collect(),
        dropped,
    }
}
