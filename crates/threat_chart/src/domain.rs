use itertools::Itertools;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use crate::record::{DimValue, Dimension, ThreatRecord};

/// Sorted, de-duplicated values of one dimension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    values: Vec<DimValue>,
}

impl DomainSet {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = DimValue>,
    {
        Self {
            values: values.into_iter().sorted().dedup().collect(),
        }
    }

    pub fn values(&self) -> &[DimValue] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &DimValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn index_of(&self, value: &DimValue) -> Option<usize> {
        self.values.binary_search(value).ok()
    }

    pub fn contains(&self, value: &DimValue) -> bool {
        self.index_of(value).is_some()
    }
}

/// Domain sets of every dimension for one task.
///
/// Built once per task load from the full record sequence and shared by every
/// chart of that task so positions and colors agree between charts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domains {
    by_dim: BTreeMap<Dimension, DomainSet>,
}

impl Domains {
    pub fn from_records(records: &[ThreatRecord]) -> Self {
        let by_dim = Dimension::iter()
            .map(|dim| {
                let set = DomainSet::from_values(records.iter().filter_map(|r| r.value(dim)));
                (dim, set)
            })
            .collect();
        Self { by_dim }
    }

    pub fn get(&self, dim: Dimension) -> DomainSet {
        self.by_dim.get(&dim).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_dim.values().all(DomainSet::is_empty)
    }

    /// Per-dimension union, used when a task is refreshed in place
    pub fn union(&self, other: &Domains) -> Domains {
        let by_dim = Dimension::iter()
            .map(|dim| {
                let (a, b) = (self.get(dim), other.get(dim));
                (dim, DomainSet::from_values(a.iter().chain(b.iter()).cloned()))
            })
            .collect();
        Domains { by_dim }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_sorted_and_deduplicated() {
        let set = DomainSet::from_values([
            DimValue::from(2021),
            DimValue::from(2019),
            DimValue::from(2021),
            DimValue::from(2020),
        ]);
        assert_eq!(
            set.values(),
            &[
                DimValue::from(2019),
                DimValue::from(2020),
                DimValue::from(2021)
            ]
        );
        assert_eq!(set.index_of(&DimValue::from(2021)), Some(2));
        assert!(!set.contains(&DimValue::from(2018)));
    }

    #[test]
    fn test_domains_from_records() {
        let records = vec![
            ThreatRecord::new("USA", 2021, 3),
            ThreatRecord::new("China", 2020, 5),
            ThreatRecord {
                country: Some("India".to_string()),
                year: None,
                severity: Some(7),
            },
        ];
        let domains = Domains::from_records(&records);

        let countries = domains.get(Dimension::Country);
        assert_eq!(
            countries.values(),
            &[
                DimValue::from("China"),
                DimValue::from("India"),
                DimValue::from("USA")
            ]
        );
        assert_eq!(domains.get(Dimension::Year).len(), 2);
        assert_eq!(domains.get(Dimension::Severity).len(), 2);
    }

    #[test]
    fn test_union_keeps_old_values() {
        let before = Domains::from_records(&[
            ThreatRecord::new("USA", 2020, 1),
            ThreatRecord::new("USA", 2021, 1),
        ]);
        let after = Domains::from_records(&[ThreatRecord::new("China", 2020, 4)]);
        let merged = before.union(&after);
        assert_eq!(merged.get(Dimension::Year).len(), 2);
        assert_eq!(merged.get(Dimension::Country).len(), 2);
        assert_eq!(merged.get(Dimension::Severity).len(), 2);
        assert_eq!(merged.union(&after), merged);
    }

    #[test]
    fn test_empty_domains() {
        let domains = Domains::from_records(&[]);
        assert!(domains.is_empty());
        assert!(domains.get(Dimension::Year).is_empty());
    }
}
