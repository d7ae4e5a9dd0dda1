use std::{cmp::Ordering, fmt};
use strum_macros::{Display, EnumIter, EnumString};

use crate::constants::{MAX_SEVERITY, MIN_SEVERITY};

/// Categorical dimension of a threat record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Dimension {
    Country,
    Year,
    Severity,
}

/// A single dimension value.
///
/// Integers order numerically and text orders lexicographically, so a domain
/// built from years reads `2019, 2020, 2100` rather than string order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DimValue {
    Int(i64),
    Text(String),
}

impl DimValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DimValue::Int(n) => Some(*n),
            DimValue::Text(_) => None,
        }
    }

    /// Parses a user supplied value for `dim` (e.g. a `--toggle` argument)
    pub fn parse_for(dim: Dimension, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match dim {
            Dimension::Country => Some(DimValue::Text(raw.to_string())),
            Dimension::Year | Dimension::Severity => raw.parse().ok().map(DimValue::Int),
        }
    }
}

impl Ord for DimValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DimValue::Int(a), DimValue::Int(b)) => a.cmp(b),
            (DimValue::Text(a), DimValue::Text(b)) => a.cmp(b),
            (DimValue::Int(_), DimValue::Text(_)) => Ordering::Less,
            (DimValue::Text(_), DimValue::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for DimValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimValue::Int(n) => write!(f, "{}", n),
            DimValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for DimValue {
    fn from(s: &str) -> Self {
        DimValue::Text(s.to_string())
    }
}

impl From<String> for DimValue {
    fn from(s: String) -> Self {
        DimValue::Text(s)
    }
}

impl From<i64> for DimValue {
    fn from(n: i64) -> Self {
        DimValue::Int(n)
    }
}

impl From<i32> for DimValue {
    fn from(n: i32) -> Self {
        DimValue::Int(n.into())
    }
}

impl From<u8> for DimValue {
    fn from(n: u8) -> Self {
        DimValue::Int(n.into())
    }
}

/// Raw threat record of a task.
///
/// Fields stay optional so that rows with broken cells survive loading and are
/// dropped (and counted) by the aggregator instead of failing the whole task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreatRecord {
    pub country: Option<String>,
    pub year: Option<i32>,
    pub severity: Option<u8>,
}

impl ThreatRecord {
    pub fn new(country: impl Into<String>, year: i32, severity: u8) -> Self {
        Self {
            country: Some(country.into()),
            year: Some(year),
            severity: Some(severity),
        }
    }

    /// Value of `dim`, or `None` when the field is missing or out of range
    pub fn value(&self, dim: Dimension) -> Option<DimValue> {
        match dim {
            Dimension::Country => self
                .country
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(DimValue::from),
            Dimension::Year => self.year.map(DimValue::from),
            Dimension::Severity => self
                .severity
                .filter(|s| (MIN_SEVERITY..=MAX_SEVERITY).contains(s))
                .map(DimValue::from),
        }
    }
}
