use std::collections::BTreeSet;

use crate::{
    aggregate::GroupedRow,
    domain::DomainSet,
    record::{DimValue, Dimension},
};

/// Active values of the one dimension a chart lets the user hide.
///
/// `reset` and `toggle` are the only mutators; the active set is always a
/// subset of the current domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    dimension: Dimension,
    domain: DomainSet,
    active: BTreeSet<DimValue>,
}

impl FilterState {
    /// Empty filter; call [`FilterState::reset`] once a task is loaded
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            domain: DomainSet::default(),
            active: BTreeSet::new(),
        }
    }

    /// Adopts `domain` and activates every value in it
    pub fn reset(&mut self, domain: &DomainSet) {
        self.domain = domain.clone();
        self.active = domain.iter().cloned().collect();
    }

    /// Flips `value`. Returns the new state, or `None` if the value is not in
    /// the domain.
    pub fn toggle(&mut self, value: &DimValue) -> Option<bool> {
        if !self.domain.contains(value) {
            log::debug!("ignoring toggle of {} outside the {} domain", value, self.dimension);
            return None;
        }
        if self.active.remove(value) {
            Some(false)
        } else {
            self.active.insert(value.clone());
            Some(true)
        }
    }

    pub fn is_active(&self, value: &DimValue) -> bool {
        self.active.contains(value)
    }

    /// Rows without the filtered dimension are never hidden
    pub fn is_row_active(&self, row: &GroupedRow) -> bool {
        row.value(self.dimension)
            .is_none_or(|value| self.is_active(value))
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn domain(&self) -> &DomainSet {
        &self.domain
    }

    pub fn active_values(&self) -> impl Iterator<Item = &DimValue> {
        self.active.iter()
    }

    pub fn all_active(&self) -> bool {
        self.active.len() == self.domain.len()
    }
}
