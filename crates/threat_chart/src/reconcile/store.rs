use std::{collections::BTreeMap, time::Duration};

use super::{
    BarAttrs, Change, Delta,
    tween::{Timing, Tween},
};
use crate::aggregate::{CompositeKey, GroupedRow};

/// Lifecycle of a bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Present,
    Updating,
    Exiting,
}

/// A bar owned by the store, bound to one grouped row
#[derive(Debug, Clone, PartialEq)]
pub struct VisualElement {
    key: CompositeKey,
    row: GroupedRow,
    phase: Phase,
    /// false while the filter hides the bar
    active: bool,
    tween: Tween<BarAttrs>,
}

impl VisualElement {
    pub fn key(&self) -> &CompositeKey {
        &self.key
    }

    pub fn row(&self) -> &GroupedRow {
        &self.row
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Attributes the bar is heading to
    pub fn target(&self) -> &BarAttrs {
        self.tween.to()
    }

    /// Attributes as drawn at `now`
    pub fn attrs_at(&self, now: Duration) -> BarAttrs {
        self.tween.value_at(now)
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        !self.tween.is_finished(now)
    }
}

/// Keyed set of bars of one chart.
///
/// Mutated only through [`ElementStore::apply`] and [`ElementStore::tick`].
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: BTreeMap<CompositeKey, VisualElement>,
    timing: Timing,
}

impl ElementStore {
    pub fn new(timing: Timing) -> Self {
        Self {
            elements: BTreeMap::new(),
            timing,
        }
    }

    /// Schedules the transitions of `delta` starting at `now`.
    ///
    /// Every transition starts from the value currently drawn, so a pass that
    /// lands mid-animation bends the running transition instead of jumping.
    pub fn apply(&mut self, delta: &Delta, now: Duration) {
        let baseline = delta.baseline;
        for change in &delta.changes {
            match change {
                Change::Enter {
                    key,
                    target,
                    row,
                    active,
                }
                | Change::Update {
                    key,
                    target,
                    row,
                    active,
                } => {
                    match self.elements.get_mut(key) {
                        Some(el) => {
                            el.row = row.clone();
                            el.active = *active;
                            if el.phase == Phase::Exiting || !el.tween.to().approx_eq(target) {
                                el.tween.retarget(*target, now);
                                el.phase = Phase::Updating;
                            }
                        }
                        None => {
                            let tween =
                                Tween::new(target.collapsed(baseline), *target, now, self.timing);
                            self.elements.insert(
                                key.clone(),
                                VisualElement {
                                    key: key.clone(),
                                    row: row.clone(),
                                    phase: Phase::Entering,
                                    active: *active,
                                    tween,
                                },
                            );
                        }
                    }
                }
                Change::Keep { .. } => {}
                Change::Exit { key } => {
                    if let Some(el) = self.elements.get_mut(key)
                        && el.phase != Phase::Exiting
                    {
                        let collapsed = el.attrs_at(now).collapsed(baseline);
                        el.tween.retarget(collapsed, now);
                        el.phase = Phase::Exiting;
                    }
                }
            }
        }
    }

    /// Settles finished transitions and drops bars whose exit completed.
    /// Returns the removed keys.
    pub fn tick(&mut self, now: Duration) -> Vec<CompositeKey> {
        let mut removed = Vec::new();
        self.elements.retain(|key, el| {
            if el.is_animating(now) {
                return true;
            }
            match el.phase {
                Phase::Exiting => {
                    removed.push(key.clone());
                    false
                }
                _ => {
                    el.phase = Phase::Present;
                    true
                }
            }
        });
        removed
    }

    /// Top-most live, unfiltered bar under `(x, y)` at `now`
    pub fn hit_test(&self, x: f64, y: f64, now: Duration) -> Option<&VisualElement> {
        self.elements
            .values()
            .rev()
            .filter(|el| el.active && el.phase != Phase::Exiting)
            .find(|el| el.attrs_at(now).contains(x, y))
    }

    pub fn get(&self, key: &CompositeKey) -> Option<&VisualElement> {
        self.elements.get(key)
    }

    /// Bars in draw order
    pub fn iter(&self) -> impl Iterator<Item = &VisualElement> {
        self.elements.values()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Bars that are not on their way out
    pub fn live_count(&self) -> usize {
        self.elements
            .values()
            .filter(|el| el.phase != Phase::Exiting)
            .count()
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.elements.values().any(|el| el.is_animating(now))
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }
}
