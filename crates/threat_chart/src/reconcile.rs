//! Keyed enter/update/exit reconciliation of bars.
//!
//! [`compute_required_set`] turns rows into target bar attributes,
//! [`reconcile`] diffs them against the current [`ElementStore`] and
//! [`ElementStore::apply`] schedules the resulting transitions.

pub mod store;
pub mod tween;

pub use store::{ElementStore, Phase, VisualElement};
pub use tween::{Easing, Interpolate, Timing, Tween};

use std::collections::BTreeMap;

use crate::{
    aggregate::{CompositeKey, GroupedRow},
    chart::ChartSpec,
    color::Rgb,
    filter::FilterState,
    scale::Scales,
};

const ATTR_EPSILON: f64 = 1e-6;

/// Drawn attributes of one bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarAttrs {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgb,
}

impl BarAttrs {
    /// Same slot, zero height on the zero line
    pub fn collapsed(&self, baseline: f64) -> Self {
        Self {
            y: baseline,
            height: 0.0,
            ..*self
        }
    }

    pub fn approx_eq(&self, other: &Self) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= ATTR_EPSILON;
        close(self.x, other.x)
            && close(self.y, other.y)
            && close(self.width, other.width)
            && close(self.height, other.height)
            && self.fill == other.fill
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && x >= self.x
            && x <= self.x + self.width
            && y >= self.y
            && y <= self.y + self.height
    }
}

impl Interpolate for BarAttrs {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            x: Interpolate::lerp(&self.x, &to.x, t),
            y: Interpolate::lerp(&self.y, &to.y, t),
            width: Interpolate::lerp(&self.width, &to.width, t),
            height: Interpolate::lerp(&self.height, &to.height, t),
            fill: self.fill.lerp(to.fill, t),
        }
    }
}

/// Target of one bar for the current rows, scales and filter
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredElement {
    pub target: BarAttrs,
    pub row: GroupedRow,
    /// false when the filter hides the bar
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequiredSet {
    pub baseline: f64,
    pub elements: BTreeMap<CompositeKey, RequiredElement>,
}

impl RequiredSet {
    pub fn get(&self, key: &CompositeKey) -> Option<&RequiredElement> {
        self.elements.get(key)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Computes the bar every row needs.
///
/// Filtering never drops a row: a hidden row keeps its slot and only its
/// target collapses to the zero line, so re-activating it restores the same
/// bar without re-aggregating.
pub fn compute_required_set(
    rows: &[GroupedRow],
    scales: &Scales,
    filter: &FilterState,
    spec: &ChartSpec,
) -> RequiredSet {
    let baseline = scales.baseline();
    let mut elements = BTreeMap::new();

    for row in rows {
        let (Some(outer), Some(inner)) = (row.value(spec.outer), row.value(spec.inner)) else {
            continue;
        };
        let (Some(x0), Some(x1)) = (scales.outer.position(outer), scales.inner.position(inner))
        else {
            log::debug!("row {} outside the chart domains, skipped", row.key);
            continue;
        };
        let Some(color_value) = row.value(spec.color) else {
            continue;
        };

        let y = scales.magnitude.map(row.count as f64);
        let full = BarAttrs {
            x: x0 + x1,
            y,
            width: scales.inner.bandwidth(),
            height: baseline - y,
            fill: scales.color.color(color_value),
        };
        let active = filter.is_row_active(row);
        let target = if active {
            full
        } else {
            full.collapsed(baseline)
        };

        elements.insert(
            row.key.clone(),
            RequiredElement {
                target,
                row: row.clone(),
                active,
            },
        );
    }

    RequiredSet { baseline, elements }
}

/// One entry of a reconciliation delta
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// key is new
    Enter {
        key: CompositeKey,
        target: BarAttrs,
        row: GroupedRow,
        active: bool,
    },
    /// target or bound row changed (also revives an exiting bar)
    Update {
        key: CompositeKey,
        target: BarAttrs,
        row: GroupedRow,
        active: bool,
    },
    /// nothing to do
    Keep { key: CompositeKey },
    /// key is gone
    Exit { key: CompositeKey },
}

impl Change {
    pub fn key(&self) -> &CompositeKey {
        match self {
            Change::Enter { key, .. }
            | Change::Update { key, .. }
            | Change::Keep { key }
            | Change::Exit { key } => key,
        }
    }
}

/// Changes needed to move a store to a required set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    pub baseline: f64,
    pub changes: Vec<Change>,
}

impl Delta {
    pub fn created(&self) -> impl Iterator<Item = &CompositeKey> {
        self.changes.iter().filter_map(|c| match c {
            Change::Enter { key, .. } => Some(key),
            _ => None,
        })
    }

    pub fn updated(&self) -> impl Iterator<Item = &CompositeKey> {
        self.changes.iter().filter_map(|c| match c {
            Change::Update { key, .. } => Some(key),
            _ => None,
        })
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &CompositeKey> {
        self.changes.iter().filter_map(|c| match c {
            Change::Keep { key } => Some(key),
            _ => None,
        })
    }

    pub fn removed(&self) -> impl Iterator<Item = &CompositeKey> {
        self.changes.iter().filter_map(|c| match c {
            Change::Exit { key } => Some(key),
            _ => None,
        })
    }

    pub fn is_noop(&self) -> bool {
        self.changes.iter().all(|c| matches!(c, Change::Keep { .. }))
    }
}

/// Diffs the current bars against the required set by key.
pub fn reconcile(previous: &ElementStore, required: &RequiredSet) -> Delta {
    let mut changes = Vec::with_capacity(required.len());

    for (key, req) in &required.elements {
        let change = match previous.get(key) {
            None => Change::Enter {
                key: key.clone(),
                target: req.target,
                row: req.row.clone(),
                active: req.active,
            },
            Some(el)
                if el.phase() != Phase::Exiting
                    && el.is_active() == req.active
                    && el.target().approx_eq(&req.target)
                    && el.row() == &req.row =>
            {
                Change::Keep { key: key.clone() }
            }
            Some(_) => Change::Update {
                key: key.clone(),
                target: req.target,
                row: req.row.clone(),
                active: req.active,
            },
        };
        changes.push(change);
    }

    for el in previous.iter() {
        if el.phase() != Phase::Exiting && !required.elements.contains_key(el.key()) {
            changes.push(Change::Exit {
                key: el.key().clone(),
            });
        }
    }

    Delta {
        baseline: required.baseline,
        changes,
    }
}

impl ElementStore {
    /// Diffs against `required` and applies the result at `now`
    pub fn reconcile_to(&mut self, required: &RequiredSet, now: std::time::Duration) -> Delta {
        let delta = reconcile(self, required);
        log::debug!(
            "reconcile: {} created, {} updated, {} unchanged, {} removed",
            delta.created().count(),
            delta.updated().count(),
            delta.unchanged().count(),
            delta.removed().count()
        );
        self.apply(&delta, now);
        delta
    }
}
