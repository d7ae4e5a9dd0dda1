use std::time::Duration;

use crate::{
    aggregate::{CompositeKey, GroupedRow},
    constants::TOOLTIP_OFFSET,
    reconcile::{ElementStore, Phase},
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    pub visible: bool,
    pub position: Point,
    pub lines: Vec<String>,
}

/// What a pointer update did to the hover state
#[derive(Debug, Clone, PartialEq)]
pub enum HoverEvent {
    Entered(CompositeKey),
    Moved(CompositeKey),
    Left(CompositeKey),
    Idle,
}

/// Hover tracking for one chart.
///
/// Hit-tests the pointer against the store instead of holding per-bar
/// callbacks, so a bar that exits can never stay hovered.
#[derive(Debug, Clone, Default)]
pub struct InteractionLayer {
    hovered: Option<CompositeKey>,
    tooltip: Tooltip,
}

impl InteractionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_move(
        &mut self,
        store: &ElementStore,
        pointer: Point,
        now: Duration,
    ) -> HoverEvent {
        let Some(el) = store.hit_test(pointer.x, pointer.y, now) else {
            return self.pointer_leave();
        };

        let key = el.key().clone();
        let event = if self.hovered.as_ref() == Some(&key) {
            HoverEvent::Moved(key.clone())
        } else {
            HoverEvent::Entered(key.clone())
        };

        self.hovered = Some(key);
        self.tooltip.visible = true;
        self.tooltip.position =
            Point::new(pointer.x + TOOLTIP_OFFSET.0, pointer.y + TOOLTIP_OFFSET.1);
        self.tooltip.lines = tooltip_lines(el.row());
        event
    }

    pub fn pointer_leave(&mut self) -> HoverEvent {
        self.tooltip.visible = false;
        match self.hovered.take() {
            Some(key) => HoverEvent::Left(key),
            None => HoverEvent::Idle,
        }
    }

    /// Drops the hover when its bar is gone, exiting or hidden by the
    /// filter; otherwise refreshes the text from the (possibly rebound) row.
    pub fn sync(&mut self, store: &ElementStore) -> HoverEvent {
        let Some(key) = self.hovered.as_ref() else {
            return HoverEvent::Idle;
        };
        match store.get(key) {
            Some(el) if el.phase() != Phase::Exiting && el.is_active() => {
                self.tooltip.lines = tooltip_lines(el.row());
                HoverEvent::Idle
            }
            _ => self.pointer_leave(),
        }
    }

    pub fn hovered(&self) -> Option<&CompositeKey> {
        self.hovered.as_ref()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }
}

/// `Country: China`, `Year: 2020`, ..., `Threats: 2`
pub fn tooltip_lines(row: &GroupedRow) -> Vec<String> {
    row.key
        .parts()
        .iter()
        .map(|(dim, value)| format!("{}: {}", dim, value))
        .chain(std::iter::once(format!("Threats: {}", row.count)))
        .collect()
}
