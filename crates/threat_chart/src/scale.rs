//! Scale builder: categorical bands, niced magnitude axis and stable colors.

pub mod band;
pub mod color;
pub mod linear;

pub use band::BandScale;
pub use color::ColorScale;
pub use linear::LinearScale;

use crate::{
    aggregate::GroupedRow,
    chart::ChartSpec,
    color::Rgb,
    config::ChartLayout,
    constants::MAGNITUDE_TICKS,
    domain::Domains,
};

/// Every scale a chart needs for one data set
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    pub outer: BandScale,
    pub inner: BandScale,
    pub magnitude: LinearScale,
    pub color: ColorScale,
}

impl Scales {
    /// y coordinate of the zero line
    pub fn baseline(&self) -> f64 {
        self.magnitude.map(0.0)
    }
}

/// Derives the scales of `spec` from `rows` and the task's full domains.
///
/// Band and color domains come from `domains`, not from `rows`, so a facet
/// that lacks some country still reserves its slot and color.
pub fn build_scales(
    rows: &[GroupedRow],
    domains: &Domains,
    spec: &ChartSpec,
    layout: &ChartLayout,
    palette: &[Rgb],
) -> Scales {
    let outer = BandScale::new(
        domains.get(spec.outer),
        (layout.margin.left, layout.width - layout.margin.right),
    )
    .padding_inner(layout.outer_padding);

    let inner = BandScale::new(domains.get(spec.inner), (0.0, outer.bandwidth()))
        .padding(layout.inner_padding);

    let max_count = rows.iter().map(|r| r.count).max().unwrap_or(0) as f64;
    let magnitude = LinearScale::new(
        (0.0, max_count),
        (layout.height - layout.margin.bottom, layout.margin.top),
    )
    .nice(MAGNITUDE_TICKS);

    let color = ColorScale::new(domains.get(spec.color), palette.to_vec());

    Scales {
        outer,
        inner,
        magnitude,
        color,
    }
}
