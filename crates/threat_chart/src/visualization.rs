//! SVG snapshots of charts.
//!
//! Axes, title and legend are regenerated on every frame; only bars carry
//! identity across frames.

pub mod axis;
pub mod legend;
pub mod svg_utils;

pub use legend::{Legend, LegendEntry, build_legend, draw_legend};
pub use svg_utils::html_encode;

use std::{io::Write, time::Duration};

use crate::{
    chart::BarChart,
    constants::{LEGEND_GAP, NO_DATA_TEXT},
    error::Result,
    reconcile::Phase,
};

/// Writes `chart` as drawn at `now` as a standalone SVG document
pub fn render_chart_svg<W: Write>(w: &mut W, chart: &BarChart, now: Duration) -> Result<()> {
    let layout = chart.layout();
    let (width, height) = (layout.width, layout.height);
    let margin = layout.margin;

    writeln!(
        w,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;
    writeln!(
        w,
        r##"<rect x="0" y="0" width="{}" height="{}" fill="#fff"/>"##,
        width, height
    )?;

    // タイトル
    writeln!(
        w,
        r##"<text x="{:.2}" y="{:.2}" font-family="Arial, sans-serif" font-size="16px" font-weight="bold" text-anchor="middle" fill="#000">{}</text>"##,
        width / 2.0,
        margin.top / 1.3,
        html_encode(&chart.spec().title)
    )?;

    if !chart.has_data() && chart.elements().is_empty() {
        writeln!(
            w,
            r##"<text x="{:.2}" y="{:.2}" font-family="Arial, sans-serif" font-size="14px" text-anchor="middle" fill="#666">{}</text>"##,
            width / 2.0,
            height / 2.0,
            NO_DATA_TEXT
        )?;
        writeln!(w, "</svg>")?;
        return Ok(());
    }

    let scales = chart.scales();
    axis::draw_band_axis(w, &scales.outer, height - margin.bottom)?;
    axis::draw_linear_axis(w, &scales.magnitude, margin.left)?;

    writeln!(w, r#"<g class="bars">"#)?;
    for el in chart.elements().iter() {
        let a = el.attrs_at(now);
        let class = match el.phase() {
            Phase::Entering => "bar entering",
            Phase::Present => "bar",
            Phase::Updating => "bar updating",
            Phase::Exiting => "bar exiting",
        };
        writeln!(
            w,
            r#"<rect class="{}" data-key="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            class,
            html_encode(&el.key().to_string()),
            a.x,
            a.y,
            a.width,
            a.height.max(0.0),
            a.fill
        )?;
    }
    writeln!(w, "</g>")?;

    draw_legend(
        w,
        &chart.legend(),
        width - margin.right + LEGEND_GAP,
        margin.top,
    )?;

    draw_tooltip(w, chart)?;

    writeln!(w, "</svg>")?;
    Ok(())
}

fn draw_tooltip<W: Write>(w: &mut W, chart: &BarChart) -> std::io::Result<()> {
    let tooltip = chart.tooltip();
    if !tooltip.visible {
        return Ok(());
    }
    let line_h = 16.0;
    let box_w = 12.0
        + 7.0
            * tooltip
                .lines
                .iter()
                .map(|l| l.chars().count())
                .max()
                .unwrap_or(0) as f64;
    let box_h = 12.0 + line_h * tooltip.lines.len() as f64;
    let (x, y) = (tooltip.position.x, tooltip.position.y);

    writeln!(w, r#"<g class="tooltip">"#)?;
    writeln!(
        w,
        r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="4" ry="4" fill="#333"/>"##,
        x, y, box_w, box_h
    )?;
    for (i, line) in tooltip.lines.iter().enumerate() {
        writeln!(
            w,
            r##"<text x="{:.2}" y="{:.2}" font-family="Arial, sans-serif" font-size="12px" fill="#fff">{}</text>"##,
            x + 6.0,
            y + 6.0 + line_h * (i as f64 + 0.75),
            html_encode(line)
        )?;
    }
    writeln!(w, "</g>")
}
