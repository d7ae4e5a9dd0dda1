use std::io::Write;

use super::svg_utils::html_encode;
use crate::{
    color::Rgb,
    constants::{LEGEND_SPACING, LEGEND_SWATCH},
    scale::ColorScale,
};

/// One swatch/label row
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    /// offset below the legend origin
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

/// 凡例: one entry per color domain value, in domain order
pub fn build_legend(color: &ColorScale, title: &str) -> Legend {
    let entries = color
        .domain()
        .iter()
        .enumerate()
        .map(|(i, value)| LegendEntry {
            label: value.to_string(),
            color: color.color(value),
            offset_y: (i + 1) as f64 * LEGEND_SPACING,
        })
        .collect();
    Legend {
        title: title.to_string(),
        entries,
    }
}

/// 絶対座標で凡例を描画
pub fn draw_legend<W: Write>(w: &mut W, legend: &Legend, x0: f64, y0: f64) -> std::io::Result<()> {
    writeln!(w, r#"<g class="legend" transform="translate({}, {})">"#, x0, y0)?;
    writeln!(
        w,
        r##"<text class="legend-title" x="0" y="0" font-family="Arial, sans-serif" font-size="14px" font-weight="bold" fill="#000">{}</text>"##,
        html_encode(&legend.title)
    )?;
    for entry in &legend.entries {
        writeln!(
            w,
            r#"<g class="legend-item" transform="translate(0, {})">"#,
            entry.offset_y
        )?;
        writeln!(
            w,
            r#"<rect x="0" width="{size}" height="{size}" fill="{fill}"/>"#,
            size = LEGEND_SWATCH,
            fill = entry.color
        )?;
        writeln!(
            w,
            r##"<text x="{x}" y="{y}" font-family="Arial, sans-serif" font-size="12px" fill="#000">{label}</text>"##,
            x = LEGEND_SWATCH + 5.0,
            y = LEGEND_SWATCH - 3.0,
            label = html_encode(&entry.label)
        )?;
        writeln!(w, "</g>")?;
    }
    writeln!(w, "</g>")?;
    Ok(())
}
