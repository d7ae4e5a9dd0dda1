use std::io::Write;

use super::svg_utils::{format_number, html_encode};
use crate::{
    constants::MAGNITUDE_TICKS,
    scale::{BandScale, LinearScale},
};

const TICK_SIZE: f64 = 6.0;

/// Bottom axis with one label per band
pub fn draw_band_axis<W: Write>(w: &mut W, scale: &BandScale, y: f64) -> std::io::Result<()> {
    let (r0, r1) = scale.range();
    writeln!(w, r#"<g class="x-axis" transform="translate(0, {})">"#, y)?;
    writeln!(
        w,
        r##"<path d="M{:.2},0H{:.2}" stroke="#000" fill="none"/>"##,
        r0, r1
    )?;
    for value in scale.domain().iter() {
        let Some(pos) = scale.position(value) else {
            continue;
        };
        let cx = pos + scale.bandwidth() / 2.0;
        writeln!(
            w,
            r##"<line x1="{cx:.2}" x2="{cx:.2}" y1="0" y2="{t}" stroke="#000"/>"##,
            cx = cx,
            t = TICK_SIZE
        )?;
        writeln!(
            w,
            r##"<text x="{:.2}" y="{:.2}" font-family="Arial, sans-serif" font-size="10px" text-anchor="middle" fill="#000">{}</text>"##,
            cx,
            TICK_SIZE + 12.0,
            html_encode(&value.to_string())
        )?;
    }
    writeln!(w, "</g>")
}

/// Left axis with round ticks
pub fn draw_linear_axis<W: Write>(w: &mut W, scale: &LinearScale, x: f64) -> std::io::Result<()> {
    let (r0, r1) = scale.range();
    writeln!(w, r#"<g class="y-axis" transform="translate({}, 0)">"#, x)?;
    writeln!(
        w,
        r##"<path d="M0,{:.2}V{:.2}" stroke="#000" fill="none"/>"##,
        r0, r1
    )?;
    for tick in scale.ticks(MAGNITUDE_TICKS) {
        let y = scale.map(tick);
        writeln!(
            w,
            r##"<line x1="-{t}" x2="0" y1="{y:.2}" y2="{y:.2}" stroke="#000"/>"##,
            t = TICK_SIZE,
            y = y
        )?;
        writeln!(
            w,
            r##"<text x="-{:.2}" y="{:.2}" font-family="Arial, sans-serif" font-size="10px" text-anchor="end" dominant-baseline="middle" fill="#000">{}</text>"##,
            TICK_SIZE + 3.0,
            y,
            format_number(tick)
        )?;
    }
    writeln!(w, "</g>")
}
