use std::time::Duration;

/// Severity range accepted from providers
pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 5;

/// Chart canvas (px)
pub const CHART_WIDTH: f64 = 600.0;
pub const AGGREGATE_HEIGHT: f64 = 400.0;
pub const FACET_HEIGHT: f64 = 300.0;

/// Margins (px)
pub const MARGIN_TOP: f64 = 50.0;
pub const MARGIN_RIGHT: f64 = 120.0; // legend lives here
pub const AGGREGATE_MARGIN_BOTTOM: f64 = 50.0;
pub const FACET_MARGIN_BOTTOM: f64 = 40.0;
pub const MARGIN_LEFT: f64 = 60.0;

/// Band padding ratios
pub const OUTER_PADDING_INNER: f64 = 0.1;
pub const INNER_PADDING: f64 = 0.05;

/// Number of ticks requested from the magnitude scale
pub const MAGNITUDE_TICKS: usize = 10;

/// Transition length for every bar attribute
pub const TRANSITION_DURATION: Duration = Duration::from_millis(600);

/// Tooltip offset from the pointer (px)
pub const TOOLTIP_OFFSET: (f64, f64) = (10.0, 0.0);

/// Legend layout (px)
pub const LEGEND_SWATCH: f64 = 15.0;
pub const LEGEND_SPACING: f64 = 20.0;
pub const LEGEND_GAP: f64 = 20.0; // from the plot's right edge

/// Set2 qualitative palette
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

/// Fill for values outside the color domain
pub const UNKNOWN_FILL: &str = "#cccccc";

/// Chart titles
pub const AGGREGATE_TITLE: &str = "Countries vs No. of Threats per Year";
pub const NO_DATA_TEXT: &str = "No data";
