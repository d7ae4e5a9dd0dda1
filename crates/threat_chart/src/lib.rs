pub mod aggregate;
pub mod chart;
pub mod color;
pub mod config;
pub mod constants;
pub mod csv_reader;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod filter;
pub mod interaction;
pub mod reconcile;
pub mod record;
pub mod scale;
pub mod task_source;
pub mod visualization;

pub use aggregate::{Aggregation, CompositeKey, GroupedRow, aggregate, aggregate_with_report};
pub use chart::{BarChart, ChartSpec};
pub use color::Rgb;
pub use config::{ChartLayout, Config};
pub use constants::{AGGREGATE_TITLE, MAX_SEVERITY, MIN_SEVERITY, NO_DATA_TEXT};
pub use csv_reader::{read_records, read_records_from_reader, read_records_json_from_reader};
pub use dashboard::{ChartId, DashboardUpdate, TaskDashboard};
pub use domain::{DomainSet, Domains};
pub use error::ChartError;
pub use filter::FilterState;
pub use interaction::{HoverEvent, InteractionLayer, Point, Tooltip};
pub use reconcile::{
    BarAttrs, Change, Delta, ElementStore, Phase, RequiredSet, Timing, compute_required_set,
    reconcile,
};
pub use record::{DimValue, Dimension, ThreatRecord};
pub use scale::{BandScale, ColorScale, LinearScale, Scales, build_scales};
pub use task_source::{DirectoryTaskSource, TaskSource};
