mod config;
mod error;
mod export;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};
use threat_chart::{
    ChartId, Config as ChartConfig, DirectoryTaskSource, HoverEvent, TaskDashboard, TaskSource,
};

use crate::script::{ToggleStep, frame_times, parse_point};

#[derive(Parser)]
#[command(author, version, about = "Render threat task dashboards as SVG animation frames", long_about = None)]
struct Args {
    /// Directory holding `<task>.csv` / `<task>.json` files
    #[arg(short = 'd', long = "data", default_value = "tasks")]
    data_dir: PathBuf,

    /// Task to render; lists available tasks when omitted
    #[arg(short = 't', long = "task")]
    task: Option<String>,

    /// Chart configuration file path
    #[arg(short = 'c', long = "config", default_value = "config/threat_chart.toml")]
    config: PathBuf,

    /// Legend click applied after the previous transition, e.g. `country=USA`
    #[arg(long = "toggle")]
    toggles: Vec<String>,

    /// Pointer position `x,y` on the aggregate chart for a final tooltip frame
    #[arg(long = "hover")]
    hover: Option<String>,

    /// Frames per transition
    #[arg(short = 'f', long = "frames", default_value_t = 6)]
    frames: u32,
}

fn main() -> Result<()> {
    // RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    let viewer_config = config::Config::from_env()?;

    match run(&args, &viewer_config) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Error: {e}");

            use std::io::ErrorKind;
            for cause in e.chain() {
                if let Some(ioe) = cause.downcast_ref::<std::io::Error>() {
                    match ioe.kind() {
                        ErrorKind::PermissionDenied => {
                            error!(
                                "Hint: Run in a writable directory or set THREAT_VIEWER_OUTPUT_DIR."
                            );
                            break;
                        }
                        ErrorKind::NotFound => {
                            error!("Hint: Check the --data directory and task name.");
                            break;
                        }
                        _ => {}
                    }
                }
            }
            let _ = std::io::stderr().flush();
            std::process::exit(1);
        }
    }
}

fn run(args: &Args, viewer_config: &config::Config) -> Result<()> {
    let chart_config = if args.config.exists() {
        ChartConfig::load_from_file(&args.config)?
    } else {
        warn!(
            "Config file not found: {}, using default settings",
            args.config.display()
        );
        ChartConfig::default()
    };

    let toggles = args
        .toggles
        .iter()
        .map(|s| s.parse::<ToggleStep>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let hover = args.hover.as_deref().map(parse_point).transpose()?;

    let source = DirectoryTaskSource::new(&args.data_dir)
        .with_context(|| format!("Cannot open task directory {}", args.data_dir.display()))?;

    let Some(task) = args.task.as_deref() else {
        let names = source.list_task_names()?;
        if names.is_empty() {
            info!("No tasks found in {}", args.data_dir.display());
        } else {
            info!("Available tasks:");
            for name in names {
                info!("  {name}");
            }
        }
        return Ok(());
    };

    let records = source.task_records(task)?;
    let transition = chart_config.timing().duration;
    let mut dashboard = TaskDashboard::new(chart_config)?;

    let update = dashboard.load_task(task, records, Duration::ZERO);
    info!(
        "Task '{}': {} aggregate bars, {} severity facets",
        task,
        update.aggregate.created().count(),
        update.facets.len()
    );
    if update.dropped_records > 0 {
        warn!(
            "{} records are missing country, year or severity",
            update.dropped_records
        );
    }

    let out_dir = export::create_run_dir(&viewer_config.output_dir, task)?;
    debug!("Exporting frames to {}", out_dir.display());

    let mut start = Duration::ZERO;
    let mut frame = render_transition(&mut dashboard, &out_dir, 0, start, transition, args.frames)?;

    for step in &toggles {
        start += transition;
        let changed = dashboard.toggle_dimension(step.dimension, &step.value, start);
        if changed == 0 {
            warn!(
                "{}={} matches no chart filter, skipped",
                step.dimension, step.value
            );
            continue;
        }
        info!(
            "Toggled {}={} on {} chart(s)",
            step.dimension, step.value, changed
        );
        frame = render_transition(&mut dashboard, &out_dir, frame, start, transition, args.frames)?;
    }

    if let Some(pointer) = hover {
        let now = start + transition;
        let chart = dashboard
            .chart_mut(ChartId::Aggregate)
            .context("aggregate chart missing")?;
        match chart.pointer_move(pointer, now) {
            HoverEvent::Entered(key) | HoverEvent::Moved(key) => {
                info!("Hovering {key}");
                export::export_dashboard_frame(&dashboard, &out_dir, frame, now)?;
                frame += 1;
            }
            _ => warn!("No bar under pointer ({}, {})", pointer.x, pointer.y),
        }
    }

    info!("{} frames saved to: {}", frame, out_dir.display());
    Ok(())
}

/// Exports one transition; returns the next frame index
fn render_transition(
    dashboard: &mut TaskDashboard,
    out_dir: &Path,
    mut frame: usize,
    start: Duration,
    transition: Duration,
    frames: u32,
) -> Result<usize> {
    for now in frame_times(start, transition, frames) {
        let removed = dashboard.tick(now);
        if removed > 0 {
            debug!("{removed} bars removed at {:?}", now);
        }
        export::export_dashboard_frame(dashboard, out_dir, frame, now)?;
        frame += 1;
    }
    Ok(frame)
}
