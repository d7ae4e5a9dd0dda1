use crate::error::{Result, ViewerError};
use chrono::Local;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};
use threat_chart::{ChartId, TaskDashboard};

/// Creates `<output_dir>/<task>_<timestamp>` for one viewer run
pub fn create_run_dir(output_dir: &Path, task: &str) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let dir = output_dir.join(format!("{}_{timestamp}", sanitize(task)));
    std::fs::create_dir_all(&dir).map_err(|e| ViewerError::CreateDir {
        path: dir.clone(),
        source: e,
    })?;
    Ok(dir)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Writes `<chart>_<frame>.svg` for one chart
pub fn write_frame(dir: &Path, id: ChartId, frame: usize, svg: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{id}_{frame:03}.svg"));
    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(svg.as_bytes())?;
        writer.flush()
    };
    write().map_err(|e| ViewerError::WriteFile {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

/// Writes every chart of the dashboard as drawn at `now`
pub fn export_dashboard_frame(
    dashboard: &TaskDashboard,
    dir: &Path,
    frame: usize,
    now: Duration,
) -> Result<Vec<PathBuf>> {
    dashboard
        .charts()
        .map(|(id, chart)| {
            let svg = chart.to_svg(now)?;
            write_frame(dir, id, frame, &svg)
        })
        .collect()
}
