use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::pipeline::{rasterize, render};
use crate::types::chart::{OutputConfig, RenderOptions};
use crate::types::report::Report;

pub const REPORT_FILE: &str = "report.json";

/// Writes `report.json` and, when `charts` is set, one PNG per chart into `dir`.
/// Returns the written paths in order.
pub fn write_report(
    report: &Report,
    dir: &Path,
    charts: Option<&RenderOptions>,
) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let report_path = dir.join(REPORT_FILE);
    fs::write(&report_path, serde_json::to_vec_pretty(report)?)?;
    written.push(report_path);

    let Some(options) = charts else {
        return Ok(written);
    };

    let output = OutputConfig {
        width: options.width,
        height: options.height,
        background: Some((255, 255, 255, 255)),
    };

    for (name, chart) in render::report_charts(report) {
        let svg = render::render_svg(&chart, options)?;
        let png = rasterize::rasterize(&svg, &output)?;
        let path = dir.join(format!("{}.png", name));
        fs::write(&path, png)?;
        tracing::debug!("Wrote chart {}", path.display());
        written.push(path);
    }

    tracing::info!("Wrote {} report files to {}", written.len(), dir.display());
    Ok(written)
}
