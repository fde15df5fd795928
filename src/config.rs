use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_INPUT: &str = "data/workouts.csv";

#[derive(Debug, Parser)]
#[command(
    name = "workout-timeline",
    about = "Enrich workout logs with per-user adjacency and write the analysis report"
)]
pub struct Args {
    /// Workouts CSV to analyse
    #[arg(env = "WORKOUTS_CSV", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub report_dir: PathBuf,
    pub threshold_minutes: f64,
    pub gap_cdf_max_minutes: f64,
    pub chart_width: u32,
    pub chart_height: u32,
    pub render_charts: bool,
    pub chart_palette: String,
}

impl Config {
    pub fn from_env() -> Self {
        let report_dir = std::env::var("REPORT_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "report".to_string());

        let threshold_minutes = std::env::var("ADJACENCY_THRESHOLD_MINUTES")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(10.0);

        let gap_cdf_max_minutes = std::env::var("GAP_CDF_MAX_MINUTES")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(120.0);

        let chart_width = std::env::var("CHART_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1200);

        let chart_height = std::env::var("CHART_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(700);

        let render_charts = std::env::var("RENDER_CHARTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        let chart_palette = std::env::var("CHART_PALETTE").unwrap_or_else(|_| "ember".to_string());

        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            report_dir: PathBuf::from(report_dir),
            threshold_minutes,
            gap_cdf_max_minutes,
            chart_width,
            chart_height,
            render_charts,
            chart_palette,
        }
    }

    /// Environment settings with the input path taken from the command line.
    pub fn from_args(args: Args) -> Self {
        Self {
            input_path: args.input,
            ..Self::from_env()
        }
    }
}
