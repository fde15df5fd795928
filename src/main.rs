use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_timeline::config::{Args, Config};
use workout_timeline::error::AppError;
use workout_timeline::pipeline::{enrich, load, output, report};
use workout_timeline::types::chart::RenderOptions;
use workout_timeline::types::palette::Palette;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workout_timeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_args(Args::parse());

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Analysis aborted: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), AppError> {
    tracing::info!("Reading workouts from {}", config.input_path.display());

    let rows = load::load_csv(&config.input_path)?;
    let enrichment = enrich::enrich(&rows);

    let options = report::ReportOptions::from_config(config, rows.len());
    let report = report::build_report(&enrichment, &options);
    report::log_summary(&report);

    let render_options = config.render_charts.then(|| {
        let mut options = RenderOptions::new(config.chart_width, config.chart_height);
        match Palette::get(&config.chart_palette) {
            Some(palette) => options.palette = palette,
            None => tracing::warn!("Unknown palette {:?}, using default", config.chart_palette),
        }
        options
    });
    output::write_report(&report, &config.report_dir, render_options.as_ref())?;

    Ok(())
}
