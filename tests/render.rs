use workout_timeline::error::RenderError;
use workout_timeline::pipeline::enrich::enrich;
use workout_timeline::pipeline::output::write_report;
use workout_timeline::pipeline::rasterize::rasterize;
use workout_timeline::pipeline::render::{render_svg, report_charts};
use workout_timeline::pipeline::report::{build_report, ReportOptions};
use workout_timeline::types::chart::{Bar, BarChart, CdfChart, Chart, OutputConfig, RenderOptions};
use workout_timeline::types::palette::Palette;
use workout_timeline::types::workout::RawWorkoutRow;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn bar_chart(bars: Vec<Bar>) -> Chart {
    Chart::Bar(BarChart {
        title: "Workouts by discipline".to_string(),
        y_label: "workouts".to_string(),
        bars,
    })
}

#[test]
fn bar_chart_escapes_labels() {
    let chart = bar_chart(vec![
        Bar {
            label: "Cycling".to_string(),
            value: 12.0,
        },
        Bar {
            label: "Spin & Core".to_string(),
            value: 3.0,
        },
    ]);
    let svg = render_svg(&chart, &RenderOptions::new(800, 500)).expect("svg");

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Spin &amp; Core"));
    assert!(!svg.contains("Spin & Core"));
    assert_eq!(svg.matches("<rect").count(), 3);
}

#[test]
fn empty_chart_renders_placeholder() {
    let svg = render_svg(&bar_chart(Vec::new()), &RenderOptions::new(800, 500)).expect("svg");
    assert!(svg.contains("No data"));

    let cdf = Chart::Cdf(CdfChart {
        title: "Gaps".to_string(),
        x_label: "minutes".to_string(),
        x_max: 60.0,
        points: Vec::new(),
    });
    let svg = render_svg(&cdf, &RenderOptions::new(800, 500)).expect("svg");
    assert!(svg.contains("No data"));
}

#[test]
fn cdf_chart_draws_step_path() {
    let chart = Chart::Cdf(CdfChart {
        title: "Gaps".to_string(),
        x_label: "minutes".to_string(),
        x_max: 60.0,
        points: vec![(5.0, 0.5), (15.0, 1.0)],
    });
    let svg = render_svg(&chart, &RenderOptions::new(800, 500)).expect("svg");
    assert!(svg.contains("<path d=\"M"));
    assert!(svg.contains("100%"));
}

#[test]
fn tiny_viewport_is_rejected() {
    let err = render_svg(&bar_chart(Vec::new()), &RenderOptions::new(100, 100)).expect_err("viewport");
    assert!(matches!(err, RenderError::SvgError(_)));
}

#[test]
fn rasterizes_to_png() {
    let options = RenderOptions::new(400, 300);
    let svg = render_svg(
        &bar_chart(vec![Bar {
            label: "Yoga".to_string(),
            value: 1.0,
        }]),
        &options,
    )
    .expect("svg");
    let png = rasterize(
        &svg,
        &OutputConfig {
            width: 400,
            height: 300,
            background: Some((255, 255, 255, 255)),
        },
    )
    .expect("png");

    assert_eq!(&png[..8], &PNG_MAGIC);
}

#[test]
fn writes_one_png_per_chart() {
    let rows = vec![
        RawWorkoutRow {
            row: 1,
            user_id: Some("u".to_string()),
            workout_id: Some("w1".to_string()),
            fitness_discipline: "cycling".to_string(),
            class_type: None,
            workout_start_time: "2019-01-07 09:00:00".to_string(),
            workout_length_minutes: 30.0,
            class_length: Some(30.0),
        },
        RawWorkoutRow {
            row: 2,
            user_id: Some("u".to_string()),
            workout_id: Some("w2".to_string()),
            fitness_discipline: "strength".to_string(),
            class_type: Some("Upper Body".to_string()),
            workout_start_time: "2019-01-07 09:35:00".to_string(),
            workout_length_minutes: 10.0,
            class_length: Some(10.0),
        },
    ];
    let report = build_report(
        &enrich(&rows),
        &ReportOptions {
            rows_loaded: 2,
            threshold_minutes: 10.0,
            gap_cdf_max_minutes: 120.0,
            top_transitions: 10,
        },
    );
    let dir = tempfile::tempdir().expect("temp dir");
    let options = RenderOptions::new(600, 400);

    let written = write_report(&report, dir.path(), Some(&options)).expect("write report");

    assert_eq!(written.len(), report_charts(&report).len() + 1);
    for path in written.iter().filter(|p| p.extension().is_some_and(|e| e == "png")) {
        let bytes = std::fs::read(path).expect("read png");
        assert_eq!(&bytes[..8], &PNG_MAGIC);
    }
}

#[test]
fn palette_spreads_bar_colours() {
    let palette = Palette::get("ocean").expect("ocean palette");
    assert_eq!(palette.color_at(0, 3), "#1B3A6B");
    assert_eq!(palette.color_at(1, 3), "#2C7DA0");
    assert_eq!(palette.color_at(2, 3), "#6CC4D9");
    assert_eq!(palette.color_at(0, 1), "#1B3A6B");
    assert!(Palette::get("neon").is_none());
}
