use std::fmt::Write;

use crate::error::RenderError;
use crate::types::chart::{Bar, BarChart, CdfChart, Chart, RenderOptions};
use crate::types::report::{LabelCount, Report};

const TITLE_OFFSET: f64 = 36.0;
const GRID_STEPS: usize = 4;
const X_TICKS: usize = 6;
const LABEL_ROTATE_THRESHOLD: usize = 12;
const TEXT_COLOR: &str = "#222222";
const GRID_COLOR: &str = "#DDDDDD";

/// Charts produced for a report, keyed by output file stem.
pub fn report_charts(report: &Report) -> Vec<(&'static str, Chart)> {
    let disciplines = report
        .disciplines
        .iter()
        .map(|d| Bar {
            label: d.discipline.clone(),
            value: d.workouts as f64,
        })
        .collect();

    let post = &report.post_cycling;

    vec![
        (
            "workouts_by_discipline",
            Chart::Bar(BarChart {
                title: "Workouts by discipline".to_string(),
                y_label: "workouts".to_string(),
                bars: disciplines,
            }),
        ),
        (
            "workouts_by_weekday",
            Chart::Bar(BarChart {
                title: "Workouts by day of week".to_string(),
                y_label: "workouts".to_string(),
                bars: bars_from_counts(&report.schedule.by_weekday),
            }),
        ),
        (
            "workouts_by_hour",
            Chart::Bar(BarChart {
                title: "Workouts by hour of day".to_string(),
                y_label: "workouts".to_string(),
                bars: bars_from_counts(&report.schedule.by_hour),
            }),
        ),
        (
            "gap_cdf",
            Chart::Cdf(CdfChart {
                title: "Minutes between consecutive workouts (ECDF)".to_string(),
                x_label: "gap minutes".to_string(),
                x_max: report.gaps.cdf_max_minutes,
                points: report
                    .gaps
                    .cdf
                    .iter()
                    .map(|p| (p.value, p.cumulative_share))
                    .collect(),
            }),
        ),
        (
            "after_finished_cycling",
            Chart::Bar(BarChart {
                title: format!(
                    "Workouts started within {} min of a finished cycling workout",
                    post.threshold_minutes
                ),
                y_label: "workouts".to_string(),
                bars: bars_from_counts(&post.by_discipline),
            }),
        ),
    ]
}

fn bars_from_counts(counts: &[LabelCount]) -> Vec<Bar> {
    counts
        .iter()
        .map(|c| Bar {
            label: c.label.clone(),
            value: c.count as f64,
        })
        .collect()
}

pub fn render_svg(chart: &Chart, options: &RenderOptions) -> Result<String, RenderError> {
    let width = options.width as f64;
    let height = options.height as f64;
    let padding = options.padding as f64;
    let view_width = width - 2.0 * padding;
    let view_height = height - 2.0 * padding - TITLE_OFFSET;
    if view_width <= 0.0 || view_height <= 0.0 {
        return Err(RenderError::SvgError("Invalid viewport size".to_string()));
    }

    let frame = Frame {
        left: padding,
        top: padding + TITLE_OFFSET,
        width: view_width,
        height: view_height,
    };

    let body = match chart {
        Chart::Bar(bar) if bar.bars.is_empty() => no_data(&frame, options),
        Chart::Cdf(cdf) if cdf.points.is_empty() => no_data(&frame, options),
        Chart::Bar(bar) => render_bars(bar, &frame, options)?,
        Chart::Cdf(cdf) => render_cdf(cdf, &frame, options)?,
    };

    Ok(format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <rect x="0" y="0" width="{w}" height="{h}" fill="#FFFFFF"/>
  <text x="{tx:.1}" y="{ty:.1}" font-family="DejaVu Sans, sans-serif" font-size="{tf}" fill="{color}" text-anchor="middle">{title}</text>
{body}</svg>"##,
        w = width,
        h = height,
        tx = width / 2.0,
        ty = padding,
        tf = options.font_size + 6,
        color = TEXT_COLOR,
        title = escape_xml(chart.title()),
        body = body,
    ))
}

struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

fn render_bars(chart: &BarChart, frame: &Frame, options: &RenderOptions) -> Result<String, RenderError> {
    let max_value = chart
        .bars
        .iter()
        .map(|b| b.value)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let count = chart.bars.len();
    let slot = frame.width / count as f64;
    let bar_width = slot * 0.7;
    let rotate = count > LABEL_ROTATE_THRESHOLD;

    let mut svg = grid_lines(frame, options, |step| {
        format_axis_value(max_value * step as f64 / GRID_STEPS as f64)
    })?;

    for (idx, bar) in chart.bars.iter().enumerate() {
        let bar_height = (bar.value.max(0.0) / max_value) * frame.height;
        let x = frame.left + slot * idx as f64 + (slot - bar_width) / 2.0;
        let y = frame.bottom() - bar_height;
        let label_x = x + bar_width / 2.0;
        let label_y = frame.bottom() + options.font_size as f64 + 4.0;

        write!(
            svg,
            r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>
"#,
            x,
            y,
            bar_width,
            bar_height,
            options.palette.color_at(idx, count)
        )
        .map_err(svg_error)?;

        let transform = if rotate {
            format!(r#" transform="rotate(45 {:.1} {:.1})""#, label_x, label_y)
        } else {
            String::new()
        };
        let anchor = if rotate { "start" } else { "middle" };
        write!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" font-family="DejaVu Sans, sans-serif" font-size="{}" fill="{}" text-anchor="{}"{}>{}</text>
"#,
            label_x,
            label_y,
            options.font_size,
            TEXT_COLOR,
            anchor,
            transform,
            escape_xml(&bar.label)
        )
        .map_err(svg_error)?;
    }

    write!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" font-family="DejaVu Sans, sans-serif" font-size="{}" fill="{}" text-anchor="start">{}</text>
"#,
        frame.left,
        frame.top - 8.0,
        options.font_size,
        TEXT_COLOR,
        escape_xml(&chart.y_label)
    )
    .map_err(svg_error)?;

    Ok(svg)
}

fn render_cdf(chart: &CdfChart, frame: &Frame, options: &RenderOptions) -> Result<String, RenderError> {
    let x_max = if chart.x_max > 0.0 { chart.x_max } else { 1.0 };
    let sx = |value: f64| frame.left + (value.clamp(0.0, x_max) / x_max) * frame.width;
    let sy = |share: f64| frame.bottom() - share.clamp(0.0, 1.0) * frame.height;

    let mut svg = grid_lines(frame, options, |step| {
        format!("{}%", 100 * step / GRID_STEPS)
    })?;

    for tick in 0..=X_TICKS {
        let value = x_max * tick as f64 / X_TICKS as f64;
        write!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" font-family="DejaVu Sans, sans-serif" font-size="{}" fill="{}" text-anchor="middle">{}</text>
"#,
            sx(value),
            frame.bottom() + options.font_size as f64 + 4.0,
            options.font_size,
            TEXT_COLOR,
            format_axis_value(value)
        )
        .map_err(svg_error)?;
    }

    let mut path = format!("M{:.2},{:.2}", sx(0.0), sy(0.0));
    let mut last_share = 0.0;
    for &(value, share) in &chart.points {
        write!(path, " H{:.2} V{:.2}", sx(value), sy(share)).map_err(svg_error)?;
        last_share = share;
    }
    write!(path, " H{:.2} V{:.2}", frame.right(), sy(last_share)).map_err(svg_error)?;

    write!(
        svg,
        r#"  <path d="{}" fill="none" stroke="{}" stroke-width="{:.1}" stroke-linejoin="round"/>
  <text x="{:.1}" y="{:.1}" font-family="DejaVu Sans, sans-serif" font-size="{}" fill="{}" text-anchor="middle">{}</text>
"#,
        path,
        options.palette.interpolate(0.0),
        options.stroke_width,
        frame.left + frame.width / 2.0,
        frame.bottom() + 2.0 * options.font_size as f64 + 12.0,
        options.font_size,
        TEXT_COLOR,
        escape_xml(&chart.x_label)
    )
    .map_err(svg_error)?;

    Ok(svg)
}

fn grid_lines<F>(frame: &Frame, options: &RenderOptions, label: F) -> Result<String, RenderError>
where
    F: Fn(usize) -> String,
{
    let mut svg = String::new();
    for step in 0..=GRID_STEPS {
        let y = frame.bottom() - frame.height * step as f64 / GRID_STEPS as f64;
        write!(
            svg,
            r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>
  <text x="{:.1}" y="{:.1}" font-family="DejaVu Sans, sans-serif" font-size="{}" fill="{}" text-anchor="end">{}</text>
"#,
            frame.left,
            y,
            frame.right(),
            y,
            GRID_COLOR,
            frame.left - 8.0,
            y + options.font_size as f64 / 3.0,
            options.font_size,
            TEXT_COLOR,
            label(step)
        )
        .map_err(svg_error)?;
    }
    Ok(svg)
}

fn no_data(frame: &Frame, options: &RenderOptions) -> String {
    format!(
        r#"  <text x="{:.1}" y="{:.1}" font-family="DejaVu Sans, sans-serif" font-size="{}" fill="{}" text-anchor="middle">No data</text>
"#,
        frame.left + frame.width / 2.0,
        frame.top + frame.height / 2.0,
        options.font_size + 4,
        TEXT_COLOR
    )
}

fn format_axis_value(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn svg_error(err: std::fmt::Error) -> RenderError {
    RenderError::SvgError(err.to_string())
}
