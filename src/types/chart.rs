use crate::types::palette::Palette;

#[derive(Debug, Clone)]
pub enum Chart {
    Bar(BarChart),
    Cdf(CdfChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Bar(chart) => &chart.title,
            Chart::Cdf(chart) => &chart.title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

/// Step chart of cumulative share (0..=1) against a value axis starting at 0.
#[derive(Debug, Clone)]
pub struct CdfChart {
    pub title: String,
    pub x_label: String,
    pub x_max: f64,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub font_size: u32,
    pub stroke_width: f32,
    pub palette: Palette,
}

impl RenderOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: 80,
            font_size: 16,
            stroke_width: 3.0,
            palette: Palette::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub background: Option<(u8, u8, u8, u8)>,
}
