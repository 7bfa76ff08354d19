//! Chart rendering
//!
//! Evaluation routines never draw directly. They describe what to draw as
//! a [`Figure`] (a stack of [`Panel`]s holding histogram or line
//! [`Series`]) and hand it to a [`ChartRenderer`]. Each call to
//! [`ChartRenderer::render`] starts from a blank canvas and ends with the
//! chart presented (written, displayed or recorded).
//!
//! Renderers:
//! - [`SvgRenderer`] - writes one SVG file per figure via plotters
//! - [`RecordingRenderer`] - keeps figures in memory

mod recording;
mod svg;

pub use recording::RecordingRenderer;
pub use svg::SvgRenderer;

use crate::error::EvalResult;

/// Something that can draw a [`Figure`]
pub trait ChartRenderer {
    fn render(&mut self, figure: &Figure) -> EvalResult<()>;
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for &mut R {
    fn render(&mut self, figure: &Figure) -> EvalResult<()> {
        (**self).render(figure)
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0x00, 0x80, 0x00);
    pub const RED: Rgb = Rgb(0xff, 0x00, 0x00);

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Line colours handed out to successive line series
pub const LINE_PALETTE: [Rgb; 6] = [
    Rgb(0x1f, 0x77, 0xb4),
    Rgb(0xff, 0x7f, 0x0e),
    Rgb(0x2c, 0xa0, 0x2c),
    Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd),
    Rgb(0x8c, 0x56, 0x4b),
];

/// Stroke pattern of a line series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Dashed,
    Solid,
    Dotted,
    DashDot,
}

impl LineStyle {
    /// Order in which styles are assigned to classifiers
    pub const CYCLE: [LineStyle; 4] = [
        LineStyle::Dashed,
        LineStyle::Solid,
        LineStyle::Dotted,
        LineStyle::DashDot,
    ];

    /// Endless dashed, solid, dotted, dash-dot, dashed, ...
    pub fn cycle() -> impl Iterator<Item = LineStyle> {
        Self::CYCLE.iter().copied().cycle()
    }
}

/// Where a panel's legend box sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

/// One drawable data series
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// Filled bars; `edges` has one more entry than `counts`
    Histogram {
        label: String,
        edges: Vec<f64>,
        counts: Vec<u64>,
        color: Rgb,
        alpha: f64,
    },
    /// Polyline through `(x[i], y[i])`
    Line {
        label: String,
        x: Vec<f64>,
        y: Vec<f64>,
        style: LineStyle,
        color: Rgb,
    },
}

impl Series {
    pub fn label(&self) -> &str {
        match self {
            Series::Histogram { label, .. } | Series::Line { label, .. } => label,
        }
    }
}

/// A single set of axes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub legend: LegendPosition,
    pub series: Vec<Series>,
}

impl Panel {
    /// Data bounds `((x_min, x_max), (y_min, y_max))`, never degenerate.
    ///
    /// Histograms pin x to [0, 1] and y to start at zero.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (0.0f64, f64::NEG_INFINITY);

        for series in &self.series {
            match series {
                Series::Histogram { edges, counts, .. } => {
                    x = (x.0.min(0.0), x.1.max(1.0));
                    if let (Some(first), Some(last)) = (edges.first(), edges.last()) {
                        x = (x.0.min(*first), x.1.max(*last));
                    }
                    let top = counts.iter().copied().max().unwrap_or(0) as f64;
                    y.1 = y.1.max(top);
                }
                Series::Line { x: xs, y: ys, .. } => {
                    for &v in xs.iter().filter(|v| v.is_finite()) {
                        x = (x.0.min(v), x.1.max(v));
                    }
                    for &v in ys.iter().filter(|v| v.is_finite()) {
                        y = (y.0.min(v), y.1.max(v));
                    }
                }
            }
        }

        if !x.0.is_finite() || !x.1.is_finite() {
            x = (0.0, 1.0);
        } else if x.1 <= x.0 {
            x = (x.0, x.0 + 1.0);
        }
        if !y.1.is_finite() || y.1 <= y.0 {
            y.1 = y.0 + 1.0;
        } else {
            y.1 += (y.1 - y.0) * 0.05;
        }
        (x, y)
    }
}

/// Panels stacked top to bottom on one canvas
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Figure {
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn single(panel: Panel) -> Self {
        Self {
            panels: vec![panel],
        }
    }

    pub fn stacked(panels: Vec<Panel>) -> Self {
        Self { panels }
    }
}
