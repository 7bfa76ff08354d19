//! SVG renderer backed by plotters
//!
//! Every figure becomes `<output_dir>/<stem>-<n>.svg`, `n` counting from 1
//! per renderer.

use super::{ChartRenderer, Figure, LegendPosition, LineStyle, Panel, Rgb, Series};
use crate::config::PlotConfig;
use crate::error::{EvalError, EvalResult};
use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Height of each stacked panel when no size is configured
const PANEL_HEIGHT: u32 = 450;

/// Dash length and gaps in pixels
const DASH: i32 = 8;
const DASH_GAP: i32 = 5;
const DASH_DOT_GAP: i32 = 8;
const DOT_GAP: i32 = 5;

/// Writes figures as SVG files
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    output_dir: PathBuf,
    stem: String,
    size: (u32, u32),
    written: Vec<PathBuf>,
}

impl SvgRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            stem: "figure".to_string(),
            size: (900, 0),
            written: Vec::new(),
        }
    }

    pub fn from_config(config: &PlotConfig) -> Self {
        Self::new(config.output_dir.clone()).with_size(config.width, config.height)
    }

    /// Canvas size in pixels; a zero height scales with the panel count
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// File name prefix
    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    /// Files written so far, oldest first
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn canvas_size(&self, panels: usize) -> (u32, u32) {
        let (width, height) = self.size;
        let height = if height == 0 {
            PANEL_HEIGHT * panels.max(1) as u32
        } else {
            height
        };
        (width.max(1), height)
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&mut self, figure: &Figure) -> EvalResult<()> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self
            .output_dir
            .join(format!("{}-{}.svg", self.stem, self.written.len() + 1));
        let size = self.canvas_size(figure.panels.len());

        draw_figure(&path, size, figure).map_err(|e| EvalError::Render(e.to_string()))?;

        info!("Wrote chart to {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

fn draw_figure(path: &Path, size: (u32, u32), figure: &Figure) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    if !figure.panels.is_empty() {
        let areas = root.split_evenly((figure.panels.len(), 1));
        for (area, panel) in areas.iter().zip(&figure.panels) {
            draw_panel(area, panel)?;
        }
    }

    root.present()?;
    debug!("Rendered {} panel(s) at {}x{}", figure.panels.len(), size.0, size.1);
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, panel: &Panel) -> Result<(), Box<dyn Error>> {
    let ((x_min, x_max), (y_min, y_max)) = panel.bounds();

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(55);
    if let Some(title) = &panel.title {
        builder.caption(title, ("sans-serif", 15));
    }
    let mut chart = builder.build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .draw()?;

    for series in &panel.series {
        match series {
            Series::Histogram {
                label,
                edges,
                counts,
                color,
                alpha,
            } => {
                let fill = plot_color(*color).mix(*alpha).filled();
                let bars = counts
                    .iter()
                    .zip(edges.windows(2))
                    .map(move |(&count, edge)| {
                        Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], fill)
                    });
                chart
                    .draw_series(bars)?
                    .label(label.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], fill));
            }
            Series::Line {
                label,
                x,
                y,
                style,
                color,
            } => {
                let stroke = plot_color(*color).stroke_width(2);
                let points: Vec<(f64, f64)> =
                    x.iter().copied().zip(y.iter().copied()).collect();
                let dot = move |c: (i32, i32)| Circle::new(c, 1, stroke.filled());

                let anno = match style {
                    LineStyle::Solid => chart.draw_series(LineSeries::new(points, stroke))?,
                    LineStyle::Dashed => {
                        chart.draw_series(DashedLineSeries::new(points, DASH, DASH_GAP, stroke))?
                    }
                    LineStyle::Dotted => {
                        chart.draw_series(DottedLineSeries::new(points, 0, DOT_GAP, dot))?
                    }
                    LineStyle::DashDot => {
                        // one dot centred in every gap
                        chart.draw_series(DottedLineSeries::new(
                            points.clone(),
                            DASH + DASH_DOT_GAP / 2,
                            DASH + DASH_DOT_GAP,
                            dot,
                        ))?;
                        chart.draw_series(DashedLineSeries::new(
                            points,
                            DASH,
                            DASH_DOT_GAP,
                            stroke,
                        ))?
                    }
                };
                let anno = anno.label(label.as_str());
                match style {
                    LineStyle::Solid => {
                        anno.legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke))
                    }
                    _ => anno.legend(move |(x, y)| {
                        DashedPathElement::new(vec![(x, y), (x + 20, y)], 5, 3, stroke)
                    }),
                };
            }
        }
    }

    if !panel.series.is_empty() {
        chart
            .configure_series_labels()
            .position(series_label_position(panel.legend))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn plot_color(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn series_label_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
    }
}
