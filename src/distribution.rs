//! Two-class score distribution chart
//!
//! Histograms the pulsar and RFI scores on a shared 25-bin [0, 1] axis and
//! titles the chart with the best-F1 cut and the normalized overlap of the
//! two distributions.

use crate::error::EvalResult;
use crate::histogram::{Histogram, OverlapOptions, DEFAULT_BINS};
use crate::models::{ClassSplit, Scores, Targets};
use crate::render::{ChartRenderer, Figure, LegendPosition, Panel, Rgb, Series};
use crate::threshold::{find_best_f1_with, CutMetrics, ThresholdOptions};
use serde::Serialize;
use tracing::debug;

/// Fill transparency of both class histograms
pub const CLASS_ALPHA: f64 = 0.65;

/// Binning, search and colours for the distribution chart
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionOptions {
    pub nbins: usize,
    pub threshold: ThresholdOptions,
    pub positive_color: Rgb,
    pub negative_color: Rgb,
    pub alpha: f64,
}

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            nbins: DEFAULT_BINS,
            threshold: ThresholdOptions::default(),
            positive_color: Rgb::GREEN,
            negative_color: Rgb::RED,
            alpha: CLASS_ALPHA,
        }
    }
}

/// Everything the distribution chart shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    /// Best-F1 cut over all samples
    pub best: CutMetrics,
    /// Normalized overlap of the two histograms from bin 0
    pub overlap: f64,
    pub pulsars: usize,
    pub rfi: usize,
    pub pulsar_hist: Histogram,
    pub rfi_hist: Histogram,
}

impl DistributionSummary {
    /// Chart title: caller prefix, best cut, and the overlap truncated to an integer
    pub fn title(&self, prefix: &str) -> String {
        format!(
            "{}, best (cut, P, C, f1) = ({:.3}, {:.3}, {:.3}, {:.3}), (overlap: {})",
            prefix,
            self.best.threshold,
            self.best.precision,
            self.best.completeness,
            self.best.f1,
            self.overlap.trunc() as i64
        )
    }

    /// Describe the chart without drawing it
    pub fn figure(&self, prefix: &str, options: &DistributionOptions) -> Figure {
        let pulsars = Series::Histogram {
            label: format!("pulsars ({})", self.pulsars),
            edges: self.pulsar_hist.edges(),
            counts: self.pulsar_hist.counts().to_vec(),
            color: options.positive_color,
            alpha: options.alpha,
        };
        let rfi = Series::Histogram {
            label: format!("rfi ({})", self.rfi),
            edges: self.rfi_hist.edges(),
            counts: self.rfi_hist.counts().to_vec(),
            color: options.negative_color,
            alpha: options.alpha,
        };

        Figure::single(Panel {
            title: Some(self.title(prefix)),
            x_label: "pulsar prediction".to_string(),
            y_label: "number".to_string(),
            legend: LegendPosition::UpperRight,
            series: vec![pulsars, rfi],
        })
    }
}

/// Compute the chart contents with default options
pub fn distribution_summary(scores: &Scores, targets: &Targets) -> EvalResult<DistributionSummary> {
    distribution_summary_with(scores, targets, &DistributionOptions::default())
}

pub fn distribution_summary_with(
    scores: &Scores,
    targets: &Targets,
    options: &DistributionOptions,
) -> EvalResult<DistributionSummary> {
    let split = ClassSplit::new(scores, targets)?;
    let pulsar_hist = Histogram::from_scores(&split.positive, options.nbins)?;
    let rfi_hist = Histogram::from_scores(&split.negative, options.nbins)?;

    let best = find_best_f1_with(scores, targets, &options.threshold)?;
    let overlap = pulsar_hist.overlap(&rfi_hist, OverlapOptions::default())?;

    Ok(DistributionSummary {
        best,
        overlap,
        pulsars: split.positive.len(),
        rfi: split.negative.len(),
        pulsar_hist,
        rfi_hist,
    })
}

/// Render the pulsar/RFI score histograms with default options.
///
/// Returns what was drawn so callers can use the numbers directly.
pub fn plot_histogram<R: ChartRenderer + ?Sized>(
    scores: &Scores,
    targets: &Targets,
    title: &str,
    renderer: &mut R,
) -> EvalResult<DistributionSummary> {
    plot_histogram_with(scores, targets, title, &DistributionOptions::default(), renderer)
}

pub fn plot_histogram_with<R: ChartRenderer + ?Sized>(
    scores: &Scores,
    targets: &Targets,
    title: &str,
    options: &DistributionOptions,
    renderer: &mut R,
) -> EvalResult<DistributionSummary> {
    let summary = distribution_summary_with(scores, targets, options)?;
    debug!(
        "Distribution of {} pulsars / {} rfi, overlap {:.3}",
        summary.pulsars, summary.rfi, summary.overlap
    );
    renderer.render(&summary.figure(title, options))?;
    Ok(summary)
}
