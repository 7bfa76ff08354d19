//! Overlap and recovery as a function of the cut
//!
//! For each named classifier the pulsar and RFI scores are histogrammed on
//! [0, 1]; the cut then walks up the bins. At cut bin `i` we record the
//! overlap of the two histograms from `i` onward and the fraction of
//! pulsars still above the cut. The last bin is never used as a cut.
//!
//! Useful for comparing classifiers and choosing the cut below which
//! pulsars and RFI mix too much.

use crate::error::{EvalError, EvalResult};
use crate::histogram::{hist_overlap, Histogram, DEFAULT_BINS};
use crate::models::{check_aligned, ClassSplit, NamedScores, Targets};
use crate::render::{ChartRenderer, Figure, LegendPosition, LineStyle, Panel, Series, LINE_PALETTE};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

/// Sweep configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOptions {
    /// Histogram bins; the sweep visits `nbins - 1` cuts
    pub nbins: usize,
    /// Render the overlap and recovery charts
    pub plot: bool,
    /// Normalize overlap by the pulsar share of the tail mass
    pub norm: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            nbins: DEFAULT_BINS,
            plot: true,
            norm: true,
        }
    }
}

/// Series recorded by a cut sweep, keyed by classifier in input order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CutSweep {
    /// Cut fractions `i / nbins` for `i = 0..nbins-1`
    pub cuts: Vec<f64>,
    /// Overlap above each cut
    pub overlap: IndexMap<String, Vec<f64>>,
    /// Fraction of pulsars above each cut
    pub recovered: IndexMap<String, Vec<f64>>,
}

impl CutSweep {
    /// Classifier names in input order
    pub fn classifiers(&self) -> impl Iterator<Item = &str> {
        self.overlap.keys().map(String::as_str)
    }

    /// Cut with the lowest overlap for `name` (earliest on ties), with that overlap
    pub fn min_overlap_cut(&self, name: &str) -> Option<(f64, f64)> {
        let series = self.overlap.get(name)?;
        self.cuts
            .iter()
            .zip(series)
            .fold(None, |best: Option<(f64, f64)>, (&cut, &overlap)| match best {
                Some((_, lowest)) if lowest <= overlap => best,
                _ => Some((cut, overlap)),
            })
    }

    /// Pulsar fraction recovered by `name` at the cut closest to `cut`
    pub fn recovered_at(&self, name: &str, cut: f64) -> Option<f64> {
        let series = self.recovered.get(name)?;
        let idx = self
            .cuts
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - cut).abs().total_cmp(&(*b - cut).abs()))
            .map(|(i, _)| i)?;
        series.get(idx).copied()
    }

    /// Overlap panel above recovery panel, one line per classifier
    pub fn figure(&self) -> Figure {
        let top = Panel {
            title: None,
            x_label: "pct cut".to_string(),
            y_label: "overlap".to_string(),
            legend: LegendPosition::UpperRight,
            series: self.lines(&self.overlap),
        };
        let bottom = Panel {
            title: None,
            x_label: "pct cut".to_string(),
            y_label: "pulsar fraction recovered".to_string(),
            legend: LegendPosition::LowerLeft,
            series: self.lines(&self.recovered),
        };
        Figure::stacked(vec![top, bottom])
    }

    fn lines(&self, by_name: &IndexMap<String, Vec<f64>>) -> Vec<Series> {
        by_name
            .iter()
            .zip(LineStyle::cycle())
            .enumerate()
            .map(|(i, ((name, values), style))| Series::Line {
                label: name.clone(),
                x: self.cuts.clone(),
                y: values.clone(),
                style,
                color: LINE_PALETTE[i % LINE_PALETTE.len()],
            })
            .collect()
    }
}

/// Record overlap and recovery curves for every classifier, no rendering
pub fn sweep_cuts(
    classifiers: &NamedScores,
    targets: &Targets,
    nbins: usize,
    norm: bool,
) -> EvalResult<CutSweep> {
    if nbins == 0 {
        return Err(EvalError::InvalidParameter(
            "cut sweep needs at least one bin".into(),
        ));
    }

    let mut histograms = Vec::with_capacity(classifiers.len());
    for (name, scores) in classifiers {
        check_aligned(scores, targets, &format!("classifier '{}'", name))?;
        let split = ClassSplit::new(scores, targets)?;
        let positive = Histogram::from_scores(&split.positive, nbins)?;
        let negative = Histogram::from_scores(&split.negative, nbins)?;
        if positive.total() == 0 {
            warn!(
                "Classifier '{}' has no pulsar scores in [0, 1]; recovered fraction is 0 at every cut",
                name
            );
        }
        histograms.push((name, positive, negative));
    }

    let steps = nbins - 1;
    let mut sweep = CutSweep {
        cuts: (0..steps).map(|i| i as f64 / nbins as f64).collect(),
        ..Default::default()
    };

    for (name, positive, negative) in histograms {
        let overlap = (0..steps)
            .map(|i| hist_overlap(positive.counts(), negative.counts(), i, norm))
            .collect::<EvalResult<Vec<_>>>()?;
        let recovered = (0..steps).map(|i| positive.recovered_fraction(i)).collect();

        sweep.overlap.insert(name.clone(), overlap);
        sweep.recovered.insert(name.clone(), recovered);
    }

    debug!(
        "Swept {} cuts over {} classifier(s)",
        sweep.cuts.len(),
        sweep.overlap.len()
    );
    Ok(sweep)
}

/// Sweep the cut for every classifier, rendering the curves when `options.plot`.
///
/// The series are returned whether or not anything is drawn.
pub fn cut_performance<R: ChartRenderer + ?Sized>(
    classifiers: &NamedScores,
    targets: &Targets,
    options: &SweepOptions,
    renderer: &mut R,
) -> EvalResult<CutSweep> {
    let sweep = sweep_cuts(classifiers, targets, options.nbins, options.norm)?;
    if options.plot {
        renderer.render(&sweep.figure())?;
    }
    Ok(sweep)
}
