//! Score histograms and the overlap metric
//!
//! Histograms always span the probability range [0, 1]. Binning follows
//! the usual numpy convention: every bin is half-open `[lo, hi)` except the
//! last, which also includes `1.0`; values outside the range (and NaN) are
//! not counted.
//!
//! The overlap of two class-conditional histograms from a start bin `idx`
//! onward is
//!
//! ```text
//! Overlap(A, B, idx) = sum_{i >= idx} min(A[i], B[i])
//! ```
//!
//! optionally scaled by A's share of the combined tail mass,
//! `sum(A[idx..]) / sum(A[idx..] + B[idx..])`. Lower overlap above a cut
//! means the two classes separate better there.

use crate::error::{EvalError, EvalResult};
use crate::models::ratio;
use serde::{Deserialize, Serialize};

/// Bin count used when none is configured
pub const DEFAULT_BINS: usize = 25;

/// Start index and normalization for [`Histogram::overlap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapOptions {
    /// First bin included in the sum
    pub idx: usize,
    /// Scale by A's share of the combined mass from `idx` onward
    pub norm: bool,
}

impl Default for OverlapOptions {
    fn default() -> Self {
        Self { idx: 0, norm: true }
    }
}

/// Fixed-length bin counts over [0, 1]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    /// Wrap precomputed counts (assumed to cover [0, 1] evenly)
    pub fn from_counts(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    /// Bin `values` into `nbins` equal-width bins over [0, 1]
    pub fn from_scores(values: &[f64], nbins: usize) -> EvalResult<Self> {
        if nbins == 0 {
            return Err(EvalError::InvalidParameter(
                "histogram needs at least one bin".into(),
            ));
        }

        let edges = bin_edges(nbins);
        let mut counts = vec![0u64; nbins];
        for &value in values {
            if let Some(bin) = bin_index(value, &edges) {
                counts[bin] += 1;
            }
        }
        Ok(Self { counts })
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn nbins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of binned samples
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Samples in bins `idx..`
    pub fn tail_total(&self, idx: usize) -> u64 {
        self.counts.iter().skip(idx).sum()
    }

    /// The `nbins + 1` bin edges, from 0.0 to 1.0
    pub fn edges(&self) -> Vec<f64> {
        bin_edges(self.nbins())
    }

    /// Fraction of this histogram's mass at or above bin `idx`
    ///
    /// An empty histogram recovers `0.0`.
    pub fn recovered_fraction(&self, idx: usize) -> f64 {
        ratio(self.tail_total(idx) as f64, self.total() as f64)
    }

    /// Overlap with `other`, see [`hist_overlap`]
    pub fn overlap(&self, other: &Histogram, options: OverlapOptions) -> EvalResult<f64> {
        hist_overlap(&self.counts, &other.counts, options.idx, options.norm)
    }
}

/// Overlap area of two histograms from bin `idx` onward.
///
/// With `norm` the raw sum is multiplied by `sum(a[idx..]) /
/// sum(a[idx..] + b[idx..])`. When both tails are empty that factor is
/// `0.0` and so is the result.
pub fn hist_overlap(a: &[u64], b: &[u64], idx: usize, norm: bool) -> EvalResult<f64> {
    if a.len() != b.len() {
        return Err(EvalError::shape("histogram overlap", a.len(), b.len()));
    }
    if idx >= a.len() {
        return Err(EvalError::IndexOutOfRange { idx, len: a.len() });
    }

    let (tail_a, tail_b) = (&a[idx..], &b[idx..]);
    let raw: u64 = tail_a.iter().zip(tail_b).map(|(&x, &y)| x.min(y)).sum();

    let scale = if norm {
        let mass_a: u64 = tail_a.iter().sum();
        let mass_b: u64 = tail_b.iter().sum();
        ratio(mass_a as f64, (mass_a + mass_b) as f64)
    } else {
        1.0
    };

    Ok(raw as f64 * scale)
}

fn bin_edges(nbins: usize) -> Vec<f64> {
    let step = 1.0 / nbins as f64;
    let mut edges: Vec<f64> = (0..=nbins).map(|k| k as f64 * step).collect();
    // pin the last edge exactly
    edges[nbins] = 1.0;
    edges
}

/// Bin of `value`, or `None` when it falls outside [0, 1]
fn bin_index(value: f64, edges: &[f64]) -> Option<usize> {
    if !(0.0..=1.0).contains(&value) {
        return None;
    }
    let nbins = edges.len() - 1;

    let mut bin = ((value * nbins as f64) as usize).min(nbins - 1);
    // float rounding can land one bin off the edge comparison
    if value < edges[bin] {
        bin -= 1;
    } else if value >= edges[bin + 1] && bin != nbins - 1 {
        bin += 1;
    }
    Some(bin)
}
