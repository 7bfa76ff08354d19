//! Best-F1 probability cut search
//!
//! Scans evenly spaced candidate cuts over `[0, max(score))` and keeps the
//! one with the highest F1 for the pulsar class. A sample is predicted
//! positive when its score is strictly above the cut. Ties keep the
//! earliest (lowest) cut.

use crate::error::{EvalError, EvalResult};
use crate::models::{check_aligned, ratio, Scores, Targets};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of candidate cuts scanned by default
pub const DEFAULT_CANDIDATES: usize = 100;

/// Classification quality at one probability cut
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CutMetrics {
    /// Samples scoring strictly above this are predicted pulsars
    pub threshold: f64,
    pub f1: f64,
    pub precision: f64,
    /// Recall of the pulsar class
    pub completeness: f64,
}

/// Search configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdOptions {
    /// How many evenly spaced cuts to try below the maximum score
    pub candidates: usize,
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES,
        }
    }
}

/// `n` evenly spaced cuts over `[0, max)`, right endpoint excluded
pub fn candidate_thresholds(max: f64, n: usize) -> Vec<f64> {
    let step = max / n as f64;
    (0..n).map(|k| k as f64 * step).collect()
}

/// Find the cut with the best F1 using the default 100 candidates
pub fn find_best_f1(scores: &Scores, targets: &Targets) -> EvalResult<CutMetrics> {
    find_best_f1_with(scores, targets, &ThresholdOptions::default())
}

/// Find the cut with the best F1.
///
/// Starts from an all-zero result, which is returned unchanged when no
/// candidate reaches a positive F1 or every score is NaN.
pub fn find_best_f1_with(
    scores: &Scores,
    targets: &Targets,
    options: &ThresholdOptions,
) -> EvalResult<CutMetrics> {
    check_aligned(scores, targets, "scores/targets")?;
    if options.candidates == 0 {
        return Err(EvalError::InvalidParameter(
            "threshold search needs at least one candidate".into(),
        ));
    }
    if scores.is_empty() {
        return Err(EvalError::EmptyInput("no scores to threshold".into()));
    }
    let Some(max) = scores.max() else {
        warn!(
            "All {} scores are NaN; no sample can pass any cut",
            scores.len()
        );
        return Ok(CutMetrics::default());
    };

    let truth: Vec<bool> = targets.is_positive().collect();
    let positives = truth.iter().filter(|&&p| p).count();
    if positives == 0 {
        warn!(
            "No positive labels among {} samples; completeness is 0 at every cut",
            truth.len()
        );
    }

    let mut best = CutMetrics::default();
    for threshold in candidate_thresholds(max, options.candidates) {
        let metrics = score_cut(scores.as_slice(), &truth, positives, threshold);
        if metrics.f1 > best.f1 {
            best = metrics;
        }
    }

    debug!(
        "Best cut {:.3}: P={:.3} C={:.3} F1={:.3} ({} candidates)",
        best.threshold, best.precision, best.completeness, best.f1, options.candidates
    );
    Ok(best)
}

/// Precision, completeness and F1 at a single cut
pub fn evaluate_cut(scores: &Scores, targets: &Targets, threshold: f64) -> EvalResult<CutMetrics> {
    check_aligned(scores, targets, "scores/targets")?;
    let truth: Vec<bool> = targets.is_positive().collect();
    let positives = truth.iter().filter(|&&p| p).count();
    Ok(score_cut(scores.as_slice(), &truth, positives, threshold))
}

fn score_cut(scores: &[f64], truth: &[bool], positives: usize, threshold: f64) -> CutMetrics {
    let mut predicted = 0usize;
    let mut true_positives = 0usize;
    for (&score, &is_pulsar) in scores.iter().zip(truth) {
        if score > threshold {
            predicted += 1;
            if is_pulsar {
                true_positives += 1;
            }
        }
    }

    let precision = ratio(true_positives as f64, predicted as f64);
    let completeness = ratio(true_positives as f64, positives as f64);
    let f1 = ratio(2.0 * precision * completeness, precision + completeness);

    CutMetrics {
        threshold,
        f1,
        precision,
        completeness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_candidates_exclude_endpoint() {
        let cuts = candidate_thresholds(0.5, 100);
        assert_eq!(cuts.len(), 100);
        assert_eq!(cuts[0], 0.0);
        assert!(approx(cuts[1], 0.005));
        assert!(cuts.iter().all(|&t| t < 0.5));
    }

    #[test]
    fn test_perfect_separation() {
        let scores = Scores::from_flat(vec![1.0, 1.0, 1.0, 0.0, 0.0]);
        let targets = Targets::new(vec![1, 1, 1, 0, 0]);
        let best = find_best_f1(&scores, &targets).unwrap();
        assert_eq!(best.f1, 1.0);
        assert_eq!(best.precision, 1.0);
        assert_eq!(best.completeness, 1.0);
        assert_eq!(best.threshold, 0.0);
    }

    #[test]
    fn test_first_perfect_cut_wins() {
        let scores = Scores::from_flat(vec![0.9, 0.8, 0.2, 0.1]);
        let targets = Targets::new(vec![1, 1, 0, 0]);
        let best = find_best_f1(&scores, &targets).unwrap();

        assert_eq!(best.f1, 1.0);
        assert_eq!(best.precision, 1.0);
        assert_eq!(best.completeness, 1.0);
        // the 24th candidate (23 * 0.009) is the first above the 0.2 negative
        assert!(approx(best.threshold, 0.207));
        assert!(best.threshold >= 0.2 && best.threshold < 0.8);
    }

    #[test]
    fn test_label_independent_scores() {
        let scores = Scores::from_flat(vec![0.5; 10]);
        let targets = Targets::new(vec![1, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
        let best = find_best_f1(&scores, &targets).unwrap();

        let p = 0.3;
        assert!(approx(best.precision, p));
        assert_eq!(best.completeness, 1.0);
        assert!(approx(best.f1, 2.0 * p / (p + 1.0)));
        assert_eq!(best.threshold, 0.0);
    }

    #[test]
    fn test_two_column_input() {
        let scores = Scores::from_proba_table(&[[0.1, 0.9], [0.3, 0.7], [0.8, 0.2], [0.95, 0.05]]);
        let targets = Targets::new(vec![1, 1, 0, 0]);
        let best = find_best_f1(&scores, &targets).unwrap();
        assert_eq!(best.f1, 1.0);
    }

    #[test]
    fn test_no_positive_labels_keeps_initial_state() {
        let scores = Scores::from_flat(vec![0.9, 0.4, 0.1]);
        let targets = Targets::new(vec![0, 0, 0]);
        assert_eq!(find_best_f1(&scores, &targets).unwrap(), CutMetrics::default());
    }

    #[test]
    fn test_all_zero_scores_keep_initial_state() {
        let scores = Scores::from_flat(vec![0.0, 0.0]);
        let targets = Targets::new(vec![1, 0]);
        let best = find_best_f1(&scores, &targets).unwrap();
        assert_eq!(best, CutMetrics::default());
    }

    #[test]
    fn test_all_nan_scores_keep_initial_state() {
        let scores = Scores::from_flat(vec![f64::NAN, f64::NAN]);
        let targets = Targets::new(vec![1, 0]);
        assert_eq!(find_best_f1(&scores, &targets).unwrap(), CutMetrics::default());
    }

    #[test]
    fn test_evaluate_cut_without_predictions() {
        let scores = Scores::from_flat(vec![0.2, 0.3]);
        let targets = Targets::new(vec![1, 0]);
        let metrics = evaluate_cut(&scores, &targets, 0.5).unwrap();
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.completeness, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        let scores = Scores::from_flat(vec![0.2, 0.3]);
        let targets = Targets::new(vec![1]);
        assert!(matches!(
            find_best_f1(&scores, &targets),
            Err(EvalError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let result = find_best_f1(&Scores::default(), &Targets::default());
        assert!(matches!(result, Err(EvalError::EmptyInput(_))));
    }

    #[test]
    fn test_zero_candidates_rejected() {
        let scores = Scores::from_flat(vec![0.2]);
        let targets = Targets::new(vec![1]);
        let options = ThresholdOptions { candidates: 0 };
        assert!(matches!(
            find_best_f1_with(&scores, &targets, &options),
            Err(EvalError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_best_dominates_every_candidate() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 200;
        let labels: Vec<i64> = (0..n).map(|_| rng.random_range(0..2)).collect();
        let values: Vec<f64> = labels
            .iter()
            .map(|&l| {
                let noise: f64 = rng.random_range(0.0..0.6);
                if l == 1 { 0.4 + noise } else { noise }
            })
            .collect();
        let scores = Scores::from_flat(values);
        let targets = Targets::new(labels);

        let best = find_best_f1(&scores, &targets).unwrap();
        assert!(best.f1 > 0.0 && best.f1 <= 1.0);

        let max = scores.max().unwrap();
        for t in candidate_thresholds(max, DEFAULT_CANDIDATES) {
            let m = evaluate_cut(&scores, &targets, t).unwrap();
            assert!(m.f1 <= best.f1);
            assert!((0.0..=1.0).contains(&m.precision));
            assert!((0.0..=1.0).contains(&m.completeness));
        }
    }
}
