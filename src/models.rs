//! Core data models for classifier evaluation
//!
//! Score and target arrays are normalized here so every evaluation
//! routine takes a single typed input: a flat positive-class probability
//! per sample, and an integer label per sample where `1` is a pulsar.

use crate::error::{EvalError, EvalResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label value of the positive (pulsar) class
pub const POSITIVE_LABEL: i64 = 1;

/// Classifier name -> positive-class scores, in insertion order
pub type NamedScores = IndexMap<String, Scores>;

/// Divide, mapping a zero denominator to `0.0`.
///
/// Every degenerate ratio in the crate goes through here: the overlap
/// normalization, precision, completeness, F1 and recovered fraction.
#[inline]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Positive-class probabilities, one per sample
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scores(Vec<f64>);

impl Scores {
    /// Scores that already hold the positive-class probability
    pub fn from_flat(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Reduce a two-column `predict_proba` style table to its positive column
    pub fn from_proba_table(rows: &[[f64; 2]]) -> Self {
        Self(rows.iter().map(|row| row[1]).collect())
    }

    /// Reduce dynamically shaped rows; each row must be exactly two wide
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> EvalResult<Self> {
        rows.iter()
            .enumerate()
            .map(|(row, values)| match values.as_ref() {
                [_, positive] => Ok(*positive),
                other => Err(EvalError::MalformedShape {
                    row,
                    width: other.len(),
                }),
            })
            .collect::<EvalResult<Vec<_>>>()
            .map(Self)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Largest score, ignoring NaN. `None` when there are no comparable values.
    pub fn max(&self) -> Option<f64> {
        self.0
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}

impl From<Vec<f64>> for Scores {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for Scores {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl From<&[f32]> for Scores {
    fn from(values: &[f32]) -> Self {
        Self(values.iter().map(|&v| v as f64).collect())
    }
}

impl From<Vec<[f64; 2]>> for Scores {
    fn from(rows: Vec<[f64; 2]>) -> Self {
        Self::from_proba_table(&rows)
    }
}

/// Ground-truth labels aligned with a [`Scores`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Targets(Vec<i64>);

impl Targets {
    pub fn new(labels: Vec<i64>) -> Self {
        Self(labels)
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` for each pulsar sample
    pub fn is_positive(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().map(|&label| label == POSITIVE_LABEL)
    }

    /// Number of pulsar samples
    pub fn positives(&self) -> usize {
        self.is_positive().filter(|&p| p).count()
    }

    /// Number of non-pulsar (RFI) samples
    pub fn negatives(&self) -> usize {
        self.len() - self.positives()
    }
}

impl From<Vec<i64>> for Targets {
    fn from(labels: Vec<i64>) -> Self {
        Self(labels)
    }
}

impl From<&[i64]> for Targets {
    fn from(labels: &[i64]) -> Self {
        Self(labels.to_vec())
    }
}

impl From<Vec<bool>> for Targets {
    fn from(labels: Vec<bool>) -> Self {
        Self(labels.into_iter().map(i64::from).collect())
    }
}

/// Fail unless scores and targets line up index-for-index
pub fn check_aligned(scores: &Scores, targets: &Targets, what: &str) -> EvalResult<()> {
    if scores.len() != targets.len() {
        return Err(EvalError::shape(what, scores.len(), targets.len()));
    }
    Ok(())
}

/// Scores partitioned by class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassSplit {
    /// Scores of samples labelled `1`
    pub positive: Vec<f64>,
    /// Scores of every other sample
    pub negative: Vec<f64>,
}

impl ClassSplit {
    pub fn new(scores: &Scores, targets: &Targets) -> EvalResult<Self> {
        check_aligned(scores, targets, "scores/targets")?;

        let mut split = ClassSplit::default();
        for (score, positive) in scores.iter().zip(targets.is_positive()) {
            if positive {
                split.positive.push(score);
            } else {
                split.negative.push(score);
            }
        }
        Ok(split)
    }
}
