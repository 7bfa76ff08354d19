//! Evaluation toolkit for binary pulsar/RFI classifiers
//!
//! Given predicted pulsar probabilities and ground-truth labels, this crate
//! measures how well a classifier separates the two classes:
//!
//! - [`hist_overlap`] - shared mass of two class histograms above a cut
//! - [`find_best_f1`] - probability cut with the best F1 for pulsars
//! - [`plot_histogram`] - pulsar/RFI score distributions with the best cut
//! - [`cut_performance`] - overlap and pulsar recovery as the cut rises, for
//!   several classifiers at once
//!
//! Charts are described as [`render::Figure`]s and drawn by a
//! [`render::ChartRenderer`] such as [`render::SvgRenderer`].

pub mod config;
pub mod distribution;
pub mod error;
pub mod histogram;
pub mod models;
pub mod render;
pub mod reporters;
pub mod sweep;
pub mod threshold;

pub use config::{load_config, EvalConfig};
pub use distribution::{plot_histogram, DistributionOptions, DistributionSummary};
pub use error::{EvalError, EvalResult};
pub use histogram::{hist_overlap, Histogram};
pub use models::{NamedScores, Scores, Targets};
pub use reporters::{EvaluationReport, OutputFormat};
pub use sweep::{cut_performance, CutSweep, SweepOptions};
pub use threshold::{find_best_f1, CutMetrics, ThresholdOptions};
