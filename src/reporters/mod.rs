//! Output reporters for evaluation results
//!
//! Supports multiple output formats:
//! - `text` - Terminal table with colors
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown

mod json;
mod markdown;
mod text;

use crate::config::EvalConfig;
use crate::distribution::{plot_histogram_with, DistributionSummary};
use crate::error::EvalResult;
use crate::models::{NamedScores, Targets};
use crate::render::ChartRenderer;
use crate::sweep::{cut_performance, CutSweep};
use crate::threshold::CutMetrics;
use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::str::FromStr;
use tracing::info;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Results of one evaluation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub title: String,
    /// Distribution summary per classifier, in input order
    pub distributions: IndexMap<String, DistributionSummary>,
    pub sweep: Option<CutSweep>,
}

impl EvaluationReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_distribution(mut self, name: impl Into<String>, summary: DistributionSummary) -> Self {
        self.distributions.insert(name.into(), summary);
        self
    }

    pub fn with_sweep(mut self, sweep: CutSweep) -> Self {
        self.sweep = Some(sweep);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty() && self.sweep.is_none()
    }

    /// Run the distribution chart for every classifier, then the cut sweep.
    ///
    /// Figures go to `renderer` in that order; the sweep is drawn only when
    /// `config.sweep.plot` is set.
    pub fn evaluate<R: ChartRenderer + ?Sized>(
        title: impl Into<String>,
        classifiers: &NamedScores,
        targets: &Targets,
        config: &EvalConfig,
        renderer: &mut R,
    ) -> EvalResult<Self> {
        let mut report = Self::new(title);
        let options = config.distribution_options();

        for (name, scores) in classifiers {
            let summary = plot_histogram_with(scores, targets, name, &options, renderer)?;
            report.distributions.insert(name.clone(), summary);
        }
        report.sweep = Some(cut_performance(
            classifiers,
            targets,
            &config.sweep_options(),
            renderer,
        )?);

        info!(
            "Evaluated {} classifier(s) on {} samples",
            classifiers.len(),
            targets.len()
        );
        Ok(report)
    }
}

/// Render an evaluation report in the specified format
pub fn report(report: &EvaluationReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render an evaluation report using an OutputFormat enum
pub fn report_with_format(report: &EvaluationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report),
    }
}

/// One-line summary of a cut, e.g. for log messages
pub fn best_cut_line(best: &CutMetrics) -> String {
    format!(
        "cut {:.3}  P {:.3}  C {:.3}  F1 {:.3}",
        best.threshold, best.precision, best.completeness, best.f1
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::distribution::distribution_summary;
    use crate::models::Scores;
    use crate::render::RecordingRenderer;
    use crate::sweep::sweep_cuts;

    /// Two classifiers, one separating the classes and one not
    pub(crate) fn test_report() -> EvaluationReport {
        let targets = Targets::new(vec![1, 1, 0, 0]);
        let mut classifiers = NamedScores::new();
        classifiers.insert("forest".into(), Scores::from_flat(vec![0.9, 0.8, 0.2, 0.1]));
        classifiers.insert("coin".into(), Scores::from_flat(vec![0.5, 0.5, 0.5, 0.5]));

        let mut report = EvaluationReport::new("test run");
        for (name, scores) in &classifiers {
            let summary = distribution_summary(scores, &targets).expect("summary");
            report = report.with_distribution(name.as_str(), summary);
        }
        report.with_sweep(sweep_cuts(&classifiers, &targets, 5, true).expect("sweep"))
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!(
            OutputFormat::from_str("markdown").unwrap(),
            OutputFormat::Markdown
        );
        assert!(OutputFormat::from_str("sarif").is_err());
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_report_dispatch() {
        let report = test_report();
        for format in ["text", "json", "md"] {
            let out = super::report(&report, format).unwrap();
            assert!(out.contains("forest"), "{format} output missing classifier");
        }
        assert!(super::report(&report, "pdf").is_err());
    }

    #[test]
    fn test_best_cut_line() {
        let best = CutMetrics {
            threshold: 0.207,
            f1: 1.0,
            precision: 1.0,
            completeness: 1.0,
        };
        assert_eq!(best_cut_line(&best), "cut 0.207  P 1.000  C 1.000  F1 1.000");
    }

    #[test]
    fn test_evaluate_renders_every_chart() {
        let targets = Targets::new(vec![1, 0, 1, 0]);
        let mut classifiers = NamedScores::new();
        classifiers.insert("a".into(), Scores::from_flat(vec![0.9, 0.1, 0.7, 0.3]));
        classifiers.insert("b".into(), Scores::from_flat(vec![0.6, 0.4, 0.6, 0.5]));

        let mut renderer = RecordingRenderer::new();
        let report = EvaluationReport::evaluate(
            "run",
            &classifiers,
            &targets,
            &EvalConfig::default(),
            &mut renderer,
        )
        .unwrap();

        // one distribution chart per classifier plus the sweep
        assert_eq!(renderer.figures().len(), 3);
        assert_eq!(report.distributions.len(), 2);
        assert_eq!(report.sweep.as_ref().map(|s| s.cuts.len()), Some(24));
        assert!(!report.is_empty());
    }

    #[test]
    fn test_evaluate_without_sweep_plot() {
        let targets = Targets::new(vec![1, 0]);
        let mut classifiers = NamedScores::new();
        classifiers.insert("a".into(), Scores::from_flat(vec![0.9, 0.1]));

        let mut config = EvalConfig::default();
        config.sweep.plot = false;
        let mut renderer = RecordingRenderer::new();
        let report =
            EvaluationReport::evaluate("run", &classifiers, &targets, &config, &mut renderer)
                .unwrap();

        assert_eq!(renderer.figures().len(), 1);
        assert!(report.sweep.is_some());
    }
}
