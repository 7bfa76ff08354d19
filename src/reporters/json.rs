//! JSON reporter
//!
//! Outputs the full EvaluationReport as pretty-printed JSON, histograms and
//! sweep series included. Useful for piping to jq or plotting elsewhere.

use super::EvaluationReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &EvaluationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
