//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - README files
//! - Pull request comments
//! - Experiment notes

use super::EvaluationReport;
use crate::sweep::CutSweep;
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &EvaluationReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    if !report.distributions.is_empty() {
        md.push_str(&render_best_cuts(report));
        md.push('\n');
    }

    if let Some(sweep) = &report.sweep {
        md.push_str(&render_sweep(sweep));
        md.push('\n');
    }

    md.push_str(&render_footer());
    Ok(md)
}

fn render_header(report: &EvaluationReport) -> String {
    let mut header = String::from("# Pulsar Classifier Evaluation\n\n");
    if !report.title.is_empty() {
        header.push_str(&format!("**Run:** {}\n\n", escape(&report.title)));
    }
    header.push_str(&format!(
        "Classifiers: {}\n",
        report
            .distributions
            .len()
            .max(report.sweep.as_ref().map_or(0, |s| s.overlap.len()))
    ));
    header
}

fn render_best_cuts(report: &EvaluationReport) -> String {
    let mut md = String::from("## Best Cuts\n\n");
    md.push_str("| Classifier | Cut | Precision | Completeness | F1 | Overlap | Pulsars | RFI |\n");
    md.push_str("|------------|----:|----------:|-------------:|---:|--------:|--------:|----:|\n");
    for (name, summary) in &report.distributions {
        let best = &summary.best;
        md.push_str(&format!(
            "| {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {} | {} |\n",
            escape(name),
            best.threshold,
            best.precision,
            best.completeness,
            best.f1,
            summary.overlap,
            summary.pulsars,
            summary.rfi
        ));
    }
    md
}

fn render_sweep(sweep: &CutSweep) -> String {
    let mut md = String::from("## Cut Sweep\n\n");
    if sweep.cuts.is_empty() {
        md.push_str("_No cuts swept._\n");
        return md;
    }

    md.push_str(&format!(
        "{} cuts from {:.2} to {:.2}.\n\n",
        sweep.cuts.len(),
        sweep.cuts[0],
        sweep.cuts[sweep.cuts.len() - 1]
    ));
    md.push_str("| Classifier | Min overlap | At cut | Recovered |\n");
    md.push_str("|------------|------------:|-------:|----------:|\n");
    for name in sweep.classifiers() {
        if let Some((cut, overlap)) = sweep.min_overlap_cut(name) {
            md.push_str(&format!(
                "| {} | {:.3} | {:.2} | {:.3} |\n",
                escape(name),
                overlap,
                cut,
                sweep.recovered_at(name, cut).unwrap_or(0.0)
            ));
        }
    }
    md
}

fn render_footer() -> String {
    "---\n\n_Overlap is measured on pulsar and RFI score histograms over [0, 1]._\n".to_string()
}

/// Keep table cells intact
fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}
