//! Text (terminal) reporter with colors and formatting

use super::EvaluationReport;
use crate::sweep::CutSweep;
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Longest classifier name shown before truncation
const NAME_WIDTH: usize = 20;

/// Render report as formatted terminal output
pub fn render(report: &EvaluationReport) -> Result<String> {
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{BOLD}Pulsar Classifier Evaluation{RESET}"));
    if !report.title.is_empty() {
        out.push_str(&format!("  {DIM}{}{RESET}", report.title));
    }
    out.push('\n');
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n\n"
    ));

    if report.is_empty() {
        out.push_str(&format!("{DIM}Nothing evaluated.{RESET}\n"));
        return Ok(out);
    }

    if !report.distributions.is_empty() {
        out.push_str(&format!("{BOLD}BEST CUTS{RESET}\n"));
        out.push_str(&format!(
            "{DIM}  {:<20}  {:>6}  {:>6}  {:>6}  {:>6}  {:>8}  {:>7}  {:>7}{RESET}\n",
            "CLASSIFIER", "CUT", "P", "C", "F1", "OVERLAP", "PULSARS", "RFI"
        ));
        for (name, summary) in &report.distributions {
            let best = &summary.best;
            out.push_str(&format!(
                "  {:<20}  {:>6.3}  {:>6.3}  {:>6.3}  {}  {:>8.3}  {:>7}  {:>7}\n",
                short_name(name),
                best.threshold,
                best.precision,
                best.completeness,
                format_f1(best.f1),
                summary.overlap,
                summary.pulsars,
                summary.rfi
            ));
        }
        out.push('\n');
    }

    if let Some(sweep) = &report.sweep {
        render_sweep(&mut out, sweep);
    }

    Ok(out)
}

fn render_sweep(out: &mut String, sweep: &CutSweep) {
    out.push_str(&format!(
        "{BOLD}CUT SWEEP{RESET} ({} cuts)\n",
        sweep.cuts.len()
    ));
    if sweep.cuts.is_empty() {
        out.push_str(&format!("  {DIM}no cuts below the last bin{RESET}\n\n"));
        return;
    }

    out.push_str(&format!(
        "{DIM}  {:<20}  {:>11}  {:>6}  {:>9}{RESET}\n",
        "CLASSIFIER", "MIN OVERLAP", "AT CUT", "RECOVERED"
    ));
    for name in sweep.classifiers() {
        let Some((cut, overlap)) = sweep.min_overlap_cut(name) else {
            continue;
        };
        let recovered = sweep.recovered_at(name, cut).unwrap_or(0.0);
        out.push_str(&format!(
            "  {:<20}  {:>11.3}  {:>6.2}  {:>9.3}\n",
            short_name(name),
            overlap,
            cut,
            recovered
        ));
    }
    out.push('\n');
}

/// Truncate long names on a char boundary
fn short_name(name: &str) -> String {
    if name.chars().count() > NAME_WIDTH {
        let head: String = name.chars().take(NAME_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// F1 with color
fn format_f1(f1: f64) -> String {
    let color = if f1 >= 0.9 {
        "\x1b[32m"
    } else if f1 >= 0.7 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    };
    format!("{color}{:>6.3}{RESET}", f1)
}
