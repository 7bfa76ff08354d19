//! End-to-end tests for the evaluation pipeline
//!
//! These tests run the public API against synthetic classifier outputs to verify:
//! - Distribution charts and cut sweeps are written as SVG files
//! - Configuration files change the computed results
//! - Reports render in every output format
//!
//! Each test uses its own isolated temp directory.

use pulsar_eval::config::{load_config, CONFIG_FILE_NAME};
use pulsar_eval::render::{ChartRenderer, RecordingRenderer, SvgRenderer};
use pulsar_eval::reporters::report;
use pulsar_eval::{
    cut_performance, find_best_f1, hist_overlap, plot_histogram, EvalError, EvaluationReport,
    Histogram, NamedScores, Scores, SweepOptions, Targets,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

/// Labels plus three classifiers of decreasing quality
fn synthetic_run(n: usize) -> (NamedScores, Targets) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let labels: Vec<i64> = (0..n).map(|_| i64::from(rng.random_bool(0.3))).collect();

    let mut classifiers = NamedScores::new();
    for (name, spread) in [("sharp", 0.2), ("fuzzy", 0.5), ("blind", 1.0)] {
        let values: Vec<f64> = labels
            .iter()
            .map(|&l| {
                let centre = if l == 1 { 1.0 - spread / 2.0 } else { spread / 2.0 };
                let noise: f64 = rng.random_range(-spread / 2.0..spread / 2.0);
                (centre + noise).clamp(0.0, 1.0)
            })
            .collect();
        classifiers.insert(name.to_string(), Scores::from_flat(values));
    }
    (classifiers, Targets::new(labels))
}

fn svg_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .expect("read output dir")
        .map(|e| e.expect("dir entry").path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "svg"))
        .collect();
    files.sort();
    files
}

#[test]
fn test_distribution_chart_written_as_svg() {
    let temp = TempDir::new().unwrap();
    let (classifiers, targets) = synthetic_run(300);
    let mut renderer = SvgRenderer::new(temp.path()).with_stem("dist");

    let summary = plot_histogram(&classifiers["sharp"], &targets, "sharp", &mut renderer).unwrap();

    assert_eq!(summary.pulsars + summary.rfi, 300);
    assert_eq!(summary.pulsars, targets.positives());
    let files = svg_files(temp.path());
    assert_eq!(files.len(), 1);
    let svg = std::fs::read_to_string(&files[0]).unwrap();
    assert!(svg.contains(&format!("pulsars ({})", summary.pulsars)));
}

#[test]
fn test_sweep_chart_and_series() {
    let temp = TempDir::new().unwrap();
    let (classifiers, targets) = synthetic_run(400);
    let mut renderer = SvgRenderer::new(temp.path().join("sweep"));

    let sweep = cut_performance(&classifiers, &targets, &SweepOptions::default(), &mut renderer)
        .unwrap();

    assert_eq!(renderer.written().len(), 1);
    assert_eq!(sweep.cuts.len(), 24);
    let names: Vec<_> = sweep.classifiers().collect();
    assert_eq!(names, vec!["sharp", "fuzzy", "blind"]);

    for name in &names {
        let recovered = &sweep.recovered[*name];
        assert_eq!(recovered[0], 1.0);
        // recovery never increases as the cut rises
        assert!(recovered.windows(2).all(|w| w[1] <= w[0]));
        assert!(sweep.overlap[*name].iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    // a well separated classifier overlaps less than a blind one
    let total = |name: &str| sweep.overlap[name].iter().sum::<f64>();
    assert!(total("sharp") < total("blind"));
}

#[test]
fn test_best_cut_improves_with_separation() {
    let (classifiers, targets) = synthetic_run(500);
    let sharp = find_best_f1(&classifiers["sharp"], &targets).unwrap();
    let blind = find_best_f1(&classifiers["blind"], &targets).unwrap();
    assert!(sharp.f1 >= blind.f1);
    assert!(sharp.f1 > 0.9);
}

#[test]
fn test_overlap_symmetric_on_random_histograms() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..20 {
        let a: Vec<u64> = (0..25).map(|_| rng.random_range(0..50)).collect();
        let b: Vec<u64> = (0..25).map(|_| rng.random_range(0..50)).collect();
        let idx = rng.random_range(0..25);
        assert_eq!(
            hist_overlap(&a, &b, idx, false).unwrap(),
            hist_overlap(&b, &a, idx, false).unwrap()
        );
        let normalized = hist_overlap(&a, &b, idx, true).unwrap();
        assert!(normalized <= hist_overlap(&a, &b, idx, false).unwrap() + 1e-9);
    }
}

#[test]
fn test_config_file_drives_evaluation() {
    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("charts");
    std::fs::write(
        temp.path().join(CONFIG_FILE_NAME),
        format!(
            "[sweep]\nnbins = 10\nplot = false\n\n[plot]\noutput_dir = {:?}\nwidth = 640\nheight = 480\n",
            out_dir.display().to_string()
        ),
    )
    .unwrap();

    let config = load_config(temp.path());
    assert_eq!(config.sweep.nbins, 10);
    assert_eq!(config.plot.output_dir, out_dir);

    let (classifiers, targets) = synthetic_run(200);
    let mut renderer = SvgRenderer::from_config(&config.plot);
    let evaluation =
        EvaluationReport::evaluate("configured", &classifiers, &targets, &config, &mut renderer)
            .unwrap();

    // three distribution charts, no sweep chart
    assert_eq!(svg_files(&out_dir).len(), 3);
    assert_eq!(evaluation.sweep.as_ref().map(|s| s.cuts.len()), Some(9));

    let md = report(&evaluation, "markdown").unwrap();
    assert!(md.contains("| sharp |"));
    let json: serde_json::Value = serde_json::from_str(&report(&evaluation, "json").unwrap()).unwrap();
    assert_eq!(json["title"], "configured");
    let text = report(&evaluation, "text").unwrap();
    assert!(text.contains("9 cuts"));
}

#[test]
fn test_errors_surface_before_drawing() {
    let mut renderer = RecordingRenderer::new();
    let scores = Scores::from_flat(vec![0.1, 0.2, 0.3]);
    let targets = Targets::new(vec![1, 0]);

    let err = plot_histogram(&scores, &targets, "bad", &mut renderer).unwrap_err();
    assert!(matches!(err, EvalError::ShapeMismatch { left: 3, right: 2, .. }));
    assert!(renderer.figures().is_empty());

    assert!(matches!(
        Histogram::from_scores(&[0.5], 0),
        Err(EvalError::InvalidParameter(_))
    ));
}

/// Renderer that fails, to check errors propagate out of the routines
struct BrokenRenderer;

impl ChartRenderer for BrokenRenderer {
    fn render(&mut self, _figure: &pulsar_eval::render::Figure) -> pulsar_eval::EvalResult<()> {
        Err(EvalError::Render("no canvas".into()))
    }
}

#[test]
fn test_renderer_failure_propagates() {
    let (classifiers, targets) = synthetic_run(50);
    let result = cut_performance(&classifiers, &targets, &SweepOptions::default(), &mut BrokenRenderer);
    assert!(matches!(result, Err(EvalError::Render(_))));

    let quiet = SweepOptions {
        plot: false,
        ..Default::default()
    };
    assert!(cut_performance(&classifiers, &targets, &quiet, &mut BrokenRenderer).is_ok());
}
