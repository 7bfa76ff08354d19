//! Evaluation settings
//!
//! Loaded from `pulsar-eval.toml` in the working directory, falling back to
//! the user config file and then to built-in defaults.
//!
//! # Configuration Format
//!
//! ```toml
//! # pulsar-eval.toml
//!
//! [threshold]
//! candidates = 100
//!
//! [sweep]
//! nbins = 25
//! norm = true
//! plot = true
//!
//! [plot]
//! output_dir = "plots"
//! width = 900
//! height = 600
//! distribution_bins = 25
//! positive_color = "#008000"
//! negative_color = "#ff0000"
//! alpha = 0.65
//! ```
//!
//! Every key is optional.

use crate::distribution::{DistributionOptions, CLASS_ALPHA};
use crate::histogram::DEFAULT_BINS;
use crate::render::Rgb;
use crate::sweep::SweepOptions;
use crate::threshold::{ThresholdOptions, DEFAULT_CANDIDATES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Project config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "pulsar-eval.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EvalConfig {
    #[serde(default)]
    pub threshold: ThresholdConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub plot: PlotConfig,
}

/// `[threshold]` section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ThresholdConfig {
    /// Candidate cuts scanned by the best-F1 search (default: 100)
    #[serde(default = "default_candidates")]
    pub candidates: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }
}

/// `[sweep]` section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SweepConfig {
    /// Histogram bins for the cut sweep (default: 25)
    #[serde(default = "default_bins")]
    pub nbins: usize,
    #[serde(default = "default_true")]
    pub norm: bool,
    #[serde(default = "default_true")]
    pub plot: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            nbins: default_bins(),
            norm: true,
            plot: true,
        }
    }
}

/// `[plot]` section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlotConfig {
    /// Directory SVG files are written to (default: plots)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    /// Canvas height; 0 sizes each figure by its panel count
    #[serde(default = "default_height")]
    pub height: u32,
    /// Bins of the pulsar/RFI distribution chart (default: 25)
    #[serde(default = "default_bins")]
    pub distribution_bins: usize,
    #[serde(default = "default_positive_color")]
    pub positive_color: String,
    #[serde(default = "default_negative_color")]
    pub negative_color: String,
    /// Histogram fill opacity (default: 0.65)
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            width: default_width(),
            height: default_height(),
            distribution_bins: default_bins(),
            positive_color: default_positive_color(),
            negative_color: default_negative_color(),
            alpha: default_alpha(),
        }
    }
}

fn default_candidates() -> usize {
    DEFAULT_CANDIDATES
}

fn default_bins() -> usize {
    DEFAULT_BINS
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_width() -> u32 {
    900
}

fn default_height() -> u32 {
    600
}

fn default_positive_color() -> String {
    Rgb::GREEN.to_hex()
}

fn default_negative_color() -> String {
    Rgb::RED.to_hex()
}

fn default_alpha() -> f64 {
    CLASS_ALPHA
}

impl EvalConfig {
    pub fn threshold_options(&self) -> ThresholdOptions {
        ThresholdOptions {
            candidates: self.threshold.candidates,
        }
    }

    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            nbins: self.sweep.nbins,
            plot: self.sweep.plot,
            norm: self.sweep.norm,
        }
    }

    /// Distribution chart options; unparseable colours fall back to the defaults
    pub fn distribution_options(&self) -> DistributionOptions {
        let alpha = if (0.0..=1.0).contains(&self.plot.alpha) {
            self.plot.alpha
        } else {
            warn!(
                "plot.alpha {} is outside [0, 1], using {}",
                self.plot.alpha, CLASS_ALPHA
            );
            CLASS_ALPHA
        };

        DistributionOptions {
            nbins: self.plot.distribution_bins,
            threshold: self.threshold_options(),
            positive_color: parse_color("positive_color", &self.plot.positive_color, Rgb::GREEN),
            negative_color: parse_color("negative_color", &self.plot.negative_color, Rgb::RED),
            alpha,
        }
    }
}

fn parse_color(key: &str, value: &str, fallback: Rgb) -> Rgb {
    Rgb::from_hex(value).unwrap_or_else(|| {
        warn!(
            "plot.{} '{}' is not a #rrggbb colour, using {}",
            key,
            value,
            fallback.to_hex()
        );
        fallback
    })
}

/// Get the user config file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pulsar-eval").join("config.toml"))
}

/// Load configuration for `dir`.
///
/// Tries `dir/pulsar-eval.toml`, then the user config file. A file that
/// fails to parse is skipped with a warning; defaults are returned when
/// nothing loads.
pub fn load_config(dir: &Path) -> EvalConfig {
    load_config_from(dir, user_config_path().as_deref())
}

fn load_config_from(dir: &Path, user_path: Option<&Path>) -> EvalConfig {
    let project_path = dir.join(CONFIG_FILE_NAME);
    let candidates = std::iter::once(project_path.as_path()).chain(user_path);

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_config_file(path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    EvalConfig::default()
}

/// Parse a single TOML config file
pub fn load_config_file(path: &Path) -> anyhow::Result<EvalConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EvalConfig = toml::from_str(&content)?;
    Ok(config)
}
