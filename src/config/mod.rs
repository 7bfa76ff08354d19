//! Configuration module for pulsar-eval
//!
//! This module handles:
//! - Project-level configuration (pulsar-eval.toml)
//! - User-level fallback (~/.config/pulsar-eval/config.toml)
//! - Conversion into the option structs each evaluation routine takes

mod eval_config;

pub use eval_config::{
    load_config, load_config_file, user_config_path, EvalConfig, PlotConfig, SweepConfig,
    ThresholdConfig, CONFIG_FILE_NAME,
};
