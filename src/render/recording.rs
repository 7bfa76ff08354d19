//! In-memory renderer

use super::{ChartRenderer, Figure};
use crate::error::EvalResult;

/// Keeps every rendered figure instead of drawing it
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    figures: Vec<Figure>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    /// Most recently rendered figure
    pub fn last(&self) -> Option<&Figure> {
        self.figures.last()
    }

    /// Drain recorded figures
    pub fn take(&mut self) -> Vec<Figure> {
        std::mem::take(&mut self.figures)
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&mut self, figure: &Figure) -> EvalResult<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}
