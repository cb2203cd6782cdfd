//! Text labels.

use crate::constants::FALLBACK_TEXT_WIDTH;
use serde::{Deserialize, Serialize};

/// A single-line text label. The element anchor is the baseline origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub text: String,
    pub font_size: f64,
}

impl Text {
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

/// Measures rendered text width.
///
/// Bounds computation only needs a width; height is always the font size.
pub trait TextMeasure {
    fn measure_width(&self, text: &str, font_size: f64) -> f64;
}

/// Used when no measurement context is available.
///
/// Every string is reported as [`FALLBACK_TEXT_WIDTH`] wide. This is an
/// approximation: long labels hit-test short and short labels hit-test long.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackMeasure;

impl TextMeasure for FallbackMeasure {
    fn measure_width(&self, _text: &str, _font_size: f64) -> f64 {
        FALLBACK_TEXT_WIDTH
    }
}

/// Average-advance estimate for a sans-serif face.
#[derive(Debug, Clone, Copy)]
pub struct AdvanceEstimate {
    /// Average glyph advance as a fraction of the font size.
    pub em_ratio: f64,
}

impl Default for AdvanceEstimate {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl TextMeasure for AdvanceEstimate {
    fn measure_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.em_ratio
    }
}
