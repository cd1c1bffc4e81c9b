//! Resources referenced by drawing instructions
//!
//! Text shaping, image decoding and media playback live elsewhere. These
//! types carry only what bounds computation and hit testing need from them.

use prism_core::{Point, Rect, Size};

// ─────────────────────────────────────────────────────────────────────────────
// Glyph runs
// ─────────────────────────────────────────────────────────────────────────────

/// Vertical font metrics in em units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the tallest glyph
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the lowest glyph
    pub descent: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            ascent: 0.8,
            descent: 0.2,
        }
    }
}

/// Shaped run of glyphs sharing a font and size
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphRun {
    pub baseline_origin: Point,
    pub em_size: f64,
    pub glyph_indices: Vec<u16>,
    /// Advance of each glyph in user units
    pub advance_widths: Vec<f64>,
    pub metrics: FontMetrics,
}

impl GlyphRun {
    pub fn new(
        baseline_origin: Point,
        em_size: f64,
        glyph_indices: Vec<u16>,
        advance_widths: Vec<f64>,
    ) -> Self {
        Self {
            baseline_origin,
            em_size,
            glyph_indices,
            advance_widths,
            metrics: FontMetrics::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: FontMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Ink box relative to the baseline origin
    ///
    /// Approximated from the advances and the font's vertical metrics.
    /// Empty when the run has no glyphs.
    pub fn compute_ink_bounding_box(&self) -> Rect {
        if self.glyph_indices.is_empty() {
            return Rect::EMPTY;
        }

        let width: f64 = self.advance_widths.iter().sum();
        let em = self.em_size.abs();
        Rect::new(
            0.0,
            -self.metrics.ascent * em,
            width.max(0.0),
            (self.metrics.ascent + self.metrics.descent) * em,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Images, media, guidelines, effects
// ─────────────────────────────────────────────────────────────────────────────

/// Decoded image
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageSource {
    /// Natural size in device-independent units
    pub size: Size,
    pub uri: Option<String>,
}

impl ImageSource {
    pub fn new(size: Size) -> Self {
        Self { size, uri: None }
    }
}

/// Video source drawn into a rectangle
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaPlayer {
    pub source: Option<String>,
}

/// Pixel snapping guidelines
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GuidelineSet {
    pub guidelines_x: Vec<f64>,
    pub guidelines_y: Vec<f64>,
}

/// Legacy bitmap effect
#[derive(Clone, Debug, PartialEq)]
pub enum BitmapEffect {
    Blur { radius: f64 },
    DropShadow { depth: f64, softness: f64 },
    OuterGlow { size: f64 },
}

/// Input region for a [`BitmapEffect`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BitmapEffectInput {
    pub area_to_apply: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ink_bounding_box() {
        let run = GlyphRun::new(Point::new(10.0, 20.0), 10.0, vec![1, 2, 3], vec![5.0, 5.0, 6.0]);
        assert_eq!(run.compute_ink_bounding_box(), Rect::new(0.0, -8.0, 16.0, 10.0));
    }

    #[test]
    fn test_empty_run() {
        let run = GlyphRun::new(Point::ZERO, 12.0, Vec::new(), Vec::new());
        assert!(run.compute_ink_bounding_box().is_empty());
    }
}
