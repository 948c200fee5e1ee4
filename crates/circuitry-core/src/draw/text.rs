//! Text formats and text measurement.
//!
//! Layout is driven by measured text: titles, pin labels and element names
//! all contribute to element sizes. Measurement goes through the
//! [`TextMeasurer`] trait so the layout engine can be fed by a real font
//! shaper ([`CosmicTextMeasurer`]) or a deterministic stand-in
//! ([`FixedAdvanceMeasurer`]).
//!
//! # Example
//!
//! ```
//! # use circuitry_core::draw::{FixedAdvanceMeasurer, TextFormat, TextMeasurer};
//! let format = TextFormat::new("monospace", 10.0);
//! let measurer = FixedAdvanceMeasurer::new(7.0);
//! let size = measurer.measure_text("clk", &format).unwrap();
//! assert_eq!(size.width(), 21.0);
//! ```

use std::sync::Mutex;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use thiserror::Error;

/// Conversion factor from points to pixels at standard DPI.
const POINTS_TO_PIXELS: f32 = 1.33;

/// Line height as a multiple of the pixel font size.
const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Failure of the text-measurement collaborator.
///
/// Layout cannot proceed without text metrics, so callers propagate this
/// error rather than recovering from it.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("font system is unavailable: {0}")]
    FontSystem(String),

    #[error("cannot measure text `{text}`: {reason}")]
    Text { text: String, reason: String },
}

/// Font family and size used for all diagram text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFormat {
    font_family: String,
    font_size: f32,
}

impl TextFormat {
    /// Creates a text format.
    ///
    /// # Arguments
    ///
    /// * `font_family` - Font family name, e.g. "Microsoft Sans Serif".
    /// * `font_size` - Font size in points.
    pub fn new(font_family: &str, font_size: f32) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Returns the font size in pixels.
    pub fn font_size_px(&self) -> f32 {
        self.font_size * POINTS_TO_PIXELS
    }

    /// Returns the height of one line of text in pixels.
    pub fn font_height(&self) -> f32 {
        self.font_size_px() * LINE_HEIGHT_FACTOR
    }
}

impl Default for TextFormat {
    fn default() -> Self {
        Self::new("Microsoft Sans Serif", 10.0)
    }
}

/// Rendered extent of a string.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextSize {
    width: f32,
    height: f32,
}

impl TextSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// Oracle for rendered text sizes.
pub trait TextMeasurer {
    /// Returns the rendered size of `text` in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError`] if the underlying font machinery fails.
    fn measure_text(&self, text: &str, format: &TextFormat) -> Result<TextSize, MeasureError>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure_text(&self, text: &str, format: &TextFormat) -> Result<TextSize, MeasureError> {
        (**self).measure_text(text, format)
    }
}

/// Measures text by shaping it with cosmic-text.
///
/// Keeps one [`FontSystem`] for its lifetime since loading system fonts is
/// expensive.
pub struct CosmicTextMeasurer {
    font_system: Mutex<FontSystem>,
}

impl CosmicTextMeasurer {
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }
}

impl Default for CosmicTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CosmicTextMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicTextMeasurer").finish_non_exhaustive()
    }
}

impl TextMeasurer for CosmicTextMeasurer {
    fn measure_text(&self, text: &str, format: &TextFormat) -> Result<TextSize, MeasureError> {
        if text.is_empty() {
            return Ok(TextSize::default());
        }

        let mut font_system = self
            .font_system
            .lock()
            .map_err(|err| MeasureError::FontSystem(err.to_string()))?;

        let metrics = Metrics::new(format.font_size_px(), format.font_height());

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(format.font_family()));

        // Unbounded so that text never wraps
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if layout_runs.is_empty() {
            // No font could shape the text; approximate from the character count.
            max_width = text.chars().count() as f32 * (format.font_size_px() * 0.55);
            total_height = metrics.line_height;
        } else {
            for run in &layout_runs {
                if let Some(last) = run.glyphs.last() {
                    max_width = max_width.max(last.x + last.w);
                }
                total_height += metrics.line_height;
            }
        }

        Ok(TextSize::new(max_width, total_height))
    }
}

/// Measures text with a constant advance per character.
///
/// Useful wherever exact, font-independent metrics are needed, such as
/// headless rendering and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceMeasurer {
    advance: f32,
}

impl FixedAdvanceMeasurer {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure_text(&self, text: &str, format: &TextFormat) -> Result<TextSize, MeasureError> {
        let lines = text.lines().count().max(1);
        let widest = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        Ok(TextSize::new(
            widest as f32 * self.advance,
            lines as f32 * format.font_height(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_text_format_default() {
        let format = TextFormat::default();
        assert_eq!(format.font_family(), "Microsoft Sans Serif");
        assert_approx_eq!(f32, format.font_size(), 10.0);
        assert_approx_eq!(f32, format.font_size_px(), 13.3, epsilon = 0.0001);
        assert_approx_eq!(f32, format.font_height(), 13.3 * 1.15, epsilon = 0.0001);
    }

    #[test]
    fn test_fixed_advance_single_line() {
        let measurer = FixedAdvanceMeasurer::new(6.0);
        let format = TextFormat::default();
        let size = measurer.measure_text("enable", &format).unwrap();
        assert_approx_eq!(f32, size.width(), 36.0);
        assert_approx_eq!(f32, size.height(), format.font_height());
    }

    #[test]
    fn test_fixed_advance_multiline_uses_widest_line() {
        let measurer = FixedAdvanceMeasurer::new(5.0);
        let format = TextFormat::default();
        let size = measurer.measure_text("a\nabcd\nab", &format).unwrap();
        assert_approx_eq!(f32, size.width(), 20.0);
        assert_approx_eq!(f32, size.height(), 3.0 * format.font_height());
    }

    #[test]
    fn test_fixed_advance_counts_chars_not_bytes() {
        let measurer = FixedAdvanceMeasurer::new(4.0);
        let size = measurer
            .measure_text("µΩ", &TextFormat::default())
            .unwrap();
        assert_approx_eq!(f32, size.width(), 8.0);
    }

    #[test]
    fn test_boxed_measurer_delegates() {
        let measurer: Box<dyn TextMeasurer> = Box::new(FixedAdvanceMeasurer::new(5.0));
        let size = measurer.measure_text("abc", &TextFormat::default()).unwrap();
        assert_approx_eq!(f32, size.width(), 15.0);
    }

    #[test]
    fn test_cosmic_empty_text_is_zero() {
        let measurer = CosmicTextMeasurer::new();
        let size = measurer.measure_text("", &TextFormat::default()).unwrap();
        assert_approx_eq!(f32, size.width(), 0.0);
        assert_approx_eq!(f32, size.height(), 0.0);
    }

    #[test]
    fn test_cosmic_longer_text_is_wider() {
        let measurer = CosmicTextMeasurer::new();
        let format = TextFormat::new("sans-serif", 12.0);
        let short = measurer.measure_text("in", &format).unwrap();
        let long = measurer.measure_text("input_enable", &format).unwrap();
        assert!(short.width() > 0.0);
        assert!(
            long.width() > short.width(),
            "long ({}) should be wider than short ({})",
            long.width(),
            short.width()
        );
    }
}
