//! Diagram theme.
//!
//! [`DiagramTheme`] supplies the pixel constants the layout engine is built
//! on (row spacing, pin size, pin margin, pin offset) together with the text
//! format and the colors used by the renderer.
//!
//! Row spacing and pin offset are derived from the text format: a pin row is
//! one line of text plus a margin, and the pin marker is vertically centered
//! within the line.
//!
//! Every theme carries a [`DiagramTheme::generation`] stamp, drawn from a
//! process-wide counter when the theme is created and again on every
//! mutation. Two themes only share a stamp if one is an unmodified clone of
//! the other. Consumers that cache values derived from the theme record the
//! stamp they were built against and discard their caches when it moves,
//! including when the whole theme is replaced.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{color::Color, draw::TextFormat};

/// Default pin marker size in pixels.
const DEFAULT_PIN_SIZE: i32 = 8;

/// Default margin around pins in pixels.
const DEFAULT_PIN_MARGIN: i32 = 2;

/// Default outline stroke width in pixels.
const DEFAULT_STROKE_WIDTH: f32 = 2.0;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Named colors of a theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub fill: Color,
    pub title_fill: Color,
    pub text: Color,
    pub outline: Color,
    pub highlight: Color,
    pub sub_graph_pin: Color,
    pub wire: Color,
    pub background: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        let parse = |css: &str| Color::new(css).expect("theme default colors are valid CSS");
        Self {
            fill: parse("white"),
            title_fill: parse("yellowgreen"),
            text: parse("black"),
            outline: parse("darkgray"),
            highlight: parse("dodgerblue"),
            sub_graph_pin: parse("lightsteelblue"),
            wire: parse("dimgray"),
            background: parse("white"),
        }
    }
}

/// Diagram rendering theme.
///
/// # Examples
///
/// ```
/// use circuitry_core::theme::DiagramTheme;
///
/// let theme = DiagramTheme::default();
/// // 10pt "Microsoft Sans Serif" renders 15px lines
/// assert_eq!(theme.font_height(), 15);
/// assert_eq!(theme.row_spacing(), 17);
/// assert_eq!(theme.pin_offset(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramTheme {
    text_format: TextFormat,
    pin_size: i32,
    pin_margin: i32,
    stroke_width: f32,
    colors: ThemeColors,
    custom_fills: HashMap<String, Color>,
    generation: u64,
}

impl DiagramTheme {
    /// Creates a theme using the given font.
    pub fn new(font_family: &str, font_size: f32) -> Self {
        Self {
            text_format: TextFormat::new(font_family, font_size),
            pin_size: DEFAULT_PIN_SIZE,
            pin_margin: DEFAULT_PIN_MARGIN,
            stroke_width: DEFAULT_STROKE_WIDTH,
            colors: ThemeColors::default(),
            custom_fills: HashMap::new(),
            generation: next_generation(),
        }
    }

    /// Returns the theme's identity stamp, renewed on every change and unique
    /// among themes that are not clones of each other.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn text_format(&self) -> &TextFormat {
        &self.text_format
    }

    /// Returns the height of one line of text in whole pixels.
    pub fn font_height(&self) -> i32 {
        self.text_format.font_height() as i32
    }

    /// Returns the row spacing in pixels between pins on an element.
    pub fn row_spacing(&self) -> i32 {
        self.font_height() + self.pin_margin
    }

    /// Returns the offset in pixels from a row's top to its pin marker.
    pub fn pin_offset(&self) -> i32 {
        (self.font_height() - self.pin_size) / 2
    }

    pub fn pin_size(&self) -> i32 {
        self.pin_size
    }

    /// Returns the margin in pixels between a pin and other markings such as labels.
    pub fn pin_margin(&self) -> i32 {
        self.pin_margin
    }

    /// Returns the stroke width used for outlines.
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn colors(&self) -> &ThemeColors {
        &self.colors
    }

    /// Returns the custom title fill registered for `key`, or the default title fill.
    pub fn fill_title_color(&self, key: &str) -> Color {
        self.custom_fills
            .get(key)
            .copied()
            .unwrap_or(self.colors.title_fill)
    }

    pub fn set_text_format(&mut self, text_format: TextFormat) {
        self.text_format = text_format;
        self.touch();
    }

    pub fn set_pin_size(&mut self, pin_size: i32) {
        self.pin_size = pin_size;
        self.touch();
    }

    pub fn set_pin_margin(&mut self, pin_margin: i32) {
        self.pin_margin = pin_margin;
        self.touch();
    }

    pub fn set_stroke_width(&mut self, stroke_width: f32) {
        self.stroke_width = stroke_width;
        self.touch();
    }

    pub fn set_colors(&mut self, colors: ThemeColors) {
        self.colors = colors;
        self.touch();
    }

    /// Registers a title fill for elements whose type is named `key`.
    ///
    /// Re-registering the same color is not a change.
    pub fn register_custom_fill(&mut self, key: &str, color: Color) {
        if self.custom_fills.get(key) != Some(&color) {
            self.custom_fills.insert(key.to_string(), color);
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.generation = next_generation();
    }
}

impl Default for DiagramTheme {
    fn default() -> Self {
        let format = TextFormat::default();
        Self::new(format.font_family(), format.font_size())
    }
}
