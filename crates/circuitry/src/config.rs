//! Configuration types for circuit diagram rendering.
//!
//! This module provides configuration structures that control how circuits
//! are laid out and styled. All types implement [`serde::Deserialize`] for
//! loading from TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining layout and style settings.
//! - [`LayoutConfig`] - Pin style, truncation and group geometry settings.
//! - [`StyleConfig`] - Font, stroke width and colors.
//!
//! # Example
//!
//! ```
//! # use circuitry::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [layout]
//!     pin_style = "on-border-filled"
//!     max_collapsed_pin_name_length = 12
//!
//!     [style]
//!     font_size = 12.0
//!     wire_color = "navy"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.layout().max_collapsed_pin_name_length(), 12);
//! assert!(config.style().theme().is_ok());
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use circuitry_core::{color::Color, geometry::Point, theme::DiagramTheme};

use crate::layout::{DEFAULT_MAX_PIN_NAME_LENGTH, LayoutError, PinNameTruncation, PinStyle};

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Geometry settings of the layout engine and renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pin_style: PinStyle,

    /// Pin names on collapsed groups at least this long are shortened.
    max_collapsed_pin_name_length: usize,

    /// Margin around expanded group content. Follows the theme when unset.
    sub_content_offset: Option<Point>,

    /// Vertical shift of group pins on expanded groups. Follows the theme
    /// when unset.
    group_pin_expanded_offset: Option<i32>,

    /// Fill element title bars with the title color.
    title_background_filled: bool,

    /// Draw element bodies with rounded corners.
    rounded_border: bool,
}

impl LayoutConfig {
    pub fn pin_style(&self) -> PinStyle {
        self.pin_style
    }

    pub fn max_collapsed_pin_name_length(&self) -> usize {
        self.max_collapsed_pin_name_length
    }

    pub fn sub_content_offset(&self) -> Option<Point> {
        self.sub_content_offset
    }

    pub fn group_pin_expanded_offset(&self) -> Option<i32> {
        self.group_pin_expanded_offset
    }

    pub fn title_background_filled(&self) -> bool {
        self.title_background_filled
    }

    pub fn rounded_border(&self) -> bool {
        self.rounded_border
    }

    /// Returns the validated pin name truncation rule.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PinNameLengthTooSmall`] if the configured
    /// length is below the minimum.
    pub fn truncation(&self) -> Result<PinNameTruncation, LayoutError> {
        PinNameTruncation::new(self.max_collapsed_pin_name_length)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pin_style: PinStyle::default(),
            max_collapsed_pin_name_length: DEFAULT_MAX_PIN_NAME_LENGTH,
            sub_content_offset: None,
            group_pin_expanded_offset: None,
            title_background_filled: true,
            rounded_border: false,
        }
    }
}

/// Visual styling configuration for rendered circuits.
///
/// Fields that are not set fall back to the [`DiagramTheme`] defaults.
/// Colors are CSS color strings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    font_family: Option<String>,
    /// Font size in points.
    font_size: Option<f32>,
    stroke_width: Option<f32>,

    fill_color: Option<String>,
    title_fill_color: Option<String>,
    text_color: Option<String>,
    outline_color: Option<String>,
    sub_graph_pin_color: Option<String>,
    wire_color: Option<String>,
    background_color: Option<String>,

    /// Title fills keyed by element type name.
    title_fills: HashMap<String, String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_optional("background_color", self.background_color.as_deref())
    }

    /// Builds a theme from the default theme and the configured overrides.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending setting if a color cannot be
    /// parsed.
    pub fn theme(&self) -> Result<DiagramTheme, String> {
        let mut theme = DiagramTheme::default();

        if self.font_family.is_some() || self.font_size.is_some() {
            let default_format = theme.text_format().clone();
            theme = DiagramTheme::new(
                self.font_family
                    .as_deref()
                    .unwrap_or(default_format.font_family()),
                self.font_size.unwrap_or(default_format.font_size()),
            );
        }

        if let Some(stroke_width) = self.stroke_width {
            theme.set_stroke_width(stroke_width);
        }

        let mut colors = theme.colors().clone();
        let overrides = [
            ("fill_color", &self.fill_color, &mut colors.fill),
            ("title_fill_color", &self.title_fill_color, &mut colors.title_fill),
            ("text_color", &self.text_color, &mut colors.text),
            ("outline_color", &self.outline_color, &mut colors.outline),
            (
                "sub_graph_pin_color",
                &self.sub_graph_pin_color,
                &mut colors.sub_graph_pin,
            ),
            ("wire_color", &self.wire_color, &mut colors.wire),
            ("background_color", &self.background_color, &mut colors.background),
        ];
        for (field, value, slot) in overrides {
            if let Some(color) = parse_optional(field, value.as_deref())? {
                *slot = color;
            }
        }
        if colors != *theme.colors() {
            theme.set_colors(colors);
        }

        for (type_name, css) in &self.title_fills {
            let color = Color::new(css)
                .map_err(|err| format!("Invalid title fill for `{type_name}` in config: {err}"))?;
            theme.register_custom_fill(type_name, color);
        }

        Ok(theme)
    }
}

fn parse_optional(field: &str, value: Option<&str>) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {field} in config: {err}"))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().pin_style(), PinStyle::Default);
        assert_eq!(config.layout().max_collapsed_pin_name_length(), 25);
        assert_eq!(config.layout().sub_content_offset(), None);
        assert!(config.layout().title_background_filled());
        assert!(!config.layout().rounded_border());
        assert_eq!(config.style().background_color(), Ok(None));
    }

    #[test]
    fn test_empty_toml_matches_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.layout().max_collapsed_pin_name_length(), 25);
        assert!(config.layout().title_background_filled());
    }

    #[test]
    fn test_layout_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            pin_style = "on-border-filled"
            sub_content_offset = { x = 8, y = 10 }
            group_pin_expanded_offset = 20
            rounded_border = true
            "#,
        )
        .unwrap();

        let layout = config.layout();
        assert_eq!(layout.pin_style(), PinStyle::OnBorderFilled);
        assert_eq!(layout.sub_content_offset(), Some(Point::new(8, 10)));
        assert_eq!(layout.group_pin_expanded_offset(), Some(20));
        assert!(layout.rounded_border());
    }

    #[test]
    fn test_truncation_is_validated() {
        let config: AppConfig =
            toml::from_str("[layout]\nmax_collapsed_pin_name_length = 3").unwrap();
        assert!(matches!(
            config.layout().truncation(),
            Err(LayoutError::PinNameLengthTooSmall { value: 3, min: 5 })
        ));
    }

    #[test]
    fn test_style_overrides_theme() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            font_family = "DejaVu Sans"
            stroke_width = 1.5
            wire_color = "red"

            [style.title_fills]
            AND = "orange"
            "#,
        )
        .unwrap();

        let theme = config.style().theme().unwrap();
        assert_eq!(theme.text_format().font_family(), "DejaVu Sans");
        assert_approx_eq!(f32, theme.text_format().font_size(), 10.0);
        assert_approx_eq!(f32, theme.stroke_width(), 1.5);
        assert_eq!(theme.colors().wire, Color::new("red").unwrap());
        assert_eq!(theme.fill_title_color("AND"), Color::new("orange").unwrap());
        assert_eq!(theme.fill_title_color("OR"), theme.colors().title_fill);
    }

    #[test]
    fn test_invalid_color_names_field() {
        let config: AppConfig = toml::from_str("[style]\noutline_color = \"nope\"").unwrap();
        let err = config.style().theme().unwrap_err();
        assert!(err.contains("outline_color"), "{err}");
    }
}
