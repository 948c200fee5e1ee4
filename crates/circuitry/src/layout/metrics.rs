//! Pixel metrics used by every layout computation.
//!
//! [`LayoutMetrics`] is a snapshot of the theme's pin constants combined
//! with the renderer settings that affect geometry. It is cheap to copy and
//! is rebuilt whenever the theme or the settings change.

use serde::Deserialize;

use circuitry_core::{
    geometry::{Point, Rect},
    theme::DiagramTheme,
};

/// Side length of the expand/collapse box drawn in a group's title bar.
pub const EXPANDER_SIZE: i32 = 8;

/// Smallest exterior width of any element.
pub const MIN_ELEMENT_WIDTH: i32 = 4;

/// Smallest exterior height of any element.
pub const MIN_ELEMENT_HEIGHT: i32 = 4;

/// How pins are drawn relative to the element border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinStyle {
    /// Hollow pin boxes inside the element border
    #[default]
    Default,
    /// Filled pin boxes centered on the element border
    OnBorderFilled,
}

/// Pin spacing and margins in pixels.
///
/// # Examples
///
/// ```
/// # use circuitry::layout::LayoutMetrics;
/// # use circuitry_core::{geometry::Point, theme::DiagramTheme};
/// let metrics = LayoutMetrics::from_theme(&DiagramTheme::default());
/// assert_eq!(metrics.row_spacing(), 17);
/// assert_eq!(metrics.sub_content_offset(), Point::new(25, 25));
/// assert_eq!(metrics.group_pin_expanded_offset(), 34);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    row_spacing: i32,
    pin_size: i32,
    pin_margin: i32,
    pin_offset: i32,
    sub_content_offset: Point,
    group_pin_expanded_offset: i32,
    pin_style: PinStyle,
}

impl LayoutMetrics {
    /// Derives metrics from the theme, using the default renderer settings.
    pub fn from_theme(theme: &DiagramTheme) -> Self {
        let row_spacing = theme.row_spacing();
        let pin_margin = theme.pin_margin();
        let margin = row_spacing + 4 * pin_margin;
        Self {
            row_spacing,
            pin_size: theme.pin_size(),
            pin_margin,
            pin_offset: theme.pin_offset(),
            sub_content_offset: Point::new(margin, margin),
            group_pin_expanded_offset: 2 * row_spacing,
            pin_style: PinStyle::default(),
        }
    }

    pub fn with_sub_content_offset(mut self, offset: Point) -> Self {
        self.sub_content_offset = offset;
        self
    }

    pub fn with_group_pin_expanded_offset(mut self, offset: i32) -> Self {
        self.group_pin_expanded_offset = offset;
        self
    }

    pub fn with_pin_style(mut self, pin_style: PinStyle) -> Self {
        self.pin_style = pin_style;
        self
    }

    pub fn row_spacing(&self) -> i32 {
        self.row_spacing
    }

    pub fn pin_size(&self) -> i32 {
        self.pin_size
    }

    pub fn pin_margin(&self) -> i32 {
        self.pin_margin
    }

    pub fn pin_offset(&self) -> i32 {
        self.pin_offset
    }

    /// Margin added around the sub-content of expanded groups.
    pub fn sub_content_offset(&self) -> Point {
        self.sub_content_offset
    }

    /// Vertical offset added to group pins drawn on an expanded group's border.
    pub fn group_pin_expanded_offset(&self) -> i32 {
        self.group_pin_expanded_offset
    }

    pub fn pin_style(&self) -> PinStyle {
        self.pin_style
    }

    /// Height of the title bar at the top of an element.
    pub fn title_height(&self) -> i32 {
        self.row_spacing + self.pin_margin
    }

    /// Height reserved below an element for its display name.
    pub fn label_height(&self) -> i32 {
        self.row_spacing + self.pin_margin
    }

    /// Margin applied per ancestor when computing a parent's world offset.
    pub fn nesting_margin(&self) -> i32 {
        self.row_spacing + 4 * self.pin_margin
    }

    /// Returns the expander box for an element whose top-left corner is `p`.
    pub fn expander_rect(&self, p: Point) -> Rect {
        Rect::new(
            p.x() + self.pin_margin + 1,
            p.y() + 2 * self.pin_margin + 1,
            EXPANDER_SIZE,
            EXPANDER_SIZE,
        )
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::from_theme(&DiagramTheme::default())
    }
}
