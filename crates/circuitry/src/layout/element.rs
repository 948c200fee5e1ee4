//! Element type layout.
//!
//! An element is a box with a title bar on top, one row per pin pair below
//! it, and an optional interior area (an icon, say) in the bottom corner.
//! Inputs are labeled from the left edge, outputs from the right edge.
//!
//! ```text
//! +--------------------+
//! | [+] TITLE          |
//! |[]a            out[]|
//! |[]b          +-----+|
//! |             | img ||
//! +-------------+-----+
//! ```
//!
//! Widths are driven by measured text: the title and every row's labels
//! must fit. Measured widths are truncated to whole pixels where they become
//! part of the layout.

use log::{debug, trace};

use circuitry_core::{
    geometry::{Rect, Size},
    semantic::{ElementType, Pin},
};

use crate::layout::{
    EXPANDER_SIZE, ElementSize, LayoutContext, LayoutError, LayoutInfo, MIN_ELEMENT_HEIGHT,
    MIN_ELEMENT_WIDTH,
};

/// Which form of pin names an element displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PinLabels {
    Full,
    /// Collapsed groups shorten overlong names.
    Truncated,
}

/// Computes the layout of an element of type `ty`.
///
/// `title` defaults to the type's name.
///
/// # Errors
///
/// Returns [`LayoutError::Measure`] if text measurement fails.
pub fn compute_element_layout(
    ty: &ElementType,
    title: Option<&str>,
    ctx: &LayoutContext<'_>,
) -> Result<LayoutInfo, LayoutError> {
    let title = title.unwrap_or(ty.name());
    let element_size = element_size(ty, Some(title), PinLabels::Full, ctx)?;
    Ok(LayoutInfo::new(title, ty, element_size))
}

/// Computes exterior size, interior rectangle and output pin offsets.
pub(crate) fn element_size(
    ty: &ElementType,
    title: Option<&str>,
    labels: PinLabels,
    ctx: &LayoutContext<'_>,
) -> Result<ElementSize, LayoutError> {
    let metrics = ctx.metrics();
    let row_spacing = metrics.row_spacing();
    let pin_margin = metrics.pin_margin();
    let pin_size = metrics.pin_size();

    let title_width = ctx.measure_width(title.unwrap_or(ty.name()))?;
    let mut width = title_width as i32 + 2 * pin_margin + 4 * EXPANDER_SIZE + 1;

    let inputs = ty.inputs();
    let outputs = ty.outputs();
    let max_rows = inputs.len().max(outputs.len());
    let min_rows = inputs.len().min(outputs.len());
    let interior_size = ty.interior_size();

    let mut height = row_spacing + 2 * pin_margin;
    height += (max_rows as i32 * row_spacing)
        .max(min_rows as i32 * row_spacing + interior_size.height() - pin_margin);

    let mut output_label_widths = vec![0; outputs.len()];
    let mut image_right = true;
    for row in 0..max_rows {
        let mut row_width = (2 * pin_margin) as f32;

        if let Some(pin) = inputs.get(row) {
            let label_width = measure_label(pin, labels, ctx)?;
            row_width += label_width + (pin_size + pin_margin) as f32;
        } else {
            image_right = false;
        }

        if let Some(pin) = outputs.get(row) {
            let label_width = measure_label(pin, labels, ctx)?;
            output_label_widths[row] = label_width as i32;
            row_width += label_width + (pin_size + pin_margin) as f32;
        }

        row_width += interior_size.width() as f32;
        trace!(row, row_width; "Measured pin row");

        width = width.max(row_width as i32);
    }

    if inputs.len() == outputs.len() {
        width = width.max(interior_size.width() + 2);
    }

    width = width.max(MIN_ELEMENT_WIDTH);
    height = height.max(MIN_ELEMENT_HEIGHT);

    let interior = Rect::new(
        if image_right {
            width - interior_size.width()
        } else {
            1
        },
        height - interior_size.height(),
        interior_size.width(),
        interior_size.height(),
    );

    let output_offsets = output_label_widths
        .into_iter()
        .map(|label_width| width - pin_margin - pin_size - label_width)
        .collect();

    debug!(element_type = ty.name(), width, height; "Computed element size");

    Ok(ElementSize::new(
        Size::new(width, height),
        interior,
        output_offsets,
    ))
}

fn measure_label(
    pin: &Pin,
    labels: PinLabels,
    ctx: &LayoutContext<'_>,
) -> Result<f32, LayoutError> {
    match labels {
        PinLabels::Full => ctx.measure_width(pin.name()),
        PinLabels::Truncated => ctx.measure_width(&ctx.truncation().apply(pin.name())),
    }
}
