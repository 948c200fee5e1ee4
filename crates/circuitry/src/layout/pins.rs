//! Pin geometry.
//!
//! Pins sit one per row below the title bar. The exception is a group pin on
//! an expanded group: it keeps the vertical position recorded on the pin, so
//! it lines up with the sub-element pin it exposes.

use circuitry_core::{
    geometry::Point,
    semantic::{Element, Pin, Side},
};

use crate::layout::{LayoutInfo, LayoutMetrics, PinStyle};

/// Returns the vertical offset of a pin from the top of its element.
///
/// An index past the end of the side's pin list is treated like a plain pin
/// at that row.
pub fn pin_offset(element: &Element, index: usize, side: Side, metrics: &LayoutMetrics) -> i32 {
    if let Some(group) = element.as_expanded_group() {
        if let Some(group_pin) = group.ty().pin(side, index).and_then(Pin::group_pin) {
            return group_pin.bounds().y()
                + metrics.group_pin_expanded_offset()
                + group.content_offset().y();
        }
    }

    metrics.row_spacing()
        + 2 * metrics.pin_margin()
        + index as i32 * metrics.row_spacing()
        + metrics.pin_offset()
        + metrics.pin_size() / 2
}

/// Returns a pin's position in the local space of the element's parent.
///
/// Inputs are on the element's left edge, outputs on its right edge as given
/// by the element's layout. With [`PinStyle::OnBorderFilled`] the position
/// moves outward by half a pin.
pub fn pin_position(
    element: &Element,
    info: &LayoutInfo,
    index: usize,
    side: Side,
    metrics: &LayoutMetrics,
) -> Point {
    let location = element.location();
    let half_pin = match metrics.pin_style() {
        PinStyle::Default => 0,
        PinStyle::OnBorderFilled => metrics.pin_size() / 2,
    };

    let x = match side {
        Side::Input => location.x() - half_pin,
        Side::Output => location.x() + info.size().width() + half_pin,
    };

    Point::new(x, location.y() + pin_offset(element, index, side, metrics))
}

#[cfg(test)]
mod tests {
    use circuitry_core::{
        geometry::{Rect, Size},
        identifier::Id,
        semantic::{ElementType, Group, GroupPin},
    };

    use super::*;
    use crate::layout::ElementSize;

    fn leaf_at(x: i32, y: i32) -> Element {
        Element::new_leaf(Id::new("u1"), Id::new("and"), Point::new(x, y))
    }

    fn info(width: i32) -> LayoutInfo {
        LayoutInfo::new(
            "AND",
            &ElementType::new("AND"),
            ElementSize::new(Size::new(width, 40), Rect::default(), Vec::new()),
        )
    }

    fn group_element(expanded: bool) -> Element {
        let ty = ElementType::new("G")
            .with_input(Pin::new_group("in", GroupPin::new(Rect::new(0, 30, 8, 8))))
            .with_output(Pin::new("plain"));
        let group = Group::new(ty)
            .with_expanded(expanded)
            .with_content_offset(Point::new(0, 5));
        Element::new_group(Id::new("g"), group, Rect::new(100, 200, 0, 0))
    }

    #[test]
    fn test_row_offsets() {
        let metrics = LayoutMetrics::default();
        let element = leaf_at(0, 0);
        // 17 + 4 + 0 + 3 + 4
        assert_eq!(pin_offset(&element, 0, Side::Input, &metrics), 28);
        assert_eq!(pin_offset(&element, 2, Side::Output, &metrics), 28 + 2 * 17);
    }

    #[test]
    fn test_out_of_range_index_uses_row_stride() {
        let metrics = LayoutMetrics::default();
        let element = group_element(true);
        assert_eq!(pin_offset(&element, 7, Side::Input, &metrics), 28 + 7 * 17);
    }

    #[test]
    fn test_expanded_group_pin_uses_recorded_position() {
        let metrics = LayoutMetrics::default();
        let element = group_element(true);
        // 30 + 2*17 + 5
        assert_eq!(pin_offset(&element, 0, Side::Input, &metrics), 69);
        // Plain pins on a group still use rows
        assert_eq!(pin_offset(&element, 0, Side::Output, &metrics), 28);
    }

    #[test]
    fn test_collapsed_group_pin_uses_rows() {
        let metrics = LayoutMetrics::default();
        let element = group_element(false);
        assert_eq!(pin_offset(&element, 0, Side::Input, &metrics), 28);
    }

    #[test]
    fn test_pin_positions() {
        let metrics = LayoutMetrics::default();
        let element = leaf_at(10, 20);
        let info = info(64);

        assert_eq!(
            pin_position(&element, &info, 0, Side::Input, &metrics),
            Point::new(10, 48)
        );
        assert_eq!(
            pin_position(&element, &info, 1, Side::Output, &metrics),
            Point::new(74, 65)
        );
    }

    #[test]
    fn test_on_border_pin_positions() {
        let metrics = LayoutMetrics::default().with_pin_style(PinStyle::OnBorderFilled);
        let element = leaf_at(10, 20);
        let info = info(64);

        assert_eq!(
            pin_position(&element, &info, 0, Side::Input, &metrics).x(),
            6
        );
        assert_eq!(
            pin_position(&element, &info, 0, Side::Output, &metrics).x(),
            78
        );
    }
}
