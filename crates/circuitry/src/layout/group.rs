//! Hierarchical group layout.
//!
//! A collapsed group looks exactly like a plain element of the group's type
//! (with overlong pin names shortened). An expanded group instead draws its
//! sub-elements inline, so its size is derived from theirs:
//!
//! 1. Union the boxes of all sub-elements, each sized by recursing into this
//!    module or [`element`](super::element).
//! 2. Stretch vertically so every group pin fits.
//! 3. Add room for the sub-elements' name labels, honor the minimum size, and
//!    pad with the sub-content margin.
//!
//! A group that is not auto-sized keeps the size stored in its bounds.

use circuitry_core::{
    geometry::{self, Rect, Size},
    semantic::{Element, ElementKind, Group, Pin},
};
use log::debug;

use crate::layout::{
    ElementSize, LayoutContext, LayoutError, LayoutInfo,
    element::{PinLabels, element_size},
};

/// Computes the layout of any element, dispatching on its kind.
///
/// Leaves are titled with their type's name, groups with their own type's
/// name.
///
/// # Errors
///
/// Returns [`LayoutError::UnknownElementType`] if a leaf (here or nested in
/// a group) refers to an unregistered type, or [`LayoutError::Measure`] if
/// text measurement fails.
pub fn compute_layout(
    element: &Element,
    ctx: &LayoutContext<'_>,
) -> Result<LayoutInfo, LayoutError> {
    let ty = ctx.resolve_type(element)?;
    let element_size = element_size_of(element, ctx)?;
    Ok(LayoutInfo::new(ty.name(), ty, element_size))
}

/// Computes the layout of a group element.
///
/// `bounds` are the group element's bounds in its parent's space; their size
/// is used only for manually sized groups.
///
/// # Errors
///
/// See [`compute_layout`].
pub fn compute_group_layout(
    group: &Group,
    bounds: Rect,
    ctx: &LayoutContext<'_>,
) -> Result<LayoutInfo, LayoutError> {
    let element_size = group_size(group, bounds, ctx)?;
    Ok(LayoutInfo::new(group.ty().name(), group.ty(), element_size))
}

/// Returns the union of the boxes of a group's sub-elements, before pins,
/// labels and margins are accounted for.
///
/// The first sub-element seeds the union. A group with no sub-elements
/// yields an empty rectangle at the origin.
///
/// # Errors
///
/// See [`compute_layout`].
pub fn sub_content_bounds(group: &Group, ctx: &LayoutContext<'_>) -> Result<Rect, LayoutError> {
    let boxes = group
        .elements()
        .iter()
        .map(|sub_element| {
            let size = element_size_of(sub_element, ctx)?.size();
            Ok(Rect::from_location_size(sub_element.location(), size))
        })
        .collect::<Result<Vec<_>, LayoutError>>()?;

    Ok(geometry::union_all(boxes).unwrap_or_default())
}

pub(crate) fn element_size_of(
    element: &Element,
    ctx: &LayoutContext<'_>,
) -> Result<ElementSize, LayoutError> {
    match element.kind() {
        ElementKind::Leaf(_) => {
            let ty = ctx.resolve_type(element)?;
            element_size(ty, None, PinLabels::Full, ctx)
        }
        ElementKind::Group(group) => group_size(group, element.bounds(), ctx),
    }
}

fn group_size(
    group: &Group,
    bounds: Rect,
    ctx: &LayoutContext<'_>,
) -> Result<ElementSize, LayoutError> {
    if !group.expanded() {
        return element_size(group.ty(), None, PinLabels::Truncated, ctx);
    }

    let metrics = ctx.metrics();
    let sub_content_offset = metrics.sub_content_offset();

    let group_bounds = if group.auto_size() {
        let content = sub_content_bounds(group, ctx)?;
        let (y_min, y_max) = group_pin_extent(group, content);

        let mut width = content.width() + sub_content_offset.x();
        // Sub-elements may have names drawn below them
        let mut height = (y_max - y_min).max(content.height()) + metrics.label_height();

        let min_size = group.min_size();
        width = width.max(min_size.width());
        height = height.max(min_size.height());

        content.union(Rect::new(content.x(), y_min, width, height))
    } else {
        bounds
    };

    let output_offsets = group
        .ty()
        .outputs()
        .iter()
        .map(|pin| {
            let label_width = ctx.measure_width(pin.name())? as i32;
            let offset =
                group_bounds.width() - metrics.pin_margin() - metrics.pin_size() - label_width;
            Ok(offset.max(0))
        })
        .collect::<Result<Vec<_>, LayoutError>>()?;

    let element_size = if !group.auto_size() {
        ElementSize::new(group_bounds.size(), Rect::default(), output_offsets)
    } else if group.min_size().is_empty() {
        let size = Size::new(
            group_bounds.width() + sub_content_offset.x(),
            group_bounds.height() + sub_content_offset.y(),
        );
        ElementSize::new(size, group_bounds, output_offsets)
    } else {
        ElementSize::new(group_bounds.size(), group_bounds, output_offsets)
    };

    debug!(
        group = group.ty().name(),
        auto_size = group.auto_size(),
        size:? = element_size.size();
        "Computed expanded group size"
    );

    Ok(element_size)
}

/// Returns the vertical extent `(y_min, y_max)` of the group pins.
///
/// Without input pins the top falls back to the content's top edge; without
/// any pins at all the bottom falls back to the content's bottom edge.
fn group_pin_extent(group: &Group, content: Rect) -> (i32, i32) {
    let pin_y = |pin: &Pin| pin.group_pin().map(|group_pin| group_pin.bounds().y());

    let inputs: Vec<i32> = group.ty().inputs().iter().filter_map(pin_y).collect();
    let outputs: Vec<i32> = group.ty().outputs().iter().filter_map(pin_y).collect();

    let mut y_min = inputs.iter().copied().min().unwrap_or(content.y());
    if let Some(output_min) = outputs.iter().copied().min() {
        y_min = y_min.min(output_min);
    }

    let y_max = inputs
        .iter()
        .chain(outputs.iter())
        .copied()
        .max()
        .unwrap_or(content.bottom());

    (y_min, y_max)
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use circuitry_core::{
        draw::{FixedAdvanceMeasurer, TextFormat},
        geometry::Point,
        identifier::Id,
        semantic::{ElementType, GroupPin},
    };

    use super::*;
    use crate::layout::{LayoutMetrics, PinNameTruncation, compute_element_layout};

    struct Fixture {
        measurer: FixedAdvanceMeasurer,
        format: TextFormat,
        types: IndexMap<Id, ElementType>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut types = IndexMap::new();
            types.insert(
                Id::new("buf"),
                ElementType::new("BUF")
                    .with_input(Pin::new("in"))
                    .with_output(Pin::new("out")),
            );
            Self {
                measurer: FixedAdvanceMeasurer::new(6.0),
                format: TextFormat::default(),
                types,
            }
        }

        fn ctx(&self) -> LayoutContext<'_> {
            LayoutContext::new(
                &self.measurer,
                &self.format,
                LayoutMetrics::default(),
                PinNameTruncation::default(),
                &self.types,
            )
        }
    }

    /// An expanded, manually sized group occupying exactly `bounds`.
    fn fixed_box(name: &str, bounds: Rect) -> Element {
        Element::new_group(
            Id::new(name),
            Group::new(ElementType::new(name))
                .with_expanded(true)
                .with_auto_size(false),
            bounds,
        )
    }

    fn group_pin(name: &str, y: i32) -> Pin {
        Pin::new_group(name, GroupPin::new(Rect::new(0, y, 8, 8)))
    }

    #[test]
    fn test_sub_content_union() {
        let fixture = Fixture::new();
        let group = Group::new(ElementType::new("G"))
            .with_expanded(true)
            .with_element(fixed_box("a", Rect::new(0, 0, 50, 30)))
            .with_element(fixed_box("b", Rect::new(60, 10, 40, 20)));

        let union = sub_content_bounds(&group, &fixture.ctx()).unwrap();
        assert_eq!(union, Rect::new(0, 0, 100, 30));
    }

    #[test]
    fn test_union_is_seeded_by_first_element() {
        let fixture = Fixture::new();
        let group = Group::new(ElementType::new("G"))
            .with_expanded(true)
            .with_element(fixed_box("a", Rect::new(20, 20, 10, 10)));

        let union = sub_content_bounds(&group, &fixture.ctx()).unwrap();
        assert_eq!(union, Rect::new(20, 20, 10, 10));
    }

    #[test]
    fn test_expanded_group_without_pins() {
        let fixture = Fixture::new();
        let group = Group::new(ElementType::new("G"))
            .with_expanded(true)
            .with_element(fixed_box("a", Rect::new(0, 0, 50, 30)))
            .with_element(fixed_box("b", Rect::new(60, 10, 40, 20)));

        let info = compute_group_layout(&group, Rect::default(), &fixture.ctx()).unwrap();

        // width 100 + 25, height max(30, 30) + 19, then margins of 25
        assert_eq!(info.interior(), Rect::new(0, 0, 125, 49));
        assert_eq!(info.size(), Size::new(150, 74));
    }

    #[test]
    fn test_group_pins_stretch_height() {
        let fixture = Fixture::new();
        let ty = ElementType::new("G")
            .with_input(group_pin("in", -10))
            .with_output(group_pin("q", 70));
        let group = Group::new(ty)
            .with_expanded(true)
            .with_element(fixed_box("a", Rect::new(0, 0, 50, 30)));

        let info = compute_group_layout(&group, Rect::default(), &fixture.ctx()).unwrap();

        // height = max(70 - -10, 30) + 19 = 99, anchored at y = -10
        assert_eq!(info.interior(), Rect::new(0, -10, 75, 99));
        assert_eq!(info.size(), Size::new(100, 124));
        // 75 - 2 - 8 - 6
        assert_eq!(info.output_offsets(), &[59]);
    }

    #[test]
    fn test_missing_inputs_fall_back_to_content_top() {
        let fixture = Fixture::new();
        let ty = ElementType::new("G").with_output(group_pin("q", 5));
        let group = Group::new(ty)
            .with_expanded(true)
            .with_element(fixed_box("a", Rect::new(0, 20, 50, 30)));

        let (y_min, y_max) = group_pin_extent(&group, Rect::new(0, 20, 50, 30));
        assert_eq!((y_min, y_max), (5, 5));

        let only_inputs = Group::new(ElementType::new("G").with_input(group_pin("i", 30)));
        let (y_min, y_max) = group_pin_extent(&only_inputs, Rect::new(0, 20, 50, 30));
        assert_eq!((y_min, y_max), (30, 30));

        let no_pins = Group::new(ElementType::new("G"));
        let (y_min, y_max) = group_pin_extent(&no_pins, Rect::new(0, 20, 50, 30));
        assert_eq!((y_min, y_max), (20, 50));

        let info = compute_group_layout(&group, Rect::default(), &fixture.ctx()).unwrap();
        assert!(info.interior().y() <= 5);
    }

    #[test]
    fn test_plain_pins_do_not_affect_extent() {
        let group = Group::new(
            ElementType::new("G")
                .with_input(Pin::new("plain"))
                .with_input(group_pin("grouped", 40)),
        );
        assert_eq!(group_pin_extent(&group, Rect::new(0, 0, 10, 10)), (40, 40));
    }

    #[test]
    fn test_min_size_suppresses_margins() {
        let fixture = Fixture::new();
        let ty = ElementType::new("G")
            .with_input(group_pin("in", -10))
            .with_output(group_pin("q", 70));
        let group = Group::new(ty)
            .with_expanded(true)
            .with_min_size(Size::new(300, 40))
            .with_element(fixed_box("a", Rect::new(0, 0, 50, 30)));

        let info = compute_group_layout(&group, Rect::default(), &fixture.ctx()).unwrap();

        assert_eq!(info.interior(), Rect::new(0, -10, 300, 99));
        assert_eq!(info.size(), Size::new(300, 99));
    }

    #[test]
    fn test_manual_size_uses_bounds() {
        let fixture = Fixture::new();
        let ty = ElementType::new("G").with_output(group_pin("q", 0));
        let group = Group::new(ty).with_expanded(true).with_auto_size(false);

        let info =
            compute_group_layout(&group, Rect::new(5, 5, 200, 100), &fixture.ctx()).unwrap();

        assert_eq!(info.size(), Size::new(200, 100));
        assert_eq!(info.interior(), Rect::default());
        assert_eq!(info.output_offsets(), &[200 - 2 - 8 - 6]);
    }

    #[test]
    fn test_collapsed_group_matches_plain_element() {
        let fixture = Fixture::new();
        let ty = ElementType::new("Counter")
            .with_input(Pin::new("clk"))
            .with_input(Pin::new("reset"))
            .with_output(Pin::new("q"))
            .with_interior_size(Size::new(12, 12));
        let group = Group::new(ty.clone())
            .with_element(fixed_box("inner", Rect::new(0, 0, 500, 500)));

        let ctx = fixture.ctx();
        let as_group = compute_group_layout(&group, Rect::default(), &ctx).unwrap();
        let as_element = compute_element_layout(&ty, None, &ctx).unwrap();

        assert_eq!(as_group, as_element);
    }

    #[test]
    fn test_collapsed_group_truncates_long_pin_names() {
        let fixture = Fixture::new();
        let ty = ElementType::new("G").with_output(Pin::new("abcdefghijklmnopqrstuvwxyz0123"));
        let group = Group::new(ty.clone());

        let ctx = fixture.ctx();
        let collapsed = compute_group_layout(&group, Rect::default(), &ctx).unwrap();
        let plain = compute_element_layout(&ty, None, &ctx).unwrap();

        // 25 displayed characters instead of 30
        assert_eq!(plain.size().width() - collapsed.size().width(), 5 * 6);
    }

    #[test]
    fn test_nested_groups_recurse() {
        let fixture = Fixture::new();
        let inner = Group::new(ElementType::new("Inner"))
            .with_expanded(true)
            .with_element(fixed_box("x", Rect::new(0, 0, 40, 40)));
        let outer = Group::new(ElementType::new("Outer"))
            .with_expanded(true)
            .with_element(Element::new_group(
                Id::new("inner"),
                inner,
                Rect::new(10, 10, 0, 0),
            ));

        let ctx = fixture.ctx();
        let union = sub_content_bounds(&outer, &ctx).unwrap();

        // Inner: interior (0,0,65,59), size (90,84)
        assert_eq!(union, Rect::new(10, 10, 90, 84));
    }

    #[test]
    fn test_leaf_sub_elements_use_registry() {
        let fixture = Fixture::new();
        let group = Group::new(ElementType::new("G"))
            .with_expanded(true)
            .with_element(Element::new_leaf(Id::new("b1"), Id::new("buf"), Point::new(0, 0)));

        let ctx = fixture.ctx();
        let buf = compute_element_layout(&fixture.types[&Id::new("buf")], None, &ctx).unwrap();
        let union = sub_content_bounds(&group, &ctx).unwrap();
        assert_eq!(union.size(), buf.size());
    }

    #[test]
    fn test_unknown_sub_element_type() {
        let fixture = Fixture::new();
        let group = Group::new(ElementType::new("G"))
            .with_expanded(true)
            .with_element(Element::new_leaf(Id::new("m"), Id::new("missing"), Point::new(0, 0)));

        let result = compute_group_layout(&group, Rect::default(), &fixture.ctx());
        assert!(matches!(result, Err(LayoutError::UnknownElementType(id)) if id == "missing"));
    }

    #[test]
    fn test_compute_layout_dispatches() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();

        let leaf = Element::new_leaf(Id::new("b1"), Id::new("buf"), Point::new(3, 4));
        let leaf_info = compute_layout(&leaf, &ctx).unwrap();
        assert_eq!(leaf_info.title(), "BUF");

        let manual = fixed_box("m", Rect::new(0, 0, 70, 30));
        let group_info = compute_layout(&manual, &ctx).unwrap();
        assert_eq!(group_info.title(), "m");
        assert_eq!(group_info.size(), Size::new(70, 30));
    }
}
