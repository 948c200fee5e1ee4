//! SVG rendering for circuit elements.

use std::borrow::Cow;

use indexmap::IndexMap;
use log::trace;
use svg::node::element as svg_element;

use circuitry_core::{
    apply_stroke,
    draw::{LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Point, Rect, Size},
    identifier::Id,
    semantic::{Element, ElementType, Group, Pin, Side},
};

use super::{Palette, Svg};
use crate::{
    export,
    layout::{DrawingStack, EXPANDER_SIZE, LayoutInfo, LayoutMetrics, PinStyle, pin_position},
};

/// Corner radius of element bodies drawn with rounded borders.
const BORDER_RADIUS: i32 = 4;

impl Svg {
    /// Draws `element` and, for an expanded group, everything inside it.
    ///
    /// `stack` holds the element's ancestors; `doc_origin` maps top-level
    /// circuit space to document space.
    pub(super) fn render_element<'c>(
        &mut self,
        element: &'c Element,
        types: &IndexMap<Id, ElementType>,
        doc_origin: Point,
        stack: &mut DrawingStack<'c>,
        output: &mut LayeredOutput,
    ) -> Result<(), export::Error> {
        let info = self.engine.layout(element, types)?;
        let ty = element.element_type(types).ok_or_else(|| {
            export::Error::Render(format!("element `{}` has no type", element.id()))
        })?;
        let metrics = self.engine.metrics();
        let palette = self.palette();

        let parent_origin = doc_origin.add_point(self.engine.world_offset(stack));
        let bounds =
            Rect::from_location_size(parent_origin.add_point(element.location()), info.size());
        trace!(element:% = element.id(), bounds:?; "Drawing element");

        let expanded_group = element.as_expanded_group();
        let body_layer = if expanded_group.is_some() {
            RenderLayer::Group
        } else {
            RenderLayer::Body
        };

        output.add_to_layer(body_layer, Box::new(self.body(bounds, &palette)));
        output.add_to_layer(
            body_layer,
            Box::new(self.title_bar(bounds, ty, &metrics, &palette)),
        );
        let has_expander = element.as_group().is_some();
        let title = self.title_text(bounds, &info, has_expander, &metrics, &palette);
        output.add_to_layer(RenderLayer::Text, Box::new(title));

        if let Some(group) = element.as_group() {
            output.add_to_layer(
                RenderLayer::Body,
                Box::new(expander(bounds, group.expanded(), &metrics, &palette)),
            );
        }

        let pin_labels = PinLabelForm::for_element(element);
        for side in [Side::Input, Side::Output] {
            for (index, pin) in ty.pins(side).iter().enumerate() {
                let position =
                    parent_origin.add_point(pin_position(element, &info, index, side, &metrics));
                output.add_to_layer(
                    RenderLayer::Pin,
                    Box::new(pin_marker(position, side, &metrics, &palette)),
                );

                let label = pin_labels.apply(self, pin);
                let label_x = match side {
                    Side::Input => bounds.x() + 2 * metrics.pin_margin() + metrics.pin_size(),
                    Side::Output => {
                        let offset = info.output_offsets().get(index).copied();
                        bounds.x() + offset.unwrap_or_default()
                    }
                };
                let label = text(&label, Point::new(label_x, position.y()), "start", &palette);
                output.add_to_layer(RenderLayer::Text, Box::new(label));
            }
        }

        if expanded_group.is_none() && !info.interior().is_empty() {
            let interior = info.interior().translate(bounds.location());
            let placeholder = interior_placeholder(interior, &palette);
            output.add_to_layer(RenderLayer::Body, Box::new(placeholder));
        }

        if !element.name().is_empty() {
            let label_center = Point::new(
                bounds.x() + bounds.width() / 2,
                bounds.bottom() + metrics.label_height() / 2,
            );
            let name = text(element.name(), label_center, "middle", &palette);
            output.add_to_layer(RenderLayer::Text, Box::new(name));
        }

        if let Some(group) = expanded_group {
            stack.push(element);
            let result =
                self.render_group_content(element, group, types, doc_origin, stack, output);
            stack.pop();
            result?;
        }

        Ok(())
    }

    /// Draws the sub-elements, internal wires and group pins of an expanded
    /// group. The group is on top of `stack`.
    fn render_group_content<'c>(
        &mut self,
        element: &'c Element,
        group: &'c Group,
        types: &IndexMap<Id, ElementType>,
        doc_origin: Point,
        stack: &mut DrawingStack<'c>,
        output: &mut LayeredOutput,
    ) -> Result<(), export::Error> {
        let content_origin = doc_origin.add_point(self.engine.world_offset(stack));
        let palette = self.palette();
        let pin_size = self.engine.metrics().pin_size();

        for sub_element in group.elements() {
            self.render_element(sub_element, types, doc_origin, stack, output)?;
        }

        for pin in group.ty().inputs().iter().chain(group.ty().outputs()) {
            if let Some(group_pin) = pin.group_pin() {
                let mut pin_bounds = group_pin.bounds();
                if pin_bounds.is_empty() {
                    pin_bounds = pin_bounds.with_size(Size::new(pin_size, pin_size));
                }
                let marker = pin_bounds.translate(content_origin);
                output.add_to_layer(
                    RenderLayer::Pin,
                    Box::new(
                        svg_element::Rectangle::new()
                            .set("x", marker.x())
                            .set("y", marker.y())
                            .set("width", marker.width())
                            .set("height", marker.height())
                            .set("fill", palette.colors.sub_graph_pin.to_string())
                            .set("fill-opacity", palette.colors.sub_graph_pin.alpha()),
                    ),
                );
            }
        }

        self.render_wires(
            group.wires(),
            group.elements(),
            Some(element),
            types,
            content_origin,
            output,
        )
    }

    fn body(&self, bounds: Rect, palette: &Palette) -> svg_element::Rectangle {
        let stroke = StrokeDefinition::solid(palette.colors.outline, palette.stroke_width);
        let mut body = svg_element::Rectangle::new()
            .set("x", bounds.x())
            .set("y", bounds.y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", palette.colors.fill.to_string())
            .set("fill-opacity", palette.colors.fill.alpha());
        if self.rounded_border {
            body = body.set("rx", BORDER_RADIUS);
        }
        apply_stroke!(body, &stroke)
    }

    fn title_bar(
        &self,
        bounds: Rect,
        ty: &ElementType,
        metrics: &LayoutMetrics,
        palette: &Palette,
    ) -> svg_element::Rectangle {
        let bar = svg_element::Rectangle::new()
            .set("x", bounds.x())
            .set("y", bounds.y())
            .set("width", bounds.width())
            .set("height", metrics.title_height().min(bounds.height()));

        if self.title_background_filled {
            let color = self.engine.theme().fill_title_color(ty.name());
            bar.set("fill", color.to_string())
                .set("fill-opacity", color.alpha())
        } else {
            let stroke = StrokeDefinition::solid(palette.colors.outline, 1.0);
            apply_stroke!(bar.set("fill", "none"), &stroke)
        }
    }

    fn title_text(
        &self,
        bounds: Rect,
        info: &LayoutInfo,
        has_expander: bool,
        metrics: &LayoutMetrics,
        palette: &Palette,
    ) -> svg_element::Text {
        let mut x = bounds.x() + 2 * metrics.pin_margin();
        if has_expander {
            x += EXPANDER_SIZE + 2 * metrics.pin_margin();
        }
        let y = bounds.y() + metrics.title_height() / 2;
        text(info.title(), Point::new(x, y), "start", palette).set("font-weight", "bold")
    }
}

/// Which form of a pin name is displayed.
enum PinLabelForm {
    Full,
    Truncated,
}

impl PinLabelForm {
    fn for_element(element: &Element) -> Self {
        match element.as_group() {
            Some(group) if !group.expanded() => Self::Truncated,
            _ => Self::Full,
        }
    }

    fn apply<'p>(&self, svg: &Svg, pin: &'p Pin) -> Cow<'p, str> {
        match self {
            Self::Full => Cow::Borrowed(pin.name()),
            Self::Truncated => svg.engine.truncation().apply(pin.name()),
        }
    }
}

/// Draws a pin box at the wire attachment point `position`.
fn pin_marker(
    position: Point,
    side: Side,
    metrics: &LayoutMetrics,
    palette: &Palette,
) -> svg_element::Rectangle {
    let pin_size = metrics.pin_size();
    let pin_margin = metrics.pin_margin();
    let stroke = StrokeDefinition::solid(palette.colors.outline, 1.0);

    let (x, fill) = match (metrics.pin_style(), side) {
        (PinStyle::Default, Side::Input) => (position.x() + pin_margin, palette.colors.fill),
        (PinStyle::Default, Side::Output) => {
            (position.x() - pin_margin - pin_size, palette.colors.fill)
        }
        (PinStyle::OnBorderFilled, Side::Input) => (position.x(), palette.colors.outline),
        (PinStyle::OnBorderFilled, Side::Output) => {
            (position.x() - pin_size, palette.colors.outline)
        }
    };

    let marker = svg_element::Rectangle::new()
        .set("x", x)
        .set("y", position.y() - pin_size / 2)
        .set("width", pin_size)
        .set("height", pin_size)
        .set("fill", fill.to_string())
        .set("fill-opacity", fill.alpha());
    apply_stroke!(marker, &stroke)
}

/// Draws the expand/collapse box: a minus sign, plus a vertical bar when
/// collapsed.
fn expander(
    bounds: Rect,
    expanded: bool,
    metrics: &LayoutMetrics,
    palette: &Palette,
) -> svg_element::Group {
    let rect = metrics.expander_rect(bounds.location());
    let stroke = StrokeDefinition::solid(palette.colors.text, 1.0);
    let center = Point::new(rect.x() + rect.width() / 2, rect.y() + rect.height() / 2);

    let frame = svg_element::Rectangle::new()
        .set("x", rect.x())
        .set("y", rect.y())
        .set("width", rect.width())
        .set("height", rect.height())
        .set("fill", palette.colors.fill.to_string());
    let minus = svg_element::Line::new()
        .set("x1", rect.x() + 2)
        .set("y1", center.y())
        .set("x2", rect.right() - 2)
        .set("y2", center.y());

    let mut group = svg_element::Group::new()
        .set("class", "expander")
        .add(apply_stroke!(frame, &stroke))
        .add(apply_stroke!(minus, &stroke));
    if !expanded {
        let bar = svg_element::Line::new()
            .set("x1", center.x())
            .set("y1", rect.y() + 2)
            .set("x2", center.x())
            .set("y2", rect.bottom() - 2);
        group = group.add(apply_stroke!(bar, &stroke));
    }
    group
}

fn interior_placeholder(interior: Rect, palette: &Palette) -> svg_element::Rectangle {
    let stroke = StrokeDefinition::dashed(palette.colors.outline, 1.0);
    let rect = svg_element::Rectangle::new()
        .set("x", interior.x())
        .set("y", interior.y())
        .set("width", interior.width())
        .set("height", interior.height())
        .set("fill", "none");
    apply_stroke!(rect, &stroke)
}

/// Draws a single line of text vertically centered on `position.y`.
fn text(content: &str, position: Point, anchor: &str, palette: &Palette) -> svg_element::Text {
    svg_element::Text::new(content)
        .set("x", position.x())
        .set("y", position.y())
        .set("text-anchor", anchor)
        .set("dominant-baseline", "middle")
        .set("font-family", palette.font_family.as_str())
        .set("font-size", palette.font_size_px)
        .set("fill", palette.colors.text.to_string())
}
