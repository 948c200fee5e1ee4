//! SVG rendering for wires.

use indexmap::IndexMap;
use log::warn;
use svg::node::element as svg_element;

use circuitry_core::{
    apply_stroke,
    draw::{LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::Point,
    identifier::Id,
    semantic::{Element, ElementType, Pin, PinRef, Side, Wire},
};

use super::Svg;
use crate::export;

impl Svg {
    /// Draws the wires of one scope: the top level of a circuit or the inside
    /// of an expanded group.
    ///
    /// `siblings` are the elements of the scope and `scope_origin` maps the
    /// scope's local space to document space. Inside a group, `owner` is the
    /// group element, so wires can attach to its group pins. Wires with an
    /// endpoint that cannot be resolved are skipped.
    pub(super) fn render_wires(
        &mut self,
        wires: &[Wire],
        siblings: &[Element],
        owner: Option<&Element>,
        types: &IndexMap<Id, ElementType>,
        scope_origin: Point,
        output: &mut LayeredOutput,
    ) -> Result<(), export::Error> {
        let palette = self.palette();
        let stroke = StrokeDefinition::solid(palette.colors.wire, palette.stroke_width / 2.0);

        for wire in wires {
            let start = self.wire_endpoint(wire.from(), Side::Output, siblings, owner, types)?;
            let end = self.wire_endpoint(wire.to(), Side::Input, siblings, owner, types)?;
            let (Some(start), Some(end)) = (start, end) else {
                warn!(wire:?; "Skipping wire with unresolved endpoint");
                continue;
            };

            let path = svg_element::Path::new()
                .set(
                    "d",
                    orthogonal_path_data(
                        start.add_point(scope_origin),
                        end.add_point(scope_origin),
                    ),
                )
                .set("fill", "none");
            output.add_to_layer(RenderLayer::Wire, Box::new(apply_stroke!(path, &stroke)));
        }

        Ok(())
    }

    /// Resolves one end of a wire in the scope's local space.
    ///
    /// `side` is the side of the pin on a sibling element. A reference to the
    /// owning group flips the side: a wire leaving a group pin starts at one
    /// of the group's inputs and ends at one of its outputs.
    fn wire_endpoint(
        &mut self,
        pin: PinRef,
        side: Side,
        siblings: &[Element],
        owner: Option<&Element>,
        types: &IndexMap<Id, ElementType>,
    ) -> Result<Option<Point>, export::Error> {
        if let Some(owner) = owner.filter(|owner| owner.id() == pin.element()) {
            let group_side = match side {
                Side::Output => Side::Input,
                Side::Input => Side::Output,
            };
            let group_pin = owner
                .as_group()
                .and_then(|group| group.ty().pin(group_side, pin.index()))
                .and_then(Pin::group_pin);
            let Some(group_pin) = group_pin else {
                return Ok(None);
            };

            let bounds = group_pin.bounds();
            let y = bounds.y() + bounds.height() / 2;
            let x = match side {
                Side::Output => bounds.right(),
                Side::Input => bounds.x(),
            };
            return Ok(Some(Point::new(x, y)));
        }

        let Some(element) = siblings.iter().find(|element| element.id() == pin.element()) else {
            return Ok(None);
        };
        let has_pin = element
            .element_type(types)
            .and_then(|ty| ty.pin(side, pin.index()))
            .is_some();
        if !has_pin {
            return Ok(None);
        }

        let position = self
            .engine
            .pin_position(element, types, pin.index(), side)?;
        Ok(Some(position))
    }
}

/// Creates path data for a wire from an output pin to an input pin, with
/// only horizontal and vertical segments.
///
/// The wire leaves and enters horizontally and turns halfway between the
/// two pins.
fn orthogonal_path_data(start: Point, end: Point) -> String {
    let mid_x = start.x() + (end.x() - start.x()) / 2;

    format!(
        "M {} {} L {} {} L {} {} L {} {}",
        start.x(),
        start.y(),
        mid_x,
        start.y(),
        mid_x,
        end.y(),
        end.x(),
        end.y()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_path_turns_halfway() {
        let data = orthogonal_path_data(Point::new(10, 20), Point::new(50, 60));
        assert_eq!(data, "M 10 20 L 30 20 L 30 60 L 50 60");
    }

    #[test]
    fn test_orthogonal_path_backwards() {
        let data = orthogonal_path_data(Point::new(100, 0), Point::new(40, 10));
        assert_eq!(data, "M 100 0 L 70 0 L 70 10 L 40 10");
    }
}
