use circuitry::{
    ExportError, Svg, SvgBuilder,
    draw::FixedAdvanceMeasurer,
    geometry::{Point, Rect},
    identifier::Id,
    layout::LayoutError,
    semantic::{Circuit, Element, ElementType, Group, Pin},
};

fn exporter() -> Svg {
    SvgBuilder::new("")
        .with_measurer(Box::new(FixedAdvanceMeasurer::new(7.0)))
        .build()
        .expect("Failed to build exporter")
}

/// An unnamed circuit with one buffer whose pins carry `pin_name`.
fn buffer_circuit(pin_name: &str) -> Circuit {
    let mut circuit = Circuit::new("");
    circuit.add_type(
        Id::new("buf"),
        ElementType::new("BUF")
            .with_input(Pin::new(pin_name))
            .with_output(Pin::new(pin_name)),
    );
    circuit.add_element(Element::new_leaf(
        Id::new("u1"),
        Id::new("buf"),
        Point::new(0, 0),
    ));
    circuit
}

#[test]
fn test_unnamed_circuits_do_not_share_layouts() {
    let short = buffer_circuit("a");
    let long = buffer_circuit("a_much_longer_pin_name");

    let mut svg = exporter();
    svg.render_circuit(Id::new("short.toml"), &short)
        .expect("Failed to render");
    let long_svg = svg
        .render_circuit(Id::new("long.toml"), &long)
        .expect("Failed to render")
        .to_string();

    let fresh_svg = exporter()
        .render_circuit(Id::new("long.toml"), &long)
        .expect("Failed to render")
        .to_string();
    assert_eq!(long_svg, fresh_svg);
}

#[test]
fn test_rerendering_a_document_reuses_its_layouts() {
    let short = buffer_circuit("a");
    let long = buffer_circuit("a_much_longer_pin_name");

    let mut svg = exporter();
    let first = svg
        .render_circuit(Id::new("short.toml"), &short)
        .expect("Failed to render")
        .to_string();
    svg.render_circuit(Id::new("long.toml"), &long)
        .expect("Failed to render");

    let again = svg
        .render_circuit(Id::new("short.toml"), &short)
        .expect("Failed to render")
        .to_string();

    assert_eq!(first, again);
    assert_eq!(svg.engine().active_document(), Some(Id::new("short.toml")));
    assert_eq!(svg.engine().cache().stats().computations, 1);
}

#[test]
fn test_duplicate_ids_in_nested_groups_are_rejected() {
    let inner = |child: Element| {
        Element::new_group(
            Id::new("inner"),
            Group::new(ElementType::new("INNER"))
                .with_expanded(true)
                .with_element(child),
            Rect::default(),
        )
    };
    let outer = |id: &str, child: Element| {
        Element::new_group(
            Id::new(id),
            Group::new(ElementType::new("OUTER"))
                .with_expanded(true)
                .with_element(child),
            Rect::default(),
        )
    };

    let mut circuit = buffer_circuit("a");
    circuit.add_element(outer(
        "left",
        inner(Element::new_leaf(Id::new("g1"), Id::new("buf"), Point::new(0, 0))),
    ));
    circuit.add_element(outer(
        "right",
        inner(Element::new_leaf(Id::new("g2"), Id::new("buf"), Point::new(0, 80))),
    ));

    let result = exporter().render_circuit(Id::new("nested.toml"), &circuit);
    match result {
        Err(ExportError::Layout(LayoutError::DuplicateElementId(id))) => {
            assert_eq!(id, Id::new("inner"));
        }
        other => panic!("Expected duplicate id error, got {other:?}"),
    }
}
