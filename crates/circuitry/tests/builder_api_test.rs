use circuitry::{CircuitBuilder, CircuitryError, config::AppConfig};

const FULL_ADDER: &str = include_str!("../../../demos/full_adder.toml");
const NESTED_GROUPS: &str = include_str!("../../../demos/nested_groups.toml");
const COLLAPSED_LONG_PINS: &str = include_str!("../../../demos/collapsed_long_pins.toml");
const MANUAL_SIZE_GROUP: &str = include_str!("../../../demos/manual_size_group.toml");

fn builder() -> CircuitBuilder {
    CircuitBuilder::new(AppConfig::default()).with_fixed_advance_text(7.0)
}

fn builder_with_config(config: &str) -> CircuitBuilder {
    let config: AppConfig = toml::from_str(config).expect("Failed to parse config");
    CircuitBuilder::new(config).with_fixed_advance_text(7.0)
}

#[test]
fn test_builder_api_exists() {
    let _builder = CircuitBuilder::new(AppConfig::default());
    let _builder = CircuitBuilder::default();
}

#[test]
fn test_parse_simple_circuit() {
    let circuit = builder().parse(FULL_ADDER).expect("Failed to parse");

    assert_eq!(circuit.name(), "full adder");
    assert_eq!(circuit.types().len(), 3);
    assert_eq!(circuit.elements().len(), 5);
    assert_eq!(circuit.wires().len(), 4);
}

#[test]
fn test_render_svg() {
    let builder = builder();
    let circuit = builder.parse(FULL_ADDER).expect("Failed to parse");
    let svg = builder.render_svg(&circuit).expect("Failed to render");

    assert!(svg.contains("<svg"));
    assert!(svg.contains("</svg>"));
    assert!(svg.contains("viewBox"));
    assert!(svg.contains("XOR"));
    assert!(svg.contains("carry"));
    assert!(svg.contains("data-layer=\"wire\""));
    assert!(svg.contains("M "));
}

#[test]
fn test_render_nested_groups() {
    let builder = builder();
    let circuit = builder.parse(NESTED_GROUPS).expect("Failed to parse");
    let svg = builder.render_svg(&circuit).expect("Failed to render");

    assert!(svg.contains("HALF-ADD"));
    assert!(svg.contains("CARRY"));
    assert!(svg.contains("XOR"));
    assert!(svg.contains("data-layer=\"group\""));
    // The collapsed group's content is not drawn.
    assert!(!svg.contains("AND"));
}

#[test]
fn test_collapsed_group_pin_names_are_truncated() {
    let builder = builder();
    let circuit = builder.parse(COLLAPSED_LONG_PINS).expect("Failed to parse");
    let svg = builder.render_svg(&circuit).expect("Failed to render");

    assert!(svg.contains("address_str...nable_input"));
    assert!(!svg.contains("address_strobe_enable_input"));
    assert!(svg.contains("clk"));
}

#[test]
fn test_truncation_length_from_config() {
    let builder = builder_with_config(
        r#"
        [layout]
        max_collapsed_pin_name_length = 9
        "#,
    );
    let circuit = builder.parse(COLLAPSED_LONG_PINS).expect("Failed to parse");
    let svg = builder.render_svg(&circuit).expect("Failed to render");

    assert!(svg.contains("add...put"));
}

#[test]
fn test_render_manual_size_group() {
    let builder = builder();
    let circuit = builder.parse(MANUAL_SIZE_GROUP).expect("Failed to parse");
    let svg = builder.render_svg(&circuit).expect("Failed to render");

    assert!(svg.contains("FRAME"));
    assert!(svg.contains("WIDE"));
    assert!(svg.contains("width=\"300\""));
}

#[test]
fn test_builder_reusability() {
    let builder = builder();

    let first = builder.parse(FULL_ADDER).expect("Failed to parse");
    let second = builder.parse(COLLAPSED_LONG_PINS).expect("Failed to parse");

    let first_svg = builder.render_svg(&first).expect("Failed to render");
    let second_svg = builder.render_svg(&second).expect("Failed to render");
    let first_again = builder.render_svg(&first).expect("Failed to render");

    assert_ne!(first_svg, second_svg);
    assert_eq!(first_svg, first_again);
}

#[test]
fn test_invalid_document_returns_document_error() {
    let source = r#"
        name = "broken"

        [[elements]]
        id = "u1"
    "#;
    let result = builder().parse(source);

    match result {
        Err(CircuitryError::Document { message, src, .. }) => {
            assert!(message.contains("kind"));
            assert_eq!(src, source);
        }
        other => panic!("Expected document error, got {other:?}"),
    }
}

#[test]
fn test_duplicate_id_in_sibling_groups_is_document_error() {
    let source = r#"
        [types.and]
        name = "AND"
        inputs = [{ name = "a" }, { name = "b" }]
        outputs = [{ name = "y" }]

        [types.xor]
        name = "XOR"
        inputs = [{ name = "a" }, { name = "b" }]
        outputs = [{ name = "y" }]

        [[elements]]
        id = "left"

        [elements.kind.group]
        expanded = true
        type = { name = "L" }

        [[elements.kind.group.elements]]
        id = "inner"

        [elements.kind.group.elements.kind.group]
        expanded = true
        type = { name = "I" }

        [[elements.kind.group.elements.kind.group.elements]]
        id = "g1"
        kind = { leaf = "and" }

        [[elements]]
        id = "right"
        bounds = { x = 300 }

        [elements.kind.group]
        expanded = true
        type = { name = "R" }

        [[elements.kind.group.elements]]
        id = "inner"

        [elements.kind.group.elements.kind.group]
        expanded = true
        type = { name = "I" }

        [[elements.kind.group.elements.kind.group.elements]]
        id = "g2"
        kind = { leaf = "xor" }

        [[elements.kind.group.elements.kind.group.elements]]
        id = "g3"
        bounds = { y = 80 }
        kind = { leaf = "xor" }
    "#;
    let result = builder().parse(source);

    match result {
        Err(CircuitryError::Document { message, src, .. }) => {
            assert!(message.contains("inner"));
            assert_eq!(src, source);
        }
        other => panic!("Expected document error, got {other:?}"),
    }
}

#[test]
fn test_invalid_toml_has_span() {
    let source = "name = \n";
    let result = builder().parse(source);

    assert!(matches!(
        result,
        Err(CircuitryError::Document { span: Some(_), .. })
    ));
}

#[test]
fn test_unknown_element_type_is_layout_error() {
    let builder = builder();
    let circuit = builder
        .parse(
            r#"
            [[elements]]
            id = "u1"
            kind = { leaf = "nand" }
            "#,
        )
        .expect("Failed to parse");

    let result = builder.render_svg(&circuit);
    assert!(matches!(result, Err(CircuitryError::Layout(_))));
}

#[test]
fn test_invalid_color_is_config_error() {
    let builder = builder_with_config(
        r#"
        [style]
        wire_color = "not-a-color"
        "#,
    );
    let circuit = builder.parse(FULL_ADDER).expect("Failed to parse");

    let result = builder.render_svg(&circuit);
    assert!(matches!(result, Err(CircuitryError::Config(_))));
}

#[test]
fn test_truncation_length_too_small_is_layout_error() {
    let builder = builder_with_config(
        r#"
        [layout]
        max_collapsed_pin_name_length = 4
        "#,
    );
    let circuit = builder.parse(FULL_ADDER).expect("Failed to parse");

    let result = builder.render_svg(&circuit);
    assert!(matches!(result, Err(CircuitryError::Layout(_))));
}

#[test]
fn test_empty_circuit_renders() {
    let builder = builder();
    let circuit = builder.parse("").expect("Failed to parse");
    let svg = builder.render_svg(&circuit).expect("Failed to render");

    assert!(svg.contains("viewBox=\"0 0 100 100\""));
}
