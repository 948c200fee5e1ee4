//! The circuit document root.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    identifier::Id,
    semantic::{Element, ElementType, PinRef},
};

/// A connection from an output pin to an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct Wire {
    from: PinRef,
    to: PinRef,
}

impl Wire {
    /// Creates a wire from output pin `from` to input pin `to`.
    pub fn new(from: PinRef, to: PinRef) -> Self {
        Self { from, to }
    }

    pub fn from(self) -> PinRef {
        self.from
    }

    pub fn to(self) -> PinRef {
        self.to
    }
}

/// A circuit document.
///
/// Element types are registered by [`Id`] so elements can refer to them
/// without holding the (mutable) type itself.
///
/// # Examples
///
/// ```
/// use circuitry_core::{
///     geometry::Point,
///     identifier::Id,
///     semantic::{Circuit, Element, ElementType, Pin},
/// };
///
/// let mut circuit = Circuit::new("blinker");
/// circuit.add_type(Id::new("not"), ElementType::new("NOT")
///     .with_input(Pin::new("in"))
///     .with_output(Pin::new("out")));
/// circuit.add_element(Element::new_leaf(Id::new("u1"), Id::new("not"), Point::new(0, 0)));
///
/// let element = circuit.find_element(Id::new("u1")).unwrap();
/// assert_eq!(circuit.type_of(element).unwrap().name(), "NOT");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Circuit {
    #[serde(default)]
    name: String,

    #[serde(default)]
    types: IndexMap<Id, ElementType>,

    #[serde(default)]
    elements: Vec<Element>,

    #[serde(default)]
    wires: Vec<Wire>,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the element type registry.
    pub fn types(&self) -> &IndexMap<Id, ElementType> {
        &self.types
    }

    pub fn element_type(&self, id: Id) -> Option<&ElementType> {
        self.types.get(&id)
    }

    pub fn element_type_mut(&mut self, id: Id) -> Option<&mut ElementType> {
        self.types.get_mut(&id)
    }

    /// Registers an element type, returning the type it replaced.
    pub fn add_type(&mut self, id: Id, ty: ElementType) -> Option<ElementType> {
        self.types.insert(id, ty)
    }

    /// Returns the top-level elements.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut Vec<Element> {
        &mut self.elements
    }

    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Returns the top-level wires.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn add_wire(&mut self, wire: Wire) {
        self.wires.push(wire);
    }

    /// Finds a top-level element by id.
    pub fn find_element(&self, id: Id) -> Option<&Element> {
        self.elements.iter().find(|element| element.id() == id)
    }

    /// Returns the first element id used more than once anywhere in the
    /// circuit, including inside groups.
    ///
    /// Layouts of groups are cached per element id, so ids must be unique
    /// across the whole document, not only among siblings.
    pub fn find_duplicate_id(&self) -> Option<Id> {
        let mut seen = HashSet::new();
        let mut pending: Vec<&Element> = self.elements.iter().collect();
        while let Some(element) = pending.pop() {
            if !seen.insert(element.id()) {
                return Some(element.id());
            }
            if let Some(group) = element.as_group() {
                pending.extend(group.elements());
            }
        }
        None
    }

    /// Resolves the type of `element` against this circuit's registry.
    pub fn type_of<'a>(&'a self, element: &'a Element) -> Option<&'a ElementType> {
        element.element_type(&self.types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{Point, Rect, Size},
        semantic::{Group, Side},
    };

    const HALF_ADDER: &str = r#"
        name = "half adder"

        [types.xor]
        name = "XOR"
        inputs = [{ name = "a" }, { name = "b" }]
        outputs = [{ name = "sum" }]

        [types.and]
        name = "AND"
        inputs = [{ name = "a" }, { name = "b" }]
        outputs = [{ name = "carry" }]
        interior_size = { width = 16, height = 16 }

        [[elements]]
        id = "x1"
        name = "sum gate"
        bounds = { x = 10, y = 10 }
        kind = { leaf = "xor" }

        [[elements]]
        id = "a1"
        bounds = { x = 10, y = 80 }
        kind = { leaf = "and" }

        [[elements]]
        id = "wrap"
        bounds = { x = 200, y = 10 }

        [elements.kind.group]
        expanded = true
        min_size = { width = 120, height = 90 }
        content_offset = { x = 4, y = 4 }

        [elements.kind.group.type]
        name = "Wrapper"
        inputs = [{ name = "in", group = { bounds = { y = 12 }, internal = { element = "n1", index = 0 } } }]

        [[elements.kind.group.elements]]
        id = "n1"
        bounds = { x = 0, y = 0 }
        kind = { leaf = "and" }

        [[wires]]
        from = { element = "x1", index = 0 }
        to = { element = "a1", index = 1 }
    "#;

    #[test]
    fn test_parse_circuit_from_toml() {
        let circuit: Circuit = toml::from_str(HALF_ADDER).unwrap();

        assert_eq!(circuit.name(), "half adder");
        assert_eq!(circuit.types().len(), 2);
        assert_eq!(circuit.elements().len(), 3);
        assert_eq!(circuit.wires().len(), 1);

        let and = circuit.element_type(Id::new("and")).unwrap();
        assert_eq!(and.interior_size(), Size::new(16, 16));
        assert_eq!(and.pin(Side::Output, 0).unwrap().name(), "carry");

        let x1 = circuit.find_element(Id::new("x1")).unwrap();
        assert_eq!(x1.name(), "sum gate");
        assert_eq!(x1.location(), Point::new(10, 10));
        assert_eq!(circuit.type_of(x1).unwrap().name(), "XOR");
    }

    #[test]
    fn test_parse_group_from_toml() {
        let circuit: Circuit = toml::from_str(HALF_ADDER).unwrap();
        let wrap = circuit.find_element(Id::new("wrap")).unwrap();
        let group = wrap.as_expanded_group().unwrap();

        assert!(group.auto_size());
        assert_eq!(group.min_size(), Size::new(120, 90));
        assert_eq!(group.content_offset(), Point::new(4, 4));
        assert_eq!(group.elements().len(), 1);
        assert!(group.find_element(Id::new("n1")).is_some());

        let pin = group.ty().pin(Side::Input, 0).unwrap();
        let group_pin = pin.group_pin().unwrap();
        assert_eq!(group_pin.bounds(), Rect::new(0, 12, 0, 0));
        assert_eq!(group_pin.internal(), Some(PinRef::new(Id::new("n1"), 0)));
    }

    #[test]
    fn test_parse_wire_from_toml() {
        let circuit: Circuit = toml::from_str(HALF_ADDER).unwrap();
        let wire = circuit.wires()[0];
        assert_eq!(wire.from(), PinRef::new(Id::new("x1"), 0));
        assert_eq!(wire.to(), PinRef::new(Id::new("a1"), 1));
    }

    #[test]
    fn test_unknown_element_kind_is_rejected() {
        let result: Result<Circuit, _> = toml::from_str(
            r#"
            [[elements]]
            id = "u1"
            kind = { widget = "x" }
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_type_registry_mutation() {
        let mut circuit = Circuit::new("c");
        assert!(circuit.add_type(Id::new("buf"), ElementType::new("BUF")).is_none());
        circuit
            .element_type_mut(Id::new("buf"))
            .unwrap()
            .set_name("BUFFER");
        assert_eq!(circuit.element_type(Id::new("buf")).unwrap().name(), "BUFFER");

        let replaced = circuit.add_type(Id::new("buf"), ElementType::new("B"));
        assert_eq!(replaced.unwrap().name(), "BUFFER");
    }

    fn wrapper(id: &str, inner: Element) -> Element {
        Element::new_group(
            Id::new(id),
            Group::new(ElementType::new("Wrapper"))
                .with_expanded(true)
                .with_element(inner),
            Rect::default(),
        )
    }

    #[test]
    fn test_unique_ids_across_groups() {
        let circuit: Circuit = toml::from_str(HALF_ADDER).unwrap();
        assert_eq!(circuit.find_duplicate_id(), None);
    }

    #[test]
    fn test_duplicate_id_in_different_groups() {
        let mut circuit = Circuit::new("nested");
        let inner = |id: &str| {
            Element::new_group(
                Id::new(id),
                Group::new(ElementType::new("Inner")),
                Rect::default(),
            )
        };
        circuit.add_element(wrapper("left", inner("inner")));
        circuit.add_element(wrapper("right", inner("inner")));

        assert_eq!(circuit.find_duplicate_id(), Some(Id::new("inner")));
    }

    #[test]
    fn test_group_id_reused_by_sub_element() {
        let mut circuit = Circuit::new("nested");
        let leaf = Element::new_leaf(Id::new("outer"), Id::new("and"), Point::new(0, 0));
        circuit.add_element(wrapper("outer", leaf));

        assert_eq!(circuit.find_duplicate_id(), Some(Id::new("outer")));
    }
}
