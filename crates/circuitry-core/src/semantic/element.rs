//! Element types, pins and element instances.
//!
//! An [`Element`] is either a leaf referring to a registered [`ElementType`]
//! by [`Id`], or a [`Group`] that carries its own type (its boundary pins)
//! together with nested sub-elements. The tagged [`ElementKind`] replaces any
//! runtime "is this a group?" probing: layout code matches on it.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    geometry::{Point, Rect, Size},
    identifier::Id,
    semantic::Wire,
};

/// The side of an element a pin sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left edge
    Input,
    /// Right edge
    Output,
}

/// Reference to a pin of an element by its row index on one side.
///
/// Which side is implied by usage: wire sources are outputs, wire targets
/// are inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct PinRef {
    element: Id,
    index: usize,
}

impl PinRef {
    pub fn new(element: Id, index: usize) -> Self {
        Self { element, index }
    }

    pub fn element(self) -> Id {
        self.element
    }

    pub fn index(self) -> usize {
        self.index
    }
}

/// Extra data carried by a pin on a group's boundary.
///
/// `bounds` is the pin's box in the group's local space; its `y` is where
/// the pin sits when the group is expanded. `internal` names the sub-element
/// pin the group pin exposes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroupPin {
    #[serde(default)]
    bounds: Rect,

    #[serde(default)]
    internal: Option<PinRef>,
}

impl GroupPin {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            internal: None,
        }
    }

    /// Connects this group pin to a pin of a sub-element.
    pub fn with_internal(mut self, internal: PinRef) -> Self {
        self.internal = Some(internal);
        self
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn internal(&self) -> Option<PinRef> {
        self.internal
    }
}

/// A named connection point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pin {
    name: String,

    #[serde(default)]
    group: Option<GroupPin>,
}

impl Pin {
    /// Creates a plain pin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: None,
        }
    }

    /// Creates a group pin.
    pub fn new_group(name: impl Into<String>, group_pin: GroupPin) -> Self {
        Self {
            name: name.into(),
            group: Some(group_pin),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the group-pin data, or `None` for a plain pin.
    pub fn group_pin(&self) -> Option<&GroupPin> {
        self.group.as_ref()
    }
}

/// A kind of circuit element: its pins and reserved interior area.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElementType {
    name: String,

    #[serde(default)]
    inputs: Vec<Pin>,

    #[serde(default)]
    outputs: Vec<Pin>,

    /// Space reserved for custom content such as an icon.
    #[serde(default)]
    interior_size: Size,
}

impl ElementType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            interior_size: Size::default(),
        }
    }

    pub fn with_input(mut self, pin: Pin) -> Self {
        self.inputs.push(pin);
        self
    }

    pub fn with_output(mut self, pin: Pin) -> Self {
        self.outputs.push(pin);
        self
    }

    pub fn with_interior_size(mut self, interior_size: Size) -> Self {
        self.interior_size = interior_size;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn inputs(&self) -> &[Pin] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Pin] {
        &self.outputs
    }

    /// Returns the pins on `side`.
    pub fn pins(&self, side: Side) -> &[Pin] {
        match side {
            Side::Input => &self.inputs,
            Side::Output => &self.outputs,
        }
    }

    /// Returns the pin at row `index` on `side`, if there is one.
    pub fn pin(&self, side: Side, index: usize) -> Option<&Pin> {
        self.pins(side).get(index)
    }

    pub fn add_input(&mut self, pin: Pin) {
        self.inputs.push(pin);
    }

    pub fn add_output(&mut self, pin: Pin) {
        self.outputs.push(pin);
    }

    pub fn interior_size(&self) -> Size {
        self.interior_size
    }
}

fn default_auto_size() -> bool {
    true
}

/// A container element holding nested sub-elements.
///
/// The group's own pins live on `ty`; group pins are expected to carry
/// [`GroupPin`] data so they can be placed when the group is expanded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    #[serde(rename = "type")]
    ty: ElementType,

    #[serde(default)]
    expanded: bool,

    #[serde(default = "default_auto_size")]
    auto_size: bool,

    #[serde(default)]
    elements: Vec<Element>,

    #[serde(default)]
    wires: Vec<Wire>,

    /// Lower bound on the expanded size; empty means "no minimum".
    #[serde(default)]
    min_size: Size,

    /// Where sub-content begins, in the group's local space.
    #[serde(default)]
    content_offset: Point,
}

impl Group {
    /// Creates a collapsed, auto-sized group with no sub-elements.
    pub fn new(ty: ElementType) -> Self {
        Self {
            ty,
            expanded: false,
            auto_size: true,
            elements: Vec::new(),
            wires: Vec::new(),
            min_size: Size::default(),
            content_offset: Point::default(),
        }
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn with_auto_size(mut self, auto_size: bool) -> Self {
        self.auto_size = auto_size;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_wire(mut self, wire: Wire) -> Self {
        self.wires.push(wire);
        self
    }

    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_content_offset(mut self, content_offset: Point) -> Self {
        self.content_offset = content_offset;
        self
    }

    pub fn ty(&self) -> &ElementType {
        &self.ty
    }

    pub fn ty_mut(&mut self) -> &mut ElementType {
        &mut self.ty
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn auto_size(&self) -> bool {
        self.auto_size
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut Vec<Element> {
        &mut self.elements
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    /// Finds a direct sub-element by id.
    pub fn find_element(&self, id: Id) -> Option<&Element> {
        self.elements.iter().find(|element| element.id() == id)
    }
}

/// Leaf or group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// An instance of a registered element type
    Leaf(Id),
    /// A container with its own type and sub-elements
    Group(Group),
}

/// A placed circuit element.
///
/// `bounds` is in the parent's local space. Only its location is used for
/// leaves and auto-sized groups; a manually sized group takes its exterior
/// size from `bounds` as well.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Element {
    id: Id,

    /// Display name drawn below the element
    #[serde(default)]
    name: String,

    #[serde(default)]
    bounds: Rect,

    kind: ElementKind,
}

impl Element {
    /// Creates a leaf element of the registered type `type_id`.
    pub fn new_leaf(id: Id, type_id: Id, location: Point) -> Self {
        Self {
            id,
            name: String::new(),
            bounds: Rect::from_location_size(location, Size::default()),
            kind: ElementKind::Leaf(type_id),
        }
    }

    /// Creates a group element.
    pub fn new_group(id: Id, group: Group, bounds: Rect) -> Self {
        Self {
            id,
            name: String::new(),
            bounds,
            kind: ElementKind::Group(group),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn location(&self) -> Point {
        self.bounds.location()
    }

    pub fn set_location(&mut self, location: Point) {
        self.bounds = Rect::from_location_size(location, self.bounds.size());
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Returns the group data if this element is a group.
    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            ElementKind::Group(group) => Some(group),
            ElementKind::Leaf(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.kind {
            ElementKind::Group(group) => Some(group),
            ElementKind::Leaf(_) => None,
        }
    }

    /// Returns the group data if this element is an expanded group.
    pub fn as_expanded_group(&self) -> Option<&Group> {
        self.as_group().filter(|group| group.expanded())
    }

    /// Resolves this element's type: a leaf looks it up in `types`, a group
    /// returns its own.
    pub fn element_type<'a>(
        &'a self,
        types: &'a IndexMap<Id, ElementType>,
    ) -> Option<&'a ElementType> {
        match &self.kind {
            ElementKind::Leaf(type_id) => types.get(type_id),
            ElementKind::Group(group) => Some(group.ty()),
        }
    }
}
