//! Computed element geometry.

use circuitry_core::{
    geometry::{Rect, Size},
    semantic::ElementType,
};

/// Exterior size, interior rectangle and output pin offsets of one element.
///
/// This is what the two calculators produce and what a group's layout is
/// built from when it recurses into its sub-elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSize {
    size: Size,
    interior: Rect,
    output_offsets: Vec<i32>,
}

impl ElementSize {
    pub fn new(size: Size, interior: Rect, output_offsets: Vec<i32>) -> Self {
        Self {
            size,
            interior,
            output_offsets,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn interior(&self) -> Rect {
        self.interior
    }

    pub fn output_offsets(&self) -> &[i32] {
        &self.output_offsets
    }
}

/// Cached layout of an element type.
///
/// Besides the geometry it records the title and pin counts it was computed
/// from. The entry is valid only while these still match the live type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInfo {
    title: String,
    size: Size,
    interior: Rect,
    output_offsets: Vec<i32>,
    num_inputs: usize,
    num_outputs: usize,
}

impl LayoutInfo {
    /// Stamps computed geometry with the title and type it was computed from.
    pub fn new(title: &str, ty: &ElementType, element_size: ElementSize) -> Self {
        let ElementSize {
            size,
            interior,
            output_offsets,
        } = element_size;
        Self {
            title: title.to_string(),
            size,
            interior,
            output_offsets,
            num_inputs: ty.inputs().len(),
            num_outputs: ty.outputs().len(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the exterior size, not including the name label below.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the area reserved for custom content, in element local space.
    pub fn interior(&self) -> Rect {
        self.interior
    }

    /// Returns the x offset of each output pin label, measured from the
    /// element's left edge.
    pub fn output_offsets(&self) -> &[i32] {
        &self.output_offsets
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Returns `true` if this layout was computed from a type with the same
    /// pin counts as `ty`, titled with its name.
    pub fn matches(&self, ty: &ElementType) -> bool {
        self.num_inputs == ty.inputs().len()
            && self.num_outputs == ty.outputs().len()
            && self.title == ty.name()
    }
}
