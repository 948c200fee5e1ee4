//! World offsets of nested elements.
//!
//! Sub-elements of an expanded group are positioned in the group's local
//! space. To draw them, every ancestor's location, content offset and the
//! sub-content margin are summed along the chain of ancestors, the
//! [`DrawingStack`].

use circuitry_core::{geometry::Point, semantic::Element};

use crate::layout::LayoutMetrics;

/// Chain of elements from the outermost ancestor down to the element being
/// drawn.
///
/// The renderer pushes a group before drawing its sub-elements and pops it
/// afterwards. The stack is passed explicitly rather than kept as renderer
/// state.
#[derive(Debug, Clone, Default)]
pub struct DrawingStack<'a> {
    elements: Vec<&'a Element>,
}

impl<'a> DrawingStack<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: &'a Element) {
        self.elements.push(element);
    }

    pub fn pop(&mut self) -> Option<&'a Element> {
        self.elements.pop()
    }

    /// Returns the innermost element.
    pub fn top(&self) -> Option<&'a Element> {
        self.elements.last().copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the elements, outermost first.
    pub fn as_slice(&self) -> &[&'a Element] {
        &self.elements
    }

    /// Returns the world offset of the innermost element's content.
    pub fn world_offset(&self, metrics: &LayoutMetrics) -> Point {
        world_offset(self.elements.iter().copied(), metrics)
    }

    /// Returns the world offset of the content of the innermost element's
    /// parent.
    pub fn parent_world_offset(&self, metrics: &LayoutMetrics) -> Point {
        parent_world_offset(&self.elements, metrics)
    }
}

/// Accumulates the offset that maps the local space inside the last element
/// of `chain` to world space.
///
/// Each element contributes its location, its content offset if it is an
/// expanded group, and the sub-content margin.
///
/// # Examples
///
/// ```
/// # use circuitry::layout::{LayoutMetrics, world_offset};
/// # use circuitry_core::{geometry::Point, identifier::Id, semantic::Element};
/// let outer = Element::new_leaf(Id::new("outer"), Id::new("t"), Point::new(10, 10));
/// let inner = Element::new_leaf(Id::new("inner"), Id::new("t"), Point::new(5, 5));
/// let metrics = LayoutMetrics::default().with_sub_content_offset(Point::new(8, 8));
///
/// assert_eq!(world_offset([&outer, &inner], &metrics), Point::new(31, 31));
/// ```
pub fn world_offset<'a>(
    chain: impl IntoIterator<Item = &'a Element>,
    metrics: &LayoutMetrics,
) -> Point {
    let margin = metrics.sub_content_offset();
    accumulate(chain, margin)
}

/// Like [`world_offset`], but stops before the last element of `chain` and
/// uses the theme-derived nesting margin instead of the configured
/// sub-content offset.
pub fn parent_world_offset(chain: &[&Element], metrics: &LayoutMetrics) -> Point {
    let ancestors = match chain.split_last() {
        Some((_, ancestors)) => ancestors,
        None => return Point::default(),
    };
    let margin = metrics.nesting_margin();
    accumulate(ancestors.iter().copied(), Point::new(margin, margin))
}

fn accumulate<'a>(chain: impl IntoIterator<Item = &'a Element>, margin: Point) -> Point {
    chain.into_iter().fold(Point::default(), |offset, element| {
        let content_offset = element
            .as_expanded_group()
            .map(|group| group.content_offset())
            .unwrap_or_default();
        offset
            .add_point(element.location())
            .add_point(content_offset)
            .add_point(margin)
    })
}
