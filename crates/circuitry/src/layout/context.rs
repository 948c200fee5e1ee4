//! Inputs shared by the layout calculators.

use std::fmt;

use indexmap::IndexMap;

use circuitry_core::{
    draw::{TextFormat, TextMeasurer},
    identifier::Id,
    semantic::{Element, ElementKind, ElementType},
};

use crate::layout::{LayoutError, LayoutMetrics, PinNameTruncation};

/// Everything a layout computation reads: the text measurer, the font, pixel
/// metrics, the truncation rule for collapsed groups and the element type
/// registry.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    measurer: &'a dyn TextMeasurer,
    format: &'a TextFormat,
    metrics: LayoutMetrics,
    truncation: PinNameTruncation,
    types: &'a IndexMap<Id, ElementType>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        measurer: &'a dyn TextMeasurer,
        format: &'a TextFormat,
        metrics: LayoutMetrics,
        truncation: PinNameTruncation,
        types: &'a IndexMap<Id, ElementType>,
    ) -> Self {
        Self {
            measurer,
            format,
            metrics,
            truncation,
            types,
        }
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn truncation(&self) -> &PinNameTruncation {
        &self.truncation
    }

    pub fn types(&self) -> &'a IndexMap<Id, ElementType> {
        self.types
    }

    /// Measures the rendered width of `text`.
    ///
    /// # Errors
    ///
    /// Propagates measurer failures as [`LayoutError::Measure`].
    pub fn measure_width(&self, text: &str) -> Result<f32, LayoutError> {
        Ok(self.measurer.measure_text(text, self.format)?.width())
    }

    /// Resolves the type of `element`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownElementType`] for a leaf whose type is
    /// not registered.
    pub fn resolve_type<'e>(&self, element: &'e Element) -> Result<&'e ElementType, LayoutError>
    where
        'a: 'e,
    {
        match element.kind() {
            ElementKind::Leaf(type_id) => self
                .types
                .get(type_id)
                .ok_or(LayoutError::UnknownElementType(*type_id)),
            ElementKind::Group(group) => Ok(group.ty()),
        }
    }
}

impl fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("format", self.format)
            .field("metrics", &self.metrics)
            .field("truncation", &self.truncation)
            .field("types", &self.types.len())
            .finish_non_exhaustive()
    }
}
