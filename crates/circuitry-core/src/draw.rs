//! Drawing-surface contracts.
//!
//! The layout engine never draws anything itself; it only asks a
//! [`TextMeasurer`] how large a string renders in a given [`TextFormat`].
//! The SVG renderer additionally uses [`LayeredOutput`] for z-ordering and
//! [`StrokeDefinition`] for outlines.

mod layer;
mod stroke;
mod text;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{
    CosmicTextMeasurer, FixedAdvanceMeasurer, MeasureError, TextFormat, TextMeasurer, TextSize,
};
