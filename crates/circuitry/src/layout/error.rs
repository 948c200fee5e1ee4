//! Layout error type.

use thiserror::Error;

use circuitry_core::{draw::MeasureError, identifier::Id};

/// Errors produced while computing layouts.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The text measurer failed. Layout cannot continue without metrics.
    #[error(transparent)]
    Measure(#[from] MeasureError),

    #[error("element refers to unknown element type `{0}`")]
    UnknownElementType(Id),

    /// Group layouts are cached per element id, so ids must be unique in a
    /// document.
    #[error("element id `{0}` is used more than once in the circuit")]
    DuplicateElementId(Id),

    #[error("maximum collapsed pin name length must be at least {min}, got {value}")]
    PinNameLengthTooSmall { value: usize, min: usize },
}
