//! Semantic circuit model.
//!
//! The model is what the layout engine reads: element types with their pin
//! lists, element instances placed in their parent's local space, and wires
//! between pins. Nothing here knows about sizes; those are computed by the
//! layout engine from the model and a text measurer.
//!
//! # Organization
//!
//! - [`element`] - Element types, pins, elements and groups: [`ElementType`], [`Pin`], [`Element`], [`Group`]
//! - [`circuit`] - The document root: [`Circuit`], [`Wire`]

pub mod circuit;
pub mod element;

pub use circuit::*;
pub use element::*;
