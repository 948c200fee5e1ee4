//! Circuitry Core Types and Definitions
//!
//! This crate provides the foundational types for Circuitry circuit
//! diagrams. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Integer pixel geometry ([`geometry`] module)
//! - **Draw**: Text measurement, strokes and layered SVG output ([`draw`] module)
//! - **Semantic**: The circuit model of element types, elements and wires ([`semantic`] module)
//! - **Theme**: Pixel constants and colors for rendering ([`theme::DiagramTheme`])

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod semantic;
pub mod theme;
