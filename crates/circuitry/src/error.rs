//! Error types for Circuitry operations.
//!
//! This module provides the main error type [`CircuitryError`] which wraps
//! the error conditions that can occur while loading and rendering circuits.

use std::io;

use thiserror::Error;

use crate::{export, layout::LayoutError};

/// The main error type for Circuitry operations.
#[derive(Debug, Error)]
pub enum CircuitryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The circuit document could not be read.
    #[error("Invalid circuit document: {message}")]
    Document {
        message: String,
        /// Byte range of the offending TOML, if known.
        span: Option<std::ops::Range<usize>>,
        src: String,
    },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<export::Error> for CircuitryError {
    fn from(error: export::Error) -> Self {
        match error {
            export::Error::Layout(err) => Self::Layout(err),
            export::Error::Config(message) => Self::Config(message),
            export::Error::Io(err) => Self::Io(err),
            other => Self::Export(Box::new(other)),
        }
    }
}

impl CircuitryError {
    /// Create a new `Document` error from a TOML parse failure and its source.
    pub fn new_document_error(err: toml::de::Error, src: impl Into<String>) -> Self {
        Self::Document {
            message: err.message().to_string(),
            span: err.span(),
            src: src.into(),
        }
    }
}
