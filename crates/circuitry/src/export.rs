pub mod svg;

use std::io;

use thiserror::Error;

use circuitry_core::semantic::Circuit;

use crate::layout::LayoutError;

/// Writes a rendered circuit somewhere.
pub trait Exporter {
    fn export_circuit(&mut self, circuit: &Circuit) -> Result<(), Error>;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid style: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}
