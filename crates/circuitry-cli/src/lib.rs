//! CLI logic for the Circuitry diagram renderer.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, LogLevel};

use std::fs;

use log::{debug, info};

use circuitry::{CircuitBuilder, CircuitryError};

/// Run the Circuitry CLI application
///
/// Reads the input circuit document, renders it with the loaded
/// configuration and writes the resulting SVG to the output file.
///
/// # Errors
///
/// Returns `CircuitryError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid circuit documents
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), CircuitryError> {
    info!(
        input:? = args.input,
        output:? = args.output;
        "Processing circuit"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let mut builder = CircuitBuilder::new(app_config);
    if let Some(advance) = args.text_advance {
        debug!(advance; "Measuring text with a fixed advance");
        builder = builder.with_fixed_advance_text(advance);
    }
    let circuit = builder.parse(&source)?;
    let svg = builder.render_svg(&circuit)?;

    fs::write(&args.output, svg)?;

    info!(output:? = args.output; "SVG exported successfully");

    Ok(())
}
