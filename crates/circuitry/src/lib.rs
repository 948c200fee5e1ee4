//! Circuitry - layout and rendering for node-and-wire circuit diagrams.
//!
//! Circuits are made of elements with input pins on the left and output pins
//! on the right, connected by wires. Elements can be groups holding nested
//! sub-circuits, drawn either collapsed like any other element or expanded
//! with their content inline.
//!
//! The [`layout`] module sizes elements from measured text and caches the
//! results per element type and per open document; [`CircuitBuilder`] reads
//! circuit documents and renders them to SVG.

pub mod config;
pub mod layout;

mod error;
mod export;

pub use circuitry_core::{color, draw, geometry, identifier, semantic, theme};

pub use error::CircuitryError;
pub use export::{
    Error as ExportError, Exporter,
    svg::{Svg, SvgBuilder},
};

use log::{debug, info, trace};

use circuitry_core::{
    draw::{FixedAdvanceMeasurer, TextMeasurer},
    identifier::Id,
};

use config::AppConfig;

/// How the builder measures text.
#[derive(Debug, Clone, Copy, Default)]
enum TextMeasurement {
    /// Shape text with the system fonts.
    #[default]
    Shaped,
    /// Constant advance per character, independent of installed fonts.
    FixedAdvance(f32),
}

/// Builder for parsing and rendering circuit diagrams.
///
/// # Examples
///
/// ```rust
/// use circuitry::{CircuitBuilder, config::AppConfig};
///
/// let source = r#"
///     name = "inverter"
///
///     [types.not]
///     name = "NOT"
///     inputs = [{ name = "in" }]
///     outputs = [{ name = "out" }]
///
///     [[elements]]
///     id = "u1"
///     kind = { leaf = "not" }
/// "#;
///
/// let builder = CircuitBuilder::new(AppConfig::default()).with_fixed_advance_text(7.0);
/// let circuit = builder.parse(source).expect("Failed to parse");
/// let svg = builder.render_svg(&circuit).expect("Failed to render");
/// assert!(svg.contains("NOT"));
/// ```
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    config: AppConfig,
    text_measurement: TextMeasurement,
}

impl CircuitBuilder {
    /// Create a new circuit builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            text_measurement: TextMeasurement::default(),
        }
    }

    /// Measure text with a constant advance per character instead of the
    /// system fonts, making output independent of the installed fonts.
    pub fn with_fixed_advance_text(mut self, advance: f32) -> Self {
        self.text_measurement = TextMeasurement::FixedAdvance(advance);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a TOML circuit document.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitryError::Document`] if the source is not a valid
    /// circuit document or reuses an element id.
    pub fn parse(&self, source: &str) -> Result<semantic::Circuit, CircuitryError> {
        info!("Parsing circuit");

        let circuit: semantic::Circuit = toml::from_str(source)
            .map_err(|err| CircuitryError::new_document_error(err, source))?;
        if let Some(id) = circuit.find_duplicate_id() {
            return Err(CircuitryError::Document {
                message: format!("element id `{id}` is used more than once"),
                span: None,
                src: source.to_string(),
            });
        }

        debug!(
            name = circuit.name(),
            types = circuit.types().len(),
            elements = circuit.elements().len();
            "Circuit parsed successfully"
        );
        trace!(circuit:?; "Parsed circuit");

        Ok(circuit)
    }

    /// Render a circuit to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitryError`] for configuration, layout or rendering
    /// errors.
    pub fn render_svg(&self, circuit: &semantic::Circuit) -> Result<String, CircuitryError> {
        info!(circuit = circuit.name(); "Rendering circuit to SVG");

        let mut svg_exporter = SvgBuilder::new("")
            .with_style(self.config.style())
            .with_layout(self.config.layout())
            .with_measurer(self.measurer())
            .build()?;

        let doc = svg_exporter.render_circuit(Id::new(circuit.name()), circuit)?;

        info!("SVG rendered successfully");
        Ok(doc.to_string())
    }

    fn measurer(&self) -> Box<dyn TextMeasurer> {
        match self.text_measurement {
            TextMeasurement::Shaped => Box::new(draw::CosmicTextMeasurer::new()),
            TextMeasurement::FixedAdvance(advance) => {
                Box::new(FixedAdvanceMeasurer::new(advance))
            }
        }
    }
}
