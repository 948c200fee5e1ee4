//! SVG export of circuits.
//!
//! [`Svg`] walks a [`Circuit`] with a [`LayoutEngine`], emitting element
//! bodies, pins, labels and wires into a [`LayeredOutput`] that is then
//! assembled into a single [`svg::Document`].

mod element;
mod wire;

use std::{fmt, fs::File, io::Write};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use circuitry_core::{
    draw::{CosmicTextMeasurer, LayeredOutput, RenderLayer, SvgNode, TextMeasurer},
    geometry::{self, Point, Rect, Size},
    identifier::Id,
    semantic::Circuit,
    theme::ThemeColors,
};

use crate::{
    config::{LayoutConfig, StyleConfig},
    export,
    layout::{DrawingStack, LayoutEngine, LayoutError},
};

/// Space around the circuit in the exported document.
const DOCUMENT_MARGIN: i32 = 50;

/// Snapshot of the theme values drawing needs, so the engine can be
/// borrowed mutably while drawing.
#[derive(Debug, Clone)]
struct Palette {
    colors: ThemeColors,
    stroke_width: f32,
    font_family: String,
    font_size_px: f32,
}

/// SVG exporter for circuits.
pub struct Svg {
    file_name: String,
    engine: LayoutEngine,
    title_background_filled: bool,
    rounded_border: bool,
}

impl Svg {
    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LayoutEngine {
        &mut self.engine
    }

    /// Renders `circuit` to an SVG document.
    ///
    /// `document` identifies the circuit to the engine's per-document
    /// caches: layouts cached under it are reused when the same document is
    /// rendered again, and never leak into other documents. Callers must
    /// not reuse one identity for different circuits.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Layout`] if an element id occurs more than
    /// once in the circuit or an element cannot be laid out.
    pub fn render_circuit(
        &mut self,
        document: Id,
        circuit: &Circuit,
    ) -> Result<Document, export::Error> {
        info!(
            document:% = document,
            elements = circuit.elements().len(),
            wires = circuit.wires().len();
            "Rendering circuit"
        );

        if let Some(id) = circuit.find_duplicate_id() {
            return Err(LayoutError::DuplicateElementId(id).into());
        }
        self.engine.activate_document(document);

        let content_bounds = self.calculate_circuit_bounds(circuit)?;
        let svg_size = self.calculate_svg_dimensions(content_bounds.size());
        let origin = Point::new(
            DOCUMENT_MARGIN - content_bounds.x(),
            DOCUMENT_MARGIN - content_bounds.y(),
        );

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Background, self.render_background(svg_size));

        let mut stack = DrawingStack::new();
        for element in circuit.elements() {
            self.render_element(element, circuit.types(), origin, &mut stack, &mut output)?;
        }
        self.render_wires(
            circuit.wires(),
            circuit.elements(),
            None,
            circuit.types(),
            origin,
            &mut output,
        )?;

        debug!(nodes = output.len(); "Circuit drawn");

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", svg_size.width(), svg_size.height()),
            )
            .set("width", svg_size.width())
            .set("height", svg_size.height());
        for node in output.render() {
            doc = doc.add(node);
        }

        Ok(doc)
    }

    /// Returns the union of the top-level elements' bounds, including the
    /// space taken by their name labels.
    fn calculate_circuit_bounds(&mut self, circuit: &Circuit) -> Result<Rect, export::Error> {
        let label_height = self.engine.metrics().label_height();

        let boxes = circuit
            .elements()
            .iter()
            .map(|element| {
                let bounds = self.engine.element_bounds(element, circuit.types())?;
                if element.name().is_empty() {
                    Ok(bounds)
                } else {
                    let size = Size::new(bounds.width(), bounds.height() + label_height);
                    Ok(bounds.with_size(size))
                }
            })
            .collect::<Result<Vec<_>, export::Error>>()?;

        Ok(geometry::union_all(boxes).unwrap_or_default())
    }

    /// Calculate the size of the SVG for the given content, adding a margin
    /// on every side.
    fn calculate_svg_dimensions(&self, content_size: Size) -> Size {
        let width = content_size.width() + 2 * DOCUMENT_MARGIN;
        let height = content_size.height() + 2 * DOCUMENT_MARGIN;

        debug!(width, height; "Final SVG dimensions");

        Size::new(width, height)
    }

    fn render_background(&self, size: Size) -> SvgNode {
        let color = self.engine.theme().colors().background;
        Box::new(
            svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", size.width())
                .set("height", size.height())
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha()),
        )
    }

    fn palette(&self) -> Palette {
        let theme = self.engine.theme();
        Palette {
            colors: theme.colors().clone(),
            stroke_width: theme.stroke_width(),
            font_family: theme.text_format().font_family().to_string(),
            font_size_px: theme.text_format().font_size_px(),
        }
    }

    /// Writes an SVG document to the exporter's file.
    pub fn write_document(&self, doc: &Document) -> Result<(), export::Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(&f, "{doc}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_circuit(&mut self, circuit: &Circuit) -> Result<(), export::Error> {
        let document = Id::new(&self.file_name);
        let doc = self.render_circuit(document, circuit)?;
        debug!("SVG document rendered");

        self.write_document(&doc)
    }
}

impl fmt::Debug for Svg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Svg")
            .field("file_name", &self.file_name)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Svg`] exporters.
pub struct SvgBuilder {
    file_name: String,
    style: StyleConfig,
    layout: LayoutConfig,
    measurer: Option<Box<dyn TextMeasurer>>,
}

impl SvgBuilder {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            style: StyleConfig::default(),
            layout: LayoutConfig::default(),
            measurer: None,
        }
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    pub fn with_layout(mut self, layout: &LayoutConfig) -> Self {
        self.layout = layout.clone();
        self
    }

    /// Uses `measurer` instead of shaping text with the system fonts.
    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = Some(measurer);
        self
    }

    /// Builds the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Config`] for an invalid style and
    /// [`export::Error::Layout`] for an out-of-range truncation length.
    pub fn build(self) -> Result<Svg, export::Error> {
        let theme = self.style.theme().map_err(export::Error::Config)?;
        let truncation = self.layout.truncation()?;
        let measurer = self
            .measurer
            .unwrap_or_else(|| Box::new(CosmicTextMeasurer::new()));

        let mut engine = LayoutEngine::new(theme, measurer)
            .with_pin_style(self.layout.pin_style())
            .with_truncation(truncation);
        if let Some(offset) = self.layout.sub_content_offset() {
            engine = engine.with_sub_content_offset(offset);
        }
        if let Some(offset) = self.layout.group_pin_expanded_offset() {
            engine = engine.with_group_pin_expanded_offset(offset);
        }

        Ok(Svg {
            file_name: self.file_name,
            engine,
            title_background_filled: self.layout.title_background_filled(),
            rounded_border: self.layout.rounded_border(),
        })
    }
}
