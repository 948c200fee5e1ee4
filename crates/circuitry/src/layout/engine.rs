//! The layout engine.
//!
//! [`LayoutEngine`] ties the calculators to the state they depend on: the
//! theme, the text measurer, the renderer settings and the per-document
//! caches. Hosts forward theme edits, graph changes and document lifecycle
//! events to it and read back layouts and pin positions.

use std::{fmt, rc::Rc};

use indexmap::IndexMap;
use log::{debug, info};

use circuitry_core::{
    draw::TextMeasurer,
    geometry::{Point, Rect},
    identifier::Id,
    semantic::{Element, ElementType, Side},
    theme::DiagramTheme,
};

use crate::layout::{
    DocumentCaches, DrawingStack, LayoutContext, LayoutError, LayoutInfo, LayoutKey,
    LayoutMetrics, LookupOutcome, PinNameTruncation, PinStyle, TypeLayoutCache, cache::Revision,
    pins,
};

/// An edit reported by the graph model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangedItem {
    /// An element type's pins or name changed
    ElementType(Id),
    /// A group's content changed
    Group(Id),
    /// An element moved or was renamed
    Element(Id),
    Wire,
}

/// Computes, caches and resolves element geometry.
pub struct LayoutEngine {
    theme: DiagramTheme,
    measurer: Box<dyn TextMeasurer>,
    pin_style: PinStyle,
    sub_content_offset: Option<Point>,
    group_pin_expanded_offset: Option<i32>,
    truncation: PinNameTruncation,
    caches: DocumentCaches,
    /// Bumped by every setting that affects computed layouts
    settings_revision: u64,
    redraw_requested: bool,
}

impl LayoutEngine {
    pub fn new(theme: DiagramTheme, measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            theme,
            measurer: Box::new(measurer),
            pin_style: PinStyle::default(),
            sub_content_offset: None,
            group_pin_expanded_offset: None,
            truncation: PinNameTruncation::default(),
            caches: DocumentCaches::new(),
            settings_revision: 0,
            redraw_requested: false,
        }
    }

    pub fn with_pin_style(mut self, pin_style: PinStyle) -> Self {
        self.pin_style = pin_style;
        self
    }

    /// Overrides the sub-content margin. Without an override the margin
    /// follows the theme.
    pub fn with_sub_content_offset(mut self, offset: Point) -> Self {
        self.sub_content_offset = Some(offset);
        self
    }

    pub fn with_group_pin_expanded_offset(mut self, offset: i32) -> Self {
        self.group_pin_expanded_offset = Some(offset);
        self
    }

    pub fn with_truncation(mut self, truncation: PinNameTruncation) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn theme(&self) -> &DiagramTheme {
        &self.theme
    }

    /// Returns the theme for editing.
    ///
    /// Any edit renews the theme's generation, which drops the active cache
    /// on the next layout request. Assigning a whole new theme through the
    /// returned reference works too; see [`LayoutEngine::set_theme`].
    pub fn theme_mut(&mut self) -> &mut DiagramTheme {
        &mut self.theme
    }

    /// Replaces the theme. Cached layouts are dropped on the next layout
    /// request, even if `theme` is a clone of the current one.
    pub fn set_theme(&mut self, theme: DiagramTheme) {
        self.theme = theme;
        self.settings_changed();
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    pub fn truncation(&self) -> &PinNameTruncation {
        &self.truncation
    }

    /// Returns the metrics for the current theme and settings.
    pub fn metrics(&self) -> LayoutMetrics {
        let mut metrics = LayoutMetrics::from_theme(&self.theme).with_pin_style(self.pin_style);
        if let Some(offset) = self.sub_content_offset {
            metrics = metrics.with_sub_content_offset(offset);
        }
        if let Some(offset) = self.group_pin_expanded_offset {
            metrics = metrics.with_group_pin_expanded_offset(offset);
        }
        metrics
    }

    pub fn set_pin_style(&mut self, pin_style: PinStyle) {
        self.pin_style = pin_style;
        self.settings_changed();
    }

    pub fn set_sub_content_offset(&mut self, offset: Option<Point>) {
        self.sub_content_offset = offset;
        self.settings_changed();
    }

    pub fn set_group_pin_expanded_offset(&mut self, offset: Option<i32>) {
        self.group_pin_expanded_offset = offset;
        self.settings_changed();
    }

    /// Sets the longest pin name collapsed groups display in full.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PinNameLengthTooSmall`] below the minimum; the
    /// engine is left unchanged.
    pub fn set_max_collapsed_pin_name_length(
        &mut self,
        max_length: usize,
    ) -> Result<(), LayoutError> {
        self.truncation = PinNameTruncation::new(max_length)?;
        self.settings_changed();
        Ok(())
    }

    /// Returns the layout of `element`, computing and caching it if needed.
    ///
    /// A cached layout that no longer matches the element's type is
    /// recomputed and a redraw is requested.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the element's type is unknown or text
    /// measurement fails.
    pub fn layout(
        &mut self,
        element: &Element,
        types: &IndexMap<Id, ElementType>,
    ) -> Result<Rc<LayoutInfo>, LayoutError> {
        self.sync_revision();

        let metrics = self.metrics();
        let ctx = LayoutContext::new(
            self.measurer.as_ref(),
            self.theme.text_format(),
            metrics,
            self.truncation,
            types,
        );
        let (info, outcome) = self.caches.current_mut().lookup(element, &ctx)?;
        if outcome == LookupOutcome::Stale {
            self.redraw_requested = true;
        }

        Ok(info)
    }

    /// Returns the element's bounds in its parent's space, excluding the
    /// name label below it.
    ///
    /// # Errors
    ///
    /// See [`LayoutEngine::layout`].
    pub fn element_bounds(
        &mut self,
        element: &Element,
        types: &IndexMap<Id, ElementType>,
    ) -> Result<Rect, LayoutError> {
        let info = self.layout(element, types)?;
        Ok(Rect::from_location_size(element.location(), info.size()))
    }

    /// Returns the vertical offset of a pin from the top of its element.
    pub fn pin_offset(&self, element: &Element, index: usize, side: Side) -> i32 {
        pins::pin_offset(element, index, side, &self.metrics())
    }

    /// Returns a pin's position in the local space of the element's parent.
    ///
    /// # Errors
    ///
    /// See [`LayoutEngine::layout`].
    pub fn pin_position(
        &mut self,
        element: &Element,
        types: &IndexMap<Id, ElementType>,
        index: usize,
        side: Side,
    ) -> Result<Point, LayoutError> {
        let info = self.layout(element, types)?;
        Ok(pins::pin_position(
            element,
            &info,
            index,
            side,
            &self.metrics(),
        ))
    }

    pub fn world_offset(&self, stack: &DrawingStack<'_>) -> Point {
        stack.world_offset(&self.metrics())
    }

    pub fn parent_world_offset(&self, stack: &DrawingStack<'_>) -> Point {
        stack.parent_world_offset(&self.metrics())
    }

    pub fn expander_rect(&self, p: Point) -> Rect {
        self.metrics().expander_rect(p)
    }

    /// Drops the cached layout for `key` and requests a redraw.
    pub fn invalidate(&mut self, key: LayoutKey) {
        let removed = self.caches.current_mut().invalidate(key);
        debug!(key:?, removed; "Invalidated layout");
        self.redraw_requested = true;
    }

    /// Drops every layout of the active document and requests a redraw.
    pub fn invalidate_all(&mut self) {
        self.caches.current_mut().clear();
        self.redraw_requested = true;
    }

    /// Reacts to a graph edit. Only type and group edits affect layouts.
    pub fn on_item_changed(&mut self, item: &ChangedItem) {
        match *item {
            ChangedItem::ElementType(id) => self.invalidate(LayoutKey::Type(id)),
            ChangedItem::Group(id) => self.invalidate(LayoutKey::Group(id)),
            ChangedItem::Element(_) | ChangedItem::Wire => {}
        }
    }

    pub fn activate_document(&mut self, document: Id) {
        self.caches.activate(document);
    }

    pub fn deactivate_document(&mut self) {
        self.caches.deactivate();
    }

    pub fn close_document(&mut self, document: Id) {
        self.caches.close(document);
    }

    pub fn active_document(&self) -> Option<Id> {
        self.caches.active()
    }

    /// Returns the active document's cache.
    pub fn cache(&self) -> &TypeLayoutCache {
        self.caches.current()
    }

    /// Returns whether a redraw was requested since the last call, and
    /// clears the request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn settings_changed(&mut self) {
        self.settings_revision += 1;
    }

    fn revision(&self) -> Revision {
        Revision {
            theme: self.theme.generation(),
            settings: self.settings_revision,
        }
    }

    fn sync_revision(&mut self) {
        let revision = self.revision();
        if self.caches.current_mut().sync_revision(revision) {
            info!(revision:?; "Theme or settings changed, dropped cached layouts");
            self.redraw_requested = true;
        }
    }
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("metrics", &self.metrics())
            .field("truncation", &self.truncation)
            .field("caches", &self.caches)
            .field("redraw_requested", &self.redraw_requested)
            .finish_non_exhaustive()
    }
}
