//! Circuit element layout.
//!
//! Computes the geometry of elements from their types: exterior size,
//! interior rectangle and output pin offsets. Plain elements are sized by
//! measured text ([`compute_element_layout`]); expanded groups are sized by
//! their sub-elements ([`compute_group_layout`]). Results are cached per
//! document ([`TypeLayoutCache`], [`DocumentCaches`]) behind the
//! [`LayoutEngine`], which also resolves pin positions and world offsets.

mod cache;
mod context;
mod element;
mod engine;
mod error;
mod group;
mod info;
mod metrics;
mod offset;
mod pins;
mod truncation;

pub use cache::{CacheStats, DocumentCaches, LayoutKey, LookupOutcome, TypeLayoutCache};
pub use context::LayoutContext;
pub use element::compute_element_layout;
pub use engine::{ChangedItem, LayoutEngine};
pub use error::LayoutError;
pub use group::{compute_group_layout, compute_layout, sub_content_bounds};
pub use info::{ElementSize, LayoutInfo};
pub use metrics::{
    EXPANDER_SIZE, LayoutMetrics, MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH, PinStyle,
};
pub use offset::{DrawingStack, parent_world_offset, world_offset};
pub use pins::{pin_offset, pin_position};
pub use truncation::{DEFAULT_MAX_PIN_NAME_LENGTH, MIN_MAX_PIN_NAME_LENGTH, PinNameTruncation};
