//! Automatic table layout for entity-relationship diagrams.
//!
//! The engine takes tables, relationships and optional areas and returns a
//! copy of the tables with fresh `x`/`y` coordinates. Native callers use the
//! [`layout`] functions directly; the browser talks to [`wasm`] with JSON.

pub mod error;
pub mod layout;
pub mod output;
pub mod request;
pub mod schema;
pub mod wasm;

pub use error::{LayoutError, Result};
pub use layout::{
    layout, layout_optimized, layout_without_areas, LayoutDirection, LayoutMode, LayoutOptions,
    LayoutSettings, LayoutStrategy,
};
pub use request::{LayoutAlgorithm, LayoutRequest};
pub use schema::{Area, DbField, DbRelationship, DbTable, Diagram};
