//! Placement algorithms for ER diagrams.
//!
//! This module contains all table placement algorithms:
//! - `area`: Row-major grid inside a fixed area, clamped to its padding
//! - `radial`: Clusters radiate around their most connected table, isolated tables in rows below
//! - `hierarchical`: Breadth-first levels inside a group region, plus a grid for isolated tables
//! - `grid`: Simple fixed-pitch grid that ignores relationships

pub mod area;
pub mod grid;
pub mod hierarchical;
pub mod radial;

pub use area::position_tables_within_area;
pub use grid::layout_grid;
pub use hierarchical::{layout_connected_hierarchical, layout_isolated_grid};
pub use radial::layout_radial;
