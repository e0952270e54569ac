//! Overlap report over a finished layout.

use crate::schema::DbTable;
use super::geometry::{table_bounds, table_dimensions};
use super::spatial_grid::SpatialGrid;

/// An overlapping (or touching) pair, ids in input order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OverlapPair {
    pub first: String,
    pub second: String,
}

fn grid_for(tables: &[DbTable]) -> SpatialGrid {
    if tables.is_empty() {
        return SpatialGrid::new(1.0);
    }
    let total: f64 = tables
        .iter()
        .map(|t| {
            let s = table_dimensions(t);
            s.w.max(s.h)
        })
        .sum();
    SpatialGrid::new(total / tables.len() as f64)
}

/// Every pair of tables whose boxes touch or overlap, ordered by the index
/// of the first table, then the second.
pub fn find_overlapping_tables(tables: &[DbTable]) -> Vec<OverlapPair> {
    let mut grid = grid_for(tables);
    let bounds: Vec<_> = tables.iter().map(table_bounds).collect();
    for b in &bounds {
        grid.insert(*b);
    }

    let mut pairs = Vec::new();
    for (i, b) in bounds.iter().enumerate() {
        for j in grid.query(b) {
            if j > i && b.touches_or_overlaps(&bounds[j]) {
                pairs.push(OverlapPair {
                    first: tables[i].id.clone(),
                    second: tables[j].id.clone(),
                });
            }
        }
    }

    log::debug!("overlap report: {} pairs among {} tables", pairs.len(), tables.len());
    pairs
}
