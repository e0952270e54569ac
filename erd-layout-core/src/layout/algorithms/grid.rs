//! Simple grid layout algorithm.
//!
//! Places tables on a fixed-pitch grid, left-to-right, top-to-bottom. It
//! ignores relationships and table sizes, so tables taller or wider than one
//! cell can overlap their neighbours. Useful as a predictable first
//! arrangement for freshly imported schemas.

use crate::layout::{LayoutOptions, PointF};
use crate::schema::DbTable;

/// Lay out the movable tables in grid slots. Tables that stay fixed keep
/// their coordinates and do not take a slot.
pub fn layout_grid(tables: &[DbTable], options: &LayoutOptions) -> Vec<DbTable> {
    let cfg = &options.settings.grid;
    let columns = cfg.columns.max(1);
    let mut out = tables.to_vec();

    for (slot, i) in options.movable_indices(&out).into_iter().enumerate() {
        let p = grid_slot(slot, columns, cfg.cell_size, cfg.origin);
        out[i].x = p.x;
        out[i].y = p.y;
    }

    log::debug!("grid layout: {} tables in {columns} columns", out.len());
    out
}

fn grid_slot(slot: usize, columns: usize, cell: f64, origin: PointF) -> PointF {
    PointF {
        x: origin.x + (slot % columns) as f64 * cell,
        y: origin.y + (slot / columns) as f64 * cell,
    }
}
