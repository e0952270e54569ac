//! Table sizing, containment and overlap predicates.

use crate::schema::{Area, DbTable};
use super::{PointF, RectF, SizeF};

pub const DEFAULT_TABLE_WIDTH: f64 = 200.0;
pub const TABLE_HEADER_HEIGHT: f64 = 60.0;
pub const FIELD_ROW_HEIGHT: f64 = 32.0;
pub const TABLE_PADDING: f64 = 20.0;

/// Box of a table: explicit width/height when set (and positive), otherwise
/// the default width and a height derived from the field count.
pub fn table_dimensions(table: &DbTable) -> SizeF {
    let computed_h =
        TABLE_HEADER_HEIGHT + table.fields.len() as f64 * FIELD_ROW_HEIGHT + TABLE_PADDING;
    SizeF {
        w: table.width.filter(|w| *w > 0.0).unwrap_or(DEFAULT_TABLE_WIDTH),
        h: table.height.filter(|h| *h > 0.0).unwrap_or(computed_h),
    }
}

pub fn table_bounds(table: &DbTable) -> RectF {
    table_bounds_at(table, PointF { x: table.x, y: table.y })
}

/// Bounds the table would have if moved to `origin`.
pub fn table_bounds_at(table: &DbTable, origin: PointF) -> RectF {
    RectF::at(origin, table_dimensions(table))
}

pub fn is_table_inside_area(table: &DbTable, area: &Area) -> bool {
    RectF::from(area).contains_rect(&table_bounds(table))
}

pub fn tables_overlap(a: &DbTable, b: &DbTable) -> bool {
    table_bounds(a).touches_or_overlaps(&table_bounds(b))
}
