//! Area-constrained placement.
//!
//! Tables are laid out in a row-major grid inside the area, then clamped so
//! that none of them crosses the padded area edge. Crowded areas may end up
//! with overlapping tables; containment wins over separation.

use crate::layout::geometry::table_dimensions;
use crate::layout::AreaLayoutConfig;
use crate::schema::{Area, DbTable};

/// Arrange `tables` inside `area`.
///
/// The caller passes only the tables that are not already fully inside, so
/// an area whose members already fit is left alone.
pub fn position_tables_within_area(
    tables: &mut [&mut DbTable],
    area: &Area,
    cfg: &AreaLayoutConfig,
) {
    if tables.is_empty() {
        return;
    }

    let p = cfg.padding;
    let avail_w = area.width - 2.0 * p;
    let avail_h = area.height - 2.0 * p;

    let cols = ((avail_w / cfg.column_width).floor() as usize).max(1);
    let rows = tables.len().div_ceil(cols).max(1);
    let cell_w = avail_w / cols as f64;
    let cell_h = avail_h / rows as f64;

    for (i, table) in tables.iter_mut().enumerate() {
        let col = (i % cols) as f64;
        let row = (i / cols) as f64;
        let size = table_dimensions(table);

        let x = area.x + p + col * cell_w + cfg.gap_x / 2.0;
        let y = area.y + p + row * cell_h + cfg.gap_y / 2.0;

        // Lower bound first, then upper; an area too small for the table
        // pins it to the upper bound.
        let max_x = area.x + area.width - p - size.w;
        let max_y = area.y + area.height - p - size.h;
        table.x = x.max(area.x + p).min(max_x);
        table.y = y.max(area.y + p).min(max_y);

        log::trace!("area '{}': table '{}' -> ({}, {})", area.id, table.id, table.x, table.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::is_table_inside_area;
    use float_cmp::assert_approx_eq;

    fn sized(id: &str, w: f64, h: f64) -> DbTable {
        let mut t = DbTable::new(id, id, 5000.0, 5000.0);
        t.width = Some(w);
        t.height = Some(h);
        t
    }

    #[test]
    fn test_four_tables_fit_in_area() {
        let area = Area::new("a", 0.0, 0.0, 600.0, 600.0);
        let mut tables: Vec<DbTable> =
            (0..4).map(|i| sized(&format!("t{i}"), 200.0, 300.0)).collect();
        let mut refs: Vec<&mut DbTable> = tables.iter_mut().collect();
        position_tables_within_area(&mut refs, &area, &AreaLayoutConfig::default());

        for t in &tables {
            assert!(is_table_inside_area(t, &area), "{} at ({}, {})", t.id, t.x, t.y);
        }
        // avail 560 -> 2 columns of 280; 2 rows of 280.
        assert_approx_eq!(f64, tables[0].x, 45.0);
        assert_approx_eq!(f64, tables[1].x, 325.0);
        // y of the second row is clamped to 600 - 20 - 300.
        assert_approx_eq!(f64, tables[2].y, 280.0);
    }

    #[test]
    fn test_second_pass_moves_nothing() {
        let area = Area::new("a", 100.0, 100.0, 900.0, 700.0);
        let mut tables: Vec<DbTable> =
            (0..5).map(|i| sized(&format!("t{i}"), 180.0, 120.0)).collect();
        let cfg = AreaLayoutConfig::default();

        let mut refs: Vec<&mut DbTable> = tables.iter_mut().collect();
        position_tables_within_area(&mut refs, &area, &cfg);
        let after_first = tables.clone();

        // The orchestrator only forwards tables that are not yet inside.
        let mut again: Vec<&mut DbTable> = tables
            .iter_mut()
            .filter(|t| !is_table_inside_area(t, &area))
            .collect();
        assert!(again.is_empty());
        position_tables_within_area(&mut again, &area, &cfg);
        assert_eq!(tables, after_first);
    }

    #[test]
    fn test_narrow_area_uses_one_column() {
        let area = Area::new("a", 0.0, 0.0, 240.0, 1000.0);
        let mut tables: Vec<DbTable> =
            (0..3).map(|i| sized(&format!("t{i}"), 150.0, 100.0)).collect();
        let mut refs: Vec<&mut DbTable> = tables.iter_mut().collect();
        position_tables_within_area(&mut refs, &area, &AreaLayoutConfig::default());

        assert!(tables.iter().all(|t| t.x == tables[0].x));
        assert!(tables[1].y > tables[0].y);
        assert!(tables.iter().all(|t| is_table_inside_area(t, &area)));
    }

    #[test]
    fn test_empty_input_is_noop() {
        let area = Area::new("a", 0.0, 0.0, 100.0, 100.0);
        position_tables_within_area(&mut [], &area, &AreaLayoutConfig::default());
    }
}
