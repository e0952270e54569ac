// Spatial hash grid for overlap queries.
//
// Instead of checking every pair of tables, each rectangle is bucketed into
// the cells it covers and only rectangles sharing a cell are compared. Cells
// are closed on both ends so rectangles that merely touch still meet.

use std::collections::{HashMap, HashSet};

use super::RectF;

/// Rectangles spanning more cells than this are kept in a side list and
/// compared against everything.
const MAX_CELLS_PER_RECT: i64 = 4096;

/// A spatial hash grid of indexed rectangles.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Edge length of one square cell.
    cell_size: f64,
    /// Map from cell coordinates to the entries touching that cell.
    cells: HashMap<(i64, i64), Vec<usize>>,
    /// Entries too large (or too far out) to bucket.
    oversized: Vec<usize>,
    rects: Vec<RectF>,
}

impl SpatialGrid {
    /// Create a new spatial grid with the given cell size.
    /// Cell size should be roughly the size of a typical item.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: if cell_size.is_finite() && cell_size >= 1.0 { cell_size } else { 1.0 },
            cells: HashMap::new(),
            oversized: Vec::new(),
            rects: Vec::new(),
        }
    }

    fn cell_of(&self, v: f64) -> i64 {
        (v / self.cell_size).floor() as i64
    }

    /// Inclusive cell span of a rectangle, or `None` if it is too large.
    fn cell_span(&self, rect: &RectF) -> Option<((i64, i64), (i64, i64))> {
        let (x0, x1) = (self.cell_of(rect.x), self.cell_of(rect.right()));
        let (y0, y1) = (self.cell_of(rect.y), self.cell_of(rect.bottom()));
        let count = x1
            .saturating_sub(x0)
            .saturating_add(1)
            .saturating_mul(y1.saturating_sub(y0).saturating_add(1));
        if !(1..=MAX_CELLS_PER_RECT).contains(&count) {
            return None;
        }
        Some(((x0, x1), (y0, y1)))
    }

    /// Insert a rectangle and return its index.
    pub fn insert(&mut self, rect: RectF) -> usize {
        let index = self.rects.len();
        self.rects.push(rect);
        match self.cell_span(&rect) {
            Some(((x0, x1), (y0, y1))) => {
                for cx in x0..=x1 {
                    for cy in y0..=y1 {
                        self.cells.entry((cx, cy)).or_default().push(index);
                    }
                }
            }
            None => self.oversized.push(index),
        }
        index
    }

    /// Indices of rectangles that share a cell with `rect`, in ascending
    /// order. May include false positives; callers do the exact test.
    pub fn query(&self, rect: &RectF) -> Vec<usize> {
        let Some(((x0, x1), (y0, y1))) = self.cell_span(rect) else {
            return (0..self.rects.len()).collect();
        };

        let mut seen: HashSet<usize> = self.oversized.iter().copied().collect();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(entries) = self.cells.get(&(cx, cy)) {
                    seen.extend(entries.iter().copied());
                }
            }
        }
        let mut result: Vec<usize> = seen.into_iter().collect();
        result.sort_unstable();
        result
    }
}
