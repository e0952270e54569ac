// Placement context shared by the free-form algorithms.
//
// Tracks which tables already have a final position and the rectangles that
// later tables must avoid. Tables outside the current layout scope are
// registered up front as fixed obstacles.

use std::collections::{HashMap, HashSet};

use crate::schema::DbTable;
use super::collision::{self, SearchStrategy};
use super::geometry::table_bounds;
use super::{PointF, RectF};

/// A rectangle that collision search must avoid, tagged with its table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRect {
    pub id: String,
    pub bounds: RectF,
}

#[derive(Debug, Clone, Default)]
pub struct PlacementContext {
    placed: HashSet<String>,
    positions: HashMap<String, PointF>,
    rects: Vec<PlacedRect>,
}

impl PlacementContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context where every table not listed in `movable` is already placed.
    pub fn with_obstacles(tables: &[DbTable], movable: &[usize]) -> Self {
        let movable: HashSet<usize> = movable.iter().copied().collect();
        let mut ctx = Self::new();
        for (i, t) in tables.iter().enumerate() {
            if !movable.contains(&i) {
                ctx.record(t);
            }
        }
        ctx
    }

    pub fn is_placed(&self, id: &str) -> bool {
        self.placed.contains(id)
    }

    pub fn position(&self, id: &str) -> Option<PointF> {
        self.positions.get(id).copied()
    }

    pub fn rects(&self) -> &[PlacedRect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Move `table` to `pos` and mark it placed.
    pub fn place(&mut self, table: &mut DbTable, pos: PointF) {
        table.x = pos.x;
        table.y = pos.y;
        self.record(table);
    }

    /// Search for a free spot near `origin`, then place the table there.
    pub fn place_near(
        &mut self,
        table: &mut DbTable,
        origin: PointF,
        strategy: SearchStrategy,
        gap: (f64, f64),
        max_attempts: usize,
    ) -> PointF {
        let pos = collision::find_position(strategy, origin, table, &self.rects, gap, max_attempts);
        self.place(table, pos);
        pos
    }

    fn record(&mut self, table: &DbTable) {
        let pos = PointF { x: table.x, y: table.y };
        let bounds = table_bounds(table);
        if self.placed.insert(table.id.clone()) {
            self.rects.push(PlacedRect { id: table.id.clone(), bounds });
        } else if let Some(r) = self.rects.iter_mut().find(|r| r.id == table.id) {
            r.bounds = bounds;
        }
        self.positions.insert(table.id.clone(), pos);
    }
}
