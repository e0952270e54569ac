//! Collision search: find a spot near a candidate point where a table does
//! not overlap anything already placed.
//!
//! Both strategies are bounded. When the budget runs out they return the
//! ORIGINAL candidate point, which may still overlap; callers treat the
//! result as best-effort.

use serde::{Deserialize, Serialize};

use crate::schema::DbTable;
use super::geometry::table_bounds_at;
use super::placement::PlacedRect;
use super::PointF;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Round-robin over four fixed offsets.
    Stepped,
    /// Unit steps along an outward right/down/left/up spiral.
    Spiral,
}

/// Attempt budgets per strategy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    pub stepped: usize,
    pub spiral: usize,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self { stepped: 100, spiral: 50 }
    }
}

impl SearchBudget {
    pub fn for_strategy(&self, strategy: SearchStrategy) -> usize {
        match strategy {
            SearchStrategy::Stepped => self.stepped,
            SearchStrategy::Spiral => self.spiral,
        }
    }
}

pub fn find_position(
    strategy: SearchStrategy,
    origin: PointF,
    table: &DbTable,
    placed: &[PlacedRect],
    gap: (f64, f64),
    max_attempts: usize,
) -> PointF {
    match strategy {
        SearchStrategy::Stepped => find_position_stepped(origin, table, placed, gap, max_attempts),
        SearchStrategy::Spiral => find_position_spiral(origin, table, placed, gap, max_attempts),
    }
}

/// Probe right, down, left+down, right+up in turn.
pub fn find_position_stepped(
    origin: PointF,
    table: &DbTable,
    placed: &[PlacedRect],
    (gap_x, gap_y): (f64, f64),
    max_attempts: usize,
) -> PointF {
    let mut p = origin;
    for attempt in 0..max_attempts {
        if !collides(table, p, placed) {
            return p;
        }
        match attempt % 4 {
            0 => p.x += gap_x,
            1 => p.y += gap_y,
            2 => {
                p.x -= gap_x;
                p.y += gap_y;
            }
            _ => {
                p.x += gap_x;
                p.y -= gap_y;
            }
        }
    }

    log::debug!("stepped search for '{}' exhausted after {max_attempts} attempts", table.id);
    origin
}

/// Walk a square spiral outward from `origin`, one gap-sized step per attempt.
/// The arm length grows by one after every second turn.
pub fn find_position_spiral(
    origin: PointF,
    table: &DbTable,
    placed: &[PlacedRect],
    (gap_x, gap_y): (f64, f64),
    max_attempts: usize,
) -> PointF {
    let directions = [(gap_x, 0.0), (0.0, gap_y), (-gap_x, 0.0), (0.0, -gap_y)];

    let mut p = origin;
    let mut dir = 0;
    let mut arm_len = 1;
    let mut steps = 0;
    let mut turns = 0;

    for _ in 0..max_attempts {
        if !collides(table, p, placed) {
            return p;
        }

        let (dx, dy) = directions[dir];
        p.x += dx;
        p.y += dy;
        steps += 1;

        if steps == arm_len {
            steps = 0;
            dir = (dir + 1) % 4;
            turns += 1;
            if turns % 2 == 0 {
                arm_len += 1;
            }
        }
    }

    log::debug!("spiral search for '{}' exhausted after {max_attempts} attempts", table.id);
    origin
}

fn collides(table: &DbTable, at: PointF, placed: &[PlacedRect]) -> bool {
    let candidate = table_bounds_at(table, at);
    placed
        .iter()
        .any(|r| r.id != table.id && candidate.touches_or_overlaps(&r.bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::RectF;

    fn obstacle(id: &str, x: f64, y: f64, w: f64, h: f64) -> PlacedRect {
        PlacedRect { id: id.to_string(), bounds: RectF::new(x, y, w, h) }
    }

    fn table() -> DbTable {
        // 200 x 80
        DbTable::new("t", "t", 0.0, 0.0)
    }

    #[test]
    fn test_free_origin_is_returned() {
        let placed = vec![obstacle("x", 1000.0, 1000.0, 10.0, 10.0)];
        for strategy in [SearchStrategy::Stepped, SearchStrategy::Spiral] {
            let origin = PointF::new(0.0, 0.0);
            let p = find_position(strategy, origin, &table(), &placed, (100.0, 100.0), 10);
            assert_eq!(p, PointF::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_own_rect_is_ignored() {
        let placed = vec![obstacle("t", 0.0, 0.0, 200.0, 80.0)];
        let p = find_position_stepped(PointF::new(0.0, 0.0), &table(), &placed, (100.0, 100.0), 10);
        assert_eq!(p, PointF::new(0.0, 0.0));
    }

    #[test]
    fn test_stepped_probe_sequence() {
        // Blocks x in [0, 300]; the first probes (right 100, then down) stay blocked
        // until the third offset sends x back and y past the obstacle.
        let placed = vec![obstacle("o", 0.0, 0.0, 300.0, 150.0)];
        let origin = PointF::new(0.0, 0.0);
        let p = find_position_stepped(origin, &table(), &placed, (100.0, 100.0), 100);
        // attempt 0: (0,0) -> (100,0); 1: (100,0) -> (100,100); 2: (100,100) -> (0,200)
        assert_eq!(p, PointF::new(0.0, 200.0));
    }

    #[test]
    fn test_spiral_probe_sequence() {
        // Obstacle covers origin and the first step right; the spiral turns down next.
        let placed = vec![obstacle("o", 0.0, 0.0, 450.0, 50.0)];
        let p = find_position_spiral(PointF::new(0.0, 0.0), &table(), &placed, (250.0, 150.0), 50);
        // (0,0) blocked -> right (250,0) blocked -> down (250,150) free
        assert_eq!(p, PointF::new(250.0, 150.0));
    }

    #[test]
    fn test_spiral_arm_grows_every_second_turn() {
        // Unit-sized table so each probe only ever touches its own point. Block
        // the first k probes and the search must land on probe k.
        let mut tiny = DbTable::new("t", "t", 0.0, 0.0);
        tiny.width = Some(1.0);
        tiny.height = Some(1.0);

        let path = [
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (-10.0, 10.0),
            (-10.0, 0.0),
            (-10.0, -10.0),
            (0.0, -10.0),
            (10.0, -10.0),
            (20.0, -10.0),
        ];
        for k in 1..path.len() {
            let placed: Vec<PlacedRect> = path[..k]
                .iter()
                .enumerate()
                .map(|(i, (x, y))| obstacle(&format!("o{i}"), *x, *y, 1.0, 1.0))
                .collect();
            let p = find_position_spiral(PointF::new(0.0, 0.0), &tiny, &placed, (10.0, 10.0), 50);
            assert_eq!(p, PointF::new(path[k].0, path[k].1), "probe {k}");
        }
    }

    #[test]
    fn test_exhausted_budget_returns_origin() {
        // Deliberately dense: one obstacle larger than any reachable probe.
        let placed = vec![obstacle("wall", -50_000.0, -50_000.0, 100_000.0, 100_000.0)];
        let origin = PointF::new(10.0, 20.0);
        for strategy in [SearchStrategy::Stepped, SearchStrategy::Spiral] {
            let budget = SearchBudget::default().for_strategy(strategy);
            let p = find_position(strategy, origin, &table(), &placed, (100.0, 100.0), budget);
            assert_eq!(p, origin, "{strategy:?} should fall back to the origin");
        }
    }

    #[test]
    fn test_zero_budget_returns_origin() {
        let p = find_position_spiral(PointF::new(5.0, 5.0), &table(), &[], (1.0, 1.0), 0);
        assert_eq!(p, PointF::new(5.0, 5.0));
    }
}
