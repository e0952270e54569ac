//! Level-based layout for the optimized path.
//!
//! A connected group is split into breadth-first levels from its most
//! connected table. Levels advance along the primary axis of the layout
//! direction and each level is centred across the other axis of the group's
//! region. Isolated tables are packed into a small grid (horizontal) or a
//! single row along the bottom of the region (vertical).

use std::collections::{HashMap, HashSet, VecDeque};

use crate::layout::adjacency::RelationshipGraph;
use crate::layout::collision::{SearchBudget, SearchStrategy};
use crate::layout::placement::PlacementContext;
use crate::layout::{LayoutDirection, OptimizedLayoutConfig, PointF, RectF};
use crate::schema::DbTable;

/// Breadth-first levels of `group`, rooted at `group[0]`.
///
/// Neighbours outside the group are not followed. Members the traversal
/// cannot reach are collected into one extra trailing level so every
/// member is returned exactly once.
pub fn assign_levels(
    tables: &[DbTable],
    group: &[usize],
    graph: &RelationshipGraph,
) -> Vec<Vec<usize>> {
    let Some(&root) = group.first() else {
        return Vec::new();
    };

    let index_of: HashMap<&str, usize> =
        group.iter().map(|&i| (tables[i].id.as_str(), i)).collect();
    let mut levels: Vec<Vec<usize>> = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    seen.insert(root);
    queue.push_back((root, 0));
    while let Some((idx, level)) = queue.pop_front() {
        if levels.len() <= level {
            levels.push(Vec::new());
        }
        levels[level].push(idx);

        for next in graph.neighbors(&tables[idx].id) {
            if let Some(&n) = index_of.get(next.as_str()) {
                if seen.insert(n) {
                    queue.push_back((n, level + 1));
                }
            }
        }
    }

    let unreached: Vec<usize> = group.iter().copied().filter(|i| !seen.contains(i)).collect();
    if !unreached.is_empty() {
        log::debug!(
            "hierarchical: {} tables unreachable from root, appending a level",
            unreached.len()
        );
        levels.push(unreached);
    }

    levels
}

#[allow(clippy::too_many_arguments)]
pub fn layout_connected_hierarchical(
    tables: &mut [DbTable],
    group: &[usize],
    graph: &RelationshipGraph,
    region: RectF,
    cfg: &OptimizedLayoutConfig,
    direction: LayoutDirection,
    budget: &SearchBudget,
    ctx: &mut PlacementContext,
) {
    let levels = assign_levels(tables, group, graph);
    let gap = (cfg.gap_x, cfg.gap_y);
    let pitch_x = cfg.table_size.w + cfg.gap_x;
    let pitch_y = cfg.table_size.h + cfg.gap_y;

    for (level, members) in levels.iter().enumerate() {
        let n = members.len() as f64;
        let (mut cursor, step) = match direction {
            LayoutDirection::Horizontal => (
                PointF {
                    x: region.x + (region.w - n * pitch_x) / 2.0,
                    y: region.y + level as f64 * cfg.level_gap_y,
                },
                PointF { x: pitch_x, y: 0.0 },
            ),
            LayoutDirection::Vertical => (
                PointF {
                    x: region.x + level as f64 * cfg.level_gap_x,
                    y: region.y + (region.h - n * pitch_y) / 2.0,
                },
                PointF { x: 0.0, y: pitch_y },
            ),
        };

        for &i in members {
            let pos =
                ctx.place_near(&mut tables[i], cursor, SearchStrategy::Spiral, gap, budget.spiral);
            log::trace!("hierarchical: level {level} '{}' at ({}, {})", tables[i].id, pos.x, pos.y);
            cursor.x += step.x;
            cursor.y += step.y;
        }
    }
}

pub fn layout_isolated_grid(
    tables: &mut [DbTable],
    isolated: &[usize],
    region: RectF,
    cfg: &OptimizedLayoutConfig,
    direction: LayoutDirection,
    budget: &SearchBudget,
    ctx: &mut PlacementContext,
) {
    if isolated.is_empty() {
        return;
    }

    let gap = (cfg.gap_x, cfg.gap_y);
    let pitch_x = cfg.table_size.w + cfg.gap_x;
    let pitch_y = cfg.table_size.h + cfg.gap_y;
    let n = isolated.len();

    match direction {
        LayoutDirection::Horizontal => {
            let cols = (n as f64).sqrt().ceil() as usize;
            let rows = n.div_ceil(cols);
            let grid_w = cols as f64 * cfg.table_size.w + (cols - 1) as f64 * cfg.gap_x;
            let grid_h = rows as f64 * cfg.table_size.h + (rows - 1) as f64 * cfg.gap_y;
            let start_x = region.x + ((region.w - grid_w) / 2.0).max(0.0);
            let start_y = region.y + ((region.h - grid_h) / 2.0).max(0.0);

            for (k, &i) in isolated.iter().enumerate() {
                let origin = PointF {
                    x: start_x + (k % cols) as f64 * pitch_x,
                    y: start_y + (k / cols) as f64 * pitch_y,
                };
                ctx.place_near(&mut tables[i], origin, SearchStrategy::Spiral, gap, budget.spiral);
            }
        }
        LayoutDirection::Vertical => {
            let total_w = n as f64 * cfg.table_size.w + (n - 1) as f64 * cfg.gap_x;
            let mut x = region.x + ((region.w - total_w) / 2.0).max(0.0);
            let y = region.y + region.h - cfg.table_size.h - cfg.isolated_bottom_margin;

            for &i in isolated {
                let cell = PointF { x, y };
                ctx.place_near(&mut tables[i], cell, SearchStrategy::Spiral, gap, budget.spiral);
                x += pitch_x;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DbRelationship;

    fn tables(ids: &[&str]) -> Vec<DbTable> {
        ids.iter().map(|id| DbTable::new(*id, *id, 0.0, 0.0)).collect()
    }

    fn rel(a: &str, b: &str) -> DbRelationship {
        DbRelationship::new(format!("{a}-{b}"), a, b)
    }

    #[test]
    fn test_levels_are_breadth_first() {
        //   r
        //  / \
        // a   b
        // |
        // c
        let t = tables(&["r", "a", "b", "c"]);
        let graph = RelationshipGraph::build(&[rel("r", "a"), rel("r", "b"), rel("a", "c")]);
        let levels = assign_levels(&t, &[0, 1, 2, 3], &graph);
        assert_eq!(levels, vec![vec![0], vec![1, 2], vec![3]]);
    }

    #[test]
    fn test_cycle_keeps_shortest_level() {
        // Depth-first discovery would put c on level 2; breadth-first puts it on 1.
        let t = tables(&["r", "a", "c"]);
        let graph = RelationshipGraph::build(&[rel("r", "a"), rel("a", "c"), rel("c", "r")]);
        let levels = assign_levels(&t, &[0, 1, 2], &graph);
        assert_eq!(levels, vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn test_unreached_members_get_extra_level() {
        let t = tables(&["r", "a", "x"]);
        let graph = RelationshipGraph::build(&[rel("r", "a")]);
        let levels = assign_levels(&t, &[0, 1, 2], &graph);
        assert_eq!(levels, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_empty_group_has_no_levels() {
        let graph = RelationshipGraph::default();
        assert!(assign_levels(&[], &[], &graph).is_empty());
    }

    #[test]
    fn test_horizontal_levels_are_centred() {
        let mut t = tables(&["r", "a", "b"]);
        let graph = RelationshipGraph::build(&[rel("r", "a"), rel("r", "b")]);
        let cfg = OptimizedLayoutConfig::for_direction(LayoutDirection::Horizontal);
        let region = RectF::new(0.0, 0.0, 2000.0, 1000.0);
        let mut ctx = PlacementContext::new();
        layout_connected_hierarchical(
            &mut t,
            &[0, 1, 2],
            &graph,
            region,
            &cfg,
            LayoutDirection::Horizontal,
            &SearchBudget::default(),
            &mut ctx,
        );

        // pitch 530: level 0 starts at (2000 - 530) / 2, level 1 at (2000 - 1060) / 2.
        assert_eq!((t[0].x, t[0].y), (735.0, 0.0));
        assert_eq!((t[1].x, t[1].y), (470.0, 280.0));
        assert_eq!((t[2].x, t[2].y), (1000.0, 280.0));
    }

    #[test]
    fn test_isolated_grid_horizontal() {
        let mut t = tables(&["a", "b", "c", "d", "e"]);
        let cfg = OptimizedLayoutConfig::for_direction(LayoutDirection::Horizontal);
        let region = RectF::new(100.0, 100.0, 2000.0, 1000.0);
        let mut ctx = PlacementContext::new();
        layout_isolated_grid(
            &mut t,
            &[0, 1, 2, 3, 4],
            region,
            &cfg,
            LayoutDirection::Horizontal,
            &SearchBudget::default(),
            &mut ctx,
        );

        // 3 columns x 2 rows: grid 1340 x 550.
        assert_eq!((t[0].x, t[0].y), (430.0, 325.0));
        assert_eq!((t[2].x, t[2].y), (1490.0, 325.0));
        assert_eq!((t[3].x, t[3].y), (430.0, 675.0));
    }

    #[test]
    fn test_isolated_row_vertical() {
        let mut t = tables(&["a", "b"]);
        let cfg = OptimizedLayoutConfig::for_direction(LayoutDirection::Vertical);
        let region = RectF::new(0.0, 0.0, 1000.0, 800.0);
        let mut ctx = PlacementContext::new();
        layout_isolated_grid(
            &mut t,
            &[0, 1],
            region,
            &cfg,
            LayoutDirection::Vertical,
            &SearchBudget::default(),
            &mut ctx,
        );

        // Row width 2 * 280 + 180 = 740; y = 800 - 200 - 50.
        assert_eq!((t[0].x, t[0].y), (130.0, 550.0));
        assert_eq!((t[1].x, t[1].y), (590.0, 550.0));
    }
}
