//! Radial free-form layout.
//!
//! The most connected table is dropped at the start point and its neighbours
//! are spread on a circle around it, each neighbour then doing the same for
//! its own unplaced neighbours. Tables that were not reached restart at the
//! start point and let collision search push them aside. Isolated tables go
//! in wrapped rows beneath the clusters.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::f64::consts::PI;

use crate::layout::adjacency::RelationshipGraph;
use crate::layout::collision::{SearchBudget, SearchStrategy};
use crate::layout::components::Partition;
use crate::layout::geometry::{table_bounds, table_dimensions};
use crate::layout::placement::PlacementContext;
use crate::layout::{LayoutConfig, PointF};
use crate::schema::DbTable;

/// One table whose neighbours are still being visited.
struct Frame {
    idx: usize,
    pos: PointF,
    next: usize,
    angle: f64,
    step: f64,
}

pub fn layout_radial(
    tables: &mut [DbTable],
    partition: &Partition,
    graph: &RelationshipGraph,
    cfg: &LayoutConfig,
    budget: &SearchBudget,
    ctx: &mut PlacementContext,
) {
    let mut connected: Vec<usize> = partition.groups.iter().flatten().copied().collect();
    connected.sort_unstable();
    connected.sort_by_key(|&i| Reverse(graph.degree(&tables[i].id)));

    let index_of: HashMap<String, usize> =
        connected.iter().map(|&i| (tables[i].id.clone(), i)).collect();

    let mut cluster_bottom: Option<f64> = None;
    for &seed in &connected {
        if ctx.is_placed(&tables[seed].id) {
            continue;
        }
        let bottom = radiate_from(tables, seed, &index_of, graph, cfg, budget, ctx);
        cluster_bottom = Some(cluster_bottom.map_or(bottom, |b| b.max(bottom)));
    }

    place_isolated_rows(tables, &partition.isolated, cluster_bottom, cfg, budget, ctx);
}

/// Place `seed` at the start point and walk its component depth-first,
/// returning the lowest edge of everything it placed.
fn radiate_from(
    tables: &mut [DbTable],
    seed: usize,
    index_of: &HashMap<String, usize>,
    graph: &RelationshipGraph,
    cfg: &LayoutConfig,
    budget: &SearchBudget,
    ctx: &mut PlacementContext,
) -> f64 {
    let gap = (cfg.gap_x, cfg.gap_y);
    let pos = ctx.place_near(
        &mut tables[seed],
        cfg.start,
        SearchStrategy::Stepped,
        gap,
        budget.stepped,
    );
    let mut bottom = table_bounds(&tables[seed]).bottom();
    log::trace!("radial: seed '{}' at ({}, {})", tables[seed].id, pos.x, pos.y);

    let mut stack = vec![frame(seed, pos, graph, tables)];
    while let Some(top) = stack.last_mut() {
        let neighbors = graph.neighbors(&tables[top.idx].id);
        let Some(next_id) = neighbors.get(top.next) else {
            stack.pop();
            continue;
        };
        top.next += 1;

        if ctx.is_placed(next_id) {
            continue;
        }
        let Some(&child) = index_of.get(next_id) else {
            continue;
        };

        let here = table_dimensions(&tables[top.idx]);
        let there = table_dimensions(&tables[child]);
        let avg_w = (here.w + there.w) / 2.0;
        let avg_h = (here.h + there.h) / 2.0;
        let target = PointF {
            x: top.pos.x + top.angle.cos() * (avg_w + 2.0 * cfg.gap_x),
            y: top.pos.y + top.angle.sin() * (avg_h + 2.0 * cfg.gap_y),
        };
        top.angle += top.step;

        let child_pos = ctx.place_near(
            &mut tables[child],
            target,
            SearchStrategy::Stepped,
            gap,
            budget.stepped,
        );
        bottom = bottom.max(table_bounds(&tables[child]).bottom());
        stack.push(frame(child, child_pos, graph, tables));
    }

    bottom
}

fn frame(idx: usize, pos: PointF, graph: &RelationshipGraph, tables: &[DbTable]) -> Frame {
    let degree = graph.degree(&tables[idx].id);
    let step = if degree == 0 { 0.0 } else { 2.0 * PI / degree as f64 };
    Frame { idx, pos, next: 0, angle: 0.0, step }
}

/// Rows of isolated tables under the clusters, wrapping after
/// `isolated_row_width`.
fn place_isolated_rows(
    tables: &mut [DbTable],
    isolated: &[usize],
    cluster_bottom: Option<f64>,
    cfg: &LayoutConfig,
    budget: &SearchBudget,
    ctx: &mut PlacementContext,
) {
    let mut x = cfg.start.x;
    let mut y = cfg.start.y + cfg.isolated_offset_y;
    if let Some(bottom) = cluster_bottom {
        y = y.max(bottom + cfg.gap_y);
    }

    for &i in isolated {
        ctx.place_near(
            &mut tables[i],
            PointF { x, y },
            SearchStrategy::Stepped,
            (cfg.gap_x, cfg.gap_y),
            budget.stepped,
        );

        x += cfg.isolated_table_width + cfg.gap_x;
        if x > cfg.start.x + cfg.isolated_row_width {
            x = cfg.start.x;
            y += cfg.isolated_table_height + cfg.gap_y;
        }
    }
}
