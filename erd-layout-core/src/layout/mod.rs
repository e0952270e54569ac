// Automatic table layout for ER diagrams.
//
// Goals:
// - Deterministic: same input order + same config => same coordinates
// - Input isolation: every entry point clones the tables and returns the clone
// - Best-effort non-overlap via bounded collision search
// - Never fails on incomplete data (dangling relationships are skipped)
//
// Submodules:
// - geometry: table sizing, containment and overlap predicates
// - collision: stepped and spiral search for a free spot
// - adjacency: undirected relationship graph
// - components: connected groups vs isolated tables
// - placement: the mutable placement context threaded through algorithms
// - regions: per-group canvas subdivision
// - overlap: overlap report backed by spatial_grid
// - algorithms: area, radial, hierarchical and grid placement

use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::{Area, DbRelationship, DbTable};

pub mod adjacency;
pub mod algorithms;
pub mod collision;
pub mod components;
pub mod geometry;
pub mod overlap;
pub mod placement;
pub mod regions;
mod spatial_grid;

use adjacency::RelationshipGraph;
use algorithms::{area, grid, hierarchical, radial};
use collision::SearchBudget;
use components::partition_tables;
use placement::PlacementContext;

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeF {
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectF {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(origin: PointF, size: SizeF) -> Self {
        Self { x: origin.x, y: origin.y, w: size.w, h: size.h }
    }

    pub fn right(&self) -> f64 { self.x + self.w }
    pub fn bottom(&self) -> f64 { self.y + self.h }

    /// True unless one rectangle lies strictly to one side of the other.
    /// Shared edges count as overlap.
    pub fn touches_or_overlaps(&self, other: &RectF) -> bool {
        !(self.right() < other.x
            || other.right() < self.x
            || self.bottom() < other.y
            || other.bottom() < self.y)
    }

    /// Inclusive containment of `inner` on all four sides.
    pub fn contains_rect(&self, inner: &RectF) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }

    pub fn union(&self, other: &RectF) -> RectF {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        RectF { x: x0, y: y0, w: x1 - x0, h: y1 - y0 }
    }
}

impl From<&Area> for RectF {
    fn from(area: &Area) -> Self {
        RectF { x: area.x, y: area.y, w: area.width, h: area.height }
    }
}

/// Which tables take part in a layout pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Every table is repositioned.
    #[default]
    All,
    /// Relationships crossing schema boundaries are ignored, so each schema
    /// forms its own clusters.
    PerSchema,
    /// Only `selected_table_ids` move; the rest stay put as obstacles.
    Selected,
}

/// Primary axis of the optimized (level-based) layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Levels stack top to bottom, tables in a level run left to right.
    #[default]
    Horizontal,
    /// Levels stack left to right, tables in a level run top to bottom.
    Vertical,
}

/// Constants for the free-form (radial) layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub gap_x: f64,
    pub gap_y: f64,
    /// Where the first cluster seed (and every later restart) is placed.
    pub start: PointF,
    /// Minimum distance from `start.y` down to the row of isolated tables.
    pub isolated_offset_y: f64,
    /// Isolated tables wrap once the row extends this far past `start.x`.
    pub isolated_row_width: f64,
    /// Horizontal pitch unit for isolated tables (plus `gap_x`).
    pub isolated_table_width: f64,
    /// Vertical pitch unit for wrapped isolated rows (plus `gap_y`).
    pub isolated_table_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap_x: 100.0,
            gap_y: 100.0,
            start: PointF { x: 100.0, y: 100.0 },
            isolated_offset_y: 400.0,
            isolated_row_width: 1000.0,
            isolated_table_width: 200.0,
            isolated_table_height: 300.0,
        }
    }
}

/// Constants for placing tables inside a fixed area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AreaLayoutConfig {
    /// Inset from every area edge.
    pub padding: f64,
    pub gap_x: f64,
    pub gap_y: f64,
    /// Width budget per grid column.
    pub column_width: f64,
}

impl Default for AreaLayoutConfig {
    fn default() -> Self {
        Self { padding: 20.0, gap_x: 50.0, gap_y: 50.0, column_width: 250.0 }
    }
}

/// Constants for the optimized layout. Spacing depends on direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizedLayoutConfig {
    pub gap_x: f64,
    pub gap_y: f64,
    /// Nominal box used for level/grid pitch and canvas sizing.
    pub table_size: SizeF,
    /// Outer canvas margin and spacing between group regions.
    pub canvas_padding: f64,
    pub level_gap_x: f64,
    pub level_gap_y: f64,
    pub min_canvas: SizeF,
    /// Inset of the vertical-mode isolated row from the region bottom.
    pub isolated_bottom_margin: f64,
}

impl OptimizedLayoutConfig {
    pub fn for_direction(direction: LayoutDirection) -> Self {
        let horizontal = direction == LayoutDirection::Horizontal;
        Self {
            gap_x: if horizontal { 250.0 } else { 180.0 },
            gap_y: if horizontal { 150.0 } else { 200.0 },
            table_size: SizeF { w: 280.0, h: 200.0 },
            canvas_padding: 100.0,
            level_gap_x: 320.0,
            level_gap_y: 280.0,
            min_canvas: SizeF { w: 1400.0, h: 1000.0 },
            isolated_bottom_margin: 50.0,
        }
    }

    /// Canvas large enough for `table_count` tables at nominal pitch.
    pub fn canvas_size(&self, table_count: usize) -> SizeF {
        let n = table_count as f64;
        SizeF {
            w: self.min_canvas.w.max(n * (self.table_size.w + self.gap_x)),
            h: self
                .min_canvas
                .h
                .max((n / 4.0).ceil() * (self.table_size.h + self.gap_y)),
        }
    }
}

impl Default for OptimizedLayoutConfig {
    fn default() -> Self {
        Self::for_direction(LayoutDirection::Horizontal)
    }
}

/// Partial `OptimizedLayoutConfig` as it appears in a request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptimizedLayoutOverrides {
    gap_x: Option<f64>,
    gap_y: Option<f64>,
    table_size: Option<SizeF>,
    canvas_padding: Option<f64>,
    level_gap_x: Option<f64>,
    level_gap_y: Option<f64>,
    min_canvas: Option<SizeF>,
    isolated_bottom_margin: Option<f64>,
}

impl OptimizedLayoutOverrides {
    fn apply(self, base: OptimizedLayoutConfig) -> OptimizedLayoutConfig {
        OptimizedLayoutConfig {
            gap_x: self.gap_x.unwrap_or(base.gap_x),
            gap_y: self.gap_y.unwrap_or(base.gap_y),
            table_size: self.table_size.unwrap_or(base.table_size),
            canvas_padding: self.canvas_padding.unwrap_or(base.canvas_padding),
            level_gap_x: self.level_gap_x.unwrap_or(base.level_gap_x),
            level_gap_y: self.level_gap_y.unwrap_or(base.level_gap_y),
            min_canvas: self.min_canvas.unwrap_or(base.min_canvas),
            isolated_bottom_margin: self
                .isolated_bottom_margin
                .unwrap_or(base.isolated_bottom_margin),
        }
    }
}

// Missing keys of `config.vertical` come from the vertical defaults, not from
// `OptimizedLayoutConfig::default()`.
fn vertical_config<'de, D>(deserializer: D) -> std::result::Result<OptimizedLayoutConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = OptimizedLayoutOverrides::deserialize(deserializer)?;
    Ok(overrides.apply(OptimizedLayoutConfig::for_direction(LayoutDirection::Vertical)))
}

/// Constants for the plain grid layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridLayoutConfig {
    pub columns: usize,
    pub cell_size: f64,
    pub origin: PointF,
}

impl Default for GridLayoutConfig {
    fn default() -> Self {
        Self { columns: 3, cell_size: 300.0, origin: PointF { x: 100.0, y: 100.0 } }
    }
}

/// Every tunable the engine reads, grouped for the JSON `config` override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    pub free_form: LayoutConfig,
    pub area: AreaLayoutConfig,
    pub horizontal: OptimizedLayoutConfig,
    #[serde(deserialize_with = "vertical_config")]
    pub vertical: OptimizedLayoutConfig,
    pub grid: GridLayoutConfig,
    pub budget: SearchBudget,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            free_form: LayoutConfig::default(),
            area: AreaLayoutConfig::default(),
            horizontal: OptimizedLayoutConfig::for_direction(LayoutDirection::Horizontal),
            vertical: OptimizedLayoutConfig::for_direction(LayoutDirection::Vertical),
            grid: GridLayoutConfig::default(),
            budget: SearchBudget::default(),
        }
    }
}

impl LayoutSettings {
    pub fn optimized(&self, direction: LayoutDirection) -> &OptimizedLayoutConfig {
        match direction {
            LayoutDirection::Horizontal => &self.horizontal,
            LayoutDirection::Vertical => &self.vertical,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOptions {
    pub mode: LayoutMode,
    pub direction: LayoutDirection,
    /// Only read in `LayoutMode::Selected`.
    pub selected_table_ids: Vec<String>,
    pub settings: LayoutSettings,
}

impl LayoutOptions {
    pub fn with_direction(direction: LayoutDirection) -> Self {
        Self { direction, ..Self::default() }
    }

    /// Indices of the tables this pass may move, in input order.
    fn movable_indices(&self, tables: &[DbTable]) -> Vec<usize> {
        match self.mode {
            LayoutMode::Selected => tables
                .iter()
                .enumerate()
                .filter(|(_, t)| self.selected_table_ids.iter().any(|id| *id == t.id))
                .map(|(i, _)| i)
                .collect(),
            LayoutMode::All | LayoutMode::PerSchema => (0..tables.len()).collect(),
        }
    }
}

/// A named layout algorithm, selected per request.
pub trait LayoutStrategy {
    fn arrange(
        &self,
        tables: &[DbTable],
        relationships: &[DbRelationship],
        areas: &[Area],
        options: &LayoutOptions,
    ) -> Vec<DbTable>;
}

/// Area-aware layout, falling back to radial placement when there are no areas.
pub struct StandardLayout;

impl LayoutStrategy for StandardLayout {
    fn arrange(
        &self,
        tables: &[DbTable],
        relationships: &[DbRelationship],
        areas: &[Area],
        options: &LayoutOptions,
    ) -> Vec<DbTable> {
        layout(tables, relationships, areas, options)
    }
}

/// Region-per-group, level-based layout.
pub struct OptimizedLayout;

impl LayoutStrategy for OptimizedLayout {
    fn arrange(
        &self,
        tables: &[DbTable],
        relationships: &[DbRelationship],
        areas: &[Area],
        options: &LayoutOptions,
    ) -> Vec<DbTable> {
        layout_optimized(tables, relationships, areas, options)
    }
}

/// Fixed-pitch grid, ignoring relationships.
pub struct GridLayout;

impl LayoutStrategy for GridLayout {
    fn arrange(
        &self,
        tables: &[DbTable],
        _relationships: &[DbRelationship],
        _areas: &[Area],
        options: &LayoutOptions,
    ) -> Vec<DbTable> {
        grid::layout_grid(tables, options)
    }
}

/// Lay out `tables`, honouring areas when any are given.
///
/// Without areas this is [`layout_without_areas`]. With areas, each table
/// whose `parent_area_id` names one of them and that is not already fully
/// inside it is moved into it; every other table keeps its coordinates.
pub fn layout(
    tables: &[DbTable],
    relationships: &[DbRelationship],
    areas: &[Area],
    options: &LayoutOptions,
) -> Vec<DbTable> {
    if areas.is_empty() {
        return layout_without_areas(tables, relationships, options);
    }

    let mut working = tables.to_vec();
    let movable = options.movable_indices(&working);
    let mut is_movable = vec![false; working.len()];
    for &i in &movable {
        is_movable[i] = true;
    }

    log::debug!(
        "area layout: {} tables ({} movable), {} areas",
        working.len(),
        movable.len(),
        areas.len()
    );

    for a in areas {
        let mut bucket: Vec<&mut DbTable> = working
            .iter_mut()
            .zip(is_movable.iter())
            .filter(|(t, movable)| {
                **movable
                    && t.parent_area_id.as_deref() == Some(a.id.as_str())
                    && !geometry::is_table_inside_area(t, a)
            })
            .map(|(t, _)| t)
            .collect();

        if bucket.is_empty() {
            continue;
        }
        log::trace!("area '{}': repositioning {} tables", a.id, bucket.len());
        area::position_tables_within_area(&mut bucket, a, &options.settings.area);
    }

    working
}

/// Free-form layout: connected clusters radiate from their most connected
/// table, isolated tables line up in rows underneath.
pub fn layout_without_areas(
    tables: &[DbTable],
    relationships: &[DbRelationship],
    options: &LayoutOptions,
) -> Vec<DbTable> {
    let mut working = tables.to_vec();
    let movable = options.movable_indices(&working);
    let graph = RelationshipGraph::build_scoped(relationships, &working, options.mode);
    let partition = partition_tables(&working, &movable, &graph);
    let mut ctx = PlacementContext::with_obstacles(&working, &movable);

    log::debug!(
        "radial layout: {} connected groups, {} isolated tables",
        partition.groups.len(),
        partition.isolated.len()
    );

    radial::layout_radial(
        &mut working,
        &partition,
        &graph,
        &options.settings.free_form,
        &options.settings.budget,
        &mut ctx,
    );

    working
}

/// Optimized layout: explicit areas are ignored; groups are derived from
/// relationship connectivity, each group gets its own canvas region, and
/// connected tables are arranged level by level from the most connected one.
pub fn layout_optimized(
    tables: &[DbTable],
    relationships: &[DbRelationship],
    _areas: &[Area],
    options: &LayoutOptions,
) -> Vec<DbTable> {
    let mut working = tables.to_vec();
    let movable = options.movable_indices(&working);
    if movable.is_empty() {
        return working;
    }

    let cfg = options.settings.optimized(options.direction);
    let budget = &options.settings.budget;
    let canvas = cfg.canvas_size(movable.len());

    let graph = RelationshipGraph::build_scoped(relationships, &working, options.mode);
    let groups = partition_tables(&working, &movable, &graph).into_layout_groups();
    let regions = regions::allocate_group_regions(groups.len(), canvas, cfg.canvas_padding);
    let mut ctx = PlacementContext::with_obstacles(&working, &movable);

    log::debug!(
        "optimized layout ({:?}): {} groups on a {}x{} canvas",
        options.direction,
        groups.len(),
        canvas.w,
        canvas.h
    );

    for (group, region) in groups.iter().zip(regions.iter()) {
        if !group.connected.is_empty() {
            hierarchical::layout_connected_hierarchical(
                &mut working,
                &group.connected,
                &graph,
                *region,
                cfg,
                options.direction,
                budget,
                &mut ctx,
            );
        }
        if !group.isolated.is_empty() {
            hierarchical::layout_isolated_grid(
                &mut working,
                &group.isolated,
                *region,
                cfg,
                options.direction,
                budget,
                &mut ctx,
            );
        }
    }

    working
}
