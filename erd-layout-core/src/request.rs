//! JSON request accepted at the engine boundary.
//!
//! Everything the browser shell sends goes through here first: the payload
//! is parsed, checked for contract violations, turned into [`LayoutOptions`]
//! and handed to the selected [`LayoutStrategy`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::layout::{
    GridLayout, LayoutDirection, LayoutMode, LayoutOptions, LayoutSettings, LayoutStrategy,
    OptimizedLayout, StandardLayout,
};
use crate::schema::{Area, DbRelationship, DbTable};

/// Which entry point a request runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutAlgorithm {
    /// Area-aware layout, radial when there are no areas.
    #[default]
    Standard,
    /// Region-per-group level layout.
    Optimized,
    /// Fixed-pitch grid.
    Grid,
}

impl LayoutAlgorithm {
    pub fn strategy(self) -> &'static dyn LayoutStrategy {
        match self {
            LayoutAlgorithm::Standard => &StandardLayout,
            LayoutAlgorithm::Optimized => &OptimizedLayout,
            LayoutAlgorithm::Grid => &GridLayout,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub tables: Vec<DbTable>,
    #[serde(default)]
    pub relationships: Vec<DbRelationship>,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub mode: LayoutMode,
    #[serde(default)]
    pub direction: LayoutDirection,
    #[serde(default)]
    pub selected_table_ids: Vec<String>,
    #[serde(default)]
    pub algorithm: LayoutAlgorithm,
    /// Overrides for any subset of the tuning constants.
    #[serde(default)]
    pub config: LayoutSettings,
}

/// Payload of the overlap report: just the tables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TablesRequest {
    pub tables: Vec<DbTable>,
}

impl TablesRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        let req: Self = serde_json::from_str(json)?;
        validate_tables(&req.tables)?;
        Ok(req)
    }
}

impl LayoutRequest {
    /// Parse and validate a request.
    pub fn from_json(json: &str) -> Result<Self> {
        let req: Self = serde_json::from_str(json)?;
        req.validate()?;
        Ok(req)
    }

    /// Reject input the engine would otherwise turn into garbage
    /// coordinates: repeated table ids, non-finite numbers and negative
    /// explicit sizes.
    pub fn validate(&self) -> Result<()> {
        validate_tables(&self.tables)?;
        for a in &self.areas {
            check_finite("area", &a.id, "x", a.x)?;
            check_finite("area", &a.id, "y", a.y)?;
            check_size("area", &a.id, "width", a.width)?;
            check_size("area", &a.id, "height", a.height)?;
        }
        Ok(())
    }

    pub fn options(&self) -> LayoutOptions {
        LayoutOptions {
            mode: self.mode,
            direction: self.direction,
            selected_table_ids: self.selected_table_ids.clone(),
            settings: self.config.clone(),
        }
    }

    /// Validate, then run the requested algorithm.
    pub fn run(&self) -> Result<Vec<DbTable>> {
        self.validate()?;
        log::debug!(
            "layout request: {:?}, mode {:?}, {} tables, {} relationships, {} areas",
            self.algorithm,
            self.mode,
            self.tables.len(),
            self.relationships.len(),
            self.areas.len()
        );
        Ok(self
            .algorithm
            .strategy()
            .arrange(&self.tables, &self.relationships, &self.areas, &self.options()))
    }
}

fn validate_tables(tables: &[DbTable]) -> Result<()> {
    let mut seen = HashSet::new();
    for t in tables {
        if !seen.insert(t.id.as_str()) {
            return Err(LayoutError::DuplicateTableId(t.id.clone()));
        }
        check_finite("table", &t.id, "x", t.x)?;
        check_finite("table", &t.id, "y", t.y)?;
        if let Some(w) = t.width {
            check_size("table", &t.id, "width", w)?;
        }
        if let Some(h) = t.height {
            check_size("table", &t.id, "height", h)?;
        }
    }
    Ok(())
}

fn check_finite(kind: &'static str, id: &str, what: &'static str, v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::NonFiniteGeometry { kind, id: id.to_string(), what })
    }
}

fn check_size(kind: &'static str, id: &str, what: &'static str, v: f64) -> Result<()> {
    check_finite(kind, id, what, v)?;
    if v < 0.0 {
        return Err(LayoutError::NegativeSize { kind, id: id.to_string(), what });
    }
    Ok(())
}
