//! Import of the "custom JSON" schema description format.
//!
//! ```json
//! {
//!   "tables": {
//!     "orders": {
//!       "chinese_name": "...", "description": "...",
//!       "fields": [{ "field_english_name": "...", "field_name": "id", "description": "..." }],
//!       "primarykey": ["id"]
//!     }
//!   },
//!   "relationships": [
//!     { "name": "...", "source_table": "orders", "target_table": "users", "relationship_type": "N:1", "description": "..." }
//!   ],
//!   "areas": [{ "name": "...", "x": 0, "y": 0, "width": 800, "height": 600, "color": "" }]
//! }
//! ```
//!
//! Tables keep the order of the `tables` object. Ids are derived from that
//! order, so importing the same document twice yields the same diagram.

use indexmap::IndexMap;
use serde::Deserialize;

use super::{Area, Cardinality, DbField, DbIndex, DbRelationship, DbTable, Diagram};
use crate::error::Result;
use crate::layout::algorithms::grid::layout_grid;
use crate::layout::LayoutOptions;

pub const TABLE_COLORS: [&str; 8] = [
    "#b067e9", "#ff6b8a", "#8eb7ff", "#ffe374", "#9ef07a", "#ff6363", "#7175fa", "#63c9ec",
];

pub const AREA_COLORS: [&str; 3] = ["#e0e0e0", "#f5f5f5", "#fafafa"];

const IMPORTED_DIAGRAM_NAME: &str = "Imported Diagram";

#[derive(Debug, Deserialize)]
struct CustomDocument {
    tables: IndexMap<String, CustomTable>,
    #[serde(default)]
    relationships: Vec<CustomRelationship>,
    #[serde(default)]
    areas: Vec<CustomArea>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CustomTable {
    chinese_name: String,
    description: String,
    fields: Vec<CustomField>,
    primarykey: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CustomField {
    field_english_name: String,
    field_name: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CustomRelationship {
    name: String,
    source_table: String,
    target_table: String,
    relationship_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CustomArea {
    name: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: String,
}

/// `(source, target)` cardinalities for a relationship type label such as
/// `"1:N"` or `"N：1"`. Unrecognised labels are one-to-many.
pub fn parse_relationship_type(label: &str) -> (Cardinality, Cardinality) {
    let normalized = label.replace('：', ":");
    if normalized.contains("1:1") {
        (Cardinality::One, Cardinality::One)
    } else if normalized.contains("1:N") {
        (Cardinality::One, Cardinality::Many)
    } else if normalized.contains("N:1") {
        (Cardinality::Many, Cardinality::One)
    } else if normalized.contains("N:N") {
        (Cardinality::Many, Cardinality::Many)
    } else {
        (Cardinality::One, Cardinality::Many)
    }
}

fn first_non_empty(preferred: &str, fallback: &str) -> Option<String> {
    [preferred, fallback]
        .into_iter()
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn convert_table(n: usize, name: &str, src: &CustomTable) -> DbTable {
    let fields: Vec<DbField> = src
        .fields
        .iter()
        .enumerate()
        .map(|(m, f)| {
            let mut field = DbField::new(format!("field_{n}_{m}"), f.field_name.clone());
            field.primary_key = src.primarykey.contains(&f.field_name);
            field.comments = first_non_empty(&f.description, &f.field_english_name);
            field
        })
        .collect();

    let mut indexes = Vec::new();
    if !src.primarykey.is_empty() {
        let field_ids = src
            .primarykey
            .iter()
            .filter_map(|pk| fields.iter().find(|f| f.name == *pk))
            .map(|f| f.id.clone())
            .collect();
        indexes.push(DbIndex {
            id: format!("index_{n}"),
            name: format!("{name}_pkey"),
            unique: true,
            field_ids,
        });
    }

    let mut table = DbTable::new(format!("table_{n}"), name, 0.0, 0.0);
    table.fields = fields;
    table.indexes = indexes;
    table.color = TABLE_COLORS[n % TABLE_COLORS.len()].to_string();
    table.comments = first_non_empty(&src.description, &src.chinese_name);
    table
}

/// The field a relationship end attaches to: the first primary-key field,
/// else the first field, else nothing.
fn anchor_field(table: &DbTable) -> String {
    table
        .fields
        .iter()
        .find(|f| f.primary_key)
        .or_else(|| table.fields.first())
        .map(|f| f.id.clone())
        .unwrap_or_default()
}

fn convert_relationship(n: usize, src: &CustomRelationship, tables: &[DbTable]) -> DbRelationship {
    let source = tables.iter().find(|t| t.name == src.source_table);
    let target = tables.iter().find(|t| t.name == src.target_table);
    let (source_cardinality, target_cardinality) = parse_relationship_type(&src.relationship_type);

    // Field anchors are only set when both ends resolve.
    let (source_field_id, target_field_id) = match (source, target) {
        (Some(s), Some(t)) => (anchor_field(s), anchor_field(t)),
        _ => (String::new(), String::new()),
    };

    DbRelationship {
        id: format!("relationship_{n}"),
        name: src.name.clone(),
        source_table_id: source.map(|t| t.id.clone()).unwrap_or_default(),
        target_table_id: target.map(|t| t.id.clone()).unwrap_or_default(),
        source_field_id,
        target_field_id,
        source_cardinality,
        target_cardinality,
    }
}

/// Parse a custom JSON document into a diagram with tables already laid out
/// on a grid.
pub fn import_custom_json(json: &str) -> Result<Diagram> {
    let doc: CustomDocument = serde_json::from_str(json)?;

    let tables: Vec<DbTable> = doc
        .tables
        .iter()
        .enumerate()
        .map(|(n, (name, t))| convert_table(n, name, t))
        .collect();

    let relationships: Vec<DbRelationship> = doc
        .relationships
        .iter()
        .enumerate()
        .map(|(n, r)| convert_relationship(n, r, &tables))
        .collect();

    let areas: Vec<Area> = doc
        .areas
        .into_iter()
        .enumerate()
        .map(|(n, a)| Area {
            id: format!("area_{n}"),
            name: a.name,
            x: a.x,
            y: a.y,
            width: a.width,
            height: a.height,
            color: if a.color.is_empty() {
                AREA_COLORS[n % AREA_COLORS.len()].to_string()
            } else {
                a.color
            },
        })
        .collect();

    log::debug!(
        "imported {} tables, {} relationships, {} areas",
        tables.len(),
        relationships.len(),
        areas.len()
    );

    let tables = layout_grid(&tables, &LayoutOptions::default());

    Ok(Diagram {
        id: "diagram".to_string(),
        name: IMPORTED_DIAGRAM_NAME.to_string(),
        tables,
        relationships,
        areas,
    })
}
