//! Schema domain model shared by the layout engine and the JSON boundary.
//!
//! These mirror the objects the diagram editor keeps in its canvas store.
//! Only `x`/`y` are ever written by the engine; everything else passes
//! through untouched.

use serde::{Deserialize, Serialize};

pub mod import;

pub use import::import_custom_json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTable {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Explicit width; `None` (or a non-positive value) means "use the default".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Explicit height; `None` (or a non-positive value) means "derive from fields".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub fields: Vec<DbField>,
    #[serde(default)]
    pub indexes: Vec<DbIndex>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_view: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl DbTable {
    /// A bare table at `(x, y)` with no fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x,
            y,
            width: None,
            height: None,
            fields: Vec::new(),
            indexes: Vec::new(),
            color: String::new(),
            is_view: false,
            comments: None,
            parent_area_id: None,
            schema: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbField {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl DbField {
    /// A nullable string column.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type: FieldType { id: "string".to_string(), name: "string".to_string() },
            primary_key: false,
            unique: false,
            nullable: true,
            comments: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbIndex {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub field_ids: Vec<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

/// A relationship between two tables. Direction and cardinality are kept for
/// the caller; layout treats every relationship as an undirected edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbRelationship {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub source_table_id: String,
    pub target_table_id: String,
    #[serde(default)]
    pub source_field_id: String,
    #[serde(default)]
    pub target_field_id: String,
    #[serde(default)]
    pub source_cardinality: Cardinality,
    #[serde(default)]
    pub target_cardinality: Cardinality,
}

impl DbRelationship {
    pub fn new(
        id: impl Into<String>,
        source_table_id: impl Into<String>,
        target_table_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            source_table_id: source_table_id.into(),
            target_table_id: target_table_id.into(),
            source_field_id: String::new(),
            target_field_id: String::new(),
            source_cardinality: Cardinality::One,
            target_cardinality: Cardinality::Many,
        }
    }
}

/// A named rectangle on the canvas that tables can belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub color: String,
}

impl Area {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            x,
            y,
            width,
            height,
            color: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub id: String,
    pub name: String,
    pub tables: Vec<DbTable>,
    pub relationships: Vec<DbRelationship>,
    pub areas: Vec<Area>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_accepts_minimal_json() {
        let t: DbTable =
            serde_json::from_str(r#"{"id":"t1","name":"users","x":10,"y":20}"#).unwrap();
        assert_eq!(t.id, "t1");
        assert!(t.fields.is_empty());
        assert_eq!(t.parent_area_id, None);
    }

    #[test]
    fn test_table_serializes_camel_case() {
        let mut t = DbTable::new("t1", "users", 0.0, 0.0);
        t.parent_area_id = Some("a1".to_string());
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"parentAreaId\":\"a1\""));
        assert!(json.contains("\"isView\":false"));
        assert!(!json.contains("width"));
    }

    #[test]
    fn test_relationship_cardinality_wire_names() {
        let r: DbRelationship = serde_json::from_str(
            r#"{"id":"r","sourceTableId":"a","targetTableId":"b",
                "sourceCardinality":"many","targetCardinality":"one"}"#,
        )
        .unwrap();
        assert_eq!(r.source_cardinality, Cardinality::Many);
        assert_eq!(r.target_cardinality, Cardinality::One);
    }
}
