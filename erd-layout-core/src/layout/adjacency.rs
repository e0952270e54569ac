// Relationship graph for layout.
//
// Relationships are treated as undirected edges regardless of cardinality or
// declared direction. Neighbour lists keep first-insertion order so that every
// traversal over them is reproducible.

use std::collections::HashMap;

use crate::schema::{DbRelationship, DbTable};
use super::LayoutMode;

#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    /// For each table id, the distinct ids it shares a relationship with.
    neighbors: HashMap<String, Vec<String>>,
}

impl RelationshipGraph {
    /// Build the symmetric adjacency of `relationships`.
    ///
    /// Tables that appear in no relationship are not keys. Endpoints are not
    /// checked against any table list; callers skip ids they cannot resolve.
    pub fn build(relationships: &[DbRelationship]) -> Self {
        let mut graph = Self::default();
        for rel in relationships {
            graph.add_edge(&rel.source_table_id, &rel.target_table_id);
        }
        graph
    }

    /// Like [`build`](Self::build), but in `PerSchema` mode drops edges whose
    /// endpoints are known tables living in different schemas.
    pub fn build_scoped(
        relationships: &[DbRelationship],
        tables: &[DbTable],
        mode: LayoutMode,
    ) -> Self {
        if mode != LayoutMode::PerSchema {
            return Self::build(relationships);
        }

        let schema_of: HashMap<&str, Option<&str>> = tables
            .iter()
            .map(|t| (t.id.as_str(), t.schema.as_deref()))
            .collect();

        let mut graph = Self::default();
        for rel in relationships {
            let source = schema_of.get(rel.source_table_id.as_str());
            let target = schema_of.get(rel.target_table_id.as_str());
            if let (Some(a), Some(b)) = (source, target) {
                if a != b {
                    continue;
                }
            }
            graph.add_edge(&rel.source_table_id, &rel.target_table_id);
        }
        graph
    }

    fn add_edge(&mut self, a: &str, b: &str) {
        Self::push_unique(self.neighbors.entry(a.to_string()).or_default(), b);
        Self::push_unique(self.neighbors.entry(b.to_string()).or_default(), a);
    }

    fn push_unique(list: &mut Vec<String>, id: &str) {
        if !list.iter().any(|n| n == id) {
            list.push(id.to_string());
        }
    }

    /// Neighbours of `id`, or an empty slice if it has none.
    pub fn neighbors(&self, id: &str) -> &[String] {
        self.neighbors.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of distinct neighbours.
    pub fn degree(&self, id: &str) -> usize {
        self.neighbors(id).len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.neighbors.contains_key(id)
    }

    /// Number of tables with at least one relationship.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}
