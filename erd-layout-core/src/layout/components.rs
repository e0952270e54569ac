// Connectivity analysis: split the tables in scope into connected groups and
// the tables that have no relationships at all.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::schema::DbTable;
use super::adjacency::RelationshipGraph;

/// Result of [`partition_tables`]. All entries are indices into the table
/// slice the partition was computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Connected groups in discovery order. Each group is sorted by
    /// descending degree, ties keeping discovery order, so `group[0]` is the
    /// natural root.
    pub groups: Vec<Vec<usize>>,
    /// Tables without relationships, in input order.
    pub isolated: Vec<usize>,
}

/// One unit of work for the optimized layout: a connected group, or the
/// trailing bucket of isolated tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGroup {
    pub connected: Vec<usize>,
    pub isolated: Vec<usize>,
}

impl Partition {
    pub fn connected_len(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    pub fn into_layout_groups(self) -> Vec<TableGroup> {
        let mut out: Vec<TableGroup> = self
            .groups
            .into_iter()
            .map(|connected| TableGroup { connected, isolated: Vec::new() })
            .collect();
        if !self.isolated.is_empty() {
            out.push(TableGroup { connected: Vec::new(), isolated: self.isolated });
        }
        out
    }
}

/// Partition the tables listed in `scope` by relationship connectivity.
///
/// Traversal is depth-first with an explicit stack, visiting neighbours in
/// adjacency order. Neighbours that are not in `scope` (unknown ids, or
/// tables that stay fixed) are skipped. If an id occurs twice, the first
/// occurrence represents it and the later ones are left out.
pub fn partition_tables(
    tables: &[DbTable],
    scope: &[usize],
    graph: &RelationshipGraph,
) -> Partition {
    let mut index_of: HashMap<&str, usize> = HashMap::new();
    for &i in scope {
        index_of.entry(tables[i].id.as_str()).or_insert(i);
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut partition = Partition::default();

    for &i in scope {
        let id = tables[i].id.as_str();
        if index_of.get(id) != Some(&i) || visited.contains(id) {
            continue;
        }
        if graph.degree(id) == 0 {
            partition.isolated.push(i);
            visited.insert(id);
            continue;
        }

        let mut group = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(&idx) = index_of.get(current) {
                group.push(idx);
            }
            // Reverse push keeps the recursive preorder.
            for next in graph.neighbors(current).iter().rev() {
                let next = next.as_str();
                if index_of.contains_key(next) && !visited.contains(next) {
                    stack.push(next);
                }
            }
        }

        group.sort_by_key(|&idx| Reverse(graph.degree(&tables[idx].id)));
        partition.groups.push(group);
    }

    partition
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

    fn ids(tables: &[DbTable], idx: &[usize]) -> Vec<String> {
        idx.iter().map(|&i| tables[i].id.clone()).collect()
    }

    fn all(tables: &[DbTable]) -> Vec<usize> {
        (0..tables.len()).collect()
    }

    #[test]
    fn test_two_groups_and_one_isolated() {
        let t = tables(&["A", "B", "C", "D", "E", "F"]);
        let graph = RelationshipGraph::build(&[rel("A", "B"), rel("B", "C"), rel("D", "E")]);
        let p = partition_tables(&t, &all(&t), &graph);

        assert_eq!(p.groups.len(), 2);
        let mut first = ids(&t, &p.groups[0]);
        first.sort();
        assert_eq!(first, ["A", "B", "C"]);
        let mut second = ids(&t, &p.groups[1]);
        second.sort();
        assert_eq!(second, ["D", "E"]);
        assert_eq!(ids(&t, &p.isolated), ["F"]);
    }

    #[test]
    fn test_group_sorted_by_degree() {
        let t = tables(&["A", "B", "C", "D"]);
        let graph = RelationshipGraph::build(&[rel("A", "B"), rel("B", "C"), rel("B", "D")]);
        let p = partition_tables(&t, &all(&t), &graph);
        // Preorder is A, B, C, D; B has the highest degree, the rest keep order.
        assert_eq!(ids(&t, &p.groups[0]), ["B", "A", "C", "D"]);
    }

    #[test]
    fn test_dangling_endpoints_are_ignored() {
        let t = tables(&["A", "B"]);
        let graph = RelationshipGraph::build(&[rel("A", "ghost"), rel("ghost", "B")]);
        let p = partition_tables(&t, &all(&t), &graph);
        // A and B only connect through a missing table, so they are separate.
        assert_eq!(p.groups.len(), 2);
        assert_eq!(ids(&t, &p.groups[0]), ["A"]);
        assert_eq!(ids(&t, &p.groups[1]), ["B"]);
        assert!(p.isolated.is_empty());
    }

    #[test]
    fn test_scope_limits_traversal() {
        let t = tables(&["A", "B", "C"]);
        let graph = RelationshipGraph::build(&[rel("A", "B"), rel("B", "C")]);
        let p = partition_tables(&t, &[0, 2], &graph);
        assert_eq!(p.groups.len(), 2);
        assert_eq!(p.connected_len(), 2);
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let t = tables(&["A", "B", "A"]);
        let graph = RelationshipGraph::build(&[rel("A", "B")]);
        let p = partition_tables(&t, &all(&t), &graph);
        assert_eq!(p.groups, vec![vec![0, 1]]);
        assert!(p.isolated.is_empty());
    }

    #[test]
    fn test_layout_groups_append_isolated_bucket() {
        let t = tables(&["A", "B", "C"]);
        let graph = RelationshipGraph::build(&[rel("A", "B")]);
        let groups = partition_tables(&t, &all(&t), &graph).into_layout_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].connected.len(), 2);
        assert!(groups[0].isolated.is_empty());
        assert!(groups[1].connected.is_empty());
        assert_eq!(groups[1].isolated, vec![2]);
    }

    #[test]
    fn test_no_isolated_bucket_when_empty() {
        let t = tables(&["A", "B"]);
        let graph = RelationshipGraph::build(&[rel("A", "B")]);
        assert_eq!(partition_tables(&t, &all(&t), &graph).into_layout_groups().len(), 1);
    }
}
