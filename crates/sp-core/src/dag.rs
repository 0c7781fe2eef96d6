//! Foreign-key dependency graph and seed ordering

use crate::schema::Schema;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// A directed graph of table dependencies derived from foreign-key columns.
///
/// Table A depends on table B when any column of A references B.
/// Self-references are ignored. Unlike a strict DAG, cycles are tolerated:
/// `seed_order` degrades to alphabetical order for any residual cycle
/// instead of failing, since a cyclic schema must not crash a run.
#[derive(Debug)]
pub struct TableDag {
    /// The underlying graph; edges point from dependency to dependent
    graph: DiGraph<String, ()>,

    /// Map from table name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl TableDag {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build the graph from a schema's foreign-key columns
    pub fn from_schema(schema: &Schema) -> Self {
        let mut dag = Self::new();

        for table in &schema.tables {
            dag.add_table(&table.name);
        }

        for table in &schema.tables {
            for column in &table.columns {
                if let Some((referenced, _)) = column.foreign_key_target() {
                    // Only edges between schema tables; a reference to an
                    // absent table never blocks seeding.
                    if referenced != table.name && dag.contains(referenced) {
                        dag.add_dependency(&table.name, referenced);
                    }
                }
            }
        }

        dag
    }

    /// Add a table node (idempotent)
    pub fn add_table(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(name) {
            idx
        } else {
            let idx = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), idx);
            idx
        }
    }

    /// Record that `from` depends on `to`
    pub fn add_dependency(&mut self, from: &str, to: &str) {
        let from_idx = self.add_table(from);
        let to_idx = self.add_table(to);
        // Edge goes from dependency to dependent, so incoming neighbors of a
        // node are its dependencies.
        self.graph.add_edge(to_idx, from_idx, ());
    }

    /// Direct dependencies of a table
    pub fn dependencies(&self, table: &str) -> Vec<String> {
        if let Some(&idx) = self.node_map.get(table) {
            self.graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|dep| self.graph[dep].clone())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Check if a table exists in the graph
    pub fn contains(&self, table: &str) -> bool {
        self.node_map.contains_key(table)
    }

    /// Table order for seeding: repeatedly peel off tables whose
    /// dependencies have all been resolved, alphabetically within each
    /// batch. When no table can be peeled (a cycle), the remainder is
    /// appended in alphabetical order.
    pub fn seed_order(&self) -> Vec<String> {
        let mut pending: BTreeSet<&str> = self.node_map.keys().map(String::as_str).collect();
        let mut order = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let batch: Vec<&str> = pending
                .iter()
                .copied()
                .filter(|name| {
                    let idx = self.node_map[*name];
                    self.graph
                        .neighbors_directed(idx, Direction::Incoming)
                        .all(|dep| !pending.contains(self.graph[dep].as_str()))
                })
                .collect();

            if batch.is_empty() {
                log::warn!(
                    "cyclic foreign-key dependencies among {} table(s), falling back to alphabetical order",
                    pending.len()
                );
                order.extend(pending.iter().map(|name| name.to_string()));
                break;
            }

            for name in batch {
                pending.remove(name);
                order.push(name.to_string());
            }
        }

        order
    }
}

impl Default for TableDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
