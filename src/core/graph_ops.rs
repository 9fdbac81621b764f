//! Pure mutation operations over schema graph snapshots
//!
//! Every operation takes a snapshot by reference and returns a new snapshot;
//! the input is never mutated. An `Err` means the mutation was absorbed as a
//! no-op (empty name, missing entity, boundary condition) and the caller must
//! not record a history entry for it. Entities an operation does not touch
//! keep their ids verbatim, so selections held by an inspector collaborator
//! survive unrelated edits.

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use uuid::Uuid;

use crate::core::schema::{Column, Relationship, RelationshipType, SchemaGraph, TableNode};
use crate::core::templates::TableTemplate;

/// Why a mutation was absorbed as a no-op
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphOpError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Label is unchanged")]
    UnchangedLabel,

    #[error("Table not found")]
    TableNotFound,

    #[error("Column not found")]
    ColumnNotFound,

    #[error("Relation not found")]
    RelationNotFound,

    #[error("A relation cannot reference its own table")]
    SelfReference,
}

/// Field-wise update for a column; `None` leaves the field unchanged.
/// `default_value` is doubly optional so a patch can clear the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnPatch {
    pub name: Option<String>,
    pub data_type: Option<String>,
    pub is_primary_key: Option<bool>,
    pub is_foreign_key: Option<bool>,
    pub is_unique: Option<bool>,
    pub is_nullable: Option<bool>,
    pub default_value: Option<Option<String>>,
}

/// Snapshot-level counts shown by the settings collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStats {
    pub tables: usize,
    pub relations: usize,
    pub columns: usize,
}

/// A table referencing the inspected one, with the foreign-key column on the
/// inspected table resolved by the `<source label>_id` naming convention
/// (`None` when no such column is declared).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingReference {
    pub source_label: String,
    pub fk_column: Option<String>,
}

/// Table-level operations on a schema graph snapshot
pub trait TableOps {
    /// Add a table. With a template the label, color, and columns are copied
    /// (columns under fresh ids); without one the table gets a default label
    /// and a single `id INT` primary-key column. Returns the new snapshot and
    /// the new table's id.
    fn add_table(&self, template: Option<&TableTemplate>) -> (SchemaGraph, Uuid);

    /// Rename a table. Absorbed as a no-op when the new label is blank or
    /// unchanged, so null edits never pollute the history.
    fn rename_table(&self, table: Uuid, new_label: &str) -> Result<SchemaGraph, GraphOpError>;

    /// Delete a table and, in the same snapshot, every relation whose source
    /// or target it is. Never leaves a dangling relation.
    fn delete_table(&self, table: Uuid) -> Result<SchemaGraph, GraphOpError>;

    /// Clone a table under a new id with a `_copy` label suffix. Columns are
    /// re-idded; relations are not copied.
    fn duplicate_table(&self, table: Uuid) -> Result<(SchemaGraph, Uuid), GraphOpError>;

    /// Write a collaborator-supplied canvas position back into the model
    fn move_table(&self, table: Uuid, position: (f64, f64)) -> Result<SchemaGraph, GraphOpError>;

    fn find_table(&self, table: Uuid) -> Option<NodeIndex>;
    fn get_table(&self, table: Uuid) -> Option<&TableNode>;
    fn find_table_by_label(&self, label: &str) -> Option<NodeIndex>;
    fn table_exists(&self, table: Uuid) -> bool;
    fn stats(&self) -> SchemaStats;
}

/// Column-level operations on a schema graph snapshot
pub trait ColumnOps {
    /// Append a column to a table. Rejects a blank column name. Column order
    /// is display order and is preserved across all operations.
    fn add_column(&self, table: Uuid, column: Column) -> Result<SchemaGraph, GraphOpError>;

    /// Merge a patch into an existing column; unspecified fields unchanged
    fn update_column(
        &self,
        table: Uuid,
        column: Uuid,
        patch: &ColumnPatch,
    ) -> Result<SchemaGraph, GraphOpError>;

    /// Remove a column; absorbed as a no-op when it does not exist
    fn delete_column(&self, table: Uuid, column: Uuid) -> Result<SchemaGraph, GraphOpError>;
}

/// Relation-level operations on a schema graph snapshot
pub trait RelationshipOps {
    /// Connect two existing, distinct tables. The display label falls back to
    /// the cardinality code when `name` is empty. Parallel relations between
    /// the same pair are allowed.
    fn add_relation(
        &self,
        source: Uuid,
        target: Uuid,
        cardinality: RelationshipType,
        name: Option<&str>,
    ) -> Result<(SchemaGraph, Uuid), GraphOpError>;

    fn delete_relation(&self, relation: Uuid) -> Result<SchemaGraph, GraphOpError>;

    fn find_relation(&self, relation: Uuid) -> Option<EdgeIndex>;

    /// Tables referencing the given one, for the inspector's key summary
    fn incoming_references(&self, table: Uuid) -> Vec<IncomingReference>;
}

impl TableOps for SchemaGraph {
    fn add_table(&self, template: Option<&TableTemplate>) -> (SchemaGraph, Uuid) {
        let mut table = match template {
            Some(t) => {
                let mut table = TableNode::new(t.label).with_color(t.color);
                table.columns = t.columns.iter().map(Column::duplicate).collect();
                table
            }
            None => TableNode::new(format!("Table_{}", self.node_count() + 1))
                .add_column(Column::new("id", "INT").primary_key()),
        };

        // Deterministic cascade instead of the free-floating placement a
        // pointer gesture would supply; the rendering collaborator owns
        // positions from here on.
        let step = (self.node_count() % 6) as f64;
        table.position = (200.0 + 60.0 * step, 100.0 + 60.0 * step);

        while self.table_exists(table.id) {
            table.id = Uuid::new_v4();
        }

        let id = table.id;
        let label = table.label.clone();
        let mut graph = self.clone();
        graph.add_node(table);
        tracing::debug!("table '{}' added", label);
        (graph, id)
    }

    fn rename_table(&self, table: Uuid, new_label: &str) -> Result<SchemaGraph, GraphOpError> {
        if new_label.trim().is_empty() {
            return Err(GraphOpError::EmptyName);
        }

        let idx = self.find_table(table).ok_or(GraphOpError::TableNotFound)?;
        if self[idx].label == new_label {
            return Err(GraphOpError::UnchangedLabel);
        }

        let mut graph = self.clone();
        graph[idx].label = new_label.to_string();
        tracing::debug!("table '{}' renamed to '{}'", self[idx].label, new_label);
        Ok(graph)
    }

    fn delete_table(&self, table: Uuid) -> Result<SchemaGraph, GraphOpError> {
        let idx = self.find_table(table).ok_or(GraphOpError::TableNotFound)?;
        let label = self[idx].label.clone();
        let cascaded = self.edges(idx).count()
            + self
                .edges_directed(idx, Direction::Incoming)
                .filter(|e| e.source() != idx)
                .count();

        let mut graph = self.clone();
        graph.remove_node(idx);
        tracing::info!("table '{}' deleted ({} relations cascaded)", label, cascaded);
        Ok(graph)
    }

    fn duplicate_table(&self, table: Uuid) -> Result<(SchemaGraph, Uuid), GraphOpError> {
        let idx = self.find_table(table).ok_or(GraphOpError::TableNotFound)?;

        let mut copy = self[idx].duplicate();
        while self.table_exists(copy.id) {
            copy.id = Uuid::new_v4();
        }

        let id = copy.id;
        let mut graph = self.clone();
        graph.add_node(copy);
        tracing::debug!("table '{}' duplicated", self[idx].label);
        Ok((graph, id))
    }

    fn move_table(&self, table: Uuid, position: (f64, f64)) -> Result<SchemaGraph, GraphOpError> {
        let idx = self.find_table(table).ok_or(GraphOpError::TableNotFound)?;

        let mut graph = self.clone();
        graph[idx].position = position;
        Ok(graph)
    }

    fn find_table(&self, table: Uuid) -> Option<NodeIndex> {
        self.node_indices().find(|&idx| self[idx].id == table)
    }

    fn get_table(&self, table: Uuid) -> Option<&TableNode> {
        self.find_table(table).map(|idx| &self[idx])
    }

    fn find_table_by_label(&self, label: &str) -> Option<NodeIndex> {
        self.node_indices().find(|&idx| self[idx].label == label)
    }

    fn table_exists(&self, table: Uuid) -> bool {
        self.find_table(table).is_some()
    }

    fn stats(&self) -> SchemaStats {
        SchemaStats {
            tables: self.node_count(),
            relations: self.edge_count(),
            columns: self
                .node_indices()
                .map(|idx| self[idx].columns.len())
                .sum(),
        }
    }
}

impl ColumnOps for SchemaGraph {
    fn add_column(&self, table: Uuid, mut column: Column) -> Result<SchemaGraph, GraphOpError> {
        if column.name.trim().is_empty() {
            return Err(GraphOpError::EmptyName);
        }

        let idx = self.find_table(table).ok_or(GraphOpError::TableNotFound)?;
        while self[idx].has_column_id(column.id) {
            column.id = Uuid::new_v4();
        }

        let mut graph = self.clone();
        tracing::debug!("column '{}' added to '{}'", column.name, graph[idx].label);
        graph[idx].columns.push(column);
        Ok(graph)
    }

    fn update_column(
        &self,
        table: Uuid,
        column: Uuid,
        patch: &ColumnPatch,
    ) -> Result<SchemaGraph, GraphOpError> {
        if let Some(name) = &patch.name
            && name.trim().is_empty()
        {
            return Err(GraphOpError::EmptyName);
        }

        let idx = self.find_table(table).ok_or(GraphOpError::TableNotFound)?;
        if !self[idx].has_column_id(column) {
            return Err(GraphOpError::ColumnNotFound);
        }

        let mut graph = self.clone();
        // Checked above; the clone preserves every column id
        if let Some(col) = graph[idx].find_column_mut(column) {
            if let Some(name) = &patch.name {
                col.name = name.clone();
            }
            if let Some(data_type) = &patch.data_type {
                col.data_type = data_type.clone();
            }
            if let Some(is_primary_key) = patch.is_primary_key {
                col.is_primary_key = is_primary_key;
            }
            if let Some(is_foreign_key) = patch.is_foreign_key {
                col.is_foreign_key = is_foreign_key;
            }
            if let Some(is_unique) = patch.is_unique {
                col.is_unique = is_unique;
            }
            if let Some(is_nullable) = patch.is_nullable {
                col.is_nullable = is_nullable;
            }
            if let Some(default_value) = &patch.default_value {
                col.default_value = default_value.clone();
            }
        }
        Ok(graph)
    }

    fn delete_column(&self, table: Uuid, column: Uuid) -> Result<SchemaGraph, GraphOpError> {
        let idx = self.find_table(table).ok_or(GraphOpError::TableNotFound)?;
        if !self[idx].has_column_id(column) {
            return Err(GraphOpError::ColumnNotFound);
        }

        let mut graph = self.clone();
        graph[idx].columns.retain(|c| c.id != column);
        Ok(graph)
    }
}

impl RelationshipOps for SchemaGraph {
    fn add_relation(
        &self,
        source: Uuid,
        target: Uuid,
        cardinality: RelationshipType,
        name: Option<&str>,
    ) -> Result<(SchemaGraph, Uuid), GraphOpError> {
        if source == target {
            return Err(GraphOpError::SelfReference);
        }

        let source_idx = self.find_table(source).ok_or(GraphOpError::TableNotFound)?;
        let target_idx = self.find_table(target).ok_or(GraphOpError::TableNotFound)?;

        let mut relation = Relationship::new(cardinality, name);
        while self.find_relation(relation.id).is_some() {
            relation.id = Uuid::new_v4();
        }

        let id = relation.id;
        let mut graph = self.clone();
        graph.add_edge(source_idx, target_idx, relation);
        tracing::debug!(
            "relation '{}' created: '{}' -> '{}'",
            cardinality,
            self[source_idx].label,
            self[target_idx].label
        );
        Ok((graph, id))
    }

    fn delete_relation(&self, relation: Uuid) -> Result<SchemaGraph, GraphOpError> {
        let idx = self
            .find_relation(relation)
            .ok_or(GraphOpError::RelationNotFound)?;

        let mut graph = self.clone();
        graph.remove_edge(idx);
        Ok(graph)
    }

    fn find_relation(&self, relation: Uuid) -> Option<EdgeIndex> {
        self.edge_indices()
            .find(|&idx| self.edge_weight(idx).is_some_and(|r| r.id == relation))
    }

    fn incoming_references(&self, table: Uuid) -> Vec<IncomingReference> {
        let Some(idx) = self.find_table(table) else {
            return Vec::new();
        };

        self.edges_directed(idx, Direction::Incoming)
            .map(|edge| {
                let source = &self[edge.source()];
                let fk_name = format!("{}_id", source.label.to_lowercase());
                let fk_column = self[idx]
                    .columns
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(&fk_name))
                    .map(|c| c.name.clone());

                IncomingReference {
                    source_label: source.label.clone(),
                    fk_column,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tables() -> (SchemaGraph, Uuid, Uuid) {
        let graph = SchemaGraph::new();
        let (graph, users) = graph.add_table(None);
        let (graph, orders) = graph.add_table(None);
        (graph, users, orders)
    }

    #[test]
    fn test_add_table_defaults() {
        let graph = SchemaGraph::new();
        let (graph, id) = graph.add_table(None);

        let table = graph.get_table(id).unwrap();
        assert_eq!(table.label, "Table_1");
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "id");
        assert_eq!(table.columns[0].data_type, "INT");
        assert!(table.columns[0].is_primary_key);
    }

    #[test]
    fn test_add_table_does_not_touch_input() {
        let graph = SchemaGraph::new();
        let (_, _) = graph.add_table(None);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_rename_table_no_ops() {
        let (graph, users, _) = two_tables();
        let graph = graph.rename_table(users, "users").unwrap();

        assert_eq!(
            graph.rename_table(users, "").unwrap_err(),
            GraphOpError::EmptyName
        );
        assert_eq!(
            graph.rename_table(users, "   ").unwrap_err(),
            GraphOpError::EmptyName
        );
        assert_eq!(
            graph.rename_table(users, "users").unwrap_err(),
            GraphOpError::UnchangedLabel
        );
        assert_eq!(
            graph.rename_table(Uuid::new_v4(), "x").unwrap_err(),
            GraphOpError::TableNotFound
        );
    }

    #[test]
    fn test_rename_keeps_id() {
        let (graph, users, _) = two_tables();
        let renamed = graph.rename_table(users, "customers").unwrap();

        let table = renamed.get_table(users).unwrap();
        assert_eq!(table.label, "customers");
        assert_eq!(table.id, users);
    }

    #[test]
    fn test_delete_table_cascades_relations() {
        let (graph, users, orders) = two_tables();
        let (graph, _) = graph
            .add_relation(users, orders, RelationshipType::OneToMany, None)
            .unwrap();
        assert_eq!(graph.edge_count(), 1);

        let graph = graph.delete_table(users).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.table_exists(orders));
    }

    #[test]
    fn test_duplicate_table_disjoint_ids_no_relations() {
        let (graph, users, orders) = two_tables();
        let graph = graph.rename_table(users, "users").unwrap();
        let (graph, _) = graph
            .add_relation(users, orders, RelationshipType::OneToMany, None)
            .unwrap();

        let (graph, copy_id) = graph.duplicate_table(users).unwrap();
        let original = graph.get_table(users).unwrap();
        let copy = graph.get_table(copy_id).unwrap();

        assert_eq!(copy.label, "users_copy");
        assert_ne!(copy.id, original.id);
        for col in &copy.columns {
            assert!(!original.has_column_id(col.id));
        }

        // The copy starts with no relations
        let copy_idx = graph.find_table(copy_id).unwrap();
        assert_eq!(graph.edges(copy_idx).count(), 0);
        assert_eq!(
            graph.edges_directed(copy_idx, Direction::Incoming).count(),
            0
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_add_column_rejects_empty_name() {
        let (graph, users, _) = two_tables();

        let result = graph.add_column(users, Column::new("", "INT"));
        assert_eq!(result.unwrap_err(), GraphOpError::EmptyName);

        let result = graph.add_column(users, Column::new("  ", "INT"));
        assert_eq!(result.unwrap_err(), GraphOpError::EmptyName);
    }

    #[test]
    fn test_add_column_appends_in_order() {
        let (graph, users, _) = two_tables();
        let graph = graph
            .add_column(users, Column::new("email", "VARCHAR(255)"))
            .unwrap();
        let graph = graph
            .add_column(users, Column::new("created_at", "TIMESTAMP"))
            .unwrap();

        let names: Vec<&str> = graph
            .get_table(users)
            .unwrap()
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "email", "created_at"]);
    }

    #[test]
    fn test_update_column_merges_patch() {
        let (graph, users, _) = two_tables();
        let graph = graph
            .add_column(users, Column::new("email", "VARCHAR(255)"))
            .unwrap();
        let column = graph.get_table(users).unwrap().columns[1].id;

        let patch = ColumnPatch {
            is_unique: Some(true),
            is_nullable: Some(false),
            ..Default::default()
        };
        let graph = graph.update_column(users, column, &patch).unwrap();

        let col = graph.get_table(users).unwrap().find_column(column).unwrap();
        assert_eq!(col.name, "email");
        assert_eq!(col.data_type, "VARCHAR(255)");
        assert!(col.is_unique);
        assert!(!col.is_nullable);
        assert_eq!(col.id, column);
    }

    #[test]
    fn test_update_column_can_clear_default() {
        let (graph, users, _) = two_tables();
        let graph = graph
            .add_column(
                users,
                Column::new("status", "VARCHAR(50)").with_default("active"),
            )
            .unwrap();
        let column = graph.get_table(users).unwrap().columns[1].id;

        let patch = ColumnPatch {
            default_value: Some(None),
            ..Default::default()
        };
        let graph = graph.update_column(users, column, &patch).unwrap();

        let col = graph.get_table(users).unwrap().find_column(column).unwrap();
        assert_eq!(col.default_value, None);
    }

    #[test]
    fn test_update_column_rejects_blank_name_patch() {
        let (graph, users, _) = two_tables();
        let column = graph.get_table(users).unwrap().columns[0].id;

        let patch = ColumnPatch {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            graph.update_column(users, column, &patch).unwrap_err(),
            GraphOpError::EmptyName
        );
    }

    #[test]
    fn test_delete_column_missing_is_noop() {
        let (graph, users, _) = two_tables();

        assert_eq!(
            graph.delete_column(users, Uuid::new_v4()).unwrap_err(),
            GraphOpError::ColumnNotFound
        );

        let column = graph.get_table(users).unwrap().columns[0].id;
        let graph = graph.delete_column(users, column).unwrap();
        assert!(graph.get_table(users).unwrap().columns.is_empty());
    }

    #[test]
    fn test_add_relation_rejects_self_reference() {
        let (graph, users, _) = two_tables();

        let result = graph.add_relation(users, users, RelationshipType::OneToOne, None);
        assert_eq!(result.unwrap_err(), GraphOpError::SelfReference);
    }

    #[test]
    fn test_add_relation_requires_existing_endpoints() {
        let (graph, users, _) = two_tables();

        let result = graph.add_relation(users, Uuid::new_v4(), RelationshipType::OneToMany, None);
        assert_eq!(result.unwrap_err(), GraphOpError::TableNotFound);
    }

    #[test]
    fn test_add_and_delete_relation() {
        let (graph, users, orders) = two_tables();
        let (graph, rel) = graph
            .add_relation(users, orders, RelationshipType::OneToMany, Some("user_orders"))
            .unwrap();

        let idx = graph.find_relation(rel).unwrap();
        assert_eq!(graph.edge_weight(idx).unwrap().label, "user_orders");

        let graph = graph.delete_relation(rel).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(
            graph.delete_relation(rel).unwrap_err(),
            GraphOpError::RelationNotFound
        );
    }

    #[test]
    fn test_incoming_references_resolve_fk_column() {
        let (graph, users, orders) = two_tables();
        let graph = graph.rename_table(users, "Users").unwrap();
        let graph = graph.rename_table(orders, "Orders").unwrap();
        let graph = graph
            .add_column(orders, Column::new("users_id", "INT").foreign_key())
            .unwrap();
        let (graph, _) = graph
            .add_relation(users, orders, RelationshipType::OneToMany, None)
            .unwrap();

        let refs = graph.incoming_references(orders);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].source_label, "Users");
        assert_eq!(refs[0].fk_column.as_deref(), Some("users_id"));

        // No declared column on the source side's incoming list
        assert!(graph.incoming_references(users).is_empty());
    }

    #[test]
    fn test_stats() {
        let (graph, users, orders) = two_tables();
        let (graph, _) = graph
            .add_relation(users, orders, RelationshipType::OneToMany, None)
            .unwrap();

        let stats = graph.stats();
        assert_eq!(stats.tables, 2);
        assert_eq!(stats.relations, 1);
        assert_eq!(stats.columns, 2);
    }
}
