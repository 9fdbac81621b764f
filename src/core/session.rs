//! Design session facade
//!
//! Owns the current snapshot and its edit history, and exposes the operation
//! surface the UI collaborator drives: every accepted mutation produces a new
//! snapshot and records exactly one history entry; rejected mutations bubble
//! their no-op reason without touching either. Readers always observe a
//! complete snapshot - there is no partially-applied state to see.

use uuid::Uuid;

use crate::core::auto_layout::{self, LayoutConfig};
use crate::core::export::{ExportOptions, SchemaExporter, SqlDialect};
use crate::core::graph_ops::{ColumnOps, ColumnPatch, GraphOpError, RelationshipOps, SchemaStats, TableOps};
use crate::core::history::EditHistory;
use crate::core::schema::{Column, RelationshipType, SchemaGraph};
use crate::core::serializer::{self, ImportError};
use crate::core::templates::TableTemplate;

/// One editing session: the current snapshot plus its undo/redo history
#[derive(Debug, Default)]
pub struct DesignSession {
    current: SchemaGraph,
    history: EditHistory,
}

impl DesignSession {
    /// Start an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty session whose history keeps at most `depth` entries
    pub fn with_history_depth(depth: usize) -> Self {
        Self {
            current: SchemaGraph::new(),
            history: EditHistory::with_capacity(depth),
        }
    }

    /// The latest snapshot, the one collaborators render from
    pub fn graph(&self) -> &SchemaGraph {
        &self.current
    }

    pub fn stats(&self) -> SchemaStats {
        self.current.stats()
    }

    fn commit(&mut self, graph: SchemaGraph) {
        self.history.record(graph.clone());
        self.current = graph;
    }

    pub fn add_table(&mut self) -> Uuid {
        let (graph, id) = self.current.add_table(None);
        self.commit(graph);
        id
    }

    pub fn add_table_from_template(&mut self, template: &TableTemplate) -> Uuid {
        let (graph, id) = self.current.add_table(Some(template));
        self.commit(graph);
        id
    }

    pub fn rename_table(&mut self, table: Uuid, new_label: &str) -> Result<(), GraphOpError> {
        let graph = self.current.rename_table(table, new_label)?;
        self.commit(graph);
        Ok(())
    }

    pub fn delete_table(&mut self, table: Uuid) -> Result<(), GraphOpError> {
        let graph = self.current.delete_table(table)?;
        self.commit(graph);
        Ok(())
    }

    pub fn duplicate_table(&mut self, table: Uuid) -> Result<Uuid, GraphOpError> {
        let (graph, id) = self.current.duplicate_table(table)?;
        self.commit(graph);
        Ok(id)
    }

    pub fn move_table(&mut self, table: Uuid, position: (f64, f64)) -> Result<(), GraphOpError> {
        let graph = self.current.move_table(table, position)?;
        self.commit(graph);
        Ok(())
    }

    pub fn add_column(&mut self, table: Uuid, column: Column) -> Result<(), GraphOpError> {
        let graph = self.current.add_column(table, column)?;
        self.commit(graph);
        Ok(())
    }

    pub fn update_column(
        &mut self,
        table: Uuid,
        column: Uuid,
        patch: &ColumnPatch,
    ) -> Result<(), GraphOpError> {
        let graph = self.current.update_column(table, column, patch)?;
        self.commit(graph);
        Ok(())
    }

    pub fn delete_column(&mut self, table: Uuid, column: Uuid) -> Result<(), GraphOpError> {
        let graph = self.current.delete_column(table, column)?;
        self.commit(graph);
        Ok(())
    }

    pub fn add_relation(
        &mut self,
        source: Uuid,
        target: Uuid,
        cardinality: RelationshipType,
        name: Option<&str>,
    ) -> Result<Uuid, GraphOpError> {
        let (graph, id) = self.current.add_relation(source, target, cardinality, name)?;
        self.commit(graph);
        Ok(id)
    }

    pub fn delete_relation(&mut self, relation: Uuid) -> Result<(), GraphOpError> {
        let graph = self.current.delete_relation(relation)?;
        self.commit(graph);
        Ok(())
    }

    /// Rearrange every table onto the default grid
    pub fn auto_layout(&mut self) {
        let graph = auto_layout::apply_grid_layout(&self.current, &LayoutConfig::default());
        self.commit(graph);
    }

    /// Step back one mutation; `false` means there was nothing to undo
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.current = snapshot.clone();
                true
            }
            None => false,
        }
    }

    /// Step forward one undone mutation; `false` means nothing to redo
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.current = snapshot.clone();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Generate schema text for the current snapshot
    pub fn generate(&self, dialect: SqlDialect) -> String {
        SchemaExporter::export(
            &self.current,
            &ExportOptions {
                dialect,
                ..Default::default()
            },
        )
    }

    /// Export the current snapshot as transport JSON
    pub fn export_json(&self) -> serde_json::Result<String> {
        serializer::export_json(&self.current)
    }

    /// Replace the current snapshot with an imported one. All-or-nothing: on
    /// any import error the current snapshot is left untouched.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        let graph = serializer::import_json(json)?;
        self.commit(graph);
        Ok(())
    }
}
