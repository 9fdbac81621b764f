//! Linear undo/redo history over schema graph snapshots
//!
//! The history is a single-branch stack: every accepted mutation appends one
//! snapshot, undo/redo only move the cursor, and recording while the cursor
//! is not at the end discards everything after it (branch truncation - there
//! is no redo tree). Boundary hits are no-op signals, not errors.

use crate::core::schema::SchemaGraph;

/// Entries kept before the oldest one is dropped
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Undo/redo stack of immutable snapshots
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: Vec<SchemaGraph>,
    /// Index of the current entry; `None` until the first record
    cursor: Option<usize>,
    max_depth: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_DEPTH)
    }

    /// A history that keeps at most `max_depth` snapshots, dropping the
    /// oldest once full so a long session cannot grow without bound
    pub fn with_capacity(max_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            max_depth: max_depth.max(1),
        }
    }

    /// Record an accepted mutation. Truncates any redo-able entries beyond
    /// the cursor, appends the snapshot, and points the cursor at it.
    /// Exactly one call per accepted mutation; rejected mutations must not
    /// record.
    pub fn record(&mut self, snapshot: SchemaGraph) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);

        if self.entries.len() == self.max_depth {
            self.entries.remove(0);
        }

        self.entries.push(snapshot);
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry, or `None` at the start of history
    pub fn undo(&mut self) -> Option<&SchemaGraph> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }

        self.cursor = Some(cursor - 1);
        self.entries.get(cursor - 1)
    }

    /// Step forward one entry, or `None` at the end of history
    pub fn redo(&mut self) -> Option<&SchemaGraph> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            return None;
        }

        self.cursor = Some(cursor + 1);
        self.entries.get(cursor + 1)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// The entry the cursor points at, if any
    pub fn current(&self) -> Option<&SchemaGraph> {
        self.entries.get(self.cursor?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TableOps;

    fn snapshot_labels(graph: &SchemaGraph) -> Vec<String> {
        graph
            .node_indices()
            .map(|idx| graph[idx].label.clone())
            .collect()
    }

    fn record_tables(history: &mut EditHistory, count: usize) -> SchemaGraph {
        let mut graph = SchemaGraph::new();
        for _ in 0..count {
            let (next, _) = graph.add_table(None);
            graph = next;
            history.record(graph.clone());
        }
        graph
    }

    #[test]
    fn test_empty_history_has_nothing_to_undo_or_redo() {
        let mut history = EditHistory::new();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_undo_restores_previous_entry() {
        let mut history = EditHistory::new();
        record_tables(&mut history, 2);

        let restored = history.undo().unwrap();
        assert_eq!(snapshot_labels(restored), vec!["Table_1"]);
    }

    #[test]
    fn test_single_entry_cannot_undo() {
        let mut history = EditHistory::new();
        record_tables(&mut history, 1);

        // The state before the first mutation was never recorded
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_redo_after_undo_round_trips() {
        let mut history = EditHistory::new();
        let latest = record_tables(&mut history, 3);

        history.undo().unwrap();
        let replayed = history.redo().unwrap();
        assert_eq!(snapshot_labels(replayed), snapshot_labels(&latest));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_after_undo_truncates_redo_branch() {
        let mut history = EditHistory::new();
        let graph = record_tables(&mut history, 3);

        history.undo().unwrap();
        history.undo().unwrap();
        assert!(history.can_redo());

        let (graph, _) = graph.add_table(None);
        history.record(graph);

        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_capacity_drops_oldest_entry() {
        let mut history = EditHistory::with_capacity(3);
        record_tables(&mut history, 5);

        assert_eq!(history.len(), 3);
        // Cursor stays on the newest entry
        assert_eq!(snapshot_labels(history.current().unwrap()).len(), 5);

        // Only two undos remain once the head has been dropped
        assert!(history.undo().is_some());
        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_undo_at_boundary_is_noop_signal() {
        let mut history = EditHistory::new();
        record_tables(&mut history, 2);

        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
        // The cursor did not move past the boundary
        assert_eq!(snapshot_labels(history.current().unwrap()), vec!["Table_1"]);
    }
}
