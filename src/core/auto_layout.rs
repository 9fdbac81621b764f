//! Auto-layout module for automatic table arrangement
//!
//! Reassigns every table's canvas position on a fixed grid: tables flow left
//! to right, three per row, with a fixed cell spacing. The result is a pure
//! function of table order - current positions never feed into it, so the
//! same snapshot always produces the same arrangement.

use petgraph::stable_graph::NodeIndex;

use crate::core::schema::SchemaGraph;

/// Layout configuration
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Tables per row
    pub columns: usize,
    /// Horizontal spacing between grid cells
    pub cell_width: f64,
    /// Vertical spacing between grid rows
    pub cell_height: f64,
    /// Starting X position
    pub start_x: f64,
    /// Starting Y position
    pub start_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            cell_width: 350.0,
            cell_height: 350.0,
            start_x: 200.0,
            start_y: 100.0,
        }
    }
}

/// Result of a layout calculation
pub struct LayoutResult {
    /// New positions for each node: (node_index, (x, y))
    pub positions: Vec<(NodeIndex, (f64, f64))>,
}

/// Compute grid positions for every table without touching the graph
pub fn calculate_grid_layout(graph: &SchemaGraph, config: &LayoutConfig) -> LayoutResult {
    let columns = config.columns.max(1);

    let positions = graph
        .node_indices()
        .enumerate()
        .map(|(i, idx)| {
            let col = i % columns;
            let row = i / columns;
            let x = config.start_x + col as f64 * config.cell_width;
            let y = config.start_y + row as f64 * config.cell_height;
            (idx, (x, y))
        })
        .collect();

    LayoutResult { positions }
}

/// Return a new snapshot with every table moved onto the grid
pub fn apply_grid_layout(graph: &SchemaGraph, config: &LayoutConfig) -> SchemaGraph {
    let layout = calculate_grid_layout(graph, config);

    let mut arranged = graph.clone();
    for (idx, position) in layout.positions {
        arranged[idx].position = position;
    }
    arranged
}
