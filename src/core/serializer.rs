//! Transport serialization for schema snapshots
//!
//! Projects a schema graph to the persisted/export JSON shape (a node list
//! plus an edge list) and back. Import is all-or-nothing: malformed JSON, a
//! missing required field, a duplicate id, or an edge referencing an unknown
//! node fails the whole import so the caller's current snapshot stays
//! untouched. Round trip: `import(export(g))` is structurally equal to `g`
//! on ids, labels, columns, relations, and positions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::schema::{Column, Relationship, RelationshipType, SchemaGraph, TableNode};

/// Why an import was rejected as a whole
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate table id '{0}'")]
    DuplicateTableId(Uuid),

    #[error("duplicate column id '{column}' in table '{table}'")]
    DuplicateColumnId { table: String, column: Uuid },

    #[error("duplicate relation id '{0}'")]
    DuplicateRelationId(Uuid),

    #[error("relation '{relation}' references unknown table '{table}'")]
    UnknownEndpoint { relation: Uuid, table: Uuid },
}

/// The persisted/transportable form of a snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaDocument {
    pub nodes: Vec<NodeEntry>,
    pub edges: Vec<EdgeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeEntry {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    pub data: TableData,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableData {
    pub label: String,
    pub columns: Vec<ColumnEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnEntry {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_foreign: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default = "default_true")]
    pub is_nullable: bool,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeEntry {
    pub id: Uuid,
    pub source: Uuid,
    pub target: Uuid,
    #[serde(rename = "type", default = "default_edge_type")]
    pub edge_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: EdgeData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default)]
    pub relation_type: String,
    pub cardinality: RelationshipType,
}

fn default_true() -> bool {
    true
}

fn default_edge_type() -> String {
    "smoothstep".to_string()
}

/// Project a snapshot into its transport form
pub fn export_document(graph: &SchemaGraph) -> SchemaDocument {
    let nodes = graph
        .node_indices()
        .map(|idx| {
            let table = &graph[idx];
            NodeEntry {
                id: table.id,
                node_type: "tableNode".to_string(),
                position: Position {
                    x: table.position.0,
                    y: table.position.1,
                },
                data: TableData {
                    label: table.label.clone(),
                    columns: table.columns.iter().map(column_entry).collect(),
                    color: table.color.clone(),
                    notes: table.notes.clone(),
                },
            }
        })
        .collect();

    let edges = graph
        .edge_indices()
        .filter_map(|idx| {
            let (source, target) = graph.edge_endpoints(idx)?;
            let relation = graph.edge_weight(idx)?;
            Some(EdgeEntry {
                id: relation.id,
                source: graph[source].id,
                target: graph[target].id,
                edge_type: default_edge_type(),
                label: Some(relation.label.clone()),
                data: EdgeData {
                    relation_type: relation.relationship_type.clone(),
                    cardinality: relation.cardinality,
                },
            })
        })
        .collect();

    SchemaDocument { nodes, edges }
}

/// Export a snapshot as pretty-printed JSON
pub fn export_json(graph: &SchemaGraph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&export_document(graph))
}

/// Rebuild a snapshot from its transport form
pub fn import_document(doc: &SchemaDocument) -> Result<SchemaGraph, ImportError> {
    let mut graph = SchemaGraph::new();
    let mut index_by_id = HashMap::new();

    for node in &doc.nodes {
        if index_by_id.contains_key(&node.id) {
            return Err(ImportError::DuplicateTableId(node.id));
        }

        let mut seen_columns = HashSet::new();
        for col in &node.data.columns {
            if !seen_columns.insert(col.id) {
                return Err(ImportError::DuplicateColumnId {
                    table: node.data.label.clone(),
                    column: col.id,
                });
            }
        }

        let table = TableNode {
            id: node.id,
            label: node.data.label.clone(),
            columns: node.data.columns.iter().map(column_from_entry).collect(),
            color: node.data.color.clone(),
            notes: node.data.notes.clone(),
            position: (node.position.x, node.position.y),
        };
        index_by_id.insert(node.id, graph.add_node(table));
    }

    let mut seen_relations = HashSet::new();
    for edge in &doc.edges {
        if !seen_relations.insert(edge.id) {
            return Err(ImportError::DuplicateRelationId(edge.id));
        }

        let source = *index_by_id
            .get(&edge.source)
            .ok_or(ImportError::UnknownEndpoint {
                relation: edge.id,
                table: edge.source,
            })?;
        let target = *index_by_id
            .get(&edge.target)
            .ok_or(ImportError::UnknownEndpoint {
                relation: edge.id,
                table: edge.target,
            })?;

        let cardinality = edge.data.cardinality;
        let relation = Relationship {
            id: edge.id,
            label: edge
                .label
                .clone()
                .unwrap_or_else(|| cardinality.to_string()),
            relationship_type: cardinality.type_label().to_string(),
            cardinality,
        };
        graph.add_edge(source, target, relation);
    }

    tracing::info!(
        "imported schema: {} tables, {} relations",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Parse and rebuild a snapshot from JSON text
pub fn import_json(json: &str) -> Result<SchemaGraph, ImportError> {
    let doc: SchemaDocument = serde_json::from_str(json)?;
    import_document(&doc)
}

fn column_entry(col: &Column) -> ColumnEntry {
    ColumnEntry {
        id: col.id,
        name: col.name.clone(),
        data_type: col.data_type.clone(),
        is_primary: col.is_primary_key,
        is_foreign: col.is_foreign_key,
        is_unique: col.is_unique,
        is_nullable: col.is_nullable,
        default_value: col.default_value.clone(),
    }
}

fn column_from_entry(entry: &ColumnEntry) -> Column {
    Column {
        id: entry.id,
        name: entry.name.clone(),
        data_type: entry.data_type.clone(),
        is_primary_key: entry.is_primary,
        is_foreign_key: entry.is_foreign,
        is_unique: entry.is_unique,
        is_nullable: entry.is_nullable,
        default_value: entry.default_value.clone(),
    }
}
