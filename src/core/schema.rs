use petgraph::Directed;
use petgraph::stable_graph::StableGraph;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Node of the schema graph - a database table
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TableNode {
    /// Stable identity, never changed by renames
    pub id: Uuid,
    /// Display name, also used as the table name in generated DDL
    pub label: String,
    pub columns: Vec<Column>,
    /// Style tag owned by the rendering collaborator
    pub color: Option<String>,
    /// Free-form documentation attached through the inspector
    pub notes: Option<String>,
    /// Position on the canvas (x, y), passed through unchanged
    pub position: (f64, f64),
}

impl TableNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            columns: Vec::new(),
            color: None,
            notes: None,
            position: (0.0, 0.0),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = (x, y);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn add_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Find a column by its id
    pub fn find_column(&self, column_id: Uuid) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn find_column_mut(&mut self, column_id: Uuid) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    pub fn has_column_id(&self, column_id: Uuid) -> bool {
        self.columns.iter().any(|c| c.id == column_id)
    }

    /// Columns flagged as part of the primary key, in column order
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_primary_key).collect()
    }

    /// Clone this table under a fresh identity: new table id, `_copy` label
    /// suffix, every column re-idded so column identity stays scoped to one
    /// table. The copy carries no relations.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: format!("{}_copy", self.label),
            columns: self.columns.iter().map(Column::duplicate).collect(),
            color: self.color.clone(),
            notes: self.notes.clone(),
            position: (self.position.0 + 60.0, self.position.1 + 60.0),
        }
    }
}

/// Table column
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Column {
    /// Stable identity, unique within the owning table
    pub id: Uuid,
    pub name: String,
    pub data_type: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_unique: bool,
    pub is_nullable: bool,
    pub default_value: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            is_foreign_key: false,
            is_unique: false,
            is_nullable: true,
            default_value: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.is_foreign_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Same column under a fresh id, for table duplication and template
    /// instantiation
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}

/// Suggest a data type from a column name, mirroring the naming conventions
/// most schemas follow. Purely advisory; the caller decides what to keep.
pub fn suggest_data_type(name: &str) -> &'static str {
    let lower = name.to_lowercase();

    if lower.contains("id") && !lower.contains("_at") {
        "INT"
    } else if lower.contains("email") {
        "VARCHAR(255)"
    } else if lower.contains("created_at") || lower.contains("updated_at") || lower.contains("date")
    {
        "TIMESTAMP"
    } else if lower.contains("price") || lower.contains("amount") {
        "DECIMAL(10, 2)"
    } else if lower.contains("is_") {
        "BOOLEAN"
    } else if lower.contains("url") || lower.contains("slug") {
        "VARCHAR(255)"
    } else if lower.contains("description") || lower.contains("content") {
        "TEXT"
    } else {
        "VARCHAR(255)"
    }
}

/// Edge of the schema graph - a relation between two tables
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Relationship {
    /// Stable identity, unique within the graph
    pub id: Uuid,
    /// Display label; defaults to the cardinality code when no name is given
    pub label: String,
    /// Derived display string, e.g. "One-to-Many (1:N)"
    pub relationship_type: String,
    pub cardinality: RelationshipType,
}

impl Relationship {
    /// Build a relation from a cardinality and an optional user-supplied name.
    /// An empty name falls back to the cardinality code ("1:1", "1:N", "M:N").
    pub fn new(cardinality: RelationshipType, name: Option<&str>) -> Self {
        let label = match name {
            Some(n) if !n.trim().is_empty() => n.to_string(),
            _ => cardinality.to_string(),
        };

        Self {
            id: Uuid::new_v4(),
            label,
            relationship_type: cardinality.type_label().to_string(),
            cardinality,
        }
    }
}

/// Relation cardinality
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl RelationshipType {
    /// Long display form shown in inspectors and generated comments
    pub fn type_label(&self) -> &'static str {
        match self {
            RelationshipType::OneToOne => "One-to-One (1:1)",
            RelationshipType::OneToMany => "One-to-Many (1:N)",
            RelationshipType::ManyToMany => "Many-to-Many (M:N)",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationshipType::OneToOne => write!(f, "1:1"),
            RelationshipType::OneToMany => write!(f, "1:N"),
            RelationshipType::ManyToMany => write!(f, "M:N"),
        }
    }
}

/// The schema graph: nodes are tables, edges are relations.
///
/// One `SchemaGraph` value is one immutable snapshot. Mutation operations
/// clone and return a new graph; see [`crate::core::TableOps`] and friends.
pub type SchemaGraph = StableGraph<TableNode, Relationship, Directed>;
