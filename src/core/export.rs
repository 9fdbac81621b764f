//! Schema text generation
//!
//! Maps a schema graph snapshot to generated schema text, parameterized by a
//! SQL dialect. The relational dialects share one generic DDL template; the
//! document dialect emits a Mongoose-style schema dump. Generation never
//! mutates the snapshot and is fully deterministic: the same snapshot always
//! produces byte-identical output. An empty snapshot yields just the header
//! comment.

use crate::core::schema::{SchemaGraph, TableNode};
use crate::core::validation;

/// Output syntax family a dialect belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialectFamily {
    Relational,
    Document,
}

/// Code-generation target profile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SqlDialect {
    #[default]
    MySQL,
    PostgreSQL,
    SQLite,
    SqlServer,
    MongoDB,
}

impl SqlDialect {
    /// Parse a dialect name, falling back to MySQL for anything unknown
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "postgresql" | "postgres" => SqlDialect::PostgreSQL,
            "sqlite" => SqlDialect::SQLite,
            "sqlserver" | "mssql" => SqlDialect::SqlServer,
            "mongodb" | "mongo" => SqlDialect::MongoDB,
            _ => SqlDialect::MySQL,
        }
    }

    pub fn family(&self) -> DialectFamily {
        match self {
            SqlDialect::MongoDB => DialectFamily::Document,
            _ => DialectFamily::Relational,
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::MySQL => write!(f, "MySQL"),
            SqlDialect::PostgreSQL => write!(f, "PostgreSQL"),
            SqlDialect::SQLite => write!(f, "SQLite"),
            SqlDialect::SqlServer => write!(f, "SQL Server"),
            SqlDialect::MongoDB => write!(f, "MongoDB"),
        }
    }
}

/// Generation options
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    pub dialect: SqlDialect,
    /// Emit a `DROP TABLE IF EXISTS` prelude before each table
    pub include_drop_statements: bool,
}

/// Stateless schema-to-text exporter
pub struct SchemaExporter;

impl SchemaExporter {
    /// Generate schema text for the snapshot in the selected dialect
    pub fn export(graph: &SchemaGraph, options: &ExportOptions) -> String {
        match options.dialect.family() {
            DialectFamily::Relational => Self::export_relational(graph, options),
            DialectFamily::Document => Self::export_document(graph),
        }
    }

    fn export_relational(graph: &SchemaGraph, options: &ExportOptions) -> String {
        Self::warn_invalid_identifiers(graph);

        let mut sql = format!("-- Generated SQL Schema: {}\n\n", options.dialect);

        for idx in graph.node_indices() {
            let table = &graph[idx];

            if options.include_drop_statements {
                sql.push_str(&format!("DROP TABLE IF EXISTS {};\n", table.label));
            }
            sql.push_str(&format!("CREATE TABLE {} (\n", table.label));

            for (i, col) in table.columns.iter().enumerate() {
                let mut def = format!("  {} {}", col.name, col.data_type);

                if col.is_primary_key && col.data_type.to_uppercase().contains("INT") {
                    def.push_str(" AUTO_INCREMENT");
                }
                if !col.is_nullable {
                    def.push_str(" NOT NULL");
                }
                if col.is_unique {
                    def.push_str(" UNIQUE");
                }
                if let Some(value) = &col.default_value
                    && !value.is_empty()
                {
                    def.push_str(&format!(" DEFAULT '{}'", value));
                }

                if i < table.columns.len() - 1 {
                    def.push(',');
                }
                sql.push_str(&def);
                sql.push('\n');
            }

            let pks = table
                .primary_key_columns()
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if !pks.is_empty() {
                sql.push_str(&format!(",  PRIMARY KEY ({})\n", pks));
            }

            sql.push_str(");\n\n");
        }

        for edge in graph.edge_indices() {
            let Some((source_idx, target_idx)) = graph.edge_endpoints(edge) else {
                continue;
            };
            let Some(relation) = graph.edge_weight(edge) else {
                continue;
            };
            let source = &graph[source_idx];
            let target = &graph[target_idx];

            let (fk_column, declared) = Self::resolve_fk_column(target, &source.label);

            sql.push_str(&format!(
                "-- {} from {} to {}\n",
                relation.relationship_type, source.label, target.label
            ));
            if !declared {
                tracing::warn!(
                    "relation '{}' -> '{}': no foreign-key column '{}' declared on '{}'",
                    source.label,
                    target.label,
                    fk_column,
                    target.label
                );
                sql.push_str(&format!(
                    "-- NOTE: column '{}' is not declared on '{}'\n",
                    fk_column, target.label
                ));
            }
            sql.push_str(&format!("ALTER TABLE {}\n", target.label));
            sql.push_str(&format!("ADD CONSTRAINT fk_{}\n", fk_column));
            sql.push_str(&format!(
                "FOREIGN KEY ({}) REFERENCES {}(id) ON DELETE CASCADE;\n\n",
                fk_column, source.label
            ));
        }

        sql
    }

    /// Resolve the foreign-key column on the target table for a relation
    /// coming from `source_label`. Prefers a declared column flagged foreign
    /// whose name matches the `<source label, lowercased>_id` convention,
    /// then any declared column with that name; otherwise synthesizes the
    /// conventional name and reports it as undeclared.
    fn resolve_fk_column(target: &TableNode, source_label: &str) -> (String, bool) {
        let conventional = format!("{}_id", source_label.to_lowercase());

        let flagged = target
            .columns
            .iter()
            .find(|c| c.is_foreign_key && c.name.eq_ignore_ascii_case(&conventional));
        let named = target
            .columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(&conventional));

        match flagged.or(named) {
            Some(col) => (col.name.clone(), true),
            None => (conventional, false),
        }
    }

    fn export_document(graph: &SchemaGraph) -> String {
        let mut schema = String::from("// Generated MongoDB Mongoose Schemas\n\n");

        for idx in graph.node_indices() {
            let table = &graph[idx];

            let fields = table
                .columns
                .iter()
                .map(|col| {
                    // Uniform placeholder type; column types are not mapped
                    // to document types
                    let mut field = format!("  {}: {{ type: String", col.name);
                    if col.is_unique {
                        field.push_str(", unique: true");
                    }
                    if !col.is_nullable {
                        field.push_str(", required: true");
                    }
                    field.push_str(" }");
                    field
                })
                .collect::<Vec<_>>()
                .join(",\n");

            schema.push_str(&format!(
                "const {}Schema = new mongoose.Schema({{\n{}\n}});\n\n",
                table.label, fields
            ));
        }

        schema
    }

    fn warn_invalid_identifiers(graph: &SchemaGraph) {
        for idx in graph.node_indices() {
            let table = &graph[idx];
            for error in &validation::validate_identifier(&table.label).errors {
                tracing::warn!("table '{}': {}", table.label, error);
            }
            for col in &table.columns {
                for error in &validation::validate_identifier(&col.name).errors {
                    tracing::warn!("column '{}.{}': {}", table.label, col.name, error);
                }
            }
        }
    }
}
