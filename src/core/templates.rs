//! Built-in table templates
//!
//! Ready-made starting points the sidebar collaborator offers for dragging
//! onto the canvas. Instantiating a template always re-ids its columns, so
//! two tables stamped from the same template never share column identity.

use crate::core::schema::Column;

/// A reusable table blueprint
#[derive(Debug, Clone, PartialEq)]
pub struct TableTemplate {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Palette color the rendering collaborator applies to the header
    pub color: &'static str,
    pub columns: Vec<Column>,
}

/// The built-in template catalog
pub fn builtin_templates() -> Vec<TableTemplate> {
    vec![
        TableTemplate {
            id: "TPL-USER",
            label: "User",
            description: "Standard User Authentication table.",
            color: "#3b82f6",
            columns: vec![
                Column::new("id", "INT").primary_key(),
                Column::new("username", "VARCHAR(50)").unique().not_null(),
                Column::new("email", "VARCHAR(255)").unique().not_null(),
                Column::new("password_hash", "VARCHAR(255)").not_null(),
                Column::new("created_at", "TIMESTAMP").with_default("CURRENT_TIMESTAMP"),
            ],
        },
        TableTemplate {
            id: "TPL-PRODUCT",
            label: "Product",
            description: "E-commerce Product catalog.",
            color: "#10b981",
            columns: vec![
                Column::new("id", "INT").primary_key(),
                Column::new("name", "VARCHAR(255)").not_null(),
                Column::new("price", "DECIMAL(10, 2)").not_null(),
                Column::new("description", "TEXT"),
                Column::new("stock_quantity", "INT").with_default("0"),
            ],
        },
        TableTemplate {
            id: "TPL-ORDER",
            label: "Order",
            description: "E-commerce Order history.",
            color: "#f97316",
            columns: vec![
                Column::new("id", "INT").primary_key(),
                Column::new("user_id", "INT").foreign_key().not_null(),
                Column::new("order_date", "TIMESTAMP").with_default("CURRENT_TIMESTAMP"),
                Column::new("total_amount", "DECIMAL(10, 2)").not_null(),
                Column::new("status", "VARCHAR(50)"),
            ],
        },
        TableTemplate {
            id: "TPL-BLOGPOST",
            label: "Blog Post",
            description: "CMS content structure.",
            color: "#8b5cf6",
            columns: vec![
                Column::new("id", "INT").primary_key(),
                Column::new("author_id", "INT").foreign_key().not_null(),
                Column::new("title", "VARCHAR(255)").not_null(),
                Column::new("content", "LONGTEXT"),
                Column::new("published_at", "TIMESTAMP"),
                Column::new("slug", "VARCHAR(255)").unique(),
            ],
        },
    ]
}

/// Look up a template by its catalog id
pub fn find_template(id: &str) -> Option<TableTemplate> {
    builtin_templates().into_iter().find(|t| t.id == id)
}
