//! Identifier validation for table and column names
//!
//! Advisory checks against the naming rules MySQL and PostgreSQL share. The
//! model itself only rejects empty names; everything here surfaces as
//! warnings during generation or on demand from an inspector collaborator,
//! so a diagram in progress is never blocked by a half-typed name.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Maximum length for identifiers (MySQL standard)
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Reserved keywords that cannot be used as identifiers without quoting,
/// combined from the SQL standard, MySQL, and PostgreSQL
static RESERVED_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
        "CONSTRAINT", "CREATE", "CROSS", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP",
        "DATABASE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXISTS",
        "FALSE", "FOR", "FOREIGN", "FROM", "FULL", "GRANT", "GROUP", "HAVING", "IF", "IN",
        "INDEX", "INNER", "INSERT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT",
        "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT",
        "SELECT", "SET", "TABLE", "THEN", "TO", "TRUE", "UNION", "UNIQUE", "UPDATE", "USING",
        "VALUES", "WHEN", "WHERE", "WITH",
        // MySQL specific
        "AUTO_INCREMENT", "BIGINT", "BLOB", "BOOLEAN", "CHAR", "DATETIME", "DECIMAL", "DOUBLE",
        "ENUM", "FLOAT", "INT", "INTEGER", "INTERVAL", "LONGTEXT", "MEDIUMINT", "NUMERIC",
        "REAL", "SCHEMA", "SHOW", "SMALLINT", "TEXT", "TIME", "TIMESTAMP", "TINYINT", "TRIGGER",
        "TRUNCATE", "UNSIGNED", "VARCHAR", "VIEW", "YEAR",
        // PostgreSQL specific
        "ANALYZE", "ARRAY", "AUTHORIZATION", "BOTH", "CAST", "DEFERRABLE", "DO", "EXCEPT",
        "ILIKE", "INTERSECT", "ISNULL", "LATERAL", "LEADING", "NATURAL", "NOTNULL", "ONLY",
        "OVERLAPS", "PLACING", "RETURNING", "SIMILAR", "SOME", "SYMMETRIC", "TRAILING",
        "VARIADIC", "WINDOW",
    ]
    .into_iter()
    .collect()
});

/// A single validation finding
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Identifier is empty
    Empty,
    /// Identifier is too long
    TooLong { max: usize, actual: usize },
    /// Identifier contains invalid characters
    InvalidCharacters { invalid: Vec<char> },
    /// Identifier starts with a digit
    StartsWithDigit,
    /// Identifier contains no letters at all
    NoLetters,
    /// Identifier is a reserved keyword
    ReservedKeyword { keyword: String },
    /// Identifier starts with an underscore
    StartsWithUnderscore,
    /// Identifier ends with an underscore
    EndsWithUnderscore,
    /// Identifier contains consecutive underscores
    ConsecutiveUnderscores,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Empty => write!(f, "Name cannot be empty"),
            ValidationError::TooLong { max, actual } => {
                write!(f, "Name is too long ({} chars, max {})", actual, max)
            }
            ValidationError::InvalidCharacters { invalid } => {
                let chars: String = invalid.iter().collect();
                write!(
                    f,
                    "Name contains invalid characters: '{}'. Only letters, numbers, and underscores are allowed",
                    chars
                )
            }
            ValidationError::StartsWithDigit => write!(f, "Name cannot start with a digit"),
            ValidationError::NoLetters => write!(f, "Name must contain at least one letter"),
            ValidationError::ReservedKeyword { keyword } => {
                write!(f, "'{}' is a reserved SQL keyword", keyword)
            }
            ValidationError::StartsWithUnderscore => {
                write!(f, "Name should not start with an underscore")
            }
            ValidationError::EndsWithUnderscore => {
                write!(f, "Name should not end with an underscore")
            }
            ValidationError::ConsecutiveUnderscores => {
                write!(f, "Name cannot contain consecutive underscores")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Findings for one identifier: errors must be fixed before the generated
/// DDL is usable, warnings are style advice
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert to Result, returning the first error if any
    pub fn to_result(&self) -> Result<(), ValidationError> {
        match self.errors.first() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Validate a table or column name
pub fn validate_identifier(name: &str) -> ValidationResult {
    let mut result = ValidationResult::default();

    let trimmed = name.trim();
    if trimmed.is_empty() {
        result.errors.push(ValidationError::Empty);
        return result;
    }

    if trimmed.len() > MAX_IDENTIFIER_LENGTH {
        result.errors.push(ValidationError::TooLong {
            max: MAX_IDENTIFIER_LENGTH,
            actual: trimmed.len(),
        });
    }

    let invalid_chars: Vec<char> = trimmed
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && *c != '_')
        .collect();
    if !invalid_chars.is_empty() {
        result.errors.push(ValidationError::InvalidCharacters {
            invalid: invalid_chars,
        });
    }

    if let Some(first) = trimmed.chars().next()
        && first.is_ascii_digit()
    {
        result.errors.push(ValidationError::StartsWithDigit);
    }

    if !trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        result.errors.push(ValidationError::NoLetters);
    }

    if is_reserved_keyword(trimmed) {
        result.errors.push(ValidationError::ReservedKeyword {
            keyword: trimmed.to_string(),
        });
    }

    if trimmed.starts_with('_') {
        result.warnings.push(ValidationError::StartsWithUnderscore);
    }
    if trimmed.ends_with('_') {
        result.warnings.push(ValidationError::EndsWithUnderscore);
    }
    if trimmed.contains("__") {
        result.warnings.push(ValidationError::ConsecutiveUnderscores);
    }

    result
}

/// Shorthand returning the first error, if any
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_identifier(name).to_result()
}

/// Check whether a string is a reserved keyword
pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(name.to_uppercase().as_str())
}
