//! SQL construction utilities
//!
//! Provides identifier quoting, string-literal escaping, and a small typed
//! INSERT builder so that generated statements never come from ad hoc
//! concatenation of raw values.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double
/// quotes by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use sp_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("orders"), r#""orders""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape a value for use inside a single-quoted SQL string literal.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a value as a single-quoted SQL string literal.
///
/// # Examples
/// ```
/// use sp_core::sql_utils::sql_string_literal;
/// assert_eq!(sql_string_literal("it's"), "'it''s'");
/// ```
pub fn sql_string_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}

/// Builder for single-row INSERT statements.
///
/// Values are pre-rendered SQL expressions (literals produced by the
/// synthesizer heuristics, `NULL`, `CURRENT_TIMESTAMP`, or correlated
/// subqueries); identifiers are always quoted.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    columns: Vec<(String, String)>,
}

impl InsertBuilder {
    /// Start an INSERT into `table`
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
        }
    }

    /// Add a column with a pre-rendered SQL expression as its value
    pub fn value(mut self, column: &str, expression: impl Into<String>) -> Self {
        self.columns.push((column.to_string(), expression.into()));
        self
    }

    /// Render the statement. With no columns this emits a DEFAULT VALUES
    /// insert (the only valid shape for tables whose sole column is the
    /// auto primary key).
    pub fn build(&self) -> String {
        if self.columns.is_empty() {
            return format!("INSERT INTO {} DEFAULT VALUES;", quote_ident(&self.table));
        }

        let column_sql: Vec<String> = self
            .columns
            .iter()
            .map(|(name, _)| quote_ident(name))
            .collect();
        let value_sql: Vec<&str> = self
            .columns
            .iter()
            .map(|(_, expr)| expr.as_str())
            .collect();

        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            quote_ident(&self.table),
            column_sql.join(", "),
            value_sql.join(", ")
        )
    }
}
