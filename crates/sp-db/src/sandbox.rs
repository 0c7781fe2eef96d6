//! Ephemeral SQLite sandbox
//!
//! One sandbox owns exactly one in-memory connection for the lifetime of a
//! run. The connection is never shared: one run = one sandbox = one thread
//! of control, so no locking is needed.

use crate::error::{DbError, DbResult};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// Rows and column names returned by a query
#[derive(Debug, Clone)]
pub struct QueryOutput {
    /// Column names in select order
    pub columns: Vec<String>,

    /// Row cells as JSON values (NULL, integer, real, or text)
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// An ephemeral, file-less database instance.
///
/// Statement failures during probing are captured as strings and never
/// propagate; the caller decides pass/fail by comparing expectation to
/// outcome.
pub struct Sandbox {
    conn: Connection,
}

impl Sandbox {
    /// Create an in-memory instance, enable foreign-key enforcement, and
    /// execute the compiled DDL statement-by-statement.
    ///
    /// A statement the engine rejects is skipped, not fatal: one malformed
    /// table definition degrades to downstream test failures instead of
    /// aborting the whole run.
    pub fn create(ddl: &str) -> DbResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let sandbox = Self { conn };
        for statement in split_statements(ddl) {
            if let Some(error) = sandbox.try_execute(&statement) {
                log::warn!("skipping rejected DDL statement: {error}");
            }
        }

        Ok(sandbox)
    }

    /// Execute a single data-modifying statement, returning affected rows
    pub fn execute(&self, sql: &str) -> DbResult<usize> {
        self.conn
            .execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))
    }

    /// Execute a query and return its rows
    pub fn query(&self, sql: &str) -> DbResult<QueryOutput> {
        let mut statement = self.conn.prepare(sql)?;
        let columns: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let column_count = columns.len();

        let mut rows = Vec::new();
        let mut raw_rows = statement.query([])?;
        while let Some(row) = raw_rows.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for i in 0..column_count {
                cells.push(json_cell(row.get_ref(i)?));
            }
            rows.push(cells);
        }

        Ok(QueryOutput { columns, rows })
    }

    /// Execute a query expected to return a single integer cell
    pub fn query_scalar_i64(&self, sql: &str) -> DbResult<i64> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => DbError::EmptyResult(sql.to_string()),
                other => DbError::ExecutionError(format!("{other}: {sql}")),
            })
    }

    /// Run a statement, capturing any engine error as text.
    ///
    /// Returns `None` on success and `Some(message)` on failure; never
    /// panics or propagates.
    pub fn try_execute(&self, sql: &str) -> Option<String> {
        match self.conn.execute_batch(sql) {
            Ok(()) => None,
            Err(e) => Some(e.to_string()),
        }
    }

    /// Run a multi-statement script, capturing any engine error as text.
    /// Used for patch application.
    pub fn try_script(&self, sql: &str) -> Option<String> {
        self.try_execute(sql)
    }

    /// Row id assigned by the most recent successful insert
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Create a named savepoint
    pub fn create_savepoint(&self, name: &str) -> DbResult<()> {
        self.conn.execute_batch(&format!("SAVEPOINT {name};"))?;
        Ok(())
    }

    /// Roll back to a named savepoint without releasing it
    pub fn rollback_to_savepoint(&self, name: &str) -> DbResult<()> {
        self.conn
            .execute_batch(&format!("ROLLBACK TO SAVEPOINT {name};"))?;
        Ok(())
    }

    /// Release a named savepoint
    pub fn release_savepoint(&self, name: &str) -> DbResult<()> {
        self.conn
            .execute_batch(&format!("RELEASE SAVEPOINT {name};"))?;
        Ok(())
    }

    /// Discard the instance. Dropping the sandbox has the same effect; this
    /// exists so callers can surface close failures.
    pub fn close(self) -> DbResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| DbError::ConnectionError(e.to_string()))
    }
}

/// Split a DDL script on `;` into trimmed single statements.
///
/// Compiled DDL never contains embedded semicolons (no triggers or string
/// literals with `;`); patch scripts, which may, go through `try_script`
/// instead.
fn split_statements(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{s};"))
        .collect()
}

fn json_cell(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => {
            let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
            serde_json::Value::String(hex)
        }
    }
}

#[cfg(test)]
#[path = "sandbox_test.rs"]
mod tests;
