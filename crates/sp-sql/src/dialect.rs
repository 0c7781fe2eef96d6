//! SQLite dialect rules
//!
//! The abstract schema is authored against a richer SQL dialect than the
//! sandbox engine supports, so types, defaults, and probe expressions all
//! pass through a normalization layer before they reach DDL.

use regex::Regex;
use std::sync::OnceLock;

fn char_length_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bchar(?:acter)?_length\s*\(").expect("static pattern compiles")
    })
}

fn cast_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"::\w+").expect("static pattern compiles"))
}

/// Map an abstract column type to its SQLite storage type.
///
/// Matched on the uppercased type string, in order: integer-like types
/// (including serials) become INTEGER, decimal/float types become REAL,
/// booleans become INTEGER 0/1, and date/time/uuid/json types become TEXT
/// since SQLite has no native representation for them.
pub fn map_data_type(data_type: &str) -> &'static str {
    let upper = data_type.to_uppercase();

    if upper.contains("INT") || upper.contains("SERIAL") {
        return "INTEGER";
    }
    if upper.contains("DECIMAL")
        || upper.contains("NUMERIC")
        || upper.contains("FLOAT")
        || upper.contains("DOUBLE")
    {
        return "REAL";
    }
    if upper.contains("BOOL") {
        return "INTEGER";
    }
    if upper.contains("DATE") || upper.contains("TIME") {
        return "TEXT";
    }
    if upper.contains("UUID") {
        return "TEXT";
    }
    if upper.contains("JSON") {
        return "TEXT";
    }
    if upper.contains("CHAR") || upper.contains("TEXT") {
        return "TEXT";
    }

    "TEXT"
}

/// Normalize a CHECK (or other probe) expression for SQLite.
///
/// Rewrites `char_length(` / `character_length(` to `length(` and strips
/// `::type` cast suffixes.
pub fn normalize_expression(expression: &str) -> String {
    let rewritten = char_length_re().replace_all(expression, "length(");
    cast_suffix_re().replace_all(&rewritten, "").into_owned()
}

/// Normalize a default-value expression for SQLite.
///
/// Boolean keywords become integer literals and `NOW()`-style calls become
/// `CURRENT_TIMESTAMP`. Any other call-like expression the engine cannot
/// evaluate is dropped (returns `None`) rather than emitted; losing a
/// default is preferable to a table that fails to compile.
pub fn normalize_default_value(default_value: &str) -> Option<String> {
    let value = default_value.trim();
    if value.is_empty() {
        return None;
    }
    let upper = value.to_uppercase();

    if upper == "TRUE" {
        return Some("1".to_string());
    }
    if upper == "FALSE" {
        return Some("0".to_string());
    }
    if upper.contains("NOW()") {
        return Some("CURRENT_TIMESTAMP".to_string());
    }
    if upper == "CURRENT_TIMESTAMP()" {
        return Some("CURRENT_TIMESTAMP".to_string());
    }
    if upper.contains('(') && !upper.starts_with('(') {
        return None;
    }

    Some(value.to_string())
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
