use super::*;
use sp_core::schema::{TableConstraint, TableIndex};

fn column(name: &str, data_type: &str) -> Column {
    Column {
        name: name.to_string(),
        data_type: data_type.to_string(),
        nullable: true,
        default_value: None,
        is_primary_key: false,
        is_foreign_key: false,
        references_table: None,
        references_column: None,
    }
}

fn serial_pk() -> Column {
    Column {
        is_primary_key: true,
        nullable: false,
        ..column("id", "SERIAL")
    }
}

fn table(name: &str, columns: Vec<Column>) -> Table {
    Table {
        id: format!("tbl_{name}"),
        name: name.to_string(),
        columns,
        constraints: Vec::new(),
        indexes: Vec::new(),
    }
}

fn schema(tables: Vec<Table>) -> Schema {
    Schema {
        tables,
        relationships: Vec::new(),
    }
}

#[test]
fn test_auto_increment_primary_key_inline() {
    let ddl = compile_schema(&schema(vec![table(
        "widgets",
        vec![serial_pk(), column("sku", "TEXT")],
    )]));
    assert!(ddl.contains(r#""id" INTEGER PRIMARY KEY AUTOINCREMENT"#));
    assert!(!ddl.contains("PRIMARY KEY ("));
}

#[test]
fn test_composite_primary_key_emitted_at_table_level() {
    let mut t = table(
        "order_items",
        vec![column("order_id", "INTEGER"), column("item_id", "INTEGER")],
    );
    t.columns[0].is_primary_key = true;
    t.columns[1].is_primary_key = true;

    let ddl = compile_schema(&schema(vec![t]));
    assert!(ddl.contains(r#"PRIMARY KEY ("order_id", "item_id")"#));
    assert!(!ddl.contains("AUTOINCREMENT"));
}

#[test]
fn test_non_serial_sole_primary_key_emitted_at_table_level() {
    let mut t = table("countries", vec![column("code", "CHAR(2)")]);
    t.columns[0].is_primary_key = true;

    let ddl = compile_schema(&schema(vec![t]));
    assert!(ddl.contains(r#""code" TEXT"#));
    assert!(ddl.contains(r#"PRIMARY KEY ("code")"#));
}

#[test]
fn test_not_null_and_default() {
    let mut t = table("users", vec![serial_pk(), column("active", "BOOLEAN")]);
    t.columns[1].nullable = false;
    t.columns[1].default_value = Some("TRUE".to_string());

    let ddl = compile_schema(&schema(vec![t]));
    assert!(ddl.contains(r#""active" INTEGER NOT NULL DEFAULT 1"#));
}

#[test]
fn test_unsupported_default_call_dropped() {
    let mut t = table("users", vec![serial_pk(), column("token", "UUID")]);
    t.columns[1].default_value = Some("gen_random_uuid()".to_string());

    let ddl = compile_schema(&schema(vec![t]));
    assert!(ddl.contains(r#""token" TEXT"#));
    assert!(!ddl.contains("DEFAULT"));
}

#[test]
fn test_foreign_key_inlined_on_column() {
    let mut orders = table(
        "orders",
        vec![serial_pk(), column("customer_id", "INTEGER")],
    );
    orders.columns[1].is_foreign_key = true;
    orders.columns[1].references_table = Some("customers".to_string());
    orders.columns[1].references_column = Some("id".to_string());
    orders.constraints.push(TableConstraint {
        kind: ConstraintType::ForeignKey,
        columns: vec!["customer_id".to_string()],
        expression: None,
        on_delete: Some(OnDeleteAction::Cascade),
    });
    let customers = table("customers", vec![serial_pk()]);

    let ddl = compile_schema(&schema(vec![orders, customers]));
    assert!(ddl.contains(r#"REFERENCES "customers"("id") ON DELETE CASCADE"#));
    // Inlined on the column, not duplicated as a table-level clause.
    assert!(!ddl.contains("FOREIGN KEY ("));
}

#[test]
fn test_dangling_foreign_key_omitted() {
    let mut orders = table(
        "orders",
        vec![serial_pk(), column("customer_id", "INTEGER")],
    );
    orders.columns[1].is_foreign_key = true;
    orders.columns[1].references_table = Some("customers".to_string());
    orders.columns[1].references_column = Some("id".to_string());

    // customers is not part of the schema: no REFERENCES clause at all.
    let ddl = compile_schema(&schema(vec![orders]));
    assert!(!ddl.contains("REFERENCES"));
    assert!(ddl.contains(r#""customer_id" INTEGER"#));
}

#[test]
fn test_foreign_key_not_duplicated_when_inlined() {
    let mut orders = table(
        "orders",
        vec![serial_pk(), column("customer_id", "INTEGER")],
    );
    orders.columns[1].is_foreign_key = true;
    orders.columns[1].references_table = Some("customers".to_string());
    orders.columns[1].references_column = Some("id".to_string());
    orders.constraints.push(TableConstraint {
        kind: ConstraintType::ForeignKey,
        columns: vec!["customer_id".to_string()],
        expression: None,
        on_delete: Some(OnDeleteAction::SetNull),
    });
    let customers = table("customers", vec![serial_pk()]);

    let ddl = compile_schema(&schema(vec![orders, customers]));
    assert!(ddl.contains(r#"REFERENCES "customers"("id") ON DELETE SET NULL"#));
    // The inline clause covers the constraint; no table-level duplicate.
    assert_eq!(ddl.matches("REFERENCES").count(), 1);
}

#[test]
fn test_table_level_foreign_key_for_constraint_only_column() {
    // Reference metadata present but the column is not flagged as FK:
    // no inline clause is possible, nothing is emitted for the constraint
    // either since the column carries no usable target.
    let mut orders = table(
        "orders",
        vec![serial_pk(), column("customer_id", "INTEGER")],
    );
    orders.columns[1].is_foreign_key = true;
    orders.columns[1].references_table = Some("customers".to_string());
    orders.columns[1].references_column = None;
    orders.constraints.push(TableConstraint {
        kind: ConstraintType::ForeignKey,
        columns: vec!["customer_id".to_string()],
        expression: None,
        on_delete: None,
    });
    let customers = table("customers", vec![serial_pk()]);

    let ddl = compile_schema(&schema(vec![orders, customers]));
    assert!(!ddl.contains("REFERENCES"));
}

#[test]
fn test_unique_and_check_constraints() {
    let mut widgets = table(
        "widgets",
        vec![serial_pk(), column("sku", "VARCHAR(64)"), column("qty", "INTEGER")],
    );
    widgets.constraints.push(TableConstraint {
        kind: ConstraintType::Unique,
        columns: vec!["sku".to_string()],
        expression: None,
        on_delete: None,
    });
    widgets.constraints.push(TableConstraint {
        kind: ConstraintType::Check,
        columns: vec!["qty".to_string()],
        expression: Some("qty::integer >= 0".to_string()),
        on_delete: None,
    });

    let ddl = compile_schema(&schema(vec![widgets]));
    assert!(ddl.contains(r#"UNIQUE ("sku")"#));
    assert!(ddl.contains("CHECK (qty >= 0)"));
}

#[test]
fn test_check_expression_normalized() {
    let mut t = table("users", vec![serial_pk(), column("name", "TEXT")]);
    t.constraints.push(TableConstraint {
        kind: ConstraintType::Check,
        columns: vec!["name".to_string()],
        expression: Some("char_length(name) > 2".to_string()),
        on_delete: None,
    });

    let ddl = compile_schema(&schema(vec![t]));
    assert!(ddl.contains("CHECK (length(name) > 2)"));
}

#[test]
fn test_indexes_emitted_after_tables() {
    let mut t = table("users", vec![serial_pk(), column("email", "TEXT")]);
    t.indexes.push(TableIndex {
        name: "idx_users_email".to_string(),
        columns: vec!["email".to_string()],
        unique: true,
    });

    let ddl = compile_schema(&schema(vec![t]));
    let create_table = ddl.find("CREATE TABLE").unwrap();
    let create_index = ddl
        .find(r#"CREATE UNIQUE INDEX IF NOT EXISTS "idx_users_email" ON "users" ("email");"#)
        .unwrap();
    assert!(create_index > create_table);
}

#[test]
fn test_statements_separated_by_blank_lines() {
    let ddl = compile_schema(&schema(vec![
        table("alpha", vec![serial_pk()]),
        table("beta", vec![serial_pk()]),
    ]));
    assert_eq!(ddl.matches("CREATE TABLE").count(), 2);
    assert!(ddl.contains(");\n\nCREATE TABLE"));
}
