use super::*;

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

fn widgets() -> Table {
    Table {
        id: "tbl_widgets".to_string(),
        name: "widgets".to_string(),
        columns: vec![
            Column {
                is_primary_key: true,
                nullable: false,
                ..column("id", "SERIAL")
            },
            column("sku", "VARCHAR(64)"),
            Column {
                nullable: false,
                ..column("qty", "INTEGER")
            },
        ],
        constraints: vec![TableConstraint {
            kind: ConstraintType::Unique,
            columns: vec!["sku".to_string()],
            expression: None,
            on_delete: None,
        }],
        indexes: vec![TableIndex {
            name: "idx_widgets_qty".to_string(),
            columns: vec!["qty".to_string()],
            unique: false,
        }],
    }
}

#[test]
fn test_serial_and_integer_types() {
    assert!(column("id", "SERIAL").has_serial_type());
    assert!(column("id", "BIGSERIAL").has_serial_type());
    assert!(!column("id", "INTEGER").has_serial_type());

    assert!(column("n", "INTEGER").has_integer_type());
    assert!(column("n", "BIGINT").has_integer_type());
    assert!(column("n", "SERIAL").has_integer_type());
    assert!(!column("n", "TEXT").has_integer_type());
}

#[test]
fn test_auto_primary_key() {
    let table = widgets();
    let id = table.column("id").unwrap();
    let sku = table.column("sku").unwrap();
    assert!(table.is_auto_primary_key(id));
    assert!(!table.is_auto_primary_key(sku));
}

#[test]
fn test_auto_primary_key_requires_serial_type() {
    let mut table = widgets();
    table.columns[0].data_type = "INTEGER".to_string();
    let id = table.columns[0].clone();
    assert!(!table.is_auto_primary_key(&id));
}

#[test]
fn test_auto_primary_key_requires_sole_pk() {
    let mut table = widgets();
    table.columns[1].is_primary_key = true;
    let id = table.columns[0].clone();
    assert!(!table.is_auto_primary_key(&id));
}

#[test]
fn test_insertable_columns_skip_auto_pk() {
    let table = widgets();
    let names: Vec<&str> = table
        .insertable_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["sku", "qty"]);
}

#[test]
fn test_unique_columns_include_unique_indexes() {
    let mut table = widgets();
    table.indexes[0].unique = true;
    let unique = table.unique_columns();
    assert!(unique.contains("sku"));
    assert!(unique.contains("qty"));
}

#[test]
fn test_foreign_key_target() {
    let fk = Column {
        is_foreign_key: true,
        references_table: Some("customers".to_string()),
        references_column: Some("id".to_string()),
        ..column("customer_id", "INTEGER")
    };
    assert_eq!(fk.foreign_key_target(), Some(("customers", "id")));

    let partial = Column {
        is_foreign_key: true,
        references_table: Some("customers".to_string()),
        ..column("customer_id", "INTEGER")
    };
    assert_eq!(partial.foreign_key_target(), None);
}

#[test]
fn test_schema_deserializes_from_designer_payload() {
    let payload = serde_json::json!({
        "tables": [{
            "id": "tbl_1",
            "name": "widgets",
            "columns": [{
                "name": "id",
                "data_type": "SERIAL",
                "nullable": false,
                "is_primary_key": true
            }],
            "constraints": [{
                "type": "UNIQUE",
                "columns": ["id"]
            }]
        }],
        "relationships": [{
            "id": "rel_1",
            "from_table": "widgets",
            "to_table": "crates",
            "from_column": "crate_id",
            "to_column": "id",
            "cardinality": "1:N",
            "required": true,
            "on_delete": "SET_NULL"
        }]
    });

    let schema: Schema = serde_json::from_value(payload).unwrap();
    assert_eq!(schema.tables[0].constraints[0].kind, ConstraintType::Unique);
    assert_eq!(
        schema.relationships[0].cardinality,
        Cardinality::OneToMany
    );
    assert_eq!(schema.relationships[0].on_delete, OnDeleteAction::SetNull);
}

#[test]
fn test_from_json_rejects_malformed_payload() {
    let error = Schema::from_json("{\"tables\": 7}").unwrap_err();
    assert!(matches!(error, CoreError::Json(_)));
}

fn linked_schema() -> Schema {
    let mut crates_table = widgets();
    crates_table.name = "crates".to_string();
    let mut widgets_table = widgets();
    widgets_table.columns.push(column("crate_id", "INTEGER"));
    Schema {
        tables: vec![widgets_table, crates_table],
        relationships: vec![Relationship {
            id: "rel_1".to_string(),
            from_table: "widgets".to_string(),
            to_table: "crates".to_string(),
            from_column: "crate_id".to_string(),
            to_column: "id".to_string(),
            cardinality: Cardinality::OneToMany,
            required: true,
            on_delete: OnDeleteAction::SetNull,
        }],
    }
}

#[test]
fn test_validate_accepts_resolvable_references() {
    assert!(linked_schema().validate().is_ok());
}

#[test]
fn test_validate_rejects_unknown_relationship_table() {
    let mut schema = linked_schema();
    schema.relationships[0].to_table = "pallets".to_string();
    let error = schema.validate().unwrap_err();
    assert!(matches!(error, CoreError::UnknownTable { name } if name == "pallets"));
}

#[test]
fn test_validate_rejects_unknown_relationship_column() {
    let mut schema = linked_schema();
    schema.relationships[0].from_column = "pallet_id".to_string();
    let error = schema.validate().unwrap_err();
    assert!(matches!(
        error,
        CoreError::UnknownColumn { table, column } if table == "widgets" && column == "pallet_id"
    ));
}

#[test]
fn test_validate_rejects_empty_table_name() {
    let mut schema = linked_schema();
    schema.tables[0].name = "  ".to_string();
    assert!(matches!(
        schema.validate().unwrap_err(),
        CoreError::EmptyName { .. }
    ));
}

#[test]
fn test_on_delete_action_sql() {
    assert_eq!(OnDeleteAction::Cascade.as_sql(), "CASCADE");
    assert_eq!(OnDeleteAction::SetNull.as_sql(), "SET NULL");
    assert_eq!(OnDeleteAction::NoAction.as_sql(), "NO ACTION");
}
