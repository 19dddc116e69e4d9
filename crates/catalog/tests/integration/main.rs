use {
    catalog::Database,
    def::{ColumnDef, DataType, Row, Value},
    storage::MemClient,
};

fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn insert_commit_and_read_back() {
    let db = Database::new(MemClient::new());

    db.create_table(
        "users",
        vec![
            ColumnDef::new("id", DataType::String, false),
            ColumnDef::new("name", DataType::String, false),
            ColumnDef::new("age", DataType::Int, true),
        ],
        vec!["id".to_string()],
    )
    .unwrap();

    let users = db.get_table("users").unwrap();

    let txn = db.begin().unwrap();
    users
        .insert(
            &txn,
            &row(&[
                ("id", Value::from("user1")),
                ("name", Value::from("John Doe")),
                ("age", Value::Int(30)),
            ]),
        )
        .unwrap();
    txn.commit().unwrap();

    let txn = db.begin().unwrap();
    let stored = users
        .get(&txn, &row(&[("id", Value::from("user1"))]))
        .unwrap();
    txn.commit().unwrap();

    assert_eq!(
        stored,
        row(&[
            ("id", Value::from("user1")),
            ("name", Value::from("John Doe")),
            ("age", Value::Int(30)),
        ])
    );

    db.close().unwrap();
}

#[test]
fn rollback_leaves_no_durable_effect() {
    let db = Database::new(MemClient::new());

    db.create_table(
        "users",
        vec![ColumnDef::new("id", DataType::String, false)],
        vec!["id".to_string()],
    )
    .unwrap();
    let users = db.get_table("users").unwrap();

    let txn = db.begin().unwrap();
    users
        .insert(&txn, &row(&[("id", Value::from("user1"))]))
        .unwrap();
    txn.rollback().unwrap();

    let txn = db.begin().unwrap();
    assert!(users
        .get(&txn, &row(&[("id", Value::from("user1"))]))
        .is_err());
}

#[test]
fn conflicting_commits_surface_the_store_error() {
    let db = Database::new(MemClient::new());

    db.create_table(
        "users",
        vec![ColumnDef::new("id", DataType::String, false)],
        vec!["id".to_string()],
    )
    .unwrap();
    let users = db.get_table("users").unwrap();

    let first = db.begin().unwrap();
    let second = db.begin().unwrap();

    users
        .insert(&first, &row(&[("id", Value::from("user1"))]))
        .unwrap();
    users
        .insert(&second, &row(&[("id", Value::from("user1"))]))
        .unwrap();

    first.commit().unwrap();
    assert!(matches!(
        second.commit().unwrap_err(),
        def::transaction::Error::Store { .. }
    ));

    // The loser stays logically active and may still roll back.
    second.rollback().unwrap();
}

#[test]
fn tables_are_shared_across_transactions() {
    let db = Database::new(MemClient::new());

    db.create_table(
        "counters",
        vec![
            ColumnDef::new("id", DataType::Int, false),
            ColumnDef::new("value", DataType::Int, true),
        ],
        vec!["id".to_string()],
    )
    .unwrap();
    let counters = db.get_table("counters").unwrap();

    let txn = db.begin().unwrap();
    counters
        .insert(
            &txn,
            &row(&[("id", Value::Int(1)), ("value", Value::Int(0))]),
        )
        .unwrap();
    txn.commit().unwrap();

    let txn = db.begin().unwrap();
    counters
        .update(
            &txn,
            &row(&[("id", Value::Int(1)), ("value", Value::Int(1))]),
        )
        .unwrap();
    txn.commit().unwrap();

    let txn = db.begin().unwrap();
    let stored = counters
        .get(&txn, &row(&[("id", Value::Int(1))]))
        .unwrap();
    assert_eq!(stored.get("value"), Some(&Value::Int(1)));
}
