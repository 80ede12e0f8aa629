//! Commit and rollback behaviour of the transaction unit.

use crate::postgres::helpers::{StoreContext, store_context};
use diesel::prelude::*;
use rstest::rstest;
use tasktracker::task::adapters::postgres::TransactionUnit;

fn insert_user(unit: &mut TransactionUnit<'_>, name: &str) {
    diesel::sql_query("INSERT INTO users (name) VALUES ($1)")
        .bind::<diesel::sql_types::Text, _>(name)
        .execute(unit.connection())
        .expect("insert user");
}

fn user_count(conn: &mut PgConnection) -> i64 {
    #[derive(QueryableByName)]
    struct CountRow {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        count: i64,
    }

    diesel::sql_query("SELECT COUNT(*) AS count FROM users")
        .get_result::<CountRow>(conn)
        .expect("count users")
        .count
}

#[rstest]
fn dropped_unit_rolls_back(store_context: StoreContext) {
    let context = store_context;
    let mut conn = PgConnection::establish(&context.database.url()).expect("connect");

    {
        let mut unit = TransactionUnit::begin(&mut conn).expect("begin");
        insert_user(&mut unit, "ghost");
    }

    assert_eq!(user_count(&mut conn), 0);
}

#[rstest]
fn committed_unit_persists(store_context: StoreContext) {
    let context = store_context;
    let mut conn = PgConnection::establish(&context.database.url()).expect("connect");

    let mut unit = TransactionUnit::begin(&mut conn).expect("begin");
    insert_user(&mut unit, "alice");
    unit.commit().expect("commit");

    assert_eq!(user_count(&mut conn), 1);
}

#[rstest]
fn failed_statement_is_rolled_back_on_drop(store_context: StoreContext) {
    let context = store_context;
    let mut conn = PgConnection::establish(&context.database.url()).expect("connect");

    {
        let mut unit = TransactionUnit::begin(&mut conn).expect("begin");
        insert_user(&mut unit, "alice");
        let failed = diesel::sql_query("INSERT INTO tasks_labels (task_id, label_id) VALUES (1, 1)")
            .execute(unit.connection());
        assert!(failed.is_err());
    }

    // The connection is usable again once the aborted transaction is gone.
    assert_eq!(user_count(&mut conn), 0);
}

#[rstest]
fn uncommitted_writes_are_invisible_to_other_connections(store_context: StoreContext) {
    let context = store_context;
    let mut writer = PgConnection::establish(&context.database.url()).expect("connect");
    let mut reader = context.connection().expect("pooled connection");

    let mut unit = TransactionUnit::begin(&mut writer).expect("begin");
    insert_user(&mut unit, "pending");
    assert_eq!(user_count(&mut reader), 0);
    unit.commit().expect("commit");

    assert_eq!(user_count(&mut reader), 1);
}
