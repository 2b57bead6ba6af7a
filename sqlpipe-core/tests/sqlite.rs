#![cfg(feature = "sqlite")]

use serde::Deserialize;
use sqlpipe_core::prelude::*;
use sqlpipe_core::{ParamType, PoolConfig, SqliteExecutor, IDENTITY_PARAM};

#[derive(Debug, Deserialize, PartialEq)]
struct Client {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "FIRST_NAME")]
    first_name: String,
    #[serde(rename = "AGE")]
    age: Option<i64>,
}

async fn clients_db() -> SqliteExecutor {
    let executor = SqliteExecutor::connect_with(&PoolConfig::new("sqlite::memory:"))
        .await
        .unwrap();
    executor
        .text(
            "CREATE TABLE CLIENTS (ID INTEGER PRIMARY KEY AUTOINCREMENT, FIRST_NAME TEXT NOT NULL, AGE INTEGER)",
            &[],
        )
        .await
        .unwrap();
    executor
}

async fn insert_client(executor: &SqliteExecutor, name: &str, age: i32) -> i64 {
    let params = vec![
        Param::with_column("@firstName", name, "FIRST_NAME"),
        Param::with_column("@age", age, "AGE"),
        Param::output(IDENTITY_PARAM, ParamType::I64),
    ];
    let execution = executor.insert_into("CLIENTS", &params).await.unwrap();
    assert!(execution.succeeded());
    execution
        .output(IDENTITY_PARAM)
        .and_then(Value::as_i64)
        .unwrap()
}

#[tokio::test]
async fn test_insert_returns_identity() {
    let executor = clients_db().await;
    let first = insert_client(&executor, "giorgi", 30).await;
    let second = insert_client(&executor, "nino", 25).await;
    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[tokio::test]
async fn test_rendered_chain_runs_with_named_params() {
    let executor = clients_db().await;
    insert_client(&executor, "giorgi", 30).await;
    insert_client(&executor, "nino", 25).await;
    insert_client(&executor, "levan", 41).await;

    let query = select(("ID", "FIRST_NAME", "AGE"))
        .from("CLIENTS")
        .where_("AGE > @age")
        .order_by_desc("AGE");

    let clients: Vec<Client> = executor
        .fetch_all(&query.to_sql(), &[Param::new("@age", 26)])
        .await
        .unwrap();

    let names: Vec<&str> = clients.iter().map(|c| c.first_name.as_str()).collect();
    assert_eq!(names, vec!["levan", "giorgi"]);
}

#[tokio::test]
async fn test_repeated_placeholder_binds_once() {
    let executor = clients_db().await;
    insert_client(&executor, "giorgi", 30).await;

    let sql = select("ID")
        .from("CLIENTS")
        .where_("AGE >= @age AND AGE <= @age")
        .to_sql();
    let id = executor
        .query_single(&sql, &[Param::new("@age", 30)], |row| row.get::<i64>("ID"))
        .await
        .unwrap();
    assert_eq!(id, Some(1));
}

#[tokio::test]
async fn test_update_and_delete() {
    let executor = clients_db().await;
    let id = insert_client(&executor, "giorgi", 30).await;

    let params = vec![Param::with_column("@age", 31, "AGE"), Param::new("@id", id)];
    let updated = executor
        .update("CLIENTS", &params, "ID = @id")
        .await
        .unwrap();
    assert_eq!(updated.rows_affected, 1);

    let age = executor
        .query_single(
            "SELECT AGE FROM CLIENTS WHERE ID = @id",
            &[Param::new("@id", id)],
            |row| row.get_nullable::<u8>("AGE"),
        )
        .await
        .unwrap();
    assert_eq!(age, Some(Some(31)));

    let deleted = executor
        .delete_from("CLIENTS", &[Param::new("@id", id)], "ID = @id")
        .await
        .unwrap();
    assert!(deleted.succeeded());

    let remaining: Option<Client> = executor
        .fetch_optional("SELECT ID, FIRST_NAME, AGE FROM CLIENTS", &[])
        .await
        .unwrap();
    assert_eq!(remaining, None);
}

#[tokio::test]
async fn test_null_values_round_trip() {
    let executor = clients_db().await;
    executor
        .text(
            "INSERT INTO CLIENTS (FIRST_NAME, AGE) VALUES (@name, @age)",
            &[Param::new("@name", "tamar"), Param::new("@age", Value::Null)],
        )
        .await
        .unwrap();

    let client: Option<Client> = executor
        .fetch_optional("SELECT ID, FIRST_NAME, AGE FROM CLIENTS", &[])
        .await
        .unwrap();
    assert_eq!(client.and_then(|c| c.age), None);
}

#[tokio::test]
async fn test_placeholder_text_inside_literal_is_stored_verbatim() {
    let executor = clients_db().await;
    executor
        .text(
            "INSERT INTO CLIENTS (FIRST_NAME, AGE) VALUES ('@age', @age)",
            &[Param::new("@age", 5)],
        )
        .await
        .unwrap();

    let client: Option<Client> = executor
        .fetch_optional("SELECT ID, FIRST_NAME, AGE FROM CLIENTS", &[])
        .await
        .unwrap();
    let client = client.unwrap();
    assert_eq!(client.first_name, "@age");
    assert_eq!(client.age, Some(5));
}

#[tokio::test]
async fn test_transaction_commit_and_rollback() {
    let executor = clients_db().await;

    let committed = run_in_transaction(&executor, |tx| {
        Box::pin(async move {
            tx.text(
                "INSERT INTO CLIENTS (FIRST_NAME, AGE) VALUES (@name, 20)",
                &[Param::new("@name", "kept")],
            )
            .await?;
            Ok(())
        })
    })
    .await;
    assert!(committed);

    let rolled_back = run_in_transaction(&executor, |tx| {
        Box::pin(async move {
            tx.text(
                "INSERT INTO CLIENTS (FIRST_NAME, AGE) VALUES (@name, 20)",
                &[Param::new("@name", "discarded")],
            )
            .await?;
            tx.text("INSERT INTO MISSING_TABLE (X) VALUES (1)", &[])
                .await?;
            Ok(())
        })
    })
    .await;
    assert!(!rolled_back);

    let names = executor
        .query("SELECT FIRST_NAME FROM CLIENTS", &[], |row| {
            row.get::<String>("FIRST_NAME")
        })
        .await
        .unwrap();
    assert_eq!(names, vec!["kept"]);
}

#[tokio::test]
async fn test_procedures_are_unsupported() {
    let executor = clients_db().await;
    let result = executor.procedure("dbo.ArchiveClients", &[]).await;
    assert!(matches!(result, Err(Error::Unsupported { .. })));
}
