use sqlpipe_core::prelude::*;
use sqlpipe_core::{ParamType, PoolConfig, SqliteExecutor, IDENTITY_PARAM};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sqlpipe_core=debug")),
        )
        .init();

    println!("=== SqlPipe SQLite - Usage Example ===\n");

    let executor = SqliteExecutor::connect_with(&PoolConfig::new("sqlite::memory:")).await?;
    executor
        .text(
            "CREATE TABLE CLIENTS (ID INTEGER PRIMARY KEY AUTOINCREMENT, NAME TEXT NOT NULL, AGE INTEGER)",
            &[],
        )
        .await?;

    for (name, age) in [("giorgi", 30), ("nino", 25), ("levan", 41)] {
        let params = vec![
            Param::with_column("@name", name, "NAME"),
            Param::with_column("@age", age, "AGE"),
            Param::output(IDENTITY_PARAM, ParamType::I64),
        ];
        let execution = executor.insert_into("CLIENTS", &params).await?;
        println!("Inserted {} with ID {:?}", name, execution.output(IDENTITY_PARAM));
    }

    let query = select(("ID", "NAME"))
        .from("CLIENTS")
        .where_("AGE > @age")
        .order_by_desc("AGE");
    println!("\n{}\n", query.to_pretty_sql());

    let names = executor
        .query(&query.to_sql(), &[Param::new("@age", 26)], |row| {
            row.get::<String>("NAME")
        })
        .await?;
    println!("Older than 26: {:?}", names);

    let moved = run_in_transaction(&executor, |tx| {
        Box::pin(async move {
            tx.update(
                "CLIENTS",
                &[Param::with_column("@age", 26, "AGE"), Param::new("@name", "nino")],
                "NAME = @name",
            )
            .await?;
            Ok(())
        })
    })
    .await;
    println!("Transaction committed: {}", moved);

    Ok(())
}
