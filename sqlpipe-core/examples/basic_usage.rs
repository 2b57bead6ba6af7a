use sqlpipe_core::prelude::*;
use sqlpipe_core::{InsertStatement, ParamType, UpdateStatement, IDENTITY_PARAM};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== SqlPipe - Clause Chain Example ===\n");

    let clients = select(("ID", "NAME"))
        .from("CLIENTS")
        .where_("AGE > @age")
        .order_by("ID");

    println!("1. Compact:");
    println!("   {}\n", clients.to_sql());

    println!("2. Pretty:");
    println!("{}\n", clients.to_pretty_sql());

    // Both branches share the FROM node
    let base = select(("C.ID", "C.NAME", "O.TOTAL"))
        .top(10)
        .from("CLIENTS C")
        .inner_join("ORDERS O")
        .on("O.CLIENT_ID = C.ID");
    let recent = base.where_("O.CREATED_AT > @since").order_by_desc("O.CREATED_AT");
    let largest = base.order_by_desc("O.TOTAL").order_by_asc("C.NAME");

    println!("3. Branching from one chain:");
    println!("   {}", recent.to_sql());
    println!("   {}\n", largest.to_sql());

    let report = select(("DEPT", "COUNT(*)"))
        .from("EMPLOYEES")
        .group_by("DEPT")
        .having("COUNT(*) > 5")
        .order_by("DEPT");
    println!("4. Grouping:");
    println!("   {}\n", report.to_statement());

    let merged = select_distinct("EMAIL")
        .from("CLIENTS")
        .union()
        .select("EMAIL")
        .from("LEADS");
    println!("5. UNION:");
    println!("{}\n", merged.to_pretty_sql());

    let params = vec![
        Param::with_column("@firstName", "giorgi", "FIRST_NAME"),
        Param::with_column("@age", 30, "AGE"),
        Param::output(IDENTITY_PARAM, ParamType::I32),
    ];
    println!("6. INSERT / UPDATE:");
    println!("   {}", InsertStatement::new("dbo.CLIENTS", &params).to_sql()?);
    println!(
        "   {}",
        UpdateStatement::new("dbo.CLIENTS", &params, "ID = @id").to_sql()?
    );

    Ok(())
}
