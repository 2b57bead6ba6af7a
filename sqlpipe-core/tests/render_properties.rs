use sqlpipe_core::prelude::*;
use sqlpipe_core::{Clause, Layout};

#[test]
fn test_select_star_for_empty_columns() {
    let empty: Vec<&str> = Vec::new();
    assert_eq!(select(()).to_sql(), "SELECT *");
    assert_eq!(select(empty).from("T").to_sql(), "SELECT * FROM T");
    assert_eq!(select(("A", "B", "C")).to_sql(), "SELECT A, B, C");
}

#[test]
fn test_top_follows_select_keyword() {
    let query = select(("X", "Y")).top(5).from("T").where_("X=1");
    assert_eq!(query.to_sql(), "SELECT TOP (5) X, Y FROM T WHERE X=1");

    let longer = select("X")
        .top(5)
        .from("T")
        .inner_join("U")
        .on("T.ID = U.ID")
        .where_("X=1")
        .order_by("X");
    assert!(longer.to_sql().starts_with("SELECT TOP (5) X FROM T"));
}

#[test]
fn test_order_by_calls_merge() {
    let query = select("A").from("T").order_by("A").order_by_desc("B");
    assert_eq!(query.to_sql(), "SELECT A FROM T ORDER BY A, B DESC");
    assert_eq!(query.to_sql().matches("ORDER BY").count(), 1);
}

#[test]
fn test_single_order_by_has_no_terminator() {
    let query = select("A").from("T").order_by("A");
    assert_eq!(query.to_sql(), "SELECT A FROM T ORDER BY A");
    assert_eq!(query.to_statement(), "SELECT A FROM T ORDER BY A;");

    let merged = query.order_by_asc("B");
    assert_eq!(merged.to_statement(), "SELECT A FROM T ORDER BY A, B ASC;");
}

#[test]
fn test_pretty_newline_before_each_keyword() {
    let query = select(("A", "B"))
        .from("T")
        .left_join("U")
        .on("T.ID = U.ID")
        .where_("A > 1")
        .group_by("A")
        .having("COUNT(*) > 1")
        .order_by("A");

    assert_eq!(
        query.to_pretty_sql(),
        "SELECT A, B\nFROM T\nLEFT JOIN U\nON T.ID = U.ID\nWHERE A > 1\nGROUP BY A\nHAVING COUNT(*) > 1\nORDER BY A"
    );

    let first_line = query.to_pretty_sql().lines().next().map(str::to_string);
    assert_eq!(first_line.as_deref(), Some("SELECT A, B"));
}

#[test]
fn test_pretty_union_and_joins() {
    let query = select("A")
        .from("T")
        .right_join("U")
        .on("1 = 1")
        .full_outer_join("V")
        .on("2 = 2")
        .union()
        .select("A")
        .from("W");

    assert_eq!(
        query.to_pretty_sql(),
        "SELECT A\nFROM T\nRIGHT JOIN U\nON 1 = 1\nFULL OUTER JOIN V\nON 2 = 2\nUNION\nSELECT A\nFROM W"
    );
}

#[test]
fn test_rendering_is_idempotent() {
    let query = select(("ID", "NAME"))
        .top(3)
        .from("CLIENTS")
        .where_("AGE > @age")
        .order_by("ID")
        .order_by_desc("NAME");

    assert_eq!(query.to_sql(), query.to_sql());
    assert_eq!(query.to_pretty_sql(), query.to_pretty_sql());
    assert_eq!(query.to_string(), query.to_sql());
}

#[test]
fn test_branches_are_independent() {
    let base = select("A").from("T");
    let x = base.where_("X=1");
    let y = base.where_("Y=2");

    assert_eq!(base.to_sql(), "SELECT A FROM T");
    assert_eq!(x.to_sql(), "SELECT A FROM T WHERE X=1");
    assert_eq!(y.to_sql(), "SELECT A FROM T WHERE Y=2");

    let x_ordered = x.order_by("A");
    assert_eq!(x.to_sql(), "SELECT A FROM T WHERE X=1");
    assert_eq!(x_ordered.to_sql(), "SELECT A FROM T WHERE X=1 ORDER BY A");
}

#[test]
fn test_end_to_end_example() {
    let query = select(("ID", "NAME"))
        .from("CLIENTS")
        .where_("AGE > @age")
        .order_by("ID");

    assert_eq!(
        query.to_sql(),
        "SELECT ID, NAME FROM CLIENTS WHERE AGE > @age ORDER BY ID"
    );
    assert_eq!(
        query.to_pretty_sql(),
        "SELECT ID, NAME\nFROM CLIENTS\nWHERE AGE > @age\nORDER BY ID"
    );
}

#[test]
fn test_top_after_union_only_limits_second_select() {
    let query = select("A")
        .from("T")
        .union()
        .select_distinct("A")
        .top(10)
        .from("U");
    assert_eq!(
        query.to_sql(),
        "SELECT A FROM T UNION SELECT DISTINCT TOP (10) A FROM U"
    );
}

#[test]
fn test_render_from_node() {
    let query = select("A").from("T").where_("A = 1");
    let node = query.node();

    assert!(matches!(node.clause(), Clause::Where(p) if p == "A = 1"));
    assert_eq!(
        sqlpipe_core::render::render(node, Layout::Pretty),
        query.to_pretty_sql()
    );
}
