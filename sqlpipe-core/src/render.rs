//! Render a clause chain to SQL text.
//!
//! Rendering walks from the terminal node back to the root and emits
//! fragments root first. Two clause pairs are not plain concatenation:
//!
//! - `TOP` is written inside the `SELECT` it follows, so the row limit
//!   lands right after that select's keyword and never on another
//!   statement of a union.
//! - An ORDER BY item that follows another ORDER BY item continues the
//!   same list instead of repeating the keyword.

use crate::builder::chain::{Clause, Node};
use crate::builder::common::SortDirection;

/// Text layout of rendered SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Single line, clauses separated by spaces
    Compact,
    /// A newline before each major clause keyword
    Pretty,
}

impl Layout {
    fn separator(self) -> char {
        match self {
            Layout::Compact => ' ',
            Layout::Pretty => '\n',
        }
    }
}

/// Render the chain ending at `node`
pub fn render(node: &Node, layout: Layout) -> String {
    let mut sql = String::new();
    write_node(&mut sql, node, layout, None);
    sql
}

fn write_node(sql: &mut String, node: &Node, layout: Layout, row_limit: Option<u64>) {
    let prev = node.predecessor();

    if let Clause::Top(rows) = node.clause() {
        if let Some(select) = prev {
            write_node(sql, select, layout, Some(*rows));
        }
        return;
    }

    if let Some(prev) = prev {
        write_node(sql, prev, layout, None);
    }

    match node.clause() {
        Clause::OrderBy { column, direction } if continues_order_by(prev) => {
            sql.push_str(", ");
            write_order_item(sql, column, direction.as_ref());
        }
        clause => {
            if prev.is_some() {
                sql.push(layout.separator());
            }
            write_fragment(sql, clause, row_limit);
        }
    }
}

fn continues_order_by(prev: Option<&Node>) -> bool {
    prev.is_some_and(|node| matches!(node.clause(), Clause::OrderBy { .. }))
}

fn write_fragment(sql: &mut String, clause: &Clause, row_limit: Option<u64>) {
    match clause {
        Clause::Select { distinct, columns } => {
            sql.push_str("SELECT");
            if *distinct {
                sql.push_str(" DISTINCT");
            }
            if let Some(rows) = row_limit {
                sql.push_str(&format!(" TOP ({})", rows));
            }
            sql.push(' ');
            if columns.is_empty() {
                sql.push('*');
            } else {
                sql.push_str(&columns.join(", "));
            }
        }
        Clause::From(table) => {
            sql.push_str("FROM ");
            sql.push_str(table);
        }
        Clause::Join { join_type, table } => {
            sql.push_str(&format!("{} JOIN {}", join_type, table));
        }
        Clause::On(predicate) => {
            sql.push_str("ON ");
            sql.push_str(predicate);
        }
        Clause::Where(predicate) => {
            sql.push_str("WHERE ");
            sql.push_str(predicate);
        }
        Clause::GroupBy(column) => {
            sql.push_str("GROUP BY ");
            sql.push_str(column);
        }
        Clause::Having(predicate) => {
            sql.push_str("HAVING ");
            sql.push_str(predicate);
        }
        Clause::OrderBy { column, direction } => {
            sql.push_str("ORDER BY ");
            write_order_item(sql, column, direction.as_ref());
        }
        Clause::Union => sql.push_str("UNION"),
        Clause::Top(_) => unreachable!("TOP is rendered by the SELECT it follows"),
    }
}

fn write_order_item(sql: &mut String, column: &str, direction: Option<&SortDirection>) {
    sql.push_str(column);
    if let Some(direction) = direction {
        sql.push(' ');
        sql.push_str(&direction.to_string());
    }
}
