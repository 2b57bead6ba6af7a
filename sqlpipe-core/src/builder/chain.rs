//! Immutable clause chain
//!
//! Every append returns a new stage wrapping the chain it was called on.
//! Stages share their predecessors through `Arc`, so a partially built
//! query can be extended in several directions without copying it or
//! changing what it renders.
//!
//! Which clause may follow which is decided by the stage types: a method
//! only exists on the stages it may legally follow.

use std::fmt;
use std::sync::Arc;

use super::common::{IntoColumns, JoinType, SortDirection};
use crate::render::{render, Layout};

/// The payload of a single clause
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Select {
        distinct: bool,
        columns: Vec<String>,
    },
    Top(u64),
    From(String),
    Join {
        join_type: JoinType,
        table: String,
    },
    On(String),
    Where(String),
    GroupBy(String),
    Having(String),
    OrderBy {
        column: String,
        direction: Option<SortDirection>,
    },
    Union,
}

/// A clause together with the chain that precedes it
#[derive(Debug)]
pub struct Node {
    prev: Option<Arc<Node>>,
    clause: Clause,
}

impl Node {
    fn root(clause: Clause) -> Arc<Self> {
        Arc::new(Self { prev: None, clause })
    }

    fn extend(prev: &Arc<Node>, clause: Clause) -> Arc<Self> {
        Arc::new(Self {
            prev: Some(Arc::clone(prev)),
            clause,
        })
    }

    pub fn predecessor(&self) -> Option<&Node> {
        self.prev.as_deref()
    }

    pub fn clause(&self) -> &Clause {
        &self.clause
    }
}

/// A chain that can be rendered to SQL text
pub trait Statement {
    /// The terminal node of the chain
    fn node(&self) -> &Arc<Node>;

    /// Render as single-line SQL
    fn to_sql(&self) -> String {
        render(self.node(), Layout::Compact)
    }

    /// Render with a newline before each major clause keyword
    fn to_pretty_sql(&self) -> String {
        render(self.node(), Layout::Pretty)
    }

    /// Render as single-line SQL terminated with `;`
    fn to_statement(&self) -> String {
        format!("{};", self.to_sql())
    }

    /// Render as pretty SQL terminated with `;`
    fn to_pretty_statement(&self) -> String {
        format!("{};", self.to_pretty_sql())
    }
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! stage {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            node: Arc<Node>,
        }

        impl Statement for $name {
            fn node(&self) -> &Arc<Node> {
                &self.node
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_sql())
            }
        }
    };
}

stage! {
    /// A chain ending in `SELECT` or `SELECT DISTINCT`
    SelectClause
}
stage! {
    /// A chain ending in `TOP (n)`
    TopClause
}
stage! {
    /// A chain ending in `FROM`
    FromClause
}
stage! {
    /// A chain ending in one of the JOIN kinds
    JoinClause
}
stage! {
    /// A chain ending in a join's `ON` predicate
    OnClause
}
stage! {
    /// A chain ending in `WHERE`
    WhereClause
}
stage! {
    /// A chain ending in `GROUP BY`
    GroupByClause
}
stage! {
    /// A chain ending in `HAVING`
    HavingClause
}
stage! {
    /// A chain ending in an ORDER BY item
    OrderByClause
}
stage! {
    /// A chain ending in `UNION`
    UnionClause
}

/// Start a chain with `SELECT`
///
/// # Examples
/// ```
/// use sqlpipe_core::prelude::*;
///
/// let query = select(("ID", "NAME")).from("CLIENTS").where_("AGE > @age");
/// assert_eq!(query.to_sql(), "SELECT ID, NAME FROM CLIENTS WHERE AGE > @age");
/// ```
pub fn select<C>(columns: C) -> SelectClause
where
    C: IntoColumns,
{
    SelectClause {
        node: Node::root(Clause::Select {
            distinct: false,
            columns: columns.into_columns(),
        }),
    }
}

/// Start a chain with `SELECT DISTINCT`
pub fn select_distinct<C>(columns: C) -> SelectClause
where
    C: IntoColumns,
{
    SelectClause {
        node: Node::root(Clause::Select {
            distinct: true,
            columns: columns.into_columns(),
        }),
    }
}

impl SelectClause {
    /// Limit the rows returned by this select
    ///
    /// The limit is rendered as given; `top(0)` yields `TOP (0)`, which
    /// returns no rows.
    pub fn top(&self, rows: u64) -> TopClause {
        TopClause {
            node: Node::extend(&self.node, Clause::Top(rows)),
        }
    }

    /// Add a FROM clause
    pub fn from(&self, table: &str) -> FromClause {
        FromClause {
            node: Node::extend(&self.node, Clause::From(table.to_string())),
        }
    }
}

impl TopClause {
    /// Add a FROM clause
    pub fn from(&self, table: &str) -> FromClause {
        FromClause {
            node: Node::extend(&self.node, Clause::From(table.to_string())),
        }
    }
}

impl JoinClause {
    /// Add the join predicate
    pub fn on(&self, predicate: &str) -> OnClause {
        OnClause {
            node: Node::extend(&self.node, Clause::On(predicate.to_string())),
        }
    }
}

impl GroupByClause {
    /// Add a HAVING predicate
    pub fn having(&self, predicate: &str) -> HavingClause {
        HavingClause {
            node: Node::extend(&self.node, Clause::Having(predicate.to_string())),
        }
    }
}

impl UnionClause {
    /// Start the next statement of the union with `SELECT`
    pub fn select<C>(&self, columns: C) -> SelectClause
    where
        C: IntoColumns,
    {
        SelectClause {
            node: Node::extend(
                &self.node,
                Clause::Select {
                    distinct: false,
                    columns: columns.into_columns(),
                },
            ),
        }
    }

    /// Start the next statement of the union with `SELECT DISTINCT`
    pub fn select_distinct<C>(&self, columns: C) -> SelectClause
    where
        C: IntoColumns,
    {
        SelectClause {
            node: Node::extend(
                &self.node,
                Clause::Select {
                    distinct: true,
                    columns: columns.into_columns(),
                },
            ),
        }
    }
}

/// Stages a JOIN may follow: FROM and ON
pub trait Joinable: Statement + sealed::Sealed {
    /// Add an INNER JOIN
    fn inner_join(&self, table: &str) -> JoinClause {
        join(self.node(), JoinType::Inner, table)
    }

    /// Add a LEFT JOIN
    fn left_join(&self, table: &str) -> JoinClause {
        join(self.node(), JoinType::Left, table)
    }

    /// Add a RIGHT JOIN
    fn right_join(&self, table: &str) -> JoinClause {
        join(self.node(), JoinType::Right, table)
    }

    /// Add a FULL OUTER JOIN
    fn full_outer_join(&self, table: &str) -> JoinClause {
        join(self.node(), JoinType::FullOuter, table)
    }
}

fn join(prev: &Arc<Node>, join_type: JoinType, table: &str) -> JoinClause {
    JoinClause {
        node: Node::extend(
            prev,
            Clause::Join {
                join_type,
                table: table.to_string(),
            },
        ),
    }
}

/// Stages WHERE may follow: FROM and ON
pub trait Filterable: Statement + sealed::Sealed {
    /// Add a WHERE predicate
    fn where_(&self, predicate: &str) -> WhereClause {
        WhereClause {
            node: Node::extend(self.node(), Clause::Where(predicate.to_string())),
        }
    }
}

/// Stages GROUP BY may follow: FROM, WHERE and ON
pub trait Groupable: Statement + sealed::Sealed {
    /// Add a GROUP BY clause
    fn group_by(&self, column: &str) -> GroupByClause {
        GroupByClause {
            node: Node::extend(self.node(), Clause::GroupBy(column.to_string())),
        }
    }
}

/// Stages ORDER BY may follow, including a previous ORDER BY item
///
/// Consecutive items render as one comma separated ORDER BY list.
pub trait Orderable: Statement + sealed::Sealed {
    /// Order by a column with the database's default direction
    fn order_by(&self, column: &str) -> OrderByClause {
        order_by(self.node(), column, None)
    }

    /// Order by a column ascending
    fn order_by_asc(&self, column: &str) -> OrderByClause {
        order_by(self.node(), column, Some(SortDirection::Asc))
    }

    /// Order by a column descending
    fn order_by_desc(&self, column: &str) -> OrderByClause {
        order_by(self.node(), column, Some(SortDirection::Desc))
    }
}

fn order_by(prev: &Arc<Node>, column: &str, direction: Option<SortDirection>) -> OrderByClause {
    OrderByClause {
        node: Node::extend(
            prev,
            Clause::OrderBy {
                column: column.to_string(),
                direction,
            },
        ),
    }
}

/// Stages UNION may follow: FROM, WHERE and ON
pub trait Unionable: Statement + sealed::Sealed {
    /// Close this statement with UNION; a new SELECT may follow
    fn union(&self) -> UnionClause {
        UnionClause {
            node: Node::extend(self.node(), Clause::Union),
        }
    }
}

impl sealed::Sealed for FromClause {}
impl sealed::Sealed for OnClause {}
impl sealed::Sealed for WhereClause {}
impl sealed::Sealed for GroupByClause {}
impl sealed::Sealed for HavingClause {}
impl sealed::Sealed for OrderByClause {}

impl Joinable for FromClause {}
impl Joinable for OnClause {}

impl Filterable for FromClause {}
impl Filterable for OnClause {}

impl Groupable for FromClause {}
impl Groupable for WhereClause {}
impl Groupable for OnClause {}

impl Orderable for FromClause {}
impl Orderable for WhereClause {}
impl Orderable for OnClause {}
impl Orderable for GroupByClause {}
impl Orderable for HavingClause {}
impl Orderable for OrderByClause {}

impl Unionable for FromClause {}
impl Unionable for WhereClause {}
impl Unionable for OnClause {}

#[cfg(test)]
mod tests {
    use super::*;

    fn clauses(statement: &impl Statement) -> Vec<Clause> {
        let mut out = Vec::new();
        let mut current = Some(statement.node().as_ref());
        while let Some(node) = current {
            out.push(node.clause().clone());
            current = node.predecessor();
        }
        out.reverse();
        out
    }

    #[test]
    fn test_root_has_no_predecessor() {
        let query = select("ID");
        assert!(query.node().predecessor().is_none());
        assert_eq!(
            query.node().clause(),
            &Clause::Select {
                distinct: false,
                columns: vec!["ID".to_string()]
            }
        );
    }

    #[test]
    fn test_chain_records_construction_order() {
        let query = select_distinct(())
            .top(3)
            .from("T")
            .inner_join("U")
            .on("T.ID = U.T_ID")
            .where_("U.X = 1")
            .order_by_desc("T.ID");

        assert_eq!(
            clauses(&query),
            vec![
                Clause::Select {
                    distinct: true,
                    columns: vec![]
                },
                Clause::Top(3),
                Clause::From("T".to_string()),
                Clause::Join {
                    join_type: JoinType::Inner,
                    table: "U".to_string()
                },
                Clause::On("T.ID = U.T_ID".to_string()),
                Clause::Where("U.X = 1".to_string()),
                Clause::OrderBy {
                    column: "T.ID".to_string(),
                    direction: Some(SortDirection::Desc)
                },
            ]
        );
    }

    #[test]
    fn test_extensions_share_predecessor() {
        let base = select("A").from("T");
        let left = base.where_("X = 1");
        let right = base.where_("Y = 2");

        let left_prev = left.node().prev.as_ref().unwrap();
        let right_prev = right.node().prev.as_ref().unwrap();
        assert!(Arc::ptr_eq(left_prev, base.node()));
        assert!(Arc::ptr_eq(right_prev, base.node()));
        // base + two extensions
        assert_eq!(Arc::strong_count(base.node()), 3);
    }

    #[test]
    fn test_union_allows_new_select() {
        let query = select("A").from("T").union().select_distinct("B");
        let clauses = clauses(&query);
        assert_eq!(clauses.len(), 4);
        assert_eq!(clauses[2], Clause::Union);
        assert!(matches!(clauses[3], Clause::Select { distinct: true, .. }));
    }

    #[test]
    fn test_dropping_extension_frees_node() {
        let base = select("A").from("T");
        {
            let _extended = base.where_("X = 1");
            assert_eq!(Arc::strong_count(base.node()), 2);
        }
        assert_eq!(Arc::strong_count(base.node()), 1);
    }

    #[test]
    fn test_chains_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SelectClause>();
        assert_send_sync::<OrderByClause>();
        assert_send_sync::<UnionClause>();
    }
}
