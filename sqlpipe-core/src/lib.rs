//! SqlPipe Core - an immutable, typed SQL clause chain with pluggable executors
//!
//! A query is built by appending clauses to a chain. Each append returns a
//! new stage type that only offers the clauses allowed to follow it, so an
//! illegal sequence does not compile. Chains render to compact or pretty
//! SQL text and are handed, together with named parameters, to an
//! [`Executor`].

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod param;
pub mod render;
pub mod row;
pub mod value;

// Re-export main types
pub use builder::{
    select, select_distinct, Clause, DeleteStatement, Filterable, FromClause, GroupByClause,
    Groupable, HavingClause, InsertStatement, IntoColumns, JoinClause, JoinType, Joinable,
    ModificationStatement, OnClause, OrderByClause, Orderable, SelectClause, SortDirection,
    Statement, TopClause, UnionClause, Unionable, UpdateStatement, WhereClause,
};
pub use config::PoolConfig;
pub use error::{Error, Result};
pub use executor::{
    run_in_transaction, transaction, Execution, Executor, ExecutorExt, QueryBehavior,
    Transaction, TransactionalExecutor,
};
pub use param::{Direction, Param, IDENTITY_PARAM};
pub use render::Layout;
pub use row::{FromValue, Row, RowCursor};
pub use value::{ParamType, Value};

#[cfg(feature = "sqlite")]
pub use executor::sqlite::{SqliteExecutor, SqliteTransaction};

/// Everything needed to build, render and execute a chain
pub mod prelude {
    pub use crate::builder::{
        select, select_distinct, Filterable, Groupable, Joinable, ModificationStatement,
        Orderable, Statement, Unionable,
    };
    pub use crate::executor::{
        run_in_transaction, transaction, Executor, ExecutorExt, QueryBehavior, Transaction,
        TransactionalExecutor,
    };
    pub use crate::{Error, Param, Result, Row, Value};
}
