//! Clause chain and statement builders

pub mod chain;
pub mod common;
pub mod delete;
pub mod insert;
pub mod update;

// Re-export types from submodules
pub use chain::{
    select, select_distinct, Clause, Filterable, FromClause, GroupByClause, Groupable,
    HavingClause, JoinClause, Joinable, Node, OnClause, OrderByClause, Orderable, SelectClause,
    Statement, TopClause, UnionClause, Unionable, WhereClause,
};
pub use common::{IntoColumns, JoinType, ModificationStatement, SortDirection};
pub use delete::DeleteStatement;
pub use insert::{scope_identity_clause, InsertStatement};
pub use update::UpdateStatement;
