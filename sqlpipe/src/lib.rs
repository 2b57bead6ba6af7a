//! SqlPipe - a typed, chainable SQL clause builder for Rust
//!
//! Queries are chains of clauses. Every append returns a new value that
//! shares the chain before it, and the type of that value decides which
//! clauses may come next:
//!
//! ```
//! use sqlpipe::prelude::*;
//!
//! let query = select(("ID", "NAME"))
//!     .from("CLIENTS")
//!     .where_("AGE > @age")
//!     .order_by("ID");
//!
//! assert_eq!(query.to_sql(), "SELECT ID, NAME FROM CLIENTS WHERE AGE > @age ORDER BY ID");
//! assert_eq!(
//!     query.to_pretty_sql(),
//!     "SELECT ID, NAME\nFROM CLIENTS\nWHERE AGE > @age\nORDER BY ID"
//! );
//! ```
//!
//! Rendered text and [`Param`]s go to an [`Executor`]; enable the `sqlite`
//! feature for a SQLx-backed one.

pub use sqlpipe_core::*;

/// Commonly used traits and functions
pub mod prelude {
    pub use sqlpipe_core::prelude::*;
}
