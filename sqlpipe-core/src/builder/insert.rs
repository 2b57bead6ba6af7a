//! INSERT statement generated from a parameter list

use super::common::ModificationStatement;
use crate::param::{Param, IDENTITY_PARAM};
use crate::{Error, Result};

/// Statement that copies the generated identity of the inserted row into `param`
pub fn scope_identity_clause(param: &str) -> String {
    format!("SET {} = SCOPE_IDENTITY()", param)
}

/// INSERT statement over the input parameters that name a source column
///
/// When the parameter list carries an `@IDENTITY` output parameter, the
/// configured identity clause is appended so the executor can read the new
/// row's identity back.
#[derive(Debug, Clone)]
pub struct InsertStatement {
    table_name: String,
    columns: Vec<String>,
    placeholders: Vec<String>,
    identity_param: Option<String>,
    identity_clause: Option<String>,
}

impl InsertStatement {
    /// Create an INSERT for `table` from `params`
    ///
    /// # Examples
    /// ```
    /// use sqlpipe_core::{InsertStatement, ModificationStatement, Param};
    ///
    /// let params = vec![
    ///     Param::with_column("@firstName", "giorgi", "FIRST_NAME"),
    ///     Param::with_column("@age", 10, "AGE"),
    /// ];
    /// let sql = InsertStatement::new("dbo.CLIENTS", &params).to_sql().unwrap();
    /// assert_eq!(sql, "INSERT INTO dbo.CLIENTS (FIRST_NAME, AGE) VALUES (@firstName, @age)");
    /// ```
    pub fn new(table: &str, params: &[Param]) -> Self {
        let (columns, placeholders): (Vec<String>, Vec<String>) = params
            .iter()
            .filter(|p| p.is_input())
            .filter_map(|p| {
                p.source_column
                    .as_ref()
                    .map(|column| (column.clone(), p.placeholder()))
            })
            .unzip();

        let identity_param = params
            .iter()
            .find(|p| p.is_output() && p.is_named(IDENTITY_PARAM))
            .map(Param::placeholder);

        Self {
            table_name: table.to_string(),
            columns,
            placeholders,
            identity_clause: identity_param.as_deref().map(scope_identity_clause),
            identity_param,
        }
    }

    /// Replace the identity clause; `None` leaves identity retrieval to the executor
    pub fn with_identity_clause(mut self, clause: Option<String>) -> Self {
        self.identity_clause = if self.identity_param.is_some() {
            clause
        } else {
            None
        };
        self
    }

    /// The identity output parameter, if the caller asked for one
    pub fn identity_param(&self) -> Option<&str> {
        self.identity_param.as_deref()
    }
}

impl ModificationStatement for InsertStatement {
    fn table(&self) -> &str {
        &self.table_name
    }

    fn to_sql(&self) -> Result<String> {
        if self.columns.is_empty() {
            return Err(Error::invalid_query(
                "INSERT requires at least one parameter with a source column",
            ));
        }

        let mut sql = String::new();

        sql.push_str("INSERT INTO ");
        sql.push_str(&self.table_name);

        sql.push_str(" (");
        sql.push_str(&self.columns.join(", "));
        sql.push(')');

        sql.push_str(" VALUES (");
        sql.push_str(&self.placeholders.join(", "));
        sql.push(')');

        if let Some(clause) = &self.identity_clause {
            sql.push_str("; ");
            sql.push_str(clause);
        }

        Ok(sql)
    }
}
