//! UPDATE statement generated from a parameter list

use super::common::ModificationStatement;
use crate::param::Param;
use crate::{Error, Result};

/// UPDATE statement assigning each source-column parameter to its column
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    table_name: String,
    set_clauses: Vec<(String, String)>,
    predicate: String,
}

impl UpdateStatement {
    /// Create an UPDATE for `table`
    ///
    /// Parameters without a source column are only referenced by the
    /// predicate and do not become assignments.
    pub fn new(table: &str, params: &[Param], predicate: &str) -> Self {
        let set_clauses = params
            .iter()
            .filter(|p| p.is_input())
            .filter_map(|p| {
                p.source_column
                    .as_ref()
                    .map(|column| (column.clone(), p.placeholder()))
            })
            .collect();

        Self {
            table_name: table.to_string(),
            set_clauses,
            predicate: predicate.to_string(),
        }
    }
}

impl ModificationStatement for UpdateStatement {
    fn table(&self) -> &str {
        &self.table_name
    }

    fn to_sql(&self) -> Result<String> {
        if self.set_clauses.is_empty() {
            return Err(Error::invalid_query(
                "UPDATE requires at least one parameter with a source column",
            ));
        }

        let mut sql = String::new();

        sql.push_str("UPDATE ");
        sql.push_str(&self.table_name);

        sql.push_str(" SET ");
        let assignments: Vec<String> = self
            .set_clauses
            .iter()
            .map(|(column, placeholder)| format!("{} = {}", column, placeholder))
            .collect();
        sql.push_str(&assignments.join(", "));

        sql.push_str(" WHERE ");
        sql.push_str(&self.predicate);

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_builder() {
        let params = vec![Param::with_column("@age", 15, "AGE"), Param::new("@id", 1)];
        let sql = UpdateStatement::new("dbo.CLIENTS", &params, "Id = @id")
            .to_sql()
            .unwrap();
        assert_eq!(sql, "UPDATE dbo.CLIENTS SET AGE = @age WHERE Id = @id");
    }

    #[test]
    fn test_update_multiple_columns() {
        let params = vec![
            Param::with_column("firstName", "nino", "FIRST_NAME"),
            Param::with_column("@isActive", false, "IS_ACTIVE"),
            Param::new("@id", 7),
        ];
        let sql = UpdateStatement::new("CLIENTS", &params, "ID = @id")
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE CLIENTS SET FIRST_NAME = @firstName, IS_ACTIVE = @isActive WHERE ID = @id"
        );
    }

    #[test]
    fn test_update_without_assignments_fails() {
        let params = vec![Param::new("@id", 1)];
        let result = UpdateStatement::new("CLIENTS", &params, "ID = @id").to_sql();
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
    }
}
