//! DELETE statement

use super::common::ModificationStatement;
use crate::Result;

/// DELETE statement; the predicate is required and passed through verbatim
#[derive(Debug, Clone)]
pub struct DeleteStatement {
    table_name: String,
    predicate: String,
}

impl DeleteStatement {
    pub fn new(table: &str, predicate: &str) -> Self {
        Self {
            table_name: table.to_string(),
            predicate: predicate.to_string(),
        }
    }
}

impl ModificationStatement for DeleteStatement {
    fn table(&self) -> &str {
        &self.table_name
    }

    fn to_sql(&self) -> Result<String> {
        Ok(format!(
            "DELETE FROM {} WHERE {}",
            self.table_name, self.predicate
        ))
    }
}
