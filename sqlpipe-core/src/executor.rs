//! Statement execution interface and transactions

use std::future::Future;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::builder::{
    scope_identity_clause, DeleteStatement, InsertStatement, ModificationStatement,
    UpdateStatement,
};
use crate::{Param, Result, Row, RowCursor, Value};

/// How many rows a query is expected to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryBehavior {
    SingleRow,
    AllRows,
}

/// Outcome of a statement that returns no rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Execution {
    pub rows_affected: u64,
    /// Output parameters keyed by placeholder, e.g. `@IDENTITY`
    pub outputs: Vec<(String, Value)>,
}

impl Execution {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            outputs: Vec::new(),
        }
    }

    pub fn with_output(mut self, name: impl Into<String>, value: Value) -> Self {
        self.outputs.push((name.into(), value));
        self
    }

    /// True when the statement touched at least one row
    pub fn succeeded(&self) -> bool {
        self.rows_affected > 0
    }

    /// Value of an output parameter, named with or without `@`
    pub fn output(&self, name: &str) -> Option<&Value> {
        let name = name.trim_start_matches('@');
        self.outputs
            .iter()
            .find(|(key, _)| key.trim_start_matches('@').eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

/// Runs rendered SQL against a database
///
/// Implementations receive the SQL text verbatim together with every
/// parameter the caller supplied.
pub trait Executor: Send + Sync {
    /// Execute a statement that returns no rows
    fn execute_text(
        &self,
        sql: &str,
        params: &[Param],
    ) -> impl Future<Output = Result<Execution>> + Send;

    /// Call a stored procedure by name
    fn execute_procedure(
        &self,
        name: &str,
        params: &[Param],
    ) -> impl Future<Output = Result<Execution>> + Send;

    /// Execute a query and return a cursor over its rows
    fn execute_query(
        &self,
        sql: &str,
        params: &[Param],
        behavior: QueryBehavior,
    ) -> impl Future<Output = Result<RowCursor>> + Send;

    /// Statement appended to an INSERT to fill the identity output parameter
    ///
    /// `None` means the executor fills the parameter itself.
    fn identity_clause(&self, param: &str) -> Option<String> {
        Some(scope_identity_clause(param))
    }
}

/// Convenience operations available on every [`Executor`]
pub trait ExecutorExt: Executor {
    /// Execute a statement, reporting whether any row was affected
    fn text(&self, sql: &str, params: &[Param]) -> impl Future<Output = Result<bool>> + Send;

    /// Call a stored procedure, reporting whether any row was affected
    fn procedure(
        &self,
        name: &str,
        params: &[Param],
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Map the first row of a query, if there is one
    fn query_single<T, F>(
        &self,
        sql: &str,
        params: &[Param],
        mapper: F,
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: Send,
        F: FnOnce(&Row) -> Result<T> + Send;

    /// Map every row of a query
    fn query<T, F>(
        &self,
        sql: &str,
        params: &[Param],
        mapper: F,
    ) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: Send,
        F: FnMut(&Row) -> Result<T> + Send;

    /// Deserialize every row of a query
    fn fetch_all<T>(&self, sql: &str, params: &[Param]) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send;

    /// Deserialize the first row of a query, if there is one
    fn fetch_optional<T>(
        &self,
        sql: &str,
        params: &[Param],
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send;

    /// Insert one row built from the parameters that name a source column
    fn insert_into(
        &self,
        table: &str,
        params: &[Param],
    ) -> impl Future<Output = Result<Execution>> + Send;

    /// Update the rows matching `predicate`
    fn update(
        &self,
        table: &str,
        params: &[Param],
        predicate: &str,
    ) -> impl Future<Output = Result<Execution>> + Send;

    /// Delete the rows matching `predicate`
    fn delete_from(
        &self,
        table: &str,
        params: &[Param],
        predicate: &str,
    ) -> impl Future<Output = Result<Execution>> + Send;
}

impl<E: Executor> ExecutorExt for E {
    async fn text(&self, sql: &str, params: &[Param]) -> Result<bool> {
        debug!(sql, params = params.len(), "executing statement");
        let execution = self.execute_text(sql, params).await?;
        trace!(rows_affected = execution.rows_affected, "statement executed");
        Ok(execution.succeeded())
    }

    async fn procedure(&self, name: &str, params: &[Param]) -> Result<bool> {
        debug!(procedure = name, params = params.len(), "calling procedure");
        let execution = self.execute_procedure(name, params).await?;
        Ok(execution.succeeded())
    }

    async fn query_single<T, F>(&self, sql: &str, params: &[Param], mapper: F) -> Result<Option<T>>
    where
        T: Send,
        F: FnOnce(&Row) -> Result<T> + Send,
    {
        debug!(sql, params = params.len(), behavior = ?QueryBehavior::SingleRow, "executing query");
        let mut cursor = self
            .execute_query(sql, params, QueryBehavior::SingleRow)
            .await?;
        if !cursor.advance() {
            return Ok(None);
        }
        cursor.current().map(mapper).transpose()
    }

    async fn query<T, F>(&self, sql: &str, params: &[Param], mut mapper: F) -> Result<Vec<T>>
    where
        T: Send,
        F: FnMut(&Row) -> Result<T> + Send,
    {
        debug!(sql, params = params.len(), behavior = ?QueryBehavior::AllRows, "executing query");
        let cursor = self
            .execute_query(sql, params, QueryBehavior::AllRows)
            .await?;
        trace!(rows = cursor.remaining(), "query returned");
        cursor.map(|row| mapper(&row)).collect()
    }

    async fn fetch_all<T>(&self, sql: &str, params: &[Param]) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.query(sql, params, Row::deserialize::<T>).await
    }

    async fn fetch_optional<T>(&self, sql: &str, params: &[Param]) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.query_single(sql, params, Row::deserialize::<T>).await
    }

    async fn insert_into(&self, table: &str, params: &[Param]) -> Result<Execution> {
        let statement = InsertStatement::new(table, params);
        let clause = statement
            .identity_param()
            .and_then(|param| self.identity_clause(param));
        let sql = statement.with_identity_clause(clause).to_sql()?;
        debug!(table, sql = %sql, "inserting row");
        self.execute_text(&sql, params).await
    }

    async fn update(&self, table: &str, params: &[Param], predicate: &str) -> Result<Execution> {
        let sql = UpdateStatement::new(table, params, predicate).to_sql()?;
        debug!(table, sql = %sql, "updating rows");
        self.execute_text(&sql, params).await
    }

    async fn delete_from(&self, table: &str, params: &[Param], predicate: &str) -> Result<Execution> {
        let sql = DeleteStatement::new(table, predicate).to_sql()?;
        debug!(table, sql = %sql, "deleting rows");
        self.execute_text(&sql, params).await
    }
}

/// An open transaction; statements run through it see its uncommitted work
pub trait Transaction: Executor {
    /// Commit the transaction
    fn commit(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;

    /// Rollback the transaction
    fn rollback(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}

/// Executors that can open a transaction
pub trait TransactionalExecutor: Executor {
    type Transaction: Transaction;

    /// Start a new transaction
    fn begin(&self) -> impl Future<Output = Result<Self::Transaction>> + Send;
}

/// Run `body` inside a transaction
///
/// Commits when the body returns `Ok`. Otherwise rolls back and returns the
/// body's error; a failed rollback is logged and does not replace it.
///
/// ```ignore
/// let id = transaction(&executor, |tx| Box::pin(async move {
///     tx.text("UPDATE ACCOUNTS SET BALANCE = BALANCE - 10 WHERE ID = @id", &params).await?;
///     Ok(42)
/// }))
/// .await?;
/// ```
pub async fn transaction<E, F, T>(executor: &E, body: F) -> Result<T>
where
    E: TransactionalExecutor,
    F: for<'t> FnOnce(&'t E::Transaction) -> BoxFuture<'t, Result<T>>,
{
    let tx = executor.begin().await?;
    trace!("transaction started");

    let outcome = body(&tx).await;
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            trace!("transaction committed");
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "rolling back transaction");
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}

/// Run `body` inside a transaction, reporting only whether it committed
pub async fn run_in_transaction<E, F>(executor: &E, body: F) -> bool
where
    E: TransactionalExecutor,
    F: for<'t> FnOnce(&'t E::Transaction) -> BoxFuture<'t, Result<()>>,
{
    match transaction(executor, body).await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "transaction did not commit");
            false
        }
    }
}

/// SQLite executor built on a SQLx pool
#[cfg(feature = "sqlite")]
pub mod sqlite {
    use std::sync::Arc;
    use std::time::Duration;

    use sqlx::sqlite::{
        SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteQueryResult, SqliteRow,
    };
    use sqlx::{Column, Row as _, Sqlite, TypeInfo, ValueRef};
    use tokio::sync::Mutex;

    use super::*;
    use crate::param::{bind_order, placeholder_tokens, IDENTITY_PARAM};
    use crate::{Error, PoolConfig};

    type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

    /// Executor over a SQLite connection pool
    ///
    /// SQLite has no `SCOPE_IDENTITY()`; an `@IDENTITY` output parameter is
    /// filled from the connection's last inserted rowid instead.
    #[derive(Debug, Clone)]
    pub struct SqliteExecutor {
        pool: SqlitePool,
    }

    impl SqliteExecutor {
        /// Connect with default pool settings
        pub async fn connect(url: &str) -> Result<Self> {
            Self::connect_with(&PoolConfig::new(url)).await
        }

        pub async fn connect_with(config: &PoolConfig) -> Result<Self> {
            let mut options =
                SqlitePoolOptions::new().max_connections(config.effective_max_connections());
            if config.is_in_memory() {
                // The database vanishes with its only connection.
                options = options
                    .idle_timeout(None::<Duration>)
                    .max_lifetime(None::<Duration>);
            }
            let pool = options.connect(&config.url).await?;
            debug!(url = %config.url, max_connections = config.effective_max_connections(), "sqlite pool ready");
            Ok(Self { pool })
        }

        /// Create from an existing SqlitePool
        pub fn from_pool(pool: SqlitePool) -> Self {
            Self { pool }
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.pool
        }
    }

    impl Executor for SqliteExecutor {
        async fn execute_text(&self, sql: &str, params: &[Param]) -> Result<Execution> {
            run_text(&self.pool, sql, params).await
        }

        async fn execute_procedure(&self, name: &str, _params: &[Param]) -> Result<Execution> {
            Err(Error::unsupported(format!("stored procedure '{}'", name)))
        }

        async fn execute_query(
            &self,
            sql: &str,
            params: &[Param],
            behavior: QueryBehavior,
        ) -> Result<RowCursor> {
            run_query(&self.pool, sql, params, behavior).await
        }

        fn identity_clause(&self, _param: &str) -> Option<String> {
            None
        }
    }

    impl TransactionalExecutor for SqliteExecutor {
        type Transaction = SqliteTransaction;

        async fn begin(&self) -> Result<Self::Transaction> {
            let inner = self.pool.begin().await?;
            Ok(SqliteTransaction {
                inner: Mutex::new(inner),
            })
        }
    }

    /// SQLite transaction wrapper
    pub struct SqliteTransaction {
        inner: Mutex<sqlx::Transaction<'static, Sqlite>>,
    }

    impl Executor for SqliteTransaction {
        async fn execute_text(&self, sql: &str, params: &[Param]) -> Result<Execution> {
            let mut tx = self.inner.lock().await;
            run_text(&mut **tx, sql, params).await
        }

        async fn execute_procedure(&self, name: &str, _params: &[Param]) -> Result<Execution> {
            Err(Error::unsupported(format!("stored procedure '{}'", name)))
        }

        async fn execute_query(
            &self,
            sql: &str,
            params: &[Param],
            behavior: QueryBehavior,
        ) -> Result<RowCursor> {
            let mut tx = self.inner.lock().await;
            run_query(&mut **tx, sql, params, behavior).await
        }

        fn identity_clause(&self, _param: &str) -> Option<String> {
            None
        }
    }

    impl Transaction for SqliteTransaction {
        async fn commit(self) -> Result<()> {
            self.inner.into_inner().commit().await?;
            Ok(())
        }

        async fn rollback(self) -> Result<()> {
            self.inner.into_inner().rollback().await?;
            Ok(())
        }
    }

    async fn run_text<'c, X>(conn: X, sql: &str, params: &[Param]) -> Result<Execution>
    where
        X: sqlx::Executor<'c, Database = Sqlite>,
    {
        let (numbered, ordered) = number_placeholders(sql, params);
        trace!(sql = %numbered, bound = ordered.len(), "binding sqlite parameters");
        let result = bind_params(sqlx::query(&numbered), &ordered)
            .execute(conn)
            .await?;
        Ok(execution(&result, params))
    }

    async fn run_query<'c, X>(
        conn: X,
        sql: &str,
        params: &[Param],
        behavior: QueryBehavior,
    ) -> Result<RowCursor>
    where
        X: sqlx::Executor<'c, Database = Sqlite>,
    {
        let (numbered, ordered) = number_placeholders(sql, params);
        trace!(sql = %numbered, bound = ordered.len(), "binding sqlite parameters");
        let query = bind_params(sqlx::query(&numbered), &ordered);
        let rows: Vec<SqliteRow> = match behavior {
            QueryBehavior::SingleRow => query.fetch_optional(conn).await?.into_iter().collect(),
            QueryBehavior::AllRows => query.fetch_all(conn).await?,
        };
        Ok(RowCursor::new(convert_rows(&rows)?))
    }

    /// Rewrite `@name` placeholders as `?N`, numbered in binding order
    ///
    /// SQLx only binds SQLite parameters positionally, so every occurrence
    /// of one name maps to the same number. Names that match no input
    /// parameter, and anything inside a quoted literal, are left untouched.
    fn number_placeholders<'p>(sql: &str, params: &'p [Param]) -> (String, Vec<&'p Param>) {
        let ordered = bind_order(sql, params);
        let mut numbered = String::with_capacity(sql.len());
        let mut copied = 0;

        for (start, token) in placeholder_tokens(sql) {
            if let Some(idx) = ordered.iter().position(|p| p.placeholder() == token) {
                numbered.push_str(&sql[copied..start]);
                numbered.push_str(&format!("?{}", idx + 1));
                copied = start + token.len();
            }
        }
        numbered.push_str(&sql[copied..]);

        (numbered, ordered)
    }

    fn bind_params<'q>(query: SqliteQuery<'q>, ordered: &[&Param]) -> SqliteQuery<'q> {
        ordered
            .iter()
            .fold(query, |query, param| bind_value(query, &param.value))
    }

    fn bind_value<'q>(query: SqliteQuery<'q>, value: &Value) -> SqliteQuery<'q> {
        match value {
            Value::Null => query.bind(None::<i64>),
            Value::Bool(b) => query.bind(*b),
            Value::U8(i) => query.bind(i64::from(*i)),
            Value::I16(i) => query.bind(i64::from(*i)),
            Value::I32(i) => query.bind(i64::from(*i)),
            Value::I64(i) => query.bind(*i),
            Value::F64(f) => query.bind(*f),
            // No native decimal storage; text keeps the exact digits.
            #[cfg(feature = "decimal-support")]
            Value::Decimal(d) => query.bind(d.to_string()),
            Value::String(s) => query.bind(s.clone()),
            Value::Bytes(b) => query.bind(b.clone()),
        }
    }

    fn execution(result: &SqliteQueryResult, params: &[Param]) -> Execution {
        let outputs = params
            .iter()
            .filter(|p| p.is_output() && p.is_named(IDENTITY_PARAM))
            .map(|p| (p.placeholder(), Value::I64(result.last_insert_rowid())))
            .collect();
        Execution {
            rows_affected: result.rows_affected(),
            outputs,
        }
    }

    fn convert_rows(rows: &[SqliteRow]) -> Result<Vec<Row>> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        let columns: Arc<[String]> = first
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();

        rows.iter()
            .map(|row| {
                let values = (0..columns.len())
                    .map(|idx| column_value(row, idx))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Row::new(Arc::clone(&columns), values))
            })
            .collect()
    }

    // Storage class of the value itself, not the declared column type.
    fn column_value(row: &SqliteRow, idx: usize) -> Result<Value> {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        let value = match raw.type_info().name() {
            "INTEGER" => Value::I64(row.try_get_unchecked(idx)?),
            "REAL" => Value::F64(row.try_get_unchecked(idx)?),
            "BLOB" => Value::Bytes(row.try_get_unchecked(idx)?),
            _ => Value::String(row.try_get_unchecked(idx)?),
        };
        Ok(value)
    }

}
