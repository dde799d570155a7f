use tracing::{debug, warn};

use crate::connection::{Connection, Connector, ExecOutcome, Session};
use crate::error::DbError;
use crate::results::ResultSet;
use crate::statement::count_statements;

use super::config::SqliteOptions;
use super::query::build_result_set;
use super::schema::SCHEMA;

/// Opens [`SqliteSession`]s on one database file.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    options: SqliteOptions,
}

impl SqliteConnector {
    #[must_use]
    pub fn new(options: SqliteOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.options
    }

    /// Open a raw driver connection with the busy timeout and journal mode applied.
    ///
    /// # Errors
    /// Returns `DbError::SqliteError` if the file cannot be opened or configured.
    pub fn open_raw(&self) -> Result<rusqlite::Connection, DbError> {
        let conn = rusqlite::Connection::open(&self.options.db_path)?;
        conn.busy_timeout(self.options.busy_timeout())?;
        if self.options.wal {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        Ok(conn)
    }

    /// Create every table the operations catalog reads or writes, if missing.
    ///
    /// # Errors
    /// Returns `DbError::SqliteError` if the DDL fails.
    pub fn create_schema(&self) -> Result<(), DbError> {
        let conn = self.open_raw()?;
        conn.execute_batch(SCHEMA)?;
        debug!(db_path = %self.options.db_path, "schema ready");
        Ok(())
    }
}

impl Connector for SqliteConnector {
    fn connect(&self) -> Result<Connection, DbError> {
        let conn = self.open_raw()?;
        Ok(Connection::new(Box::new(SqliteSession { conn })))
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.options.db_path)
    }
}

/// One `rusqlite` connection behind the [`Session`] interface.
pub struct SqliteSession {
    conn: rusqlite::Connection,
}

impl SqliteSession {
    fn single_statement(sql: &str) -> Result<(), DbError> {
        match count_statements(sql) {
            1 => Ok(()),
            0 => Err(DbError::ExecutionError("empty statement".into())),
            n => Err(DbError::ExecutionError(format!(
                "expected one statement, found {n}"
            ))),
        }
    }
}

impl Session for SqliteSession {
    fn ping(&mut self) -> Result<(), DbError> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn execute(&mut self, sql: &str) -> Result<ExecOutcome, DbError> {
        Self::single_statement(sql)?;
        let rows = self.conn.execute(sql, [])?;
        Ok(ExecOutcome {
            rows_affected: rows as u64,
            last_insert_id: u64::try_from(self.conn.last_insert_rowid()).unwrap_or(0),
        })
    }

    fn query(&mut self, sql: &str) -> Result<ResultSet, DbError> {
        Self::single_statement(sql)?;
        let mut stmt = self.conn.prepare(sql)?;
        build_result_set(&mut stmt)
    }

    fn close(self: Box<Self>) {
        if let Err((_, err)) = self.conn.close() {
            warn!("error closing sqlite connection: {err}");
        }
    }
}
