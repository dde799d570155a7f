use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::session::SqliteConnector;

/// Default time a statement waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_wal() -> bool {
    true
}

/// Options for opening `SQLite` connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteOptions {
    pub db_path: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Switch the database to write-ahead logging on every open.
    #[serde(default = "default_wal")]
    pub wal: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            wal: true,
        }
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    #[must_use]
    pub fn connector(self) -> SqliteConnector {
        SqliteConnector::new(self)
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Finish and wrap the options in a connector for [`Database::open`](crate::Database::open).
    #[must_use]
    pub fn connector(self) -> SqliteConnector {
        self.finish().connector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let opts = SqliteOptionsBuilder::new("bot.db")
            .busy_timeout(Duration::from_millis(250))
            .wal(false)
            .finish();
        assert_eq!(opts.db_path, "bot.db");
        assert_eq!(opts.busy_timeout(), Duration::from_millis(250));
        assert!(!opts.wal);
    }

    #[test]
    fn missing_fields_take_defaults_when_deserialized() {
        let opts: SqliteOptions = serde_json::from_str(r#"{"db_path":"bot.db"}"#).unwrap();
        assert_eq!(opts, SqliteOptions::new("bot.db"));
    }
}
