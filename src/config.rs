use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// Default number of idle connections kept open between tasks.
pub const DEFAULT_IDLE_CAP: usize = 30;
/// Default pause before the second attempt to start a worker.
pub const DEFAULT_SPAWN_RETRY_DELAY_MS: u64 = 50;

/// Options for a [`Database`](crate::Database).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseOptions {
    /// Identifies this bot in every row it writes and in bot-scoped lookups.
    pub bot_id: u32,
    /// Maximum number of idle connections kept in the pool.
    pub idle_cap: usize,
    /// Delay between the two worker spawn attempts, in milliseconds.
    pub spawn_retry_delay_ms: u64,
    /// Prefix for worker thread names.
    pub worker_name_prefix: String,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            bot_id: 0,
            idle_cap: DEFAULT_IDLE_CAP,
            spawn_retry_delay_ms: DEFAULT_SPAWN_RETRY_DELAY_MS,
            worker_name_prefix: "db-task".to_string(),
        }
    }
}

impl DatabaseOptions {
    #[must_use]
    pub fn new(bot_id: u32) -> Self {
        Self {
            bot_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder() -> DatabaseOptionsBuilder {
        DatabaseOptionsBuilder::default()
    }

    #[must_use]
    pub fn spawn_retry_delay(&self) -> Duration {
        Duration::from_millis(self.spawn_retry_delay_ms)
    }

    /// Reject option combinations the pool cannot honour.
    ///
    /// # Errors
    /// Returns [`DbError::ConfigError`] for an empty worker name prefix.
    pub fn validate(&self) -> Result<(), DbError> {
        if self.worker_name_prefix.is_empty() {
            return Err(DbError::ConfigError(
                "worker_name_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Fluent builder for [`DatabaseOptions`].
#[derive(Debug, Clone, Default)]
pub struct DatabaseOptionsBuilder {
    opts: DatabaseOptions,
}

impl DatabaseOptionsBuilder {
    #[must_use]
    pub fn bot_id(mut self, bot_id: u32) -> Self {
        self.opts.bot_id = bot_id;
        self
    }

    #[must_use]
    pub fn idle_cap(mut self, idle_cap: usize) -> Self {
        self.opts.idle_cap = idle_cap;
        self
    }

    #[must_use]
    pub fn spawn_retry_delay(mut self, delay: Duration) -> Self {
        self.opts.spawn_retry_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn worker_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.opts.worker_name_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn finish(self) -> DatabaseOptions {
        self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pool_constants() {
        let opts = DatabaseOptions::default();
        assert_eq!(opts.idle_cap, 30);
        assert_eq!(opts.spawn_retry_delay(), Duration::from_millis(50));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn builder_overrides_fields() {
        let opts = DatabaseOptions::builder()
            .bot_id(7)
            .idle_cap(2)
            .spawn_retry_delay(Duration::from_millis(5))
            .worker_name_prefix("bot7")
            .finish();
        assert_eq!(opts.bot_id, 7);
        assert_eq!(opts.idle_cap, 2);
        assert_eq!(opts.spawn_retry_delay_ms, 5);
        assert_eq!(opts.worker_name_prefix, "bot7");
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let opts = DatabaseOptions::builder().worker_name_prefix("").finish();
        assert!(matches!(opts.validate(), Err(DbError::ConfigError(_))));
    }
}
