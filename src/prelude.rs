//! Convenient imports for common functionality.
//!
//! Brings in the facade, its options, the task types and the record types the operations
//! take and return.

pub use crate::config::DatabaseOptions;
pub use crate::connection::{Connector, Session};
pub use crate::database::Database;
pub use crate::error::{DbError, TaskError};
pub use crate::ops::{
    BanRecord, DotaPlayerRecord, DotaPlayerSummary, FinishedGame, GameListEntry,
    GamePlayerSummary, ListedPlayer, MapDownload, NewGamePlayer, W3mmdPlayer, W3mmdVars,
};
pub use crate::pool::PoolStatus;
pub use crate::task::{Operation, OperationKind, Task, TaskId, TaskOutcome};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnector, SqliteOptions};
