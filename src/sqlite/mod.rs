//! `SQLite` backend built on `rusqlite`.

pub mod config;
pub mod query;
pub mod schema;
pub mod session;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use query::{build_result_set, sqlite_extract_text};
pub use schema::SCHEMA;
pub use session::{SqliteConnector, SqliteSession};
