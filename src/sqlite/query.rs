use rusqlite::Statement;
use rusqlite::types::ValueRef;

use crate::error::DbError;
use crate::results::{ResultSet, TextRow};

/// Decode one column of a `SQLite` row into nullable text.
///
/// Numbers are rendered in decimal; blobs are read as lossy UTF-8.
///
/// # Errors
/// Returns `DbError::SqliteError` if the column index is out of range.
pub fn sqlite_extract_text(row: &rusqlite::Row, idx: usize) -> Result<Option<String>, DbError> {
    let value = row.get_ref(idx)?;
    Ok(match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    })
}

/// Run a prepared statement and buffer every row it returns.
///
/// # Errors
/// Returns `DbError::SqliteError` if execution or decoding fails.
pub fn build_result_set(stmt: &mut Statement) -> Result<ResultSet, DbError> {
    let column_count = stmt.column_count();
    let mut rows_iter = stmt.query([])?;
    let mut result_set = ResultSet::with_capacity(column_count, 10);

    while let Some(row) = rows_iter.next()? {
        let mut fields = Vec::with_capacity(column_count);
        for i in 0..column_count {
            fields.push(sqlite_extract_text(row, i)?);
        }
        result_set.add_row(TextRow::new(fields));
    }

    Ok(result_set)
}
