//! Helper utilities for testing and development.

use crate::results::TextRow;

/// Build a row from borrowed nullable fields.
#[must_use]
pub fn text_row(fields: &[Option<&str>]) -> TextRow {
    TextRow::new(fields.iter().map(|f| f.map(str::to_string)).collect())
}

/// Poll `ready` until it returns `true` or roughly two seconds pass.
pub fn spin_until(mut ready: impl FnMut() -> bool) -> bool {
    for _ in 0..400 {
        if ready() {
            return true;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    ready()
}
