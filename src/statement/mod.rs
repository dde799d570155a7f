//! Lightweight SQL text scanning.
//!
//! Statement text is built by splicing escaped literals into a template, so the one structural
//! property worth checking before it reaches a driver is that it is still exactly one
//! statement. The scanner skips quoted strings, quoted identifiers and comments; it does not
//! parse SQL.

mod scanner;

use scanner::{State, closing, is_block_comment_end, is_block_comment_start, is_line_comment_start};

/// Number of non-empty statements in `sql`, split on `;` outside literals and comments.
///
/// ```rust
/// use hostbot_db::statement::count_statements;
///
/// assert_eq!(count_statements("SELECT 'a;b' -- ;\n;"), 1);
/// assert_eq!(count_statements("SELECT 1; DROP TABLE admins"), 2);
/// ```
#[must_use]
pub fn count_statements(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut state = State::Normal;
    let mut count = 0;
    let mut has_content = false;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b';' => {
                    if has_content {
                        count += 1;
                    }
                    has_content = false;
                }
                _ if is_line_comment_start(bytes, idx) => {
                    state = State::LineComment;
                    idx += 1;
                }
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment;
                    idx += 1;
                }
                _ if b.is_ascii_whitespace() => {}
                _ => {
                    has_content = true;
                    state = match b {
                        b'\'' => State::SingleQuoted,
                        b'"' => State::DoubleQuoted,
                        b'`' => State::Backticked,
                        b'[' => State::Bracketed,
                        _ => State::Normal,
                    };
                }
            },
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if is_block_comment_end(bytes, idx) {
                    state = State::Normal;
                    idx += 1;
                }
            }
            quoted => {
                match closing(quoted) {
                    Some((close, true)) if b == close && bytes.get(idx + 1) == Some(&close) => {
                        idx += 1; // escaped quote
                    }
                    Some((close, _)) if b == close => state = State::Normal,
                    _ => {}
                }
            }
        }
        idx += 1;
    }

    if has_content {
        count += 1;
    }
    count
}

/// `true` when `sql` holds exactly one statement.
#[must_use]
pub fn is_single_statement(sql: &str) -> bool {
    count_statements(sql) == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_utils::quote;

    #[test]
    fn trailing_semicolon_and_whitespace_do_not_count() {
        assert_eq!(count_statements("SELECT 1;  \n"), 1);
        assert_eq!(count_statements(" ; ;"), 0);
        assert_eq!(count_statements(""), 0);
    }

    #[test]
    fn separators_inside_literals_and_comments_are_skipped() {
        assert!(is_single_statement("SELECT 'it''s; fine' FROM t"));
        assert!(is_single_statement("SELECT \"a;b\", `c;d`, [e;f] FROM t"));
        assert!(is_single_statement("SELECT 1 /* ; */ -- ;\n"));
    }

    #[test]
    fn escaped_injection_stays_one_statement() {
        let hostile = "x'; DROP TABLE admins; --";
        let sql = format!("SELECT * FROM admins WHERE name={}", quote(hostile));
        assert!(is_single_statement(&sql));

        let unescaped = format!("SELECT * FROM admins WHERE name='{hostile}'");
        assert_eq!(count_statements(&unescaped), 2);
    }
}
