//! Helpers for splicing user-supplied text into statement literals.

/// Escape a value for use inside a single-quoted SQL string literal.
///
/// Single quotes are doubled, which is the SQL-standard escape and keeps the value inside its
/// literal no matter what follows it. NUL characters are dropped: drivers that take
/// NUL-terminated statement text would otherwise end the statement early.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        match ch {
            '\'' => escaped.push_str("''"),
            '\0' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escape `value` and wrap it in single quotes.
///
/// ```rust
/// use hostbot_db::query_utils::quote;
///
/// assert_eq!(quote("o'neil"), "'o''neil'");
/// ```
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", escape(value))
}

/// Lowercase a user name before it is stored or compared.
///
/// Admin, ban, score and player-id lookups all key on the lowercased name, so every path that
/// touches those tables must go through here or lookups silently miss.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_doubles_quotes_and_drops_nul() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("it's"), "it''s");
        assert_eq!(escape("a\0b"), "ab");
        assert_eq!(escape("''"), "''''");
    }

    #[test]
    fn quote_keeps_terminators_inside_the_literal() {
        let hostile = "x'; DROP TABLE bans; --";
        assert_eq!(quote(hostile), "'x''; DROP TABLE bans; --'");
    }

    #[test]
    fn normalize_name_lowercases() {
        assert_eq!(normalize_name("FooBar"), "foobar");
        assert_eq!(normalize_name("ÄDMIN"), "ädmin");
    }
}
