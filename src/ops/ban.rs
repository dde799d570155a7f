use chrono::{NaiveDate, NaiveDateTime};

use crate::query_utils::{normalize_name, quote};
use crate::results::TextRow;
use crate::task::{Operation, OperationKind, Runner};

use super::model::{BanRecord, DATETIME_FORMAT, PERMANENT_BAN_SENTINEL};
use super::required_row;

const BAN_COLUMNS: &str = "name, ip, date, gamename, admin, reason, expiredate";

fn unexpired() -> String {
    format!("(expiredate = '{PERMANENT_BAN_SENTINEL}' OR expiredate >= datetime('now'))")
}

fn ban_from_row(server: &str, row: &TextRow) -> BanRecord {
    let expiry = row.text(6);
    BanRecord {
        server: server.to_string(),
        name: row.string(0),
        ip: row.string(1),
        date: NaiveDate::parse_from_str(row.text(2), "%Y-%m-%d").ok(),
        game_name: row.string(3),
        admin: row.string(4),
        reason: row.string(5),
        expires: if expiry == PERMANENT_BAN_SENTINEL {
            None
        } else {
            NaiveDateTime::parse_from_str(expiry, DATETIME_FORMAT).ok()
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanCount {
    pub server: String,
}

impl Operation for BanCount {
    const KIND: OperationKind = OperationKind::BanCount;
    type Output = u32;

    fn fallback(&self) -> u32 {
        0
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let sql = format!(
            "SELECT COUNT(*) FROM bans WHERE server={}",
            quote(&self.server)
        );
        let what = format!("counting bans [{}]", self.server);
        required_row(runner, &sql, 1, &what).map_or(0, |row| row.u32(0))
    }
}

/// Active ban on a user, or on their IP address when one is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanCheck {
    pub server: String,
    pub user: String,
    /// Empty to match on server and name only.
    pub ip: String,
}

impl Operation for BanCheck {
    const KIND: OperationKind = OperationKind::BanCheck;
    type Output = Option<BanRecord>;

    fn fallback(&self) -> Self::Output {
        None
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let by_name = format!(
            "server={} AND name={}",
            quote(&self.server),
            quote(&normalize_name(&self.user))
        );
        let matcher = if self.ip.is_empty() {
            by_name
        } else {
            format!("(({by_name}) OR ip={})", quote(&self.ip))
        };
        let sql = format!(
            "SELECT {BAN_COLUMNS} FROM bans WHERE {matcher} AND {} LIMIT 1",
            unexpired()
        );
        let rows = runner.query(&sql)?;
        rows.rows_of_width(7)
            .next()
            .map(|row| ban_from_row(&self.server, row))
    }
}

/// Ban a user. A `length_secs` of zero bans permanently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanAdd {
    pub server: String,
    pub user: String,
    pub ip: String,
    pub game_name: String,
    pub admin: String,
    pub reason: String,
    pub length_secs: u32,
}

impl Operation for BanAdd {
    const KIND: OperationKind = OperationKind::BanAdd;
    type Output = bool;

    fn fallback(&self) -> bool {
        false
    }

    fn run(self, runner: &mut Runner<'_>) -> bool {
        let expires = if self.length_secs == 0 {
            format!("'{PERMANENT_BAN_SENTINEL}'")
        } else {
            format!("datetime('now', '+{} seconds')", self.length_secs)
        };
        let sql = format!(
            "INSERT INTO bans ( botid, server, name, ip, date, gamename, admin, reason, expiredate ) \
             VALUES ( {}, {}, {}, {}, date('now'), {}, {}, {}, {expires} )",
            runner.bot_id(),
            quote(&self.server),
            quote(&normalize_name(&self.user)),
            quote(&self.ip),
            quote(&self.game_name),
            quote(&self.admin),
            quote(&self.reason),
        );
        runner.execute(&sql).is_some()
    }
}

/// Lift bans on a user, on one server or on all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRemove {
    /// `None` removes the user's bans on every server.
    pub server: Option<String>,
    pub user: String,
}

impl Operation for BanRemove {
    const KIND: OperationKind = OperationKind::BanRemove;
    type Output = bool;

    fn fallback(&self) -> bool {
        false
    }

    fn run(self, runner: &mut Runner<'_>) -> bool {
        let name = quote(&normalize_name(&self.user));
        let sql = match &self.server {
            Some(server) => format!(
                "DELETE FROM bans WHERE server={} AND name={name}",
                quote(server)
            ),
            None => format!("DELETE FROM bans WHERE name={name}"),
        };
        runner.execute(&sql).is_some()
    }
}

/// Every unexpired ban on a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanList {
    pub server: String,
}

impl Operation for BanList {
    const KIND: OperationKind = OperationKind::BanList;
    type Output = Vec<BanRecord>;

    fn fallback(&self) -> Self::Output {
        Vec::new()
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let sql = format!(
            "SELECT {BAN_COLUMNS} FROM bans WHERE server={} AND {} ORDER BY id",
            quote(&self.server),
            unexpired()
        );
        let Some(rows) = runner.query(&sql) else {
            return Vec::new();
        };
        rows.rows_of_width(7)
            .map(|row| ban_from_row(&self.server, row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> TextRow {
        TextRow::new(fields.iter().map(|f| Some((*f).to_string())).collect())
    }

    #[test]
    fn sentinel_expiry_is_permanent() {
        let ban = ban_from_row(
            "europe",
            &row(&["bob", "", "2024-05-01", "dota", "admin", "flame", PERMANENT_BAN_SENTINEL]),
        );
        assert!(ban.is_permanent());
        assert_eq!(ban.date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn timed_ban_keeps_expiry() {
        let ban = ban_from_row(
            "europe",
            &row(&["bob", "1.2.3.4", "2024-05-01", "", "", "", "2024-05-02 10:00:00"]),
        );
        let expected = NaiveDate::from_ymd_opt(2024, 5, 2).and_then(|d| d.and_hms_opt(10, 0, 0));
        assert_eq!(ban.expires, expected);
        assert_eq!(ban.ip, "1.2.3.4");
    }
}
