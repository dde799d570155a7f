use std::collections::BTreeMap;

use crate::query_utils::{normalize_name, quote};
use crate::task::{Operation, OperationKind, Runner};

use super::required_row;

/// Number of admins registered for a realm server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCount {
    pub server: String,
}

impl Operation for AdminCount {
    const KIND: OperationKind = OperationKind::AdminCount;
    type Output = u32;

    fn fallback(&self) -> u32 {
        0
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let sql = format!(
            "SELECT COUNT(*) FROM admins WHERE server={}",
            quote(&self.server)
        );
        let what = format!("counting admins [{}]", self.server);
        required_row(runner, &sql, 1, &what).map_or(0, |row| row.u32(0))
    }
}

/// Whether a user is an admin on a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCheck {
    pub server: String,
    pub user: String,
}

impl Operation for AdminCheck {
    const KIND: OperationKind = OperationKind::AdminCheck;
    type Output = bool;

    fn fallback(&self) -> bool {
        false
    }

    fn run(self, runner: &mut Runner<'_>) -> bool {
        let sql = format!(
            "SELECT name FROM admins WHERE server={} AND name={}",
            quote(&self.server),
            quote(&normalize_name(&self.user))
        );
        runner.query(&sql).is_some_and(|rows| !rows.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAdd {
    pub server: String,
    pub user: String,
}

impl Operation for AdminAdd {
    const KIND: OperationKind = OperationKind::AdminAdd;
    type Output = bool;

    fn fallback(&self) -> bool {
        false
    }

    fn run(self, runner: &mut Runner<'_>) -> bool {
        let sql = format!(
            "INSERT INTO admins ( botid, server, name ) VALUES ( {}, {}, {} )",
            runner.bot_id(),
            quote(&self.server),
            quote(&normalize_name(&self.user))
        );
        runner.execute(&sql).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRemove {
    pub server: String,
    pub user: String,
}

impl Operation for AdminRemove {
    const KIND: OperationKind = OperationKind::AdminRemove;
    type Output = bool;

    fn fallback(&self) -> bool {
        false
    }

    fn run(self, runner: &mut Runner<'_>) -> bool {
        let sql = format!(
            "DELETE FROM admins WHERE server={} AND name={}",
            quote(&self.server),
            quote(&normalize_name(&self.user))
        );
        runner.execute(&sql).is_some()
    }
}

/// Admins of a server, keyed by lowercase name, with their access level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminList {
    pub server: String,
}

impl Operation for AdminList {
    const KIND: OperationKind = OperationKind::AdminList;
    type Output = BTreeMap<String, u32>;

    fn fallback(&self) -> Self::Output {
        BTreeMap::new()
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let sql = format!(
            "SELECT name, level FROM admins WHERE server={} AND level != 0",
            quote(&self.server)
        );
        let Some(rows) = runner.query(&sql) else {
            return BTreeMap::new();
        };
        rows.rows_of_width(2)
            .map(|row| (normalize_name(row.text(0)), row.u32(1)))
            .collect()
    }
}
