//! The catalog of database calls a bot makes.
//!
//! Each operation is a plain struct holding its parameters. It builds SQLite-dialect statement
//! text from escaped values and decodes the rows into its typed result. Names that model a
//! player identity are lowercased inside `run`, so callers can pass them as typed.

pub mod admin;
pub mod ban;
pub mod game;
pub mod gamelist;
pub mod identity;
pub mod model;
pub mod settings;
pub mod stats;

pub use admin::{AdminAdd, AdminCheck, AdminCount, AdminList, AdminRemove};
pub use ban::{BanAdd, BanCheck, BanCount, BanList, BanRemove};
pub use game::{DotaGameAdd, DotaPlayerAdd, DownloadAdd, GameAdd, GamePlayerAdd, UpdateGameInfo};
pub use gamelist::GameListUpdate;
pub use identity::{CreatePlayerId, GetPlayerId, ReserveGameId};
pub use model::{
    BanRecord, DotaPlayerRecord, DotaPlayerSummary, FinishedGame, GameListEntry,
    GamePlayerSummary, ListedPlayer, MapDownload, NewGamePlayer, PERMANENT_BAN_SENTINEL, VarKey,
    W3mmdPlayer, W3mmdVars,
};
pub use settings::{Aliases, BotConfigTexts, BotConfigs, Languages, MapConfig, StatsTemplates};
pub use stats::{
    DotaPlayerSummaryCheck, GamePlayerSummaryCheck, PlayerScore, PlayerStats, ScoreCheck,
    W3mmdPlayerAdd, W3mmdVarAdd,
};

use crate::results::TextRow;
use crate::task::Runner;

/// First row of `sql`, which must exist and have `width` columns.
///
/// Anything else is recorded as a shape error. Statement failures are recorded by the runner.
pub(crate) fn required_row(
    runner: &mut Runner<'_>,
    sql: &str,
    width: usize,
    what: &str,
) -> Option<TextRow> {
    let rows = runner.query(sql)?;
    match rows.rows.into_iter().next() {
        Some(row) if row.len() == width => Some(row),
        _ => {
            runner.shape_error(shape_message(what, width));
            None
        }
    }
}

/// First row of `sql` if there is one.
///
/// An empty result is not an error; a row of the wrong width is.
pub(crate) fn optional_row(
    runner: &mut Runner<'_>,
    sql: &str,
    width: usize,
    what: &str,
) -> Option<TextRow> {
    let rows = runner.query(sql)?;
    match rows.rows.into_iter().next() {
        Some(row) if row.len() == width => Some(row),
        Some(_) => {
            runner.shape_error(shape_message(what, width));
            None
        }
        None => None,
    }
}

fn shape_message(what: &str, width: usize) -> String {
    let plural = if width == 1 { "" } else { "s" };
    format!("error {what} - row doesn't have {width} column{plural}")
}

/// Row id from an insert, truncated to the width the bot tracks ids in.
pub(crate) fn row_id(last_insert_id: u64) -> u32 {
    u32::try_from(last_insert_id).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_message_pluralizes() {
        assert_eq!(
            shape_message("counting admins [europe]", 1),
            "error counting admins [europe] - row doesn't have 1 column"
        );
        assert_eq!(
            shape_message("checking gameplayersummary [bob]", 12),
            "error checking gameplayersummary [bob] - row doesn't have 12 columns"
        );
    }

    #[test]
    fn row_id_saturates() {
        assert_eq!(row_id(7), 7);
        assert_eq!(row_id(u64::MAX), u32::MAX);
    }
}
