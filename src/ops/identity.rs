//! Allocation of player and game identifiers.

use crate::query_utils::{normalize_name, quote};
use crate::task::{Operation, OperationKind, Runner};

use super::{optional_row, row_id};

/// Name given to a games row that has been reserved but not yet played.
pub const RESERVED_GAME_NAME: &str = "RESERVED";

/// Id of a known player, 0 when the name has never been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPlayerId {
    pub user: String,
}

impl Operation for GetPlayerId {
    const KIND: OperationKind = OperationKind::GetPlayerId;
    type Output = u32;

    fn fallback(&self) -> u32 {
        0
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let name = normalize_name(&self.user);
        let sql = format!(
            "SELECT id FROM stats_players WHERE player_lower = {}",
            quote(&name)
        );
        let what = format!("looking up player id [{name}]");
        optional_row(runner, &sql, 1, &what).map_or(0, |row| row.u32(0))
    }
}

/// Register a player. The display name is kept as typed next to its lowercase key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlayerId {
    pub user: String,
    pub ip: String,
    pub realm: String,
}

impl Operation for CreatePlayerId {
    const KIND: OperationKind = OperationKind::CreatePlayerId;
    type Output = u32;

    fn fallback(&self) -> u32 {
        0
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let sql = format!(
            "INSERT INTO stats_players ( player, player_lower, ip, realm, player_language ) \
             VALUES ( {}, {}, {}, {}, 'en' )",
            quote(&self.user),
            quote(&normalize_name(&self.user)),
            quote(&self.ip),
            quote(&self.realm)
        );
        runner
            .execute(&sql)
            .map_or(0, |outcome| row_id(outcome.last_insert_id))
    }
}

/// Id for the next hosted game.
///
/// Reuses this bot's reserved, unplayed row when there is one; otherwise inserts a new
/// reserved row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReserveGameId;

impl Operation for ReserveGameId {
    const KIND: OperationKind = OperationKind::ReserveGameId;
    type Output = u32;

    fn fallback(&self) -> u32 {
        0
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let bot_id = runner.bot_id();
        let select = format!(
            "SELECT id FROM games WHERE gamename = '{RESERVED_GAME_NAME}' AND gamestatus = 0 \
             AND botid = {bot_id} ORDER BY id LIMIT 1"
        );
        let existing = optional_row(runner, &select, 1, "reserving game id").map_or(0, |row| row.u32(0));
        if existing != 0 {
            return existing;
        }

        let insert = format!(
            "INSERT INTO games ( botid, gamename, gamestatus, datetime ) \
             VALUES ( {bot_id}, '{RESERVED_GAME_NAME}', 0, datetime('now') )"
        );
        runner
            .execute(&insert)
            .map_or(0, |outcome| row_id(outcome.last_insert_id))
    }
}
