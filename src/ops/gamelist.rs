use crate::query_utils::quote;
use crate::task::{Operation, OperationKind, Runner};

use super::model::GameListEntry;

/// Publish or withdraw a hosted game on the public game list.
///
/// Rows are keyed by (bot id, host counter). A non-empty game name upserts the row; an empty
/// one deletes it together with this bot's lobby rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameListUpdate {
    pub entry: GameListEntry,
}

impl GameListUpdate {
    fn statement(&self, bot_id: u32) -> String {
        let e = &self.entry;
        if e.game_name.is_empty() {
            return format!(
                "DELETE FROM gamelist WHERE botid = {bot_id} AND ( gameid = {} OR lobby = 1 )",
                e.host_counter
            );
        }
        let lobby = u32::from(e.lobby);
        format!(
            "INSERT INTO gamelist ( botid, gameid, lobby, map_type, duration, gamename, ownername, \
             creatorname, map, players, total, users ) \
             VALUES ( {bot_id}, {}, {lobby}, {}, {}, {}, {}, {}, {}, {}, {}, {} ) \
             ON CONFLICT ( botid, gameid ) DO UPDATE SET lobby = excluded.lobby, \
             duration = excluded.duration, ownername = excluded.ownername, \
             players = excluded.players, total = excluded.total, users = excluded.users",
            e.host_counter,
            quote(&e.map_type),
            e.duration,
            quote(&e.game_name),
            quote(&e.owner_name),
            quote(&e.creator_name),
            quote(&e.map),
            e.players,
            e.total,
            quote(&e.encoded_players()),
        )
    }
}

impl Operation for GameListUpdate {
    const KIND: OperationKind = OperationKind::GameListUpdate;
    type Output = bool;

    fn fallback(&self) -> bool {
        false
    }

    fn run(self, runner: &mut Runner<'_>) -> bool {
        let sql = self.statement(runner.bot_id());
        runner.execute(&sql).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_deletes_row_and_lobbies() {
        let op = GameListUpdate {
            entry: GameListEntry {
                host_counter: 12,
                ..GameListEntry::default()
            },
        };
        assert_eq!(
            op.statement(3),
            "DELETE FROM gamelist WHERE botid = 3 AND ( gameid = 12 OR lobby = 1 )"
        );
    }

    #[test]
    fn named_game_upserts_on_host_counter() {
        let op = GameListUpdate {
            entry: GameListEntry {
                host_counter: 12,
                lobby: true,
                game_name: "dota -ap".into(),
                ..GameListEntry::default()
            },
        };
        let sql = op.statement(3);
        assert!(sql.starts_with("INSERT INTO gamelist"));
        assert!(sql.contains("VALUES ( 3, 12, 1, "));
        assert!(sql.contains("ON CONFLICT ( botid, gameid ) DO UPDATE"));
    }
}
