//! Writes that record a finished game and what happened in it.

use crate::query_utils::{normalize_name, quote};
use crate::task::{Operation, OperationKind, Runner};

use super::model::{DotaPlayerRecord, FinishedGame, MapDownload, NewGamePlayer};
use super::row_id;

fn joined_log(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// Store a finished game over its reserved row, then its lobby and game logs.
///
/// The two statements are independent: a failed update still writes the logs. The result is
/// the game id that was passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameAdd {
    pub game: FinishedGame,
}

impl Operation for GameAdd {
    const KIND: OperationKind = OperationKind::GameAdd;
    type Output = u32;

    fn fallback(&self) -> u32 {
        self.game.game_id
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let g = &self.game;
        let update = format!(
            "UPDATE games SET gamestatus = 1, server={}, map={}, datetime=datetime('now'), \
             gamename={}, ownername={}, duration={}, gamestate={}, creatorname={}, \
             creatorserver={}, alias_id={}, elochange={} WHERE id={}",
            quote(&g.server),
            quote(&g.map),
            quote(&g.game_name),
            quote(&g.owner_name),
            g.duration,
            g.game_state,
            quote(&g.creator_name),
            quote(&g.creator_server),
            g.alias_id,
            quote(&g.elo_change),
            g.game_id,
        );
        runner.execute(&update);

        let logs = format!(
            "INSERT INTO lobby_game_logs ( gameid, botid, lobbylog, gamelog ) VALUES ( {}, {}, {}, {} )",
            g.game_id,
            runner.bot_id(),
            quote(&joined_log(&g.lobby_log)),
            quote(&joined_log(&g.game_log)),
        );
        runner.execute(&logs);

        g.game_id
    }
}

/// One player's row for a finished game. Returns the new row id, 0 on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePlayerAdd {
    pub player: NewGamePlayer,
}

impl Operation for GamePlayerAdd {
    const KIND: OperationKind = OperationKind::GamePlayerAdd;
    type Output = u32;

    fn fallback(&self) -> u32 {
        0
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let p = &self.player;
        let sql = format!(
            "INSERT INTO gameplayers ( botid, player_id, gameid, name, ip, spoofed, reserved, \
             loadingtime, \"left\", leftreason, team, colour, spoofedrealm ) \
             VALUES ( {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {} )",
            runner.bot_id(),
            p.player_id,
            p.game_id,
            quote(&normalize_name(&p.name)),
            quote(&p.ip),
            p.spoofed,
            p.reserved,
            p.loading_time,
            p.left,
            quote(&p.left_reason),
            p.team,
            p.colour,
            quote(&p.spoofed_realm),
        );
        runner
            .execute(&sql)
            .map_or(0, |outcome| row_id(outcome.last_insert_id))
    }
}

/// Rename a game that is still in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateGameInfo {
    pub game_id: u32,
    pub game_name: String,
}

impl Operation for UpdateGameInfo {
    const KIND: OperationKind = OperationKind::UpdateGameInfo;
    type Output = ();

    fn fallback(&self) {}

    fn run(self, runner: &mut Runner<'_>) {
        let sql = format!(
            "UPDATE games SET gamename={} WHERE id={}",
            quote(&self.game_name),
            self.game_id
        );
        runner.execute(&sql);
    }
}

/// Match result: `winner` is 1 for the first team, 2 for the second, 0 for a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotaGameAdd {
    pub game_id: u32,
    pub winner: u32,
    pub min: u32,
    pub sec: u32,
}

impl Operation for DotaGameAdd {
    const KIND: OperationKind = OperationKind::DotaGameAdd;
    type Output = u32;

    fn fallback(&self) -> u32 {
        0
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let sql = format!(
            "INSERT INTO dotagames ( botid, gameid, winner, min, sec ) VALUES ( {}, {}, {}, {}, {} )",
            runner.bot_id(),
            self.game_id,
            self.winner,
            self.min,
            self.sec
        );
        runner
            .execute(&sql)
            .map_or(0, |outcome| row_id(outcome.last_insert_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotaPlayerAdd {
    pub record: DotaPlayerRecord,
}

impl Operation for DotaPlayerAdd {
    const KIND: OperationKind = OperationKind::DotaPlayerAdd;
    type Output = u32;

    fn fallback(&self) -> u32 {
        0
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let r = &self.record;
        let items: Vec<String> = r.items.iter().map(|item| quote(item)).collect();
        let spells: Vec<String> = r.spells.iter().map(|spell| quote(spell)).collect();
        let sql = format!(
            "INSERT INTO dotaplayers ( botid, gameid, colour, kills, deaths, creepkills, \
             creepdenies, assists, gold, neutralkills, item1, item2, item3, item4, item5, item6, \
             spell1, spell2, spell3, spell4, spell5, spell6, hero, newcolour, towerkills, \
             raxkills, courierkills, level ) \
             VALUES ( {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {} )",
            runner.bot_id(),
            r.game_id,
            r.colour,
            r.kills,
            r.deaths,
            r.creep_kills,
            r.creep_denies,
            r.assists,
            r.gold,
            r.neutral_kills,
            items.join(", "),
            spells.join(", "),
            quote(&r.hero),
            r.new_colour,
            r.tower_kills,
            r.rax_kills,
            r.courier_kills,
            r.level,
        );
        runner
            .execute(&sql)
            .map_or(0, |outcome| row_id(outcome.last_insert_id))
    }
}

/// Audit entry for a map transferred to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAdd {
    pub download: MapDownload,
}

impl Operation for DownloadAdd {
    const KIND: OperationKind = OperationKind::DownloadAdd;
    type Output = bool;

    fn fallback(&self) -> bool {
        false
    }

    fn run(self, runner: &mut Runner<'_>) -> bool {
        let d = &self.download;
        let sql = format!(
            "INSERT INTO downloads ( botid, map, mapsize, datetime, name, ip, spoofed, \
             spoofedrealm, downloadtime ) \
             VALUES ( {}, {}, {}, datetime('now'), {}, {}, {}, {}, {} )",
            runner.bot_id(),
            quote(&d.map),
            d.map_size,
            quote(&d.name),
            quote(&d.ip),
            d.spoofed,
            quote(&d.spoofed_realm),
            d.download_time,
        );
        runner.execute(&sql).is_some()
    }
}
