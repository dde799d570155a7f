//! Per-player statistics: lookups over finished games and W3MMD inserts.

use std::collections::BTreeMap;

use crate::query_utils::{escape, normalize_name, quote};
use crate::task::{Operation, OperationKind, Runner};

use super::model::{DotaPlayerSummary, GamePlayerSummary, W3mmdPlayer, W3mmdVars};
use super::{optional_row, required_row, row_id};

/// Score reported when a player has no score row.
pub const NO_SCORE: f64 = -100_000.0;
/// Rating reported for a player with no stats row under an alias.
pub const DEFAULT_PLAYER_SCORE: f64 = 1000.0;

/// Keys of the map returned by [`PlayerStats`], in column order.
pub const PLAYER_STAT_KEYS: [&str; 23] = [
    "VALUE_01",
    "VALUE_02",
    "VALUE_03",
    "VALUE_04",
    "VALUE_05",
    "VALUE_06",
    "VALUE_07",
    "VALUE_08",
    "VALUE_09",
    "VALUE_10",
    "VALUE_11",
    "VALUE_12",
    "VALUE_13",
    "REALM",
    "STREAK",
    "MAXSTREAK",
    "LOSINGSTREAK",
    "MAXLOSINGSTREAK",
    "ZERODEATHS",
    "WINPRECENTAGE",
    "NAME",
    "STAYPERCENTAGE",
    "PLAYTIME",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePlayerSummaryCheck {
    pub name: String,
}

impl Operation for GamePlayerSummaryCheck {
    const KIND: OperationKind = OperationKind::GamePlayerSummaryCheck;
    type Output = Option<GamePlayerSummary>;

    fn fallback(&self) -> Self::Output {
        None
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let name = normalize_name(&self.name);
        let sql = format!(
            "SELECT MIN(date(datetime)), MAX(date(datetime)), COUNT(*), MIN(loadingtime), \
             AVG(loadingtime), MAX(loadingtime), MIN(\"left\" * 1.0 / duration) * 100, \
             AVG(\"left\" * 1.0 / duration) * 100, MAX(\"left\" * 1.0 / duration) * 100, \
             MIN(duration), AVG(duration), MAX(duration) \
             FROM gameplayers LEFT JOIN games ON games.id = gameplayers.gameid \
             WHERE LOWER(name) = {}",
            quote(&name)
        );
        let what = format!("checking gameplayersummary [{name}]");
        let row = required_row(runner, &sql, 12, &what)?;
        if row.u32(2) == 0 {
            return None;
        }
        Some(GamePlayerSummary {
            first_game: row.string(0),
            last_game: row.string(1),
            total_games: row.u32(2),
            min_loading_time: row.u32(3),
            avg_loading_time: row.u32(4),
            max_loading_time: row.u32(5),
            min_left_percent: row.u32(6),
            avg_left_percent: row.u32(7),
            max_left_percent: row.u32(8),
            min_duration: row.u32(9),
            avg_duration: row.u32(10),
            max_duration: row.u32(11),
            name,
        })
    }
}

/// Lifetime match totals for a player: totals, then wins, then losses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotaPlayerSummaryCheck {
    pub name: String,
}

const DOTA_JOINS: &str = "FROM gameplayers \
     LEFT JOIN games ON games.id = gameplayers.gameid \
     LEFT JOIN dotaplayers ON dotaplayers.gameid = games.id AND dotaplayers.colour = gameplayers.colour";

impl Operation for DotaPlayerSummaryCheck {
    const KIND: OperationKind = OperationKind::DotaPlayerSummaryCheck;
    type Output = Option<DotaPlayerSummary>;

    fn fallback(&self) -> Self::Output {
        None
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let name = normalize_name(&self.name);
        let quoted = quote(&name);
        let totals = format!(
            "SELECT COUNT(dotaplayers.id), SUM(kills), SUM(deaths), SUM(creepkills), \
             SUM(creepdenies), SUM(assists), SUM(neutralkills), SUM(towerkills), SUM(raxkills), \
             SUM(courierkills) {DOTA_JOINS} WHERE LOWER(name) = {quoted}"
        );
        let row = required_row(
            runner,
            &totals,
            10,
            &format!("checking dotaplayersummary [{name}]"),
        )?;
        let total_games = row.u32(0);
        if total_games == 0 {
            return None;
        }

        let outcome_count = |runner: &mut Runner<'_>, team_one: u32, what: &str| {
            let team_two = 3 - team_one;
            let sql = format!(
                "SELECT COUNT(*) {DOTA_JOINS} \
                 LEFT JOIN dotagames ON games.id = dotagames.gameid WHERE name = {quoted} \
                 AND ((winner = {team_one} AND dotaplayers.newcolour >= 1 AND dotaplayers.newcolour <= 5) \
                 OR (winner = {team_two} AND dotaplayers.newcolour >= 7 AND dotaplayers.newcolour <= 11))"
            );
            let what = format!("checking dotaplayersummary {what} [{name}]");
            required_row(runner, &sql, 1, &what).map_or(0, |row| row.u32(0))
        };
        let total_wins = outcome_count(runner, 1, "wins");
        let total_losses = outcome_count(runner, 2, "losses");

        Some(DotaPlayerSummary {
            name: name.clone(),
            total_games,
            total_wins,
            total_losses,
            total_kills: row.u32(1),
            total_deaths: row.u32(2),
            total_creep_kills: row.u32(3),
            total_creep_denies: row.u32(4),
            total_assists: row.u32(5),
            total_neutral_kills: row.u32(6),
            total_tower_kills: row.u32(7),
            total_rax_kills: row.u32(8),
            total_courier_kills: row.u32(9),
        })
    }
}

/// Score in a category, or [`NO_SCORE`] if the player has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCheck {
    pub category: String,
    pub name: String,
    pub server: String,
}

impl Operation for ScoreCheck {
    const KIND: OperationKind = OperationKind::ScoreCheck;
    type Output = f64;

    fn fallback(&self) -> f64 {
        NO_SCORE
    }

    fn run(self, runner: &mut Runner<'_>) -> f64 {
        let sql = format!(
            "SELECT score FROM scores WHERE category={} AND name={} AND server={}",
            quote(&self.category),
            quote(&normalize_name(&self.name)),
            quote(&self.server)
        );
        let what = format!(
            "checking score [{} : {} : {}]",
            self.category, self.name, self.server
        );
        optional_row(runner, &sql, 1, &what).map_or(NO_SCORE, |row| row.f64(0))
    }
}

/// Rating of a player under one alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScore {
    pub alias_id: u32,
    pub player_id: u32,
}

impl Operation for PlayerScore {
    const KIND: OperationKind = OperationKind::PlayerScore;
    type Output = f64;

    fn fallback(&self) -> f64 {
        DEFAULT_PLAYER_SCORE
    }

    fn run(self, runner: &mut Runner<'_>) -> f64 {
        let sql = format!(
            "SELECT score FROM stats_global WHERE alias_id = {} AND pid = {}",
            self.alias_id, self.player_id
        );
        let what = format!("checking player score [{}]", self.player_id);
        optional_row(runner, &sql, 1, &what).map_or(DEFAULT_PLAYER_SCORE, |row| row.f64(0))
    }
}

/// Named stat values for a player, keyed by [`PLAYER_STAT_KEYS`].
///
/// An `alias_id` of 0 aggregates the player's rows across every alias. NULL columns read as
/// empty strings; no row at all yields an empty map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub alias_id: u32,
    pub player_id: u32,
}

impl Operation for PlayerStats {
    const KIND: OperationKind = OperationKind::PlayerStats;
    type Output = BTreeMap<String, String>;

    fn fallback(&self) -> Self::Output {
        BTreeMap::new()
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let sql = if self.alias_id != 0 {
            format!(
                "SELECT games, score, wins, losses, draw, kills, deaths, assists, creeps, denies, \
                 neutrals, towers, rax, realm, streak, maxstreak, losingstreak, maxlosingstreak, \
                 zerodeaths, ROUND(wins * 100.0 / games, 2), player, leaver, playtime \
                 FROM stats_global WHERE alias_id = {} AND pid = {}",
                self.alias_id, self.player_id
            )
        } else {
            format!(
                "SELECT SUM(games), SUM(score), SUM(wins), SUM(losses), SUM(draw), SUM(kills), \
                 SUM(deaths), SUM(assists), SUM(creeps), SUM(denies), SUM(neutrals), SUM(towers), \
                 SUM(rax), realm, MAX(streak), MAX(maxstreak), MAX(losingstreak), \
                 MAX(maxlosingstreak), SUM(zerodeaths), ROUND(SUM(wins) * 100.0 / SUM(games), 2), \
                 player, SUM(leaver), SUM(playtime) \
                 FROM stats_global WHERE pid = {} GROUP BY pid",
                self.player_id
            )
        };
        let what = format!("checking player stats [{}]", self.player_id);
        let Some(row) = optional_row(runner, &sql, PLAYER_STAT_KEYS.len(), &what) else {
            return BTreeMap::new();
        };
        PLAYER_STAT_KEYS
            .iter()
            .enumerate()
            .map(|(i, key)| ((*key).to_string(), row.string(i)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct W3mmdPlayerAdd {
    pub player: W3mmdPlayer,
}

impl Operation for W3mmdPlayerAdd {
    const KIND: OperationKind = OperationKind::W3mmdPlayerAdd;
    type Output = u32;

    fn fallback(&self) -> u32 {
        0
    }

    fn run(self, runner: &mut Runner<'_>) -> u32 {
        let p = &self.player;
        let sql = format!(
            "INSERT INTO w3mmdplayers ( botid, category, gameid, pid, name, flag, leaver, practicing ) \
             VALUES ( {}, {}, {}, {}, {}, {}, {}, {} )",
            runner.bot_id(),
            quote(&p.category),
            p.game_id,
            p.pid,
            quote(&normalize_name(&p.name)),
            quote(&p.flag),
            p.leaver,
            p.practicing,
        );
        runner
            .execute(&sql)
            .map_or(0, |outcome| row_id(outcome.last_insert_id))
    }
}

/// Insert a batch of W3MMD variables as one multi-row statement.
///
/// An empty batch runs nothing and reports `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct W3mmdVarAdd {
    pub game_id: u32,
    pub vars: W3mmdVars,
}

impl W3mmdVarAdd {
    fn statement(&self, bot_id: u32) -> Option<String> {
        let (column, values): (&str, Vec<String>) = match &self.vars {
            W3mmdVars::Ints(vars) => (
                "value_int",
                vars.iter()
                    .map(|((pid, name), value)| self.values_row(bot_id, *pid, name, &value.to_string()))
                    .collect(),
            ),
            W3mmdVars::Reals(vars) => (
                "value_real",
                vars.iter()
                    .map(|((pid, name), value)| {
                        let literal = if value.is_finite() {
                            value.to_string()
                        } else {
                            "NULL".to_string()
                        };
                        self.values_row(bot_id, *pid, name, &literal)
                    })
                    .collect(),
            ),
            W3mmdVars::Strings(vars) => (
                "value_string",
                vars.iter()
                    .map(|((pid, name), value)| self.values_row(bot_id, *pid, name, &quote(value)))
                    .collect(),
            ),
        };
        if values.is_empty() {
            return None;
        }
        Some(format!(
            "INSERT INTO w3mmdvars ( botid, gameid, pid, varname, {column} ) VALUES {}",
            values.join(", ")
        ))
    }

    fn values_row(&self, bot_id: u32, pid: u32, name: &str, literal: &str) -> String {
        format!(
            "( {bot_id}, {}, {pid}, '{}', {literal} )",
            self.game_id,
            escape(name)
        )
    }
}

impl Operation for W3mmdVarAdd {
    const KIND: OperationKind = OperationKind::W3mmdVarAdd;
    type Output = bool;

    fn fallback(&self) -> bool {
        false
    }

    fn run(self, runner: &mut Runner<'_>) -> bool {
        match self.statement(runner.bot_id()) {
            Some(sql) => runner.execute(&sql).is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_batch_is_one_statement() {
        let mut vars = BTreeMap::new();
        vars.insert((1, "kills".to_string()), 3);
        vars.insert((2, "it's".to_string()), -1);
        let op = W3mmdVarAdd {
            game_id: 9,
            vars: W3mmdVars::Ints(vars),
        };
        assert_eq!(
            op.statement(4).as_deref(),
            Some(
                "INSERT INTO w3mmdvars ( botid, gameid, pid, varname, value_int ) VALUES \
                 ( 4, 9, 1, 'kills', 3 ), ( 4, 9, 2, 'it''s', -1 )"
            )
        );
    }

    #[test]
    fn empty_batch_has_no_statement() {
        let op = W3mmdVarAdd {
            game_id: 1,
            vars: W3mmdVars::Strings(BTreeMap::new()),
        };
        assert!(op.statement(0).is_none());
    }

    #[test]
    fn non_finite_reals_become_null() {
        let mut vars = BTreeMap::new();
        vars.insert((1, "apm".to_string()), f64::NAN);
        let op = W3mmdVarAdd {
            game_id: 1,
            vars: W3mmdVars::Reals(vars),
        };
        assert!(op.statement(0).is_some_and(|sql| sql.ends_with("'apm', NULL )")));
    }

    #[test]
    fn stat_keys_cover_every_column() {
        assert_eq!(PLAYER_STAT_KEYS.len(), 23);
        assert_eq!(PLAYER_STAT_KEYS[20], "NAME");
    }
}
