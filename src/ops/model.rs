//! Parameter and result records exchanged with the operations catalog.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Expiry value stored for bans that never expire.
pub const PERMANENT_BAN_SENTINEL: &str = "0000-00-00 00:00:00";

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One ban as stored by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    pub server: String,
    pub name: String,
    pub ip: String,
    /// Day the ban was issued; `None` if the stored value did not parse.
    pub date: Option<NaiveDate>,
    pub game_name: String,
    pub admin: String,
    pub reason: String,
    /// `None` for a permanent ban.
    pub expires: Option<NaiveDateTime>,
}

impl BanRecord {
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.expires.is_none()
    }
}

/// Aggregates over every game a player took part in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePlayerSummary {
    pub name: String,
    pub first_game: String,
    pub last_game: String,
    pub total_games: u32,
    pub min_loading_time: u32,
    pub avg_loading_time: u32,
    pub max_loading_time: u32,
    pub min_left_percent: u32,
    pub avg_left_percent: u32,
    pub max_left_percent: u32,
    pub min_duration: u32,
    pub avg_duration: u32,
    pub max_duration: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotaPlayerSummary {
    pub name: String,
    pub total_games: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_kills: u32,
    pub total_deaths: u32,
    pub total_creep_kills: u32,
    pub total_creep_denies: u32,
    pub total_assists: u32,
    pub total_neutral_kills: u32,
    pub total_tower_kills: u32,
    pub total_rax_kills: u32,
    pub total_courier_kills: u32,
}

/// A finished game, written over the row reserved for it by `reserve_game_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedGame {
    pub game_id: u32,
    pub server: String,
    pub map: String,
    pub game_name: String,
    pub owner_name: String,
    pub duration: u32,
    pub game_state: u32,
    pub creator_name: String,
    pub creator_server: String,
    pub alias_id: u32,
    pub lobby_log: Vec<String>,
    pub game_log: Vec<String>,
    pub elo_change: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGamePlayer {
    pub game_id: u32,
    pub player_id: u32,
    pub name: String,
    pub ip: String,
    pub spoofed: u32,
    pub spoofed_realm: String,
    pub reserved: u32,
    pub loading_time: u32,
    pub left: u32,
    pub left_reason: String,
    pub team: u32,
    pub colour: u32,
}

/// End-of-game statistics for one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotaPlayerRecord {
    pub game_id: u32,
    pub colour: u32,
    pub kills: u32,
    pub deaths: u32,
    pub creep_kills: u32,
    pub creep_denies: u32,
    pub assists: u32,
    pub gold: u32,
    pub neutral_kills: u32,
    pub items: [String; 6],
    pub spells: [String; 6],
    pub hero: String,
    pub new_colour: u32,
    pub tower_kills: u32,
    pub rax_kills: u32,
    pub courier_kills: u32,
    pub level: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDownload {
    pub map: String,
    pub map_size: u32,
    pub name: String,
    pub ip: String,
    pub spoofed: u32,
    pub spoofed_realm: String,
    pub download_time: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct W3mmdPlayer {
    pub category: String,
    pub game_id: u32,
    pub pid: u32,
    pub name: String,
    pub flag: String,
    pub leaver: u32,
    pub practicing: u32,
}

/// Key of one W3MMD variable: player slot and variable name.
pub type VarKey = (u32, String);

/// A batch of W3MMD variables of one value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum W3mmdVars {
    Ints(BTreeMap<VarKey, i32>),
    Reals(BTreeMap<VarKey, f64>),
    Strings(BTreeMap<VarKey, String>),
}

impl W3mmdVars {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            W3mmdVars::Ints(vars) => vars.len(),
            W3mmdVars::Reals(vars) => vars.len(),
            W3mmdVars::Strings(vars) => vars.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One occupied slot in a listed game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedPlayer {
    pub slot: u32,
    pub team: u32,
    pub colour: u32,
    pub name: String,
    pub realm: String,
    pub ping: u32,
    pub ip: String,
    pub left_time: u32,
    pub left_reason: String,
}

/// Snapshot of a hosted game for the public game list.
///
/// An empty `game_name` means the game is gone and its row should be removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListEntry {
    pub host_counter: u32,
    pub lobby: bool,
    pub map_type: String,
    pub duration: u32,
    pub game_name: String,
    pub owner_name: String,
    pub creator_name: String,
    pub map: String,
    pub players: u32,
    pub total: u32,
    pub player_list: Vec<ListedPlayer>,
}

impl GameListEntry {
    /// Players encoded as `slot,team,colour,name,realm,ping,ip,left_time,left_reason#` per slot.
    #[must_use]
    pub fn encoded_players(&self) -> String {
        self.player_list
            .iter()
            .map(|p| {
                format!(
                    "{},{},{},{},{},{},{},{},{}#",
                    p.slot,
                    p.team,
                    p.colour,
                    p.name,
                    p.realm,
                    p.ping,
                    p.ip,
                    p.left_time,
                    p.left_reason
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players_encode_with_trailing_separator() {
        let entry = GameListEntry {
            player_list: vec![
                ListedPlayer {
                    slot: 1,
                    team: 0,
                    colour: 2,
                    name: "alice".into(),
                    realm: "europe".into(),
                    ping: 40,
                    ip: "10.0.0.1".into(),
                    ..ListedPlayer::default()
                },
                ListedPlayer {
                    slot: 2,
                    name: "bob".into(),
                    left_reason: "left".into(),
                    left_time: 90,
                    ..ListedPlayer::default()
                },
            ],
            ..GameListEntry::default()
        };
        assert_eq!(
            entry.encoded_players(),
            "1,0,2,alice,europe,40,10.0.0.1,0,#2,0,0,bob,,0,,90,left#"
        );
    }

    #[test]
    fn empty_var_batch() {
        assert!(W3mmdVars::Ints(BTreeMap::new()).is_empty());
        let mut reals = BTreeMap::new();
        reals.insert((1, "apm".to_string()), 120.5);
        assert_eq!(W3mmdVars::Reals(reals).len(), 1);
    }
}
