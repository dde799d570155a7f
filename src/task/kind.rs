use std::fmt;

use serde::Serialize;

/// Tag naming which statement contract a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    AdminCount,
    AdminCheck,
    AdminAdd,
    AdminRemove,
    AdminList,
    BanCount,
    BanCheck,
    BanAdd,
    BanRemove,
    BanList,
    GameAdd,
    GamePlayerAdd,
    GamePlayerSummaryCheck,
    UpdateGameInfo,
    DotaGameAdd,
    DotaPlayerAdd,
    DotaPlayerSummaryCheck,
    DownloadAdd,
    ScoreCheck,
    PlayerScore,
    PlayerStats,
    W3mmdPlayerAdd,
    W3mmdVarAdd,
    GetPlayerId,
    CreatePlayerId,
    ReserveGameId,
    BotConfigs,
    BotConfigTexts,
    Languages,
    MapConfig,
    Aliases,
    StatsTemplates,
    GameListUpdate,
}

impl OperationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::AdminCount => "admin_count",
            OperationKind::AdminCheck => "admin_check",
            OperationKind::AdminAdd => "admin_add",
            OperationKind::AdminRemove => "admin_remove",
            OperationKind::AdminList => "admin_list",
            OperationKind::BanCount => "ban_count",
            OperationKind::BanCheck => "ban_check",
            OperationKind::BanAdd => "ban_add",
            OperationKind::BanRemove => "ban_remove",
            OperationKind::BanList => "ban_list",
            OperationKind::GameAdd => "game_add",
            OperationKind::GamePlayerAdd => "game_player_add",
            OperationKind::GamePlayerSummaryCheck => "game_player_summary_check",
            OperationKind::UpdateGameInfo => "update_game_info",
            OperationKind::DotaGameAdd => "dota_game_add",
            OperationKind::DotaPlayerAdd => "dota_player_add",
            OperationKind::DotaPlayerSummaryCheck => "dota_player_summary_check",
            OperationKind::DownloadAdd => "download_add",
            OperationKind::ScoreCheck => "score_check",
            OperationKind::PlayerScore => "player_score",
            OperationKind::PlayerStats => "player_stats",
            OperationKind::W3mmdPlayerAdd => "w3mmd_player_add",
            OperationKind::W3mmdVarAdd => "w3mmd_var_add",
            OperationKind::GetPlayerId => "get_player_id",
            OperationKind::CreatePlayerId => "create_player_id",
            OperationKind::ReserveGameId => "reserve_game_id",
            OperationKind::BotConfigs => "bot_configs",
            OperationKind::BotConfigTexts => "bot_config_texts",
            OperationKind::Languages => "languages",
            OperationKind::MapConfig => "map_config",
            OperationKind::Aliases => "aliases",
            OperationKind::StatsTemplates => "stats_templates",
            OperationKind::GameListUpdate => "game_list_update",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
