//! One submitting method per operation kind.

use crate::ops::{
    AdminAdd, AdminCheck, AdminCount, AdminList, AdminRemove, Aliases, BanAdd, BanCheck, BanCount,
    BanList, BanRemove, BotConfigTexts, BotConfigs, CreatePlayerId, DotaGameAdd, DotaPlayerAdd,
    DotaPlayerRecord, DotaPlayerSummaryCheck, DownloadAdd, FinishedGame, GameAdd, GameListEntry,
    GameListUpdate, GamePlayerAdd, GamePlayerSummaryCheck, GetPlayerId, Languages, MapConfig,
    MapDownload, NewGamePlayer, PlayerScore, PlayerStats, ReserveGameId, ScoreCheck,
    StatsTemplates, UpdateGameInfo, W3mmdPlayer, W3mmdPlayerAdd, W3mmdVarAdd, W3mmdVars,
};
use crate::task::Task;

use super::Database;

impl Database {
    pub fn admin_count(&mut self, server: &str) -> Task<AdminCount> {
        self.submit(AdminCount {
            server: server.to_string(),
        })
    }

    pub fn admin_check(&mut self, server: &str, user: &str) -> Task<AdminCheck> {
        self.submit(AdminCheck {
            server: server.to_string(),
            user: user.to_string(),
        })
    }

    pub fn admin_add(&mut self, server: &str, user: &str) -> Task<AdminAdd> {
        self.submit(AdminAdd {
            server: server.to_string(),
            user: user.to_string(),
        })
    }

    pub fn admin_remove(&mut self, server: &str, user: &str) -> Task<AdminRemove> {
        self.submit(AdminRemove {
            server: server.to_string(),
            user: user.to_string(),
        })
    }

    pub fn admin_list(&mut self, server: &str) -> Task<AdminList> {
        self.submit(AdminList {
            server: server.to_string(),
        })
    }

    pub fn ban_count(&mut self, server: &str) -> Task<BanCount> {
        self.submit(BanCount {
            server: server.to_string(),
        })
    }

    /// Pass an empty `ip` to match on server and name only.
    pub fn ban_check(&mut self, server: &str, user: &str, ip: &str) -> Task<BanCheck> {
        self.submit(BanCheck {
            server: server.to_string(),
            user: user.to_string(),
            ip: ip.to_string(),
        })
    }

    /// Ban `user`; a `length_secs` of zero is permanent.
    #[allow(clippy::too_many_arguments)]
    pub fn ban_add(
        &mut self,
        server: &str,
        user: &str,
        ip: &str,
        game_name: &str,
        admin: &str,
        reason: &str,
        length_secs: u32,
    ) -> Task<BanAdd> {
        self.submit(BanAdd {
            server: server.to_string(),
            user: user.to_string(),
            ip: ip.to_string(),
            game_name: game_name.to_string(),
            admin: admin.to_string(),
            reason: reason.to_string(),
            length_secs,
        })
    }

    pub fn ban_remove(&mut self, server: &str, user: &str) -> Task<BanRemove> {
        self.submit(BanRemove {
            server: Some(server.to_string()),
            user: user.to_string(),
        })
    }

    pub fn ban_remove_everywhere(&mut self, user: &str) -> Task<BanRemove> {
        self.submit(BanRemove {
            server: None,
            user: user.to_string(),
        })
    }

    pub fn ban_list(&mut self, server: &str) -> Task<BanList> {
        self.submit(BanList {
            server: server.to_string(),
        })
    }

    pub fn game_add(&mut self, game: FinishedGame) -> Task<GameAdd> {
        self.submit(GameAdd { game })
    }

    pub fn game_player_add(&mut self, player: NewGamePlayer) -> Task<GamePlayerAdd> {
        self.submit(GamePlayerAdd { player })
    }

    pub fn game_player_summary_check(&mut self, name: &str) -> Task<GamePlayerSummaryCheck> {
        self.submit(GamePlayerSummaryCheck {
            name: name.to_string(),
        })
    }

    pub fn update_game_info(&mut self, game_id: u32, game_name: &str) -> Task<UpdateGameInfo> {
        self.submit(UpdateGameInfo {
            game_id,
            game_name: game_name.to_string(),
        })
    }

    pub fn dota_game_add(&mut self, game_id: u32, winner: u32, min: u32, sec: u32) -> Task<DotaGameAdd> {
        self.submit(DotaGameAdd {
            game_id,
            winner,
            min,
            sec,
        })
    }

    pub fn dota_player_add(&mut self, record: DotaPlayerRecord) -> Task<DotaPlayerAdd> {
        self.submit(DotaPlayerAdd { record })
    }

    pub fn dota_player_summary_check(&mut self, name: &str) -> Task<DotaPlayerSummaryCheck> {
        self.submit(DotaPlayerSummaryCheck {
            name: name.to_string(),
        })
    }

    pub fn download_add(&mut self, download: MapDownload) -> Task<DownloadAdd> {
        self.submit(DownloadAdd { download })
    }

    pub fn score_check(&mut self, category: &str, name: &str, server: &str) -> Task<ScoreCheck> {
        self.submit(ScoreCheck {
            category: category.to_string(),
            name: name.to_string(),
            server: server.to_string(),
        })
    }

    pub fn player_score(&mut self, alias_id: u32, player_id: u32) -> Task<PlayerScore> {
        self.submit(PlayerScore {
            alias_id,
            player_id,
        })
    }

    /// Pass an `alias_id` of 0 to aggregate across aliases.
    pub fn player_stats(&mut self, alias_id: u32, player_id: u32) -> Task<PlayerStats> {
        self.submit(PlayerStats {
            alias_id,
            player_id,
        })
    }

    pub fn w3mmd_player_add(&mut self, player: W3mmdPlayer) -> Task<W3mmdPlayerAdd> {
        self.submit(W3mmdPlayerAdd { player })
    }

    pub fn w3mmd_var_add(&mut self, game_id: u32, vars: W3mmdVars) -> Task<W3mmdVarAdd> {
        self.submit(W3mmdVarAdd { game_id, vars })
    }

    pub fn player_id(&mut self, user: &str) -> Task<GetPlayerId> {
        self.submit(GetPlayerId {
            user: user.to_string(),
        })
    }

    pub fn create_player_id(&mut self, user: &str, ip: &str, realm: &str) -> Task<CreatePlayerId> {
        self.submit(CreatePlayerId {
            user: user.to_string(),
            ip: ip.to_string(),
            realm: realm.to_string(),
        })
    }

    pub fn reserve_game_id(&mut self) -> Task<ReserveGameId> {
        self.submit(ReserveGameId)
    }

    pub fn bot_configs(&mut self) -> Task<BotConfigs> {
        self.submit(BotConfigs)
    }

    pub fn bot_config_texts(&mut self) -> Task<BotConfigTexts> {
        self.submit(BotConfigTexts)
    }

    pub fn languages(&mut self) -> Task<Languages> {
        self.submit(Languages)
    }

    pub fn map_config(&mut self, name: &str) -> Task<MapConfig> {
        self.submit(MapConfig {
            name: name.to_string(),
        })
    }

    pub fn aliases(&mut self) -> Task<Aliases> {
        self.submit(Aliases)
    }

    pub fn stats_templates(&mut self) -> Task<StatsTemplates> {
        self.submit(StatsTemplates)
    }

    pub fn game_list_update(&mut self, entry: GameListEntry) -> Task<GameListUpdate> {
        self.submit(GameListUpdate { entry })
    }
}
