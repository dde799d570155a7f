/// DDL for every table the operations catalog touches.
///
/// Idempotent: every statement is `IF NOT EXISTS`.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL DEFAULT 0,
    server TEXT NOT NULL,
    name TEXT NOT NULL,
    level INTEGER NOT NULL DEFAULT 1
);
CREATE INDEX IF NOT EXISTS admins_server_name ON admins (server, name);

CREATE TABLE IF NOT EXISTS bans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL DEFAULT 0,
    server TEXT NOT NULL,
    name TEXT NOT NULL,
    ip TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL,
    gamename TEXT NOT NULL DEFAULT '',
    admin TEXT NOT NULL DEFAULT '',
    reason TEXT NOT NULL DEFAULT '',
    expiredate TEXT NOT NULL DEFAULT '0000-00-00 00:00:00'
);
CREATE INDEX IF NOT EXISTS bans_server_name ON bans (server, name);

CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL DEFAULT 0,
    server TEXT NOT NULL DEFAULT '',
    map TEXT NOT NULL DEFAULT '',
    datetime TEXT,
    gamename TEXT NOT NULL DEFAULT '',
    ownername TEXT NOT NULL DEFAULT '',
    duration INTEGER NOT NULL DEFAULT 0,
    gamestate INTEGER NOT NULL DEFAULT 0,
    creatorname TEXT NOT NULL DEFAULT '',
    creatorserver TEXT NOT NULL DEFAULT '',
    alias_id INTEGER NOT NULL DEFAULT 0,
    elochange TEXT NOT NULL DEFAULT '',
    gamestatus INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS lobby_game_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    gameid INTEGER NOT NULL,
    botid INTEGER NOT NULL DEFAULT 0,
    lobbylog TEXT NOT NULL DEFAULT '',
    gamelog TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS gameplayers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL DEFAULT 0,
    player_id INTEGER NOT NULL DEFAULT 0,
    gameid INTEGER NOT NULL,
    name TEXT NOT NULL,
    ip TEXT NOT NULL DEFAULT '',
    spoofed INTEGER NOT NULL DEFAULT 0,
    reserved INTEGER NOT NULL DEFAULT 0,
    loadingtime INTEGER NOT NULL DEFAULT 0,
    "left" INTEGER NOT NULL DEFAULT 0,
    leftreason TEXT NOT NULL DEFAULT '',
    team INTEGER NOT NULL DEFAULT 0,
    colour INTEGER NOT NULL DEFAULT 0,
    spoofedrealm TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS gameplayers_name ON gameplayers (name);

CREATE TABLE IF NOT EXISTS dotagames (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL DEFAULT 0,
    gameid INTEGER NOT NULL,
    winner INTEGER NOT NULL DEFAULT 0,
    min INTEGER NOT NULL DEFAULT 0,
    sec INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS dotaplayers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL DEFAULT 0,
    gameid INTEGER NOT NULL,
    colour INTEGER NOT NULL DEFAULT 0,
    kills INTEGER NOT NULL DEFAULT 0,
    deaths INTEGER NOT NULL DEFAULT 0,
    creepkills INTEGER NOT NULL DEFAULT 0,
    creepdenies INTEGER NOT NULL DEFAULT 0,
    assists INTEGER NOT NULL DEFAULT 0,
    gold INTEGER NOT NULL DEFAULT 0,
    neutralkills INTEGER NOT NULL DEFAULT 0,
    item1 TEXT NOT NULL DEFAULT '',
    item2 TEXT NOT NULL DEFAULT '',
    item3 TEXT NOT NULL DEFAULT '',
    item4 TEXT NOT NULL DEFAULT '',
    item5 TEXT NOT NULL DEFAULT '',
    item6 TEXT NOT NULL DEFAULT '',
    spell1 TEXT NOT NULL DEFAULT '',
    spell2 TEXT NOT NULL DEFAULT '',
    spell3 TEXT NOT NULL DEFAULT '',
    spell4 TEXT NOT NULL DEFAULT '',
    spell5 TEXT NOT NULL DEFAULT '',
    spell6 TEXT NOT NULL DEFAULT '',
    hero TEXT NOT NULL DEFAULT '',
    newcolour INTEGER NOT NULL DEFAULT 0,
    towerkills INTEGER NOT NULL DEFAULT 0,
    raxkills INTEGER NOT NULL DEFAULT 0,
    courierkills INTEGER NOT NULL DEFAULT 0,
    level INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS downloads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL DEFAULT 0,
    map TEXT NOT NULL,
    mapsize INTEGER NOT NULL DEFAULT 0,
    datetime TEXT NOT NULL,
    name TEXT NOT NULL,
    ip TEXT NOT NULL DEFAULT '',
    spoofed INTEGER NOT NULL DEFAULT 0,
    spoofedrealm TEXT NOT NULL DEFAULT '',
    downloadtime INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    name TEXT NOT NULL,
    server TEXT NOT NULL,
    score REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS w3mmdplayers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL DEFAULT 0,
    category TEXT NOT NULL DEFAULT '',
    gameid INTEGER NOT NULL,
    pid INTEGER NOT NULL,
    name TEXT NOT NULL,
    flag TEXT NOT NULL DEFAULT '',
    leaver INTEGER NOT NULL DEFAULT 0,
    practicing INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS w3mmdvars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL DEFAULT 0,
    gameid INTEGER NOT NULL,
    pid INTEGER NOT NULL,
    varname TEXT NOT NULL,
    value_int INTEGER,
    value_real REAL,
    value_string TEXT
);

CREATE TABLE IF NOT EXISTS stats_players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player TEXT NOT NULL,
    player_lower TEXT NOT NULL UNIQUE,
    ip TEXT NOT NULL DEFAULT '',
    realm TEXT NOT NULL DEFAULT '',
    player_language TEXT NOT NULL DEFAULT 'en'
);

CREATE TABLE IF NOT EXISTS stats_global (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    alias_id INTEGER NOT NULL,
    pid INTEGER NOT NULL,
    player TEXT NOT NULL DEFAULT '',
    realm TEXT NOT NULL DEFAULT '',
    games INTEGER NOT NULL DEFAULT 0,
    score REAL NOT NULL DEFAULT 1000,
    wins INTEGER NOT NULL DEFAULT 0,
    losses INTEGER NOT NULL DEFAULT 0,
    draw INTEGER NOT NULL DEFAULT 0,
    kills INTEGER NOT NULL DEFAULT 0,
    deaths INTEGER NOT NULL DEFAULT 0,
    assists INTEGER NOT NULL DEFAULT 0,
    creeps INTEGER NOT NULL DEFAULT 0,
    denies INTEGER NOT NULL DEFAULT 0,
    neutrals INTEGER NOT NULL DEFAULT 0,
    towers INTEGER NOT NULL DEFAULT 0,
    rax INTEGER NOT NULL DEFAULT 0,
    streak INTEGER NOT NULL DEFAULT 0,
    maxstreak INTEGER NOT NULL DEFAULT 0,
    losingstreak INTEGER NOT NULL DEFAULT 0,
    maxlosingstreak INTEGER NOT NULL DEFAULT 0,
    zerodeaths INTEGER NOT NULL DEFAULT 0,
    leaver INTEGER NOT NULL DEFAULT 0,
    playtime INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS bot_configuration (
    cfg_botid INTEGER NOT NULL,
    cfg_name TEXT NOT NULL,
    cfg_value TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (cfg_botid, cfg_name)
);

CREATE TABLE IF NOT EXISTS lang_translations (
    translation_id INTEGER NOT NULL,
    language_code TEXT NOT NULL,
    translation TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (translation_id, language_code)
);

CREATE TABLE IF NOT EXISTS mapcfgs (
    cfg_name TEXT NOT NULL,
    cfg_key TEXT NOT NULL,
    cfg_value TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (cfg_name, cfg_key)
);

CREATE TABLE IF NOT EXISTS aliases (
    alias_id INTEGER PRIMARY KEY,
    alias_name TEXT NOT NULL,
    alias_template TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS gamelist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    botid INTEGER NOT NULL,
    gameid INTEGER NOT NULL,
    lobby INTEGER NOT NULL DEFAULT 0,
    map_type TEXT NOT NULL DEFAULT '',
    duration INTEGER NOT NULL DEFAULT 0,
    gamename TEXT NOT NULL DEFAULT '',
    ownername TEXT NOT NULL DEFAULT '',
    creatorname TEXT NOT NULL DEFAULT '',
    map TEXT NOT NULL DEFAULT '',
    players INTEGER NOT NULL DEFAULT 0,
    total INTEGER NOT NULL DEFAULT 0,
    users TEXT NOT NULL DEFAULT '',
    UNIQUE (botid, gameid)
);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_applies_twice() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 18);
    }
}
