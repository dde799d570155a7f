#![cfg(feature = "sqlite")]

use std::collections::BTreeMap;

use hostbot_db::ops::{
    DotaPlayerRecord, FinishedGame, GameListEntry, ListedPlayer, MapDownload, NewGamePlayer,
    W3mmdPlayer, W3mmdVars,
};
use hostbot_db::sqlite::SCHEMA;
use hostbot_db::statement::is_single_statement;
use hostbot_db::test_utils::SpyConnector;
use hostbot_db::{Database, DatabaseOptions};

const HOSTILE: &str = "it's'; DELETE FROM admins; --";

/// Submit every operation in the catalog with hostile text in each string parameter.
fn submit_everything(db: &mut Database) {
    macro_rules! run {
        ($task:expr) => {{
            let mut task = $task;
            task.wait();
            db.recover(task).unwrap();
        }};
    }

    run!(db.admin_count(HOSTILE));
    run!(db.admin_check(HOSTILE, HOSTILE));
    run!(db.admin_add(HOSTILE, HOSTILE));
    run!(db.admin_remove(HOSTILE, HOSTILE));
    run!(db.admin_list(HOSTILE));
    run!(db.ban_count(HOSTILE));
    run!(db.ban_check(HOSTILE, HOSTILE, ""));
    run!(db.ban_check(HOSTILE, HOSTILE, HOSTILE));
    run!(db.ban_add(HOSTILE, HOSTILE, HOSTILE, HOSTILE, HOSTILE, HOSTILE, 0));
    run!(db.ban_add(HOSTILE, HOSTILE, HOSTILE, HOSTILE, HOSTILE, HOSTILE, 60));
    run!(db.ban_remove(HOSTILE, HOSTILE));
    run!(db.ban_remove_everywhere(HOSTILE));
    run!(db.ban_list(HOSTILE));
    run!(db.game_add(FinishedGame {
        game_id: 1,
        server: HOSTILE.into(),
        map: HOSTILE.into(),
        game_name: HOSTILE.into(),
        owner_name: HOSTILE.into(),
        creator_name: HOSTILE.into(),
        creator_server: HOSTILE.into(),
        lobby_log: vec![HOSTILE.into()],
        game_log: vec![HOSTILE.into(), HOSTILE.into()],
        elo_change: HOSTILE.into(),
        ..FinishedGame::default()
    }));
    run!(db.game_player_add(NewGamePlayer {
        name: HOSTILE.into(),
        ip: HOSTILE.into(),
        left_reason: HOSTILE.into(),
        spoofed_realm: HOSTILE.into(),
        ..NewGamePlayer::default()
    }));
    run!(db.game_player_summary_check(HOSTILE));
    run!(db.update_game_info(1, HOSTILE));
    run!(db.dota_game_add(1, 1, 30, 0));
    run!(db.dota_player_add(DotaPlayerRecord {
        items: std::array::from_fn(|_| HOSTILE.to_string()),
        spells: std::array::from_fn(|_| HOSTILE.to_string()),
        hero: HOSTILE.into(),
        ..DotaPlayerRecord::default()
    }));
    run!(db.dota_player_summary_check(HOSTILE));
    run!(db.download_add(MapDownload {
        map: HOSTILE.into(),
        name: HOSTILE.into(),
        ip: HOSTILE.into(),
        spoofed_realm: HOSTILE.into(),
        ..MapDownload::default()
    }));
    run!(db.score_check(HOSTILE, HOSTILE, HOSTILE));
    run!(db.player_score(1, 1));
    run!(db.player_stats(1, 1));
    run!(db.player_stats(0, 1));
    run!(db.w3mmd_player_add(W3mmdPlayer {
        category: HOSTILE.into(),
        name: HOSTILE.into(),
        flag: HOSTILE.into(),
        ..W3mmdPlayer::default()
    }));
    run!(db.w3mmd_var_add(
        1,
        W3mmdVars::Strings(BTreeMap::from([((1, HOSTILE.to_string()), HOSTILE.to_string())]))
    ));
    run!(db.w3mmd_var_add(
        1,
        W3mmdVars::Reals(BTreeMap::from([((1, HOSTILE.to_string()), f64::INFINITY)]))
    ));
    run!(db.player_id(HOSTILE));
    run!(db.create_player_id(HOSTILE, HOSTILE, HOSTILE));
    run!(db.reserve_game_id());
    run!(db.bot_configs());
    run!(db.bot_config_texts());
    run!(db.languages());
    run!(db.map_config(HOSTILE));
    run!(db.aliases());
    run!(db.stats_templates());
    run!(db.game_list_update(GameListEntry {
        game_name: HOSTILE.into(),
        map_type: HOSTILE.into(),
        owner_name: HOSTILE.into(),
        creator_name: HOSTILE.into(),
        map: HOSTILE.into(),
        player_list: vec![ListedPlayer {
            name: HOSTILE.into(),
            realm: HOSTILE.into(),
            ip: HOSTILE.into(),
            left_reason: HOSTILE.into(),
            ..ListedPlayer::default()
        }],
        ..GameListEntry::default()
    }));
    run!(db.game_list_update(GameListEntry::default()));
}

#[test]
fn every_statement_is_single_and_valid_sqlite() {
    let spy = SpyConnector::new();
    let mut db = Database::open(spy.clone(), DatabaseOptions::new(9)).unwrap();
    submit_everything(&mut db);

    let statements = spy.statements();
    assert!(statements.len() >= 40, "only {} statements", statements.len());

    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    for sql in &statements {
        assert!(is_single_statement(sql), "not a single statement: {sql}");
        assert!(!sql.contains('\0'));
        if let Err(err) = conn.prepare(sql) {
            panic!("statement does not prepare: {err}\n{sql}");
        }
    }
}

#[test]
fn bot_id_is_written_into_bot_scoped_rows() {
    let spy = SpyConnector::new();
    let mut db = Database::open(spy.clone(), DatabaseOptions::new(31)).unwrap();

    let mut task = db.admin_add("europe", "moon");
    task.wait();
    db.recover(task).unwrap();
    let mut task = db.bot_configs();
    task.wait();
    db.recover(task).unwrap();

    let statements = spy.statements();
    assert_eq!(
        statements[0],
        "INSERT INTO admins ( botid, server, name ) VALUES ( 31, 'europe', 'moon' )"
    );
    assert_eq!(
        statements[1],
        "SELECT cfg_name, cfg_value FROM bot_configuration WHERE cfg_botid = 31"
    );
}
