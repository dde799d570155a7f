use hostbot_db::test_utils::{SpyConnector, spin_until};
use hostbot_db::{Database, DatabaseOptions, PoolStatus, TaskError};

fn open(spy: &SpyConnector, idle_cap: usize) -> Database {
    let options = DatabaseOptions::builder()
        .bot_id(7)
        .idle_cap(idle_cap)
        .finish();
    Database::open(spy.clone(), options).unwrap()
}

fn status(idle: usize, total: usize, outstanding: usize) -> PoolStatus {
    PoolStatus {
        idle,
        total,
        outstanding,
    }
}

#[test]
fn open_connects_once_and_reports_status() {
    let spy = SpyConnector::new();
    let db = open(&spy, 30);
    assert_eq!(spy.connects(), 1);
    assert_eq!(db.status(), status(1, 1, 0));
    assert_eq!(
        db.status().to_string(),
        "DB STATUS --- Connections: 1/1 idle. Outstanding tasks: 0."
    );
}

#[test]
fn open_fails_when_target_unreachable() {
    let spy = SpyConnector::new();
    spy.fail_connect(true);
    let result = Database::open(spy.clone(), DatabaseOptions::new(1));
    assert!(result.is_err());
}

#[test]
fn recovered_task_returns_connection_and_output() {
    let spy = SpyConnector::new();
    spy.respond("SELECT COUNT(*) FROM admins", &[&[Some("3")]]);
    let mut db = open(&spy, 30);

    let mut task = db.admin_count("europe.battle.net");
    assert_eq!(db.status(), status(0, 1, 1));
    task.wait();
    assert!(task.is_ready());
    assert_eq!(task.output(), Some(&3));

    let outcome = db.recover(task).unwrap();
    assert_eq!(*outcome.output(), 3);
    assert!(outcome.is_ok());
    assert!(outcome.ran());
    assert_eq!(outcome.error_text(), "");
    assert_eq!(db.status(), status(1, 1, 0));
    assert_eq!(spy.pings(), 1);
    assert_eq!(
        spy.statements(),
        vec!["SELECT COUNT(*) FROM admins WHERE server='europe.battle.net'".to_string()]
    );
}

#[test]
fn task_ids_increase_per_database() {
    let spy = SpyConnector::new();
    let mut db = open(&spy, 30);
    let mut first = db.admin_count("a");
    let mut second = db.admin_count("b");
    assert!(second.id() > first.id());
    first.wait();
    second.wait();
    db.recover(first).unwrap();
    db.recover(second).unwrap();
}

#[test]
fn unready_task_is_handed_back() {
    let spy = SpyConnector::new();
    let mut db = open(&spy, 30);

    spy.hold();
    let mut task = db.admin_check("europe", "Grubby");
    assert!(!task.is_ready());
    assert!(task.errors().is_empty());
    let mut task = db.recover(task).unwrap_err();
    assert_eq!(db.outstanding(), 1);

    spy.release();
    task.wait();
    let outcome = db.recover(task).unwrap();
    assert!(!*outcome.output());
    assert_eq!(db.outstanding(), 0);
}

#[test]
fn empty_pool_opens_lazily() {
    let spy = SpyConnector::new();
    let mut db = open(&spy, 30);

    spy.hold();
    let mut first = db.admin_count("a");
    let mut second = db.admin_count("b");
    assert_eq!(db.status(), status(0, 2, 2));
    spy.release();
    first.wait();
    second.wait();
    db.recover(first).unwrap();
    db.recover(second).unwrap();

    assert_eq!(spy.connects(), 2);
    assert_eq!(db.status(), status(2, 2, 0));
}

#[test]
fn idle_cap_closes_surplus_connections() {
    let spy = SpyConnector::new();
    let mut db = open(&spy, 1);

    spy.hold();
    let mut tasks: Vec<_> = (0..3).map(|i| db.admin_count(&format!("s{i}"))).collect();
    spy.release();
    for task in &mut tasks {
        task.wait();
    }
    for task in tasks {
        db.recover(task).unwrap();
    }

    assert_eq!(db.status(), status(1, 1, 0));
    assert_eq!(spy.closes(), 2);
}

#[test]
fn failed_probe_discards_connection() {
    let spy = SpyConnector::new();
    let mut db = open(&spy, 30);
    spy.fail_ping(true);

    let mut task = db.admin_check("europe", "grubby");
    task.wait();
    let outcome = db.recover(task).unwrap();

    assert!(!*outcome.output());
    assert!(matches!(outcome.error(), Some(TaskError::Connection(_))));
    assert!(spy.statements().is_empty());
    assert_eq!(spy.closes(), 1);
    assert_eq!(db.status(), status(0, 0, 0));
}

#[test]
fn failed_lazy_open_is_forgotten() {
    let spy = SpyConnector::new();
    let mut db = open(&spy, 30);

    spy.hold();
    let mut lent = db.admin_count("a");
    spy.fail_connect(true);
    let mut lazy = db.player_id("moon");
    lazy.wait();
    let outcome = db.recover(lazy).unwrap();
    assert_eq!(*outcome.output(), 0);
    assert!(matches!(outcome.error(), Some(TaskError::Connection(_))));
    assert_eq!(db.status(), status(0, 1, 1));

    spy.release();
    lent.wait();
    db.recover(lent).unwrap();
    assert_eq!(db.status(), status(1, 1, 0));
}

#[test]
fn statement_failure_keeps_connection() {
    let spy = SpyConnector::new();
    let mut db = open(&spy, 30);
    spy.fail_statements(Some("FROM admins"));

    let mut task = db.admin_count("europe");
    task.wait();
    assert_eq!(task.errors().len(), 1);
    let outcome = db.recover(task).unwrap();

    assert_eq!(*outcome.output(), 0);
    assert!(matches!(outcome.error(), Some(TaskError::Statement(_))));
    assert!(outcome.error_text().contains("FROM admins"));
    assert_eq!(db.status(), status(1, 1, 0));
}

#[test]
fn foreign_task_is_refused() {
    let spy = SpyConnector::new();
    let mut first = open(&spy, 30);
    let mut second = open(&spy, 30);

    let mut task = first.admin_count("europe");
    task.wait();
    let task = second.recover(task).unwrap_err();
    assert_eq!(second.outstanding(), 0);
    assert_eq!(first.outstanding(), 1);
    first.recover(task).unwrap();
    assert_eq!(first.outstanding(), 0);
}

#[test]
fn polling_eventually_observes_ready() {
    let spy = SpyConnector::new();
    spy.respond("SELECT id FROM stats_players", &[&[Some("42")]]);
    let mut db = open(&spy, 30);

    let mut task = db.player_id("Moon");
    assert!(spin_until(|| task.is_ready()));
    assert!(task.is_ready());
    let outcome = db.recover(task).unwrap();
    assert_eq!(outcome.into_output(), 42);
    assert_eq!(
        spy.statements(),
        vec!["SELECT id FROM stats_players WHERE player_lower = 'moon'".to_string()]
    );
}

#[test]
fn drop_closes_idle_connections() {
    let spy = SpyConnector::new();
    let db = open(&spy, 30);
    drop(db);
    assert_eq!(spy.closes(), 1);
}
