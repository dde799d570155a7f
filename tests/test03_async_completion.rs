use hostbot_db::test_utils::SpyConnector;
use hostbot_db::{Database, DatabaseOptions};

#[tokio::test(flavor = "current_thread")]
async fn completed_resolves_without_blocking_the_executor() {
    let spy = SpyConnector::new();
    spy.respond("SELECT alias_id, alias_name", &[
        &[Some("1"), Some("DotA")],
        &[Some("2"), Some("LoD")],
    ]);
    let mut db = Database::open(spy.clone(), DatabaseOptions::new(3)).unwrap();

    let mut task = db.aliases();
    task.completed().await;
    assert!(task.is_ready());

    let aliases = db.recover(task).unwrap().into_output();
    assert_eq!(aliases.len(), 2);
    assert_eq!(aliases.get(&1).map(String::as_str), Some("DotA"));
    assert_eq!(aliases.get(&2).map(String::as_str), Some("LoD"));
}

#[tokio::test(flavor = "current_thread")]
async fn completed_twice_is_harmless() {
    let spy = SpyConnector::new();
    let mut db = Database::open(spy.clone(), DatabaseOptions::new(3)).unwrap();

    let mut task = db.reserve_game_id();
    task.completed().await;
    task.completed().await;
    let outcome = db.recover(task).unwrap();
    // No reserved row scripted, so the insert runs and the spy hands out id 1.
    assert_eq!(*outcome.output(), 1);
    let statements = spy.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].starts_with("SELECT id FROM games"));
    assert!(statements[1].starts_with("INSERT INTO games"));
}
