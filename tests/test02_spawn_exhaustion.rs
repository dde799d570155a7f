use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hostbot_db::test_utils::SpyConnector;
use hostbot_db::{Database, DatabaseOptions, Spawn, TaskError, ThreadSpawner, WorkerBody};

/// Refuses the first `refusals` spawn requests, then starts real threads.
struct Rationed {
    refusals: AtomicUsize,
    attempts: AtomicUsize,
}

impl Rationed {
    fn new(refusals: usize) -> Arc<Self> {
        Arc::new(Self {
            refusals: AtomicUsize::new(refusals),
            attempts: AtomicUsize::new(0),
        })
    }
}

impl Spawn for Rationed {
    fn spawn(&self, name: String, body: WorkerBody) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let left = self.refusals.load(Ordering::SeqCst);
        if left > 0 {
            self.refusals.store(left - 1, Ordering::SeqCst);
            return Err(io::Error::other("thread limit reached"));
        }
        ThreadSpawner.spawn(name, body)
    }
}

fn open(spy: &SpyConnector, spawner: Arc<Rationed>) -> Database {
    let options = DatabaseOptions::builder()
        .bot_id(1)
        .spawn_retry_delay(Duration::from_millis(1))
        .finish();
    Database::with_spawner(Arc::new(spy.clone()), options, spawner).unwrap()
}

#[test]
fn single_refusal_is_retried() {
    let spy = SpyConnector::new();
    spy.respond("SELECT COUNT(*) FROM bans", &[&[Some("5")]]);
    let spawner = Rationed::new(1);
    let mut db = open(&spy, Arc::clone(&spawner));

    let mut task = db.ban_count("europe");
    task.wait();
    let outcome = db.recover(task).unwrap();

    assert_eq!(spawner.attempts.load(Ordering::SeqCst), 2);
    assert!(outcome.ran());
    assert_eq!(*outcome.output(), 5);
}

#[test]
fn two_refusals_force_the_task_ready() {
    let spy = SpyConnector::new();
    let spawner = Rationed::new(2);
    let mut db = open(&spy, Arc::clone(&spawner));

    let mut task = db.ban_count("europe");
    assert!(task.is_ready());
    assert_eq!(spawner.attempts.load(Ordering::SeqCst), 2);
    assert!(matches!(
        task.errors(),
        [TaskError::ResourceExhaustion(_)]
    ));

    let outcome = db.recover(task).unwrap();
    assert!(!outcome.ran());
    assert_eq!(*outcome.output(), 0);
    assert!(spy.statements().is_empty());
    // The lent connection comes back untouched.
    assert_eq!(db.status().idle, 1);
    assert_eq!(db.status().total, 1);
    assert_eq!(db.outstanding(), 0);
}

#[test]
fn exhaustion_without_idle_connection_settles_counters() {
    let spy = SpyConnector::new();
    let spawner = Rationed::new(0);
    let mut db = open(&spy, Arc::clone(&spawner));

    spy.hold();
    let mut running = db.ban_count("a");
    spawner.refusals.store(2, Ordering::SeqCst);
    let abandoned = db.ban_count("b");
    assert_eq!(db.status().total, 2);

    let outcome = db.recover(abandoned).unwrap();
    assert!(!outcome.ran());
    assert_eq!(db.status().total, 1);

    spy.release();
    running.wait();
    db.recover(running).unwrap();
    assert_eq!(db.status().idle, 1);
    assert_eq!(db.outstanding(), 0);
}
