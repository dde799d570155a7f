//! Starting one worker per task, with a bounded retry when the OS refuses a new thread.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{error, warn};

use crate::error::{DbError, TaskError};
use crate::task::worker::Job;

/// Attempts made to start a worker before the task is given up.
pub const MAX_SPAWN_ATTEMPTS: u32 = 2;

/// Body handed to a [`Spawn`] implementation.
pub type WorkerBody = Box<dyn FnOnce() + Send + 'static>;

/// Something that can start a concurrent unit of execution.
pub trait Spawn: Send + Sync {
    /// Start `body` on a new worker named `name`.
    ///
    /// # Errors
    /// Returns the OS error when no worker could be started. The body is dropped unrun.
    fn spawn(&self, name: String, body: WorkerBody) -> io::Result<()>;
}

/// Default spawner: one named OS thread per task.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSpawner;

impl Spawn for ThreadSpawner {
    fn spawn(&self, name: String, body: WorkerBody) -> io::Result<()> {
        thread::Builder::new().name(name).spawn(body).map(|_| ())
    }
}

type JobSlot = Arc<Mutex<Option<Box<dyn Job>>>>;

pub(crate) struct Dispatcher {
    spawner: Arc<dyn Spawn>,
    retry_delay: Duration,
    name_prefix: String,
}

impl Dispatcher {
    pub(crate) fn new(spawner: Arc<dyn Spawn>, retry_delay: Duration, name_prefix: String) -> Self {
        Self {
            spawner,
            retry_delay,
            name_prefix,
        }
    }

    /// Start a worker for `job`, retrying once after the configured delay.
    ///
    /// On give-up the job is published as ready without running, carrying
    /// [`TaskError::ResourceExhaustion`], so its task never hangs.
    pub(crate) fn dispatch(&self, label: &str, job: Box<dyn Job>) -> Result<(), DbError> {
        let slot: JobSlot = Arc::new(Mutex::new(Some(job)));
        let name = format!("{}-{label}", self.name_prefix);
        let mut last_err = None;

        for attempt in 1..=MAX_SPAWN_ATTEMPTS {
            if attempt > 1 {
                thread::sleep(self.retry_delay);
            }
            let worker_slot = Arc::clone(&slot);
            let body: WorkerBody = Box::new(move || {
                if let Some(job) = take(&worker_slot) {
                    job.run();
                }
            });
            match self.spawner.spawn(name.clone(), body) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    if attempt < MAX_SPAWN_ATTEMPTS {
                        warn!(worker = %name, attempt, "failed to spawn worker, retrying: {err}");
                    }
                    last_err = Some(err);
                }
            }
        }

        let reason = last_err.map_or_else(|| "unknown error".to_string(), |err| err.to_string());
        error!(worker = %name, "giving up on worker after {MAX_SPAWN_ATTEMPTS} attempts: {reason}");
        if let Some(job) = take(&slot) {
            job.abandon(TaskError::ResourceExhaustion(reason.clone()));
        }
        Err(DbError::WorkerSpawn(reason))
    }
}

fn take(slot: &JobSlot) -> Option<Box<dyn Job>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    impl Spawn for Flaky {
        fn spawn(&self, name: String, body: WorkerBody) -> io::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(io::Error::new(io::ErrorKind::WouldBlock, "no threads"));
            }
            ThreadSpawner.spawn(name, body)
        }
    }

    #[derive(Default)]
    struct Probe {
        ran: Arc<AtomicU32>,
        abandoned: Arc<Mutex<Option<TaskError>>>,
    }

    impl Job for Probe {
        fn run(self: Box<Self>) {
            self.ran.fetch_add(1, Ordering::SeqCst);
        }

        fn abandon(self: Box<Self>, reason: TaskError) {
            *self.abandoned.lock().unwrap() = Some(reason);
        }
    }

    fn dispatcher(failures: u32) -> (Dispatcher, Arc<Flaky>) {
        let spawner = Arc::new(Flaky {
            failures_left: AtomicU32::new(failures),
            calls: AtomicU32::new(0),
        });
        let d = Dispatcher::new(spawner.clone(), Duration::from_millis(1), "test".into());
        (d, spawner)
    }

    #[test]
    fn second_attempt_runs_job() {
        let (d, spawner) = dispatcher(1);
        let probe = Probe::default();
        let ran = Arc::clone(&probe.ran);
        d.dispatch("t1", Box::new(probe)).unwrap();
        for _ in 0..200 {
            if ran.load(Ordering::SeqCst) == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(spawner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn two_failures_abandon_without_running() {
        let (d, spawner) = dispatcher(2);
        let probe = Probe::default();
        let ran = Arc::clone(&probe.ran);
        let abandoned = Arc::clone(&probe.abandoned);
        let err = d.dispatch("t2", Box::new(probe)).unwrap_err();
        assert!(matches!(err, DbError::WorkerSpawn(_)));
        assert_eq!(spawner.calls.load(Ordering::SeqCst), MAX_SPAWN_ATTEMPTS);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert!(matches!(
            abandoned.lock().unwrap().clone(),
            Some(TaskError::ResourceExhaustion(_))
        ));
    }
}
