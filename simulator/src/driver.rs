use std::fs;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use hostbot_db::test_utils::SpyConnector;
use hostbot_db::{Database, DatabaseOptions, Spawn, ThreadSpawner, WorkerBody};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::args::SimConfig;
use crate::logging::EventLog;
use crate::model::{Kind, Op, Pending, Tracked};
use crate::oracle::Oracle;

/// Refuses the next `refusals` spawn requests, then starts threads normally.
#[derive(Default)]
struct FlakySpawner {
    refusals: AtomicU32,
}

impl Spawn for FlakySpawner {
    fn spawn(&self, name: String, body: WorkerBody) -> io::Result<()> {
        let refused = self
            .refusals
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return Err(io::Error::other("simulated thread limit"));
        }
        ThreadSpawner.spawn(name, body)
    }
}

struct Sim {
    spy: SpyConnector,
    spawner: Arc<FlakySpawner>,
    db: Database,
    tasks: Vec<Tracked>,
    held: bool,
    submitted: u64,
    recovered: u64,
    exhausted: u64,
}

pub(crate) fn run(config: &SimConfig, rng: &mut ChaCha8Rng) -> Result<(), String> {
    let spy = SpyConnector::new();
    spy.respond("SELECT COUNT(*) FROM admins", &[&[Some("2")]]);
    spy.respond("SELECT id FROM stats_players", &[&[Some("17")]]);
    let spawner = Arc::new(FlakySpawner::default());
    let options = load_options(config)?;
    let db = Database::with_spawner(Arc::new(spy.clone()), options, spawner.clone())
        .map_err(|err| format!("open failed: {err}"))?;

    let mut sim = Sim {
        spy,
        spawner,
        db,
        tasks: Vec::new(),
        held: false,
        submitted: 0,
        recovered: 0,
        exhausted: 0,
    };
    let oracle = Oracle::new(sim.db.options().idle_cap);
    let mut events = EventLog::new(config.first_steps, config.tail_steps);

    let started = Instant::now();
    let max_steps = config.iterations.unwrap_or(u64::MAX);
    let max_time = config.duration_ms.map(Duration::from_millis);

    let mut step: u64 = 0;
    while step < max_steps && max_time.is_none_or(|limit| started.elapsed() < limit) {
        let op = next_op(&sim, config, rng);
        let result = sim.apply(op, rng);
        events.record(format!(
            "step={step} op={op:?} status=[{}] result={result:?}",
            sim.db.status()
        ));
        let checked = result.and_then(|()| oracle.check(sim.db.status(), sim.tasks.len()));
        if let Err(reason) = checked {
            events.dump_failure(&reason);
            return Err(reason);
        }
        step += 1;
    }

    if let Err(reason) = sim.drain() {
        events.dump_failure(&reason);
        return Err(reason);
    }

    tracing::info!(
        "complete: steps={} submitted={} recovered={} exhausted={} connects={} closes={} {}",
        step,
        sim.submitted,
        sim.recovered,
        sim.exhausted,
        sim.spy.connects(),
        sim.spy.closes(),
        sim.db.status()
    );
    Ok(())
}

fn load_options(config: &SimConfig) -> Result<DatabaseOptions, String> {
    let Some(path) = &config.options else {
        return Ok(DatabaseOptions::builder()
            .bot_id(1)
            .idle_cap(config.idle_cap)
            .spawn_retry_delay(Duration::from_millis(1))
            .worker_name_prefix("sim")
            .finish());
    };
    let content = fs::read_to_string(path)
        .map_err(|err| format!("failed to read options file {}: {err}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|err| format!("failed to parse options JSON {}: {err}", path.display()))
}

impl Sim {
    fn apply(&mut self, op: Op, rng: &mut ChaCha8Rng) -> Result<(), String> {
        match op {
            Op::Submit(kind) => {
                let pending = Pending::submit(&mut self.db, kind, self.submitted);
                self.submitted += 1;
                self.tasks.push(Tracked {
                    pending,
                    seen_ready: false,
                });
            }
            Op::Poll => {
                if let Some(tracked) = self.pick(rng) {
                    let ready = tracked.pending.is_ready();
                    if tracked.seen_ready && !ready {
                        return Err(format!("task {} went from ready to not ready", tracked.pending.id()));
                    }
                    tracked.seen_ready |= ready;
                }
            }
            Op::Recover => {
                if !self.tasks.is_empty() {
                    let index = rng.random_range(0..self.tasks.len());
                    self.recover_at(index)?;
                }
            }
            Op::Wait => {
                if let Some(tracked) = self.pick(rng) {
                    tracked.pending.wait();
                    if !tracked.pending.is_ready() {
                        return Err(format!("task {} not ready after wait", tracked.pending.id()));
                    }
                    tracked.seen_ready = true;
                }
            }
            Op::Hold => {
                self.spy.hold();
                self.held = true;
            }
            Op::Release => {
                self.spy.release();
                self.held = false;
            }
            Op::PingFault(on) => self.spy.fail_ping(on),
            Op::ConnectFault(on) => self.spy.fail_connect(on),
            Op::StatementFault(on) => self.spy.fail_statements(on.then_some("FROM bans")),
            Op::Sleep(ms) => std::thread::sleep(Duration::from_millis(ms)),
        }
        Ok(())
    }

    fn pick(&mut self, rng: &mut ChaCha8Rng) -> Option<&mut Tracked> {
        if self.tasks.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.tasks.len());
        self.tasks.get_mut(index)
    }

    fn recover_at(&mut self, index: usize) -> Result<(), String> {
        let mut tracked = self.tasks.swap_remove(index);
        let ready = tracked.pending.is_ready();
        match tracked.pending.recover(&mut self.db) {
            Ok(recovered) => {
                if !ready {
                    return Err(format!("task {} recovered before it was ready", recovered.id));
                }
                Oracle::check_recovered(&recovered)?;
                if !recovered.ran {
                    self.exhausted += 1;
                }
                self.recovered += 1;
            }
            Err(pending) => {
                if ready {
                    return Err(format!("ready task {} was refused", pending.id()));
                }
                self.tasks.push(Tracked {
                    pending,
                    seen_ready: tracked.seen_ready,
                });
            }
        }
        Ok(())
    }

    /// Lift every fault, wait for every task and recover it.
    fn drain(&mut self) -> Result<(), String> {
        self.spy.release();
        self.held = false;
        self.spy.fail_ping(false);
        self.spy.fail_connect(false);
        self.spy.fail_statements(None);
        while !self.tasks.is_empty() {
            let last = self.tasks.len() - 1;
            self.tasks[last].pending.wait();
            self.recover_at(last)?;
        }
        Oracle::check_drained(self.db.status())
    }
}

fn next_op(sim: &Sim, config: &SimConfig, rng: &mut ChaCha8Rng) -> Op {
    let roll = rng.random::<f64>();
    if roll < config.ping_fault_rate {
        return Op::PingFault(rng.random_bool(0.3));
    }
    let roll = roll - config.ping_fault_rate;
    if roll < config.connect_fault_rate {
        return Op::ConnectFault(rng.random_bool(0.3));
    }
    let roll = roll - config.connect_fault_rate;
    if roll < config.statement_fault_rate {
        return Op::StatementFault(rng.random_bool(0.5));
    }
    let roll = roll - config.statement_fault_rate;
    if roll < config.hold_rate {
        return if sim.held { Op::Release } else { Op::Hold };
    }

    let can_submit = sim.tasks.len() < config.max_outstanding;
    let mut weights = vec![(Op::Poll, 0.30), (Op::Recover, 0.25), (Op::Sleep(1), 0.05)];
    if !sim.held {
        weights.push((Op::Wait, 0.10));
    }
    if can_submit {
        let kind = match rng.random_range(0..4) {
            0 => Kind::AdminCount,
            1 => Kind::BanList,
            2 => Kind::PlayerId,
            _ => Kind::ReserveGameId,
        };
        if rng.random::<f64>() < config.spawn_refusal_rate {
            sim.spawner
                .refusals
                .store(rng.random_range(1..=2), Ordering::SeqCst);
        }
        weights.push((Op::Submit(kind), 0.30));
    }
    choose_weighted(&weights, rng)
}

fn choose_weighted(items: &[(Op, f64)], rng: &mut ChaCha8Rng) -> Op {
    let total: f64 = items.iter().map(|(_, weight)| weight.max(0.0)).sum();
    if total <= f64::EPSILON {
        return items.first().map_or(Op::Sleep(1), |(op, _)| *op);
    }
    let mut target = rng.random::<f64>() * total;
    for (op, weight) in items {
        let w = weight.max(0.0);
        if target <= w {
            return *op;
        }
        target -= w;
    }
    items.last().map_or(Op::Sleep(1), |(op, _)| *op)
}
