use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::connection::{Connection, Connector, ExecOutcome, Session};
use crate::error::DbError;
use crate::results::{ResultSet, TextRow};

#[derive(Default)]
struct SpyState {
    statements: Vec<String>,
    scripted: Vec<(String, ResultSet)>,
    fail_connect: bool,
    fail_ping: bool,
    fail_matching: Option<String>,
    connects: usize,
    pings: usize,
    closes: usize,
    next_insert_id: u64,
}

#[derive(Default)]
struct Gate {
    held: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    fn wait(&self) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while *held {
            held = self
                .opened
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn set(&self, value: bool) {
        *self.held.lock().unwrap_or_else(PoisonError::into_inner) = value;
        if !value {
            self.opened.notify_all();
        }
    }
}

/// In-memory stand-in for a database server.
///
/// Records every statement it is sent, answers queries from rows scripted by statement
/// prefix, and can be told to fail connects, probes or statements. Clones share state, so a
/// test keeps one handle while the [`Database`](crate::Database) owns another.
#[derive(Clone, Default)]
pub struct SpyConnector {
    state: Arc<Mutex<SpyState>>,
    gate: Arc<Gate>,
}

impl SpyConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SpyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer queries starting with `prefix` with `rows`. Earlier scripts win.
    pub fn respond(&self, prefix: &str, rows: &[&[Option<&str>]]) {
        let result: ResultSet = rows
            .iter()
            .map(|fields| TextRow::new(fields.iter().map(|f| f.map(str::to_string)).collect()))
            .collect();
        self.state().scripted.push((prefix.to_string(), result));
    }

    pub fn fail_connect(&self, fail: bool) {
        self.state().fail_connect = fail;
    }

    pub fn fail_ping(&self, fail: bool) {
        self.state().fail_ping = fail;
    }

    /// Reject every statement containing `needle`; `None` stops rejecting.
    pub fn fail_statements(&self, needle: Option<&str>) {
        self.state().fail_matching = needle.map(str::to_string);
    }

    /// Block every statement until [`SpyConnector::release`] is called.
    pub fn hold(&self) {
        self.gate.set(true);
    }

    pub fn release(&self) {
        self.gate.set(false);
    }

    /// Every statement received so far, in arrival order.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.state().statements.clone()
    }

    #[must_use]
    pub fn connects(&self) -> usize {
        self.state().connects
    }

    #[must_use]
    pub fn pings(&self) -> usize {
        self.state().pings
    }

    #[must_use]
    pub fn closes(&self) -> usize {
        self.state().closes
    }

    fn record(&self, sql: &str) -> Result<(), DbError> {
        let mut state = self.state();
        state.statements.push(sql.to_string());
        match &state.fail_matching {
            Some(needle) if sql.contains(needle.as_str()) => Err(DbError::ExecutionError(
                format!("spy rejected statement containing {needle:?}"),
            )),
            _ => Ok(()),
        }
    }
}

impl Connector for SpyConnector {
    fn connect(&self) -> Result<Connection, DbError> {
        let mut state = self.state();
        state.connects += 1;
        if state.fail_connect {
            return Err(DbError::ConnectionError("spy refused connection".into()));
        }
        drop(state);
        Ok(Connection::new(Box::new(SpySession { spy: self.clone() })))
    }

    fn describe(&self) -> String {
        "spy".to_string()
    }
}

struct SpySession {
    spy: SpyConnector,
}

impl Session for SpySession {
    fn ping(&mut self) -> Result<(), DbError> {
        let mut state = self.spy.state();
        state.pings += 1;
        if state.fail_ping {
            return Err(DbError::ConnectionError("spy connection went away".into()));
        }
        Ok(())
    }

    fn execute(&mut self, sql: &str) -> Result<ExecOutcome, DbError> {
        self.spy.gate.wait();
        self.spy.record(sql)?;
        let mut state = self.spy.state();
        state.next_insert_id += 1;
        Ok(ExecOutcome {
            rows_affected: 1,
            last_insert_id: state.next_insert_id,
        })
    }

    fn query(&mut self, sql: &str) -> Result<ResultSet, DbError> {
        self.spy.gate.wait();
        self.spy.record(sql)?;
        let state = self.spy.state();
        Ok(state
            .scripted
            .iter()
            .find(|(prefix, _)| sql.starts_with(prefix.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    fn close(self: Box<Self>) {
        self.spy.state().closes += 1;
    }
}
