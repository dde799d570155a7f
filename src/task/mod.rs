//! The owner-side handle for one in-flight database call.
//!
//! A task moves through `Dispatched -> Ready -> Recovered`. The worker owns the parameters and
//! the connection until it publishes a completion; from then on the owner reads the result and
//! hands the task to [`Database::recover`](crate::Database::recover), which is the only way to
//! reach the terminal state.

mod kind;
mod operation;
pub(crate) mod worker;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::TaskError;

pub use kind::OperationKind;
pub use operation::{Operation, Runner};
pub(crate) use worker::Completion;

static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of the [`Database`](crate::Database) a task was submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OwnerId(u64);

impl OwnerId {
    pub(crate) fn next() -> Self {
        OwnerId(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Sequence number of a task within its database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to one asynchronous database call.
///
/// Returned immediately by submission. Poll [`Task::is_ready`] (or block with [`Task::wait`],
/// or `.await` [`Task::completed`]) and then pass the task to
/// [`Database::recover`](crate::Database::recover) exactly once.
pub struct Task<O: Operation> {
    id: TaskId,
    owner: OwnerId,
    receiver: Option<oneshot::Receiver<Completion<O::Output>>>,
    completion: Option<Completion<O::Output>>,
    // Reported if the worker disappears without publishing.
    fallback: Option<O::Output>,
}

impl<O: Operation> Task<O> {
    pub(crate) fn new(
        id: TaskId,
        owner: OwnerId,
        receiver: oneshot::Receiver<Completion<O::Output>>,
        fallback: O::Output,
    ) -> Self {
        Self {
            id,
            owner,
            receiver: Some(receiver),
            completion: None,
            fallback: Some(fallback),
        }
    }

    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        O::KIND
    }

    pub(crate) fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Non-blocking check for the ready state.
    ///
    /// Once this returns `true` it keeps returning `true`, and the result and errors are fixed.
    pub fn is_ready(&mut self) -> bool {
        if self.completion.is_some() {
            return true;
        }
        let polled = match self.receiver.as_mut() {
            Some(rx) => rx.try_recv(),
            None => return false,
        };
        match polled {
            Ok(completion) => self.settle(completion),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => self.settle_lost(),
        }
        true
    }

    /// Block the calling thread until the task is ready.
    ///
    /// # Panics
    /// Panics if called from within an asynchronous execution context; use
    /// [`Task::completed`] there.
    pub fn wait(&mut self) {
        if let Some(rx) = self.receiver.take() {
            match rx.blocking_recv() {
                Ok(completion) => self.settle(completion),
                Err(_) => self.settle_lost(),
            }
        }
    }

    /// Wait for the ready state without blocking the executor.
    pub async fn completed(&mut self) {
        if let Some(rx) = self.receiver.as_mut() {
            match rx.await {
                Ok(completion) => self.settle(completion),
                Err(_) => self.settle_lost(),
            }
        }
    }

    /// The result, once ready.
    #[must_use]
    pub fn output(&self) -> Option<&O::Output> {
        self.completion.as_ref().map(|c| &c.output)
    }

    /// Errors recorded so far; always empty before the task is ready.
    #[must_use]
    pub fn errors(&self) -> &[TaskError] {
        self.completion
            .as_ref()
            .map(|c| c.errors.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn into_completion(self) -> Result<Completion<O::Output>, Self> {
        match self {
            Task {
                completion: Some(completion),
                ..
            } => Ok(completion),
            pending => Err(pending),
        }
    }

    fn settle(&mut self, completion: Completion<O::Output>) {
        self.receiver = None;
        self.fallback = None;
        self.completion = Some(completion);
    }

    fn settle_lost(&mut self) {
        self.receiver = None;
        if let Some(output) = self.fallback.take() {
            self.completion = Some(Completion {
                output,
                errors: vec![TaskError::WorkerLost],
                connection: None,
                healthy: false,
                ran: true,
            });
        }
    }
}

impl<O: Operation> fmt::Debug for Task<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("kind", &O::KIND)
            .field("ready", &self.completion.is_some())
            .finish_non_exhaustive()
    }
}

/// What the owner gets back from recovering a ready task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome<T> {
    id: TaskId,
    kind: OperationKind,
    output: T,
    errors: Vec<TaskError>,
    ran: bool,
}

impl<T> TaskOutcome<T> {
    pub(crate) fn new(
        id: TaskId,
        kind: OperationKind,
        output: T,
        errors: Vec<TaskError>,
        ran: bool,
    ) -> Self {
        Self {
            id,
            kind,
            output,
            errors,
            ran,
        }
    }

    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    #[must_use]
    pub fn output(&self) -> &T {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> T {
        self.output
    }

    /// Every error recorded, in the order the steps hit them.
    #[must_use]
    pub fn errors(&self) -> &[TaskError] {
        &self.errors
    }

    /// The most recent error.
    #[must_use]
    pub fn error(&self) -> Option<&TaskError> {
        self.errors.last()
    }

    /// Text of the most recent error, empty when the task succeeded.
    #[must_use]
    pub fn error_text(&self) -> String {
        self.error().map(ToString::to_string).unwrap_or_default()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// `false` when the task was forced ready because no worker could be started.
    #[must_use]
    pub fn ran(&self) -> bool {
        self.ran
    }
}
