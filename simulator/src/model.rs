use hostbot_db::ops::{AdminCount, BanList, GetPlayerId, ReserveGameId};
use hostbot_db::{Database, Operation, OperationKind, Task, TaskError, TaskId};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Kind {
    AdminCount,
    BanList,
    PlayerId,
    ReserveGameId,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Op {
    Submit(Kind),
    Poll,
    Recover,
    Wait,
    Hold,
    Release,
    PingFault(bool),
    ConnectFault(bool),
    StatementFault(bool),
    Sleep(u64),
}

/// A submitted task of any of the kinds the driver exercises.
pub(crate) enum Pending {
    AdminCount(Task<AdminCount>),
    BanList(Task<BanList>),
    PlayerId(Task<GetPlayerId>),
    ReserveGameId(Task<ReserveGameId>),
}

macro_rules! each_task {
    ($pending:expr, $task:ident => $body:expr) => {
        match $pending {
            Pending::AdminCount($task) => $body,
            Pending::BanList($task) => $body,
            Pending::PlayerId($task) => $body,
            Pending::ReserveGameId($task) => $body,
        }
    };
}

/// What the driver learns from a successful recovery.
#[derive(Debug)]
pub(crate) struct Recovered {
    pub(crate) id: TaskId,
    pub(crate) kind: OperationKind,
    pub(crate) ran: bool,
    pub(crate) errors: Vec<TaskError>,
}

impl Pending {
    pub(crate) fn submit(db: &mut Database, kind: Kind, n: u64) -> Self {
        match kind {
            Kind::AdminCount => Pending::AdminCount(db.admin_count(&format!("server{}", n % 3))),
            Kind::BanList => Pending::BanList(db.ban_list("europe")),
            Kind::PlayerId => Pending::PlayerId(db.player_id(&format!("Player{n}"))),
            Kind::ReserveGameId => Pending::ReserveGameId(db.reserve_game_id()),
        }
    }

    pub(crate) fn id(&self) -> TaskId {
        each_task!(self, task => task.id())
    }

    pub(crate) fn is_ready(&mut self) -> bool {
        each_task!(self, task => task.is_ready())
    }

    pub(crate) fn wait(&mut self) {
        each_task!(self, task => task.wait())
    }

    pub(crate) fn recover(self, db: &mut Database) -> Result<Recovered, Pending> {
        match self {
            Pending::AdminCount(task) => settle(db, task, Pending::AdminCount),
            Pending::BanList(task) => settle(db, task, Pending::BanList),
            Pending::PlayerId(task) => settle(db, task, Pending::PlayerId),
            Pending::ReserveGameId(task) => settle(db, task, Pending::ReserveGameId),
        }
    }
}

fn settle<O: Operation>(
    db: &mut Database,
    task: Task<O>,
    wrap: fn(Task<O>) -> Pending,
) -> Result<Recovered, Pending> {
    db.recover(task)
        .map(|outcome| Recovered {
            id: outcome.id(),
            kind: outcome.kind(),
            ran: outcome.ran(),
            errors: outcome.errors().to_vec(),
        })
        .map_err(wrap)
}

/// Driver-side bookkeeping for one outstanding task.
pub(crate) struct Tracked {
    pub(crate) pending: Pending,
    pub(crate) seen_ready: bool,
}
