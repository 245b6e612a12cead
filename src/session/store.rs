//! `SessionStore` is an actor. It holds every visitor's session, and forgets
//! the ones that haven't been used in a while.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use actix::{Actor, AsyncContext, Context, Handler, Message, MessageResult};
use log::*;

use super::SessionId;

/// What we remember about a visitor between requests.
struct Entry {
    flash: Vec<String>,
    last_seen: Instant,
}

impl Entry {
    fn new() -> Self {
        Self {
            flash: vec![],
            last_seen: Instant::now(),
        }
    }
}

/// Queue a message to be shown on the visitor's next page.
#[derive(Message)]
#[rtype(result = "()")]
pub struct PushFlash(pub SessionId, pub String);

impl Handler<PushFlash> for SessionStore {
    type Result = ();

    fn handle(&mut self, PushFlash(id, msg): PushFlash, _: &mut Context<Self>) {
        let idle = self.idle;
        let entry = self.sessions.entry(id).or_insert_with(Entry::new);
        if entry.last_seen.elapsed() > idle {
            entry.flash.clear();
        }
        entry.flash.push(msg);
        entry.last_seen = Instant::now();
    }
}

/// Hand over every queued message, leaving none behind.
#[derive(Message)]
#[rtype(result = "Vec<String>")]
pub struct TakeFlash(pub SessionId);

impl Handler<TakeFlash> for SessionStore {
    type Result = MessageResult<TakeFlash>;

    fn handle(&mut self, TakeFlash(id): TakeFlash, _: &mut Context<Self>) -> Self::Result {
        if let Some(entry) = self.sessions.get_mut(&id) {
            if entry.last_seen.elapsed() <= self.idle {
                entry.last_seen = Instant::now();
                return MessageResult(std::mem::take(&mut entry.flash));
            }
            self.sessions.remove(&id);
        }
        MessageResult(vec![])
    }
}

/// How many sessions are being kept right now.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct CountSessions;

impl Handler<CountSessions> for SessionStore {
    type Result = usize;

    fn handle(&mut self, _: CountSessions, _: &mut Context<Self>) -> usize {
        self.sessions.len()
    }
}

/// `SessionStore` owns all session state; request handlers talk to it through [`super::Session`].
pub struct SessionStore {
    sessions: HashMap<SessionId, Entry>,
    idle: Duration,
}

impl SessionStore {
    /// A store whose sessions expire after `idle` without use.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle,
        }
    }

    /// Drop every session that's been idle too long.
    fn sweep(&mut self) {
        let idle = self.idle;
        let before = self.sessions.len();
        self.sessions.retain(|_, e| e.last_seen.elapsed() <= idle);

        let swept = before - self.sessions.len();
        if swept > 0 {
            debug!("swept {} idle sessions, {} remain", swept, self.sessions.len());
        }
    }
}

impl Actor for SessionStore {
    type Context = Context<Self>;

    /// Sweep twice per idle period, so nothing outlives its welcome by much.
    fn started(&mut self, ctx: &mut Self::Context) {
        let every = (self.idle / 2).max(Duration::from_secs(1));
        ctx.run_interval(every, |act, _| act.sweep());
    }
}
