//! Per-visitor sessions, which exist to carry flash messages across a redirect.
//!
//! [`crate::middlewares::SessionCookies`] works out which session a request belongs to and
//! leaves a [`Session`] in the request's extensions; handlers take it as an argument.

use actix::Addr;
use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::ServiceError;

pub mod cookie;
pub use cookie::SigningKey;

mod store;
pub use store::{CountSessions, PushFlash, SessionStore, TakeFlash};

pub type SessionId = Uuid;

/// The session of the visitor making the current request.
#[derive(Clone)]
pub struct Session {
    id: SessionId,
    store: Addr<SessionStore>,
}

impl Session {
    pub fn new(id: SessionId, store: Addr<SessionStore>) -> Self {
        Self { id, store }
    }

    /// Leaves `msg` for the next page that shows flash messages.
    pub async fn flash(&self, msg: impl Into<String>) -> Result<(), ServiceError> {
        Ok(self.store.send(PushFlash(self.id, msg.into())).await?)
    }

    /// Every message left for this visitor; they won't be returned again.
    pub async fn take_flash(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.store.send(TakeFlash(self.id)).await?)
    }
}

impl FromRequest for Session {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<Session>().cloned().ok_or_else(|| {
            log::error!("no session on request; is the SessionCookies middleware installed?");
            ServiceError::InternalServerError
        }))
    }
}
