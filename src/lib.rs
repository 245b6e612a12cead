//! # Request Flow
//! The contact app is a server-rendered CRUD site over a single MongoDB collection.
//!
//! ## Adding a contact
//! The browser POSTs the add form to `/contact`. The submission runs through
//! [`contact::validation`]; if anything fails, the form comes back with the errors inline.
//! Otherwise the contact is stored, a flash message is queued on the visitor's [`Session`],
//! and the browser is redirected to `/contact`, which shows the message exactly once.
//!
//! ## Editing and deleting
//! HTML forms can only send GET and POST, so the edit and delete forms POST to
//! `/contact?_method=PUT` and `/contact?_method=DELETE`; [`middlewares::MethodOverride`]
//! rewrites those before routing.

#![recursion_limit = "256"]
#![warn(clippy::pedantic)]
#![allow(clippy::enum_glob_use)]
#![allow(clippy::module_name_repetitions)]
//#![forbid(missing_docs)]
#![forbid(unsafe_code)]
use actix_web::{error::ResponseError, http::header::ContentType, HttpResponse};
use log::*;
use std::fmt;

pub mod config;
pub use config::{Config, ConfigError, StoreKind};

pub mod contact;
pub use contact::{Contact, ContactId, ContactStore, MemoryContacts, MongoContacts, NewContact};

pub mod data;

#[cfg(feature = "webserver")]
pub mod middlewares;
#[cfg(feature = "webserver")]
mod pages;
#[cfg(feature = "webserver")]
pub mod session;
#[cfg(feature = "webserver")]
pub use session::{Session, SessionStore};
#[cfg(feature = "webserver")]
pub mod views;
#[cfg(feature = "webserver")]
pub use views::Views;

#[cfg(feature = "webserver")]
mod app;
#[cfg(feature = "webserver")]
pub use app::{app, AppState};

#[derive(Debug)]
/// The contact app was unable to service you, for any of these reasons.
pub enum ServiceError {
    /// Something went wrong on our end.
    InternalServerError,
    /// The request you send us was invalid or not usable for any number of reasons.
    BadRequest(String),
    /// We don't know anything about what you requested.
    NoData,
}
impl ServiceError {
    /// A shortcut for making a `ServiceError::BadRequest`.
    /// ```
    /// use contact_app::ServiceError;
    ///
    /// let br = ServiceError::bad_request("that isn't a contact id");
    /// let is_br = matches!(br, ServiceError::BadRequest(_));
    /// assert!(is_br, "ServiceError::bad_request() should always return a BadRequest variant");
    /// ```
    pub fn bad_request<T: ToString + ?Sized>(t: &T) -> Self {
        Self::BadRequest(t.to_string())
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ServiceError::*;

        match self {
            InternalServerError => write!(f, "Internal Server Error"),
            BadRequest(s) => write!(f, "Bad Request: {}", s),
            NoData => write!(f, "No data found"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::NoData => debug!("{}", self),
            _ => error!("{}", self),
        }
        match self {
            ServiceError::InternalServerError => {
                HttpResponse::InternalServerError().body("Internal Server Error. Try again later.")
            }
            ServiceError::BadRequest(s) => HttpResponse::BadRequest().body(s.clone()),
            ServiceError::NoData => HttpResponse::NotFound()
                .content_type(ContentType::html())
                .body("<h1>404</h1>"),
        }
    }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(e: mongodb::error::Error) -> ServiceError {
        error!("mongodb error: {}", e);
        ServiceError::InternalServerError
    }
}

impl From<bson::oid::Error> for ServiceError {
    fn from(e: bson::oid::Error) -> ServiceError {
        ServiceError::bad_request(&format!("invalid contact id: {}", e))
    }
}

impl From<tera::Error> for ServiceError {
    fn from(e: tera::Error) -> ServiceError {
        // tera's Display only shows the outermost layer
        let mut msg = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(s) = source {
            msg.push_str(": ");
            msg.push_str(&s.to_string());
            source = std::error::Error::source(s);
        }
        error!("template error: {}", msg);
        ServiceError::InternalServerError
    }
}

impl From<actix::MailboxError> for ServiceError {
    fn from(e: actix::MailboxError) -> ServiceError {
        error!("mailbox error: {}", e);
        ServiceError::InternalServerError
    }
}

#[cfg(test)]
mod test {
    use super::ServiceError;
    use actix_web::{http::StatusCode, ResponseError};

    #[test]
    fn status_codes() {
        assert_eq!(
            ServiceError::NoData.error_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::bad_request("nope").error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InternalServerError.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn bad_object_id_is_a_bad_request() {
        let e: ServiceError = bson::oid::ObjectId::parse_str("not-hex")
            .map_err(ServiceError::from)
            .unwrap_err();
        assert!(matches!(e, ServiceError::BadRequest(_)), "got {:?}", e);
    }
}
