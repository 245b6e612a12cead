use std::{sync::Arc, time::Duration};

use actix::{Actor, Addr};
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error,
};

use crate::{
    contact::{routes, ContactStore},
    middlewares::{MethodOverride, SessionCookies},
    pages,
    session::{SessionStore, SigningKey},
    views::Views,
};

/// Everything the request handlers share. Cheap to clone; one clone goes to each worker.
#[derive(Clone)]
pub struct AppState {
    pub contacts: web::Data<dyn ContactStore>,
    pub views: web::Data<Views>,
    pub sessions: Addr<SessionStore>,
    pub signing_key: SigningKey,
    pub session_idle: Duration,
}

impl AppState {
    /// Starts the session store; must be called from inside a running actix system.
    pub fn new(
        contacts: Arc<dyn ContactStore>,
        views: Views,
        signing_key: SigningKey,
        session_idle: Duration,
    ) -> Self {
        Self {
            contacts: web::Data::from(contacts),
            views: web::Data::new(views),
            sessions: SessionStore::new(session_idle).start(),
            signing_key,
            session_idle,
        }
    }
}

/// The whole site, ready for an `HttpServer` or for `actix_web::test::init_service`.
pub fn app(
    state: &AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state.contacts.clone())
        .app_data(state.views.clone())
        .wrap(SessionCookies::new(
            state.sessions.clone(),
            state.signing_key.clone(),
            state.session_idle,
        ))
        .wrap(MethodOverride)
        .wrap(Logger::default())
        .service(pages::home)
        .service(pages::about)
        .service(routes::contact_list)
        // before contact_detail, or "add" would be taken for a name
        .service(routes::contact_add_form)
        .service(routes::contact_add)
        .service(routes::contact_delete)
        .service(routes::contact_edit_form)
        .service(routes::contact_edit)
        .service(routes::contact_detail)
        .default_service(web::route().to(pages::not_found))
}
