use std::time::Duration;

use actix::Addr;
use actix_web::{
    cookie::{time, Cookie, SameSite},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::*;
use uuid::Uuid;

use crate::session::{Session, SessionStore, SigningKey};

pub const SESSION_COOKIE: &str = "sid";

/// Lets a POST pretend to be a PUT, PATCH or DELETE by adding `?_method=PUT` (or similar)
/// to its URL, since that's all an HTML form can do.
pub struct MethodOverride;

impl<S, B> Transform<S, ServiceRequest> for MethodOverride
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = MethodOverrideMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MethodOverrideMiddleware { service }))
    }
}

pub struct MethodOverrideMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for MethodOverrideMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        if let Some(method) = overridden_method(req.method(), req.query_string()) {
            trace!("{} {} is really a {}", req.method(), req.path(), method);
            req.head_mut().method = method;
        }

        self.service.call(req)
    }
}

/// The method a request is standing in for, if it's a POST with a usable `_method`.
fn overridden_method(method: &Method, query: &str) -> Option<Method> {
    if *method != Method::POST {
        return None;
    }

    let wanted = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "_method")
        .map(|(_, v)| v.to_ascii_uppercase())?;

    match wanted.as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

/// Gives every request a [`Session`], remembered between requests by a signed cookie.
///
/// Requests without a cookie, or with one we didn't sign, start a new session.
/// Every response renews the cookie, so it expires `idle` after the visitor's last request.
#[derive(Clone)]
pub struct SessionCookies {
    store: Addr<SessionStore>,
    key: SigningKey,
    idle: Duration,
}

impl SessionCookies {
    pub fn new(store: Addr<SessionStore>, key: SigningKey, idle: Duration) -> Self {
        Self { store, key, idle }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionCookies
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionCookiesMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionCookiesMiddleware {
            service,
            settings: self.clone(),
        }))
    }
}

pub struct SessionCookiesMiddleware<S> {
    service: S,
    settings: SessionCookies,
}

impl<S, B> Service<ServiceRequest> for SessionCookiesMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let SessionCookies { store, key, idle } = &self.settings;

        let id = req
            .cookie(SESSION_COOKIE)
            .and_then(|c| key.verify(c.value()))
            .unwrap_or_else(|| {
                let id = Uuid::new_v4();
                trace!("starting session {}", id);
                id
            });
        req.extensions_mut().insert(Session::new(id, store.clone()));

        let cookie = Cookie::build(SESSION_COOKIE, key.sign(id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(
                i64::try_from(idle.as_secs()).unwrap_or(i64::MAX),
            ))
            .finish();

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            if let Err(e) = res.response_mut().add_cookie(&cookie) {
                warn!("couldn't set session cookie: {}", e);
            }
            Ok(res)
        })
    }
}
