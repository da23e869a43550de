use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    api::ApiClient,
    config::AppConfig,
    gate::{self, RouteAccess},
    models::Principal,
    session::{SessionState, SessionStore, StoredSession},
};

/// Cookie holding the opaque backend token.
pub const TOKEN_COOKIE: &str = "authToken";
/// Cookie holding the serialized principal. The jar percent-encodes values on the
/// way out and decodes them on the way in.
pub const PRINCIPAL_COOKIE: &str = "user";
/// Cookie remembering which e-mail an OTP was sent to, between the form that
/// requested it and the form that consumes it.
pub const PENDING_EMAIL_COOKIE: &str = "pendingEmail";

/// CookieSessionStore
///
/// The browser's durable session storage, seen from one request. Reads come from the
/// request's `Cookie` header; writes and clears are recorded in the jar and reach the
/// browser as `Set-Cookie` headers on the response (see `session_layer`).
pub struct CookieSessionStore {
    jar: Mutex<CookieJar>,
    secure: bool,
}

impl CookieSessionStore {
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self {
            jar: Mutex::new(jar),
            secure,
        }
    }

    pub fn from_headers(headers: &HeaderMap, secure: bool) -> Self {
        Self::new(CookieJar::from_headers(headers), secure)
    }

    /// jar
    ///
    /// The current jar, including every change made through this store.
    pub fn jar(&self) -> CookieJar {
        self.jar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn pending_email(&self) -> Option<String> {
        self.value(PENDING_EMAIL_COOKIE)
            .filter(|email| !email.is_empty())
    }

    pub fn set_pending_email(&self, email: &str) {
        let cookie = self.cookie(PENDING_EMAIL_COOKIE, email.to_string());
        self.update(|jar| jar.add(cookie));
    }

    pub fn clear_pending_email(&self) {
        self.update(|jar| jar.remove(Cookie::build(PENDING_EMAIL_COOKIE).path("/")));
    }

    fn value(&self, name: &str) -> Option<String> {
        self.jar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|cookie| cookie.value().to_string())
    }

    fn update(&self, change: impl FnOnce(CookieJar) -> CookieJar) {
        let mut jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        let current = std::mem::take(&mut *jar);
        *jar = change(current);
    }

    fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}

impl SessionStore for CookieSessionStore {
    fn read(&self) -> StoredSession {
        StoredSession {
            token: self.value(TOKEN_COOKIE),
            principal: self.value(PRINCIPAL_COOKIE),
        }
    }

    fn write(&self, token: &str, principal: &str) {
        let token = self.cookie(TOKEN_COOKIE, token.to_string());
        let principal = self.cookie(PRINCIPAL_COOKIE, principal.to_string());
        self.update(|jar| jar.add(token).add(principal));
    }

    fn clear(&self) {
        self.update(|jar| {
            jar.remove(Cookie::build(TOKEN_COOKIE).path("/"))
                .remove(Cookie::build(PRINCIPAL_COOKIE).path("/"))
        });
    }
}

/// PageSession
///
/// The session of the request being served: the cookie store plus the principal it
/// held when the request arrived (if it parsed). Installed by `session_layer`.
#[derive(Clone)]
pub struct PageSession {
    pub store: Arc<CookieSessionStore>,
    pub principal: Option<Principal>,
}

impl PageSession {
    pub fn from_store(store: Arc<CookieSessionStore>) -> Self {
        let principal = store
            .read()
            .credentials()
            .and_then(|(_, raw)| gate::parse_principal(raw).ok());
        Self { store, principal }
    }

    /// api
    ///
    /// The backend client bound to this session: it sends the session token and wipes
    /// the session when the backend answers 401.
    pub fn api(&self, client: &ApiClient) -> ApiClient {
        let store: SessionState = self.store.clone();
        client.with_session(store)
    }
}

/// PageSession Extractor Implementation
///
/// Hands the session installed by `session_layer` to handlers and to `page_gate`.
/// Rejection: 500 when the layer is missing from the router.
impl<S> FromRequestParts<S> for PageSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<PageSession>().cloned().ok_or_else(|| {
            tracing::error!("session_layer is not installed on this router");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

/// session_layer
///
/// Outermost session middleware. Opens the cookie store for the request, exposes it
/// as a `PageSession` and, once the response is built, attaches every write or clear
/// made during the request as `Set-Cookie` headers.
pub async fn session_layer(
    State(config): State<AppConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let store = Arc::new(CookieSessionStore::from_headers(
        request.headers(),
        config.cookie_secure,
    ));
    request
        .extensions_mut()
        .insert(PageSession::from_store(store.clone()));

    let response = next.run(request).await;
    (store.jar(), response).into_response()
}

/// page_gate
///
/// Route-layer middleware evaluating the access gate for the page classification it
/// was built with. Allowed navigations proceed to the handler; everything else
/// becomes a redirect to the location chosen by the gate.
pub async fn page_gate(
    State(access): State<RouteAccess>,
    session: PageSession,
    request: Request,
    next: Next,
) -> Response {
    let requested = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let verdict = gate::evaluate(&access, &requested, session.store.as_ref());
    match verdict.location() {
        None => next.run(request).await,
        Some(location) => Redirect::to(&location).into_response(),
    }
}
