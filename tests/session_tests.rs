use axum::http::{HeaderMap, HeaderValue, header};
use axum_extra::extract::cookie::CookieJar;
use hopeon_portal::{
    MemorySessionStore, SessionStore, StoredSession,
    auth::{CookieSessionStore, PENDING_EMAIL_COOKIE, PRINCIPAL_COOKIE, TOKEN_COOKIE},
    gate::parse_principal,
    models::{Principal, Role},
    session::persist_login,
};

fn principal(role: Role) -> Principal {
    Principal {
        id: "u-42".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role,
        phone_number: None,
        image: None,
        is_organizer_approved: false,
        is_organizer_revoked: false,
        created_at: None,
        updated_at: None,
    }
}

fn request_cookies(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
    headers
}

// Set-Cookie headers produced by the store's jar, as the browser would receive them.
fn set_cookies(jar: CookieJar) -> Vec<String> {
    use axum::response::IntoResponse;

    (jar, ())
        .into_response()
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

// --- MemorySessionStore ---

#[test]
fn test_memory_store_write_then_clear() {
    let store = MemorySessionStore::new();
    assert!(store.read().is_empty());

    store.write("tok", r#"{"role":"donor"}"#);
    assert_eq!(
        store.read(),
        StoredSession {
            token: Some("tok".to_string()),
            principal: Some(r#"{"role":"donor"}"#.to_string()),
        }
    );

    store.clear();
    assert!(store.read().is_empty());
}

#[test]
fn test_credentials_require_both_fields() {
    assert!(MemorySessionStore::seeded(Some("t"), Some("p")).read().credentials().is_some());
    assert!(MemorySessionStore::seeded(Some("t"), None).read().credentials().is_none());
    assert!(MemorySessionStore::seeded(None, Some("p")).read().credentials().is_none());
    assert!(MemorySessionStore::seeded(Some(""), Some("p")).read().credentials().is_none());
}

#[test]
fn test_persist_login_stores_a_parseable_principal() {
    let store = MemorySessionStore::new();
    persist_login(&store, "jwt-abc", &principal(Role::Organizer)).unwrap();

    let stored = store.read();
    let (token, raw) = stored.credentials().unwrap();
    assert_eq!(token, "jwt-abc");

    let parsed = parse_principal(raw).unwrap();
    assert_eq!(parsed, principal(Role::Organizer));
}

// --- CookieSessionStore ---

#[test]
fn test_cookie_store_reads_request_cookies() {
    let headers = request_cookies(
        "authToken=tok-1; user=%7B%22role%22%3A%22admin%22%7D; pendingEmail=a%40b.co",
    );
    let store = CookieSessionStore::from_headers(&headers, false);

    let stored = store.read();
    assert_eq!(stored.token.as_deref(), Some("tok-1"));
    assert_eq!(stored.principal.as_deref(), Some(r#"{"role":"admin"}"#));
    assert_eq!(store.pending_email().as_deref(), Some("a@b.co"));
}

#[test]
fn test_cookie_store_without_cookies_is_empty() {
    let store = CookieSessionStore::from_headers(&HeaderMap::new(), false);
    assert!(store.read().is_empty());
    assert!(store.pending_email().is_none());
}

#[test]
fn test_cookie_store_write_is_visible_and_emitted() {
    let store = CookieSessionStore::from_headers(&HeaderMap::new(), true);
    persist_login(&store, "tok-2", &principal(Role::Donor)).unwrap();

    // Later reads within the same request see the write.
    let stored = store.read();
    assert_eq!(stored.token.as_deref(), Some("tok-2"));
    assert_eq!(parse_principal(stored.principal.as_deref().unwrap()).unwrap().role, Role::Donor);

    let headers = set_cookies(store.jar());
    let token = headers
        .iter()
        .find(|h| h.starts_with(&format!("{TOKEN_COOKIE}=")))
        .expect("token cookie emitted");
    assert!(token.contains("HttpOnly"));
    assert!(token.contains("SameSite=Lax"));
    assert!(token.contains("Secure"));
    assert!(token.contains("Path=/"));

    let user = headers
        .iter()
        .find(|h| h.starts_with(&format!("{PRINCIPAL_COOKIE}=")))
        .expect("principal cookie emitted");
    // The JSON is percent-encoded so it survives as a cookie value.
    assert!(user.starts_with("user=%7B"));
}

#[test]
fn test_cookie_store_clear_removes_both_cookies() {
    let headers = request_cookies("authToken=tok; user=garbage");
    let store = CookieSessionStore::from_headers(&headers, false);

    store.clear();
    assert!(store.read().is_empty());

    let emitted = set_cookies(store.jar());
    for name in [TOKEN_COOKIE, PRINCIPAL_COOKIE] {
        let removal = emitted
            .iter()
            .find(|h| h.starts_with(&format!("{name}=")))
            .unwrap_or_else(|| panic!("{name} removal emitted"));
        assert!(removal.contains("Max-Age=0"), "{removal}");
    }
}

#[test]
fn test_pending_email_lifecycle() {
    let store = CookieSessionStore::from_headers(&HeaderMap::new(), false);

    store.set_pending_email("new+user@example.com");
    assert_eq!(store.pending_email().as_deref(), Some("new+user@example.com"));

    store.clear_pending_email();
    assert!(store.pending_email().is_none());

    // Set and dropped within one request: the browser never hears about it.
    let emitted = set_cookies(store.jar());
    assert!(emitted.iter().all(|h| !h.starts_with(&format!("{PENDING_EMAIL_COOKIE}="))));
}

#[test]
fn test_pending_email_from_request_is_removed_on_clear() {
    let store = CookieSessionStore::from_headers(&request_cookies("pendingEmail=a%40b.co"), false);
    store.clear_pending_email();

    let emitted = set_cookies(store.jar());
    let removal = emitted
        .iter()
        .find(|h| h.starts_with(&format!("{PENDING_EMAIL_COOKIE}=")))
        .expect("pending email removal emitted");
    assert!(removal.contains("Max-Age=0"));
}

#[test]
fn test_clearing_session_keeps_pending_email() {
    let headers = request_cookies("authToken=t; user=u; pendingEmail=x%40y.z");
    let store = CookieSessionStore::from_headers(&headers, false);

    store.clear();
    assert_eq!(store.pending_email().as_deref(), Some("x@y.z"));
}
