//! Access gate: decides, for every page navigation, whether the current session may
//! see the requested page and where to send it otherwise.
//!
//! The gate reads the injected `SessionStore` and only ever writes to it to wipe a
//! session whose stored principal cannot be parsed. Callers always get a `Verdict`;
//! no failure escapes as an error.

use thiserror::Error;

use crate::{
    models::{Principal, Role},
    paths,
    session::SessionStore,
};

/// RouteAccess
///
/// The static classification attached to every navigable page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Only for visitors without a session (login, register, forgot-password).
    PublicOnly,
    /// Requires a session. A non-empty role list restricts access further, except
    /// for `Role::Admin`, which passes every restriction.
    Protected(Vec<Role>),
    /// Reachable by anyone; the gate is not consulted.
    Open,
}

impl RouteAccess {
    pub fn protected(roles: impl IntoIterator<Item = Role>) -> Self {
        RouteAccess::Protected(roles.into_iter().collect())
    }

    /// Any authenticated role.
    pub fn authenticated() -> Self {
        RouteAccess::Protected(Vec::new())
    }
}

/// Verdict
///
/// The gate's answer for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Redirect {
        to: String,
        /// The location originally requested, forwarded so the login flow can return
        /// there after authentication.
        from: Option<String>,
    },
}

impl Verdict {
    fn redirect(to: &str) -> Self {
        Verdict::Redirect {
            to: to.to_string(),
            from: None,
        }
    }

    fn redirect_with_context(to: &str, from: &str) -> Self {
        Verdict::Redirect {
            to: to.to_string(),
            from: Some(from.to_string()),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    /// location
    ///
    /// The full redirect target, with the context appended as the `from` query
    /// parameter. `None` for `Allow`.
    pub fn location(&self) -> Option<String> {
        match self {
            Verdict::Allow => None,
            Verdict::Redirect { to, from: None } => Some(to.clone()),
            Verdict::Redirect {
                to,
                from: Some(from),
            } => Some(format!("{}?from={}", to, urlencoding::encode(from))),
        }
    }
}

/// PrincipalError
///
/// The stored principal is not an identity record with a string `role`.
#[derive(Debug, Error)]
pub enum PrincipalError {
    #[error("stored principal is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored principal is not a JSON object")]
    NotAnObject,
}

/// parse_principal
///
/// Turns the serialized principal kept in the session into a structured record.
pub fn parse_principal(raw: &str) -> Result<Principal, PrincipalError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(PrincipalError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

/// guard_protected
///
/// Gate for pages that need a session, optionally restricted to `allowed_roles`.
/// A corrupt session is wiped and sent to login without context.
pub fn guard_protected(
    allowed_roles: &[Role],
    requested: &str,
    store: &dyn SessionStore,
) -> Verdict {
    let stored = store.read();
    let Some((_, raw_principal)) = stored.credentials() else {
        tracing::debug!(requested = %requested, "no session, redirecting to login");
        return Verdict::redirect_with_context(paths::LOGIN, requested);
    };

    let principal = match parse_principal(raw_principal) {
        Ok(principal) => principal,
        Err(e) => {
            tracing::warn!(error = %e, requested = %requested, "clearing unreadable session");
            store.clear();
            return Verdict::redirect(paths::LOGIN);
        }
    };

    if principal.role == Role::Admin {
        return Verdict::Allow;
    }

    if !allowed_roles.is_empty() && !allowed_roles.contains(&principal.role) {
        tracing::debug!(
            role = %principal.role,
            requested = %requested,
            "role not allowed, redirecting home"
        );
        return Verdict::redirect(principal.role.home_path());
    }

    Verdict::Allow
}

/// guard_public_only
///
/// Gate for pages meant for visitors without a session. A corrupt session is wiped
/// and the public page is shown, since it is safe for anyone.
pub fn guard_public_only(store: &dyn SessionStore) -> Verdict {
    let stored = store.read();
    let Some((_, raw_principal)) = stored.credentials() else {
        return Verdict::Allow;
    };

    match parse_principal(raw_principal) {
        Ok(principal) => Verdict::redirect(principal.role.home_path()),
        Err(e) => {
            tracing::warn!(error = %e, "clearing unreadable session on public page");
            store.clear();
            Verdict::Allow
        }
    }
}

/// evaluate
///
/// Applies the guard matching the page's classification.
pub fn evaluate(access: &RouteAccess, requested: &str, store: &dyn SessionStore) -> Verdict {
    match access {
        RouteAccess::Open => Verdict::Allow,
        RouteAccess::PublicOnly => guard_public_only(store),
        RouteAccess::Protected(roles) => guard_protected(roles, requested, store),
    }
}
