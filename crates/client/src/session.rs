//! Session cookie storage and the per-page session context.
//!
//! The cookie store is the only shared mutable state in the client. Views
//! never touch it directly: they read and write through [`SessionContext`].

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use medportal_auth::{Access, AuthzError, Principal, Session, TokenValidationError, authorize};

use crate::config::{COOKIE_DURATION_DAYS, COOKIE_NAME, COOKIE_SAME_SITE, COOKIE_SECURE};

/// The `jwt` cookie holding the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: &'static str,
    pub value: String,
    pub expires: DateTime<Utc>,
    pub same_site: &'static str,
    pub secure: bool,
}

impl SessionCookie {
    /// Cookie set at login.
    pub fn issue(token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: COOKIE_NAME,
            value: token.into(),
            expires: now + Duration::days(COOKIE_DURATION_DAYS),
            same_site: COOKIE_SAME_SITE,
            secure: COOKIE_SECURE,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// `Set-Cookie` header value.
    pub fn header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Path=/; Expires={}; SameSite={}",
            self.name,
            self.value,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.same_site
        );
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}

/// Where the session cookie lives.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<SessionCookie>;
    fn save(&self, cookie: SessionCookie);
    fn clear(&self);
}

/// Process-local cookie jar.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookie: RwLock<Option<SessionCookie>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryCookieStore {
    /// A writer that panicked leaves the slot holding a whole cookie or none,
    /// so a poisoned lock is recovered rather than failing every later call.
    fn slot(&self) -> RwLockWriteGuard<'_, Option<SessionCookie>> {
        self.cookie.write().unwrap_or_else(|poisoned| {
            tracing::error!("session cookie lock poisoned; recovering");
            self.cookie.clear_poison();
            poisoned.into_inner()
        })
    }
}

impl SessionStore for MemoryCookieStore {
    fn load(&self) -> Option<SessionCookie> {
        self.cookie
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, cookie: SessionCookie) {
        *self.slot() = Some(cookie);
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}

/// Why a protected page may not render.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    #[error(transparent)]
    Token(#[from] TokenValidationError),

    #[error(transparent)]
    Authz(#[from] AuthzError),
}

/// A session admitted by a page policy, with the token for gateway calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorized {
    pub token: String,
    pub principal: Principal,
    pub session: Session,
}

/// Explicit session handle passed to every view.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl core::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCookieStore::new()))
    }

    /// The stored token, unless its cookie has lapsed.
    pub fn token(&self, now: DateTime<Utc>) -> Option<String> {
        let cookie = self.store.load()?;
        if cookie.is_expired(now) {
            tracing::debug!("session cookie expired; discarding");
            self.store.clear();
            return None;
        }
        Some(cookie.value)
    }

    pub fn session(&self, now: DateTime<Utc>) -> Result<Session, TokenValidationError> {
        Session::establish(self.token(now).as_deref(), now)
    }

    /// Validate the stored token and check it against `access`.
    ///
    /// Fails before any gateway call can be made on the caller's behalf.
    pub fn require(&self, access: Access, now: DateTime<Utc>) -> Result<Authorized, AccessDenied> {
        let token = self.token(now).ok_or(TokenValidationError::MissingToken)?;
        let session = Session::establish(Some(&token), now)?;
        let principal = authorize(&session, access)?
            .cloned()
            .ok_or(AuthzError::Unauthenticated)?;
        Ok(Authorized {
            token,
            principal,
            session,
        })
    }

    pub fn sign_in(&self, token: impl Into<String>, now: DateTime<Utc>) -> SessionCookie {
        let cookie = SessionCookie::issue(token, now);
        self.store.save(cookie.clone());
        cookie
    }

    pub fn sign_out(&self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // {"sub":"1","role":"admin"}
    const ADMIN_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIiwicm9sZSI6ImFkbWluIn0.sig";

    #[test]
    fn cookie_attributes() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let cookie = SessionCookie::issue("abc", now);
        assert_eq!(cookie.name, "jwt");
        assert_eq!(cookie.expires, now + Duration::days(1));
        assert_eq!(
            cookie.header_value(),
            "jwt=abc; Path=/; Expires=Thu, 02 May 2024 12:00:00 GMT; SameSite=None; Secure"
        );
        assert!(!cookie.is_expired(now));
        assert!(cookie.is_expired(now + Duration::days(1)));
    }

    #[test]
    fn lapsed_cookie_is_dropped() {
        let now = Utc::now();
        let ctx = SessionContext::in_memory();
        ctx.sign_in(ADMIN_TOKEN, now);
        assert_eq!(ctx.token(now).as_deref(), Some(ADMIN_TOKEN));
        assert_eq!(ctx.token(now + Duration::days(2)), None);
        assert_eq!(ctx.token(now), None);
    }

    #[test]
    fn require_checks_token_then_role() {
        let now = Utc::now();
        let ctx = SessionContext::in_memory();
        assert_eq!(
            ctx.require(Access::AdminOnly, now),
            Err(AccessDenied::Token(TokenValidationError::MissingToken))
        );

        ctx.sign_in(ADMIN_TOKEN, now);
        let ok = ctx.require(Access::AdminOnly, now).unwrap();
        assert_eq!(ok.principal.user_id().get(), 1);
        assert!(matches!(ok.session, Session::Admin(_)));
        assert!(matches!(
            ctx.require(Access::DoctorOnly, now),
            Err(AccessDenied::Authz(AuthzError::Forbidden(_)))
        ));

        ctx.sign_in("garbage", now);
        assert!(matches!(
            ctx.require(Access::AllRoles, now),
            Err(AccessDenied::Token(TokenValidationError::Decode(_)))
        ));

        ctx.sign_out();
        assert!(ctx.session(now).unwrap() == Session::Anonymous);
    }

    #[test]
    fn poisoned_store_still_records_sign_in() {
        let store = Arc::new(MemoryCookieStore::new());
        let writer = Arc::clone(&store);
        let crashed = std::thread::spawn(move || {
            let _guard = writer.cookie.write().unwrap();
            panic!("writer crashed while holding the cookie");
        })
        .join();
        assert!(crashed.is_err());
        assert!(store.cookie.is_poisoned());

        let now = Utc::now();
        let ctx = SessionContext::new(store.clone());
        ctx.sign_in(ADMIN_TOKEN, now);
        assert_eq!(ctx.token(now).as_deref(), Some(ADMIN_TOKEN));
        assert!(!store.cookie.is_poisoned());

        ctx.sign_out();
        assert_eq!(ctx.token(now), None);
    }
}
