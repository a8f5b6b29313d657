//! Admin session gate: password verification, session issue/revoke and route guarding.
//!
//! There is a single privilege level. A correct password yields an opaque
//! [`SessionToken`] that the HTTP layer stores in a cookie; the token is only
//! meaningful to the [`SessionStore`] that issued it.

use std::future::Future;
use std::time::Duration as StdDuration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use dashmap::DashMap;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{AdminCredential, AdminSettings};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no admin password configured; set admin.password_hash or admin.password")]
    MissingCredential,
    #[error("admin.password_hash is not a valid PHC string: {0}")]
    InvalidHash(String),
    #[error("failed to hash password: {0}")]
    Hashing(String),
    #[error("password verification task failed: {0}")]
    Verification(String),
    #[error("session lifetime of {0:?} is out of range")]
    InvalidTtl(StdDuration),
}

/// Opaque identifier of an admin session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        Self(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AdminSession {
    pub expires_at: OffsetDateTime,
}

impl AdminSession {
    fn is_live(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

/// In-process session table shared by all requests.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<SessionToken, AdminSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, token: SessionToken, session: AdminSession) {
        self.sessions.insert(token, session);
    }

    /// Live session for `token`. Expired entries are dropped on the way.
    fn get_live(&self, token: &SessionToken, now: OffsetDateTime) -> Option<AdminSession> {
        let session = *self.sessions.get(token)?;
        if session.is_live(now) {
            return Some(session);
        }
        self.sessions.remove(token);
        None
    }

    /// Drop every session that is no longer live at `now`.
    fn prune(&self, now: OffsetDateTime) {
        self.sessions.retain(|_, session| session.is_live(now));
    }

    fn remove(&self, token: &SessionToken) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Outcome of [`SessionGate::require_authenticated`].
#[derive(Debug, PartialEq, Eq)]
pub enum Guarded<T> {
    Allowed(T),
    Denied,
}

pub struct SessionGate {
    password_hash: String,
    sessions: SessionStore,
    ttl: Duration,
}

impl SessionGate {
    /// Build a gate around an argon2 PHC `password_hash`.
    pub fn new(password_hash: impl Into<String>, ttl: StdDuration) -> Result<Self, AuthError> {
        let password_hash = password_hash.into();
        PasswordHash::new(&password_hash).map_err(|err| AuthError::InvalidHash(err.to_string()))?;
        let ttl = Duration::try_from(ttl).map_err(|_| AuthError::InvalidTtl(ttl))?;

        Ok(Self {
            password_hash,
            sessions: SessionStore::new(),
            ttl,
        })
    }

    pub fn from_settings(admin: &AdminSettings) -> Result<Self, AuthError> {
        match admin.credential.as_ref() {
            Some(AdminCredential::Hash(hash)) => Self::new(hash.clone(), admin.session_ttl),
            Some(AdminCredential::Plaintext(password)) => {
                warn!(
                    target = "jotter::application::auth",
                    "admin.password is set in plaintext; store an argon2 hash in admin.password_hash instead"
                );
                Self::new(hash_password(password)?, admin.session_ttl)
            }
            None => Err(AuthError::MissingCredential),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.ttl
    }

    /// Check `password` and open a session on success.
    ///
    /// Returns `None` on mismatch without recording anything.
    pub async fn login(&self, password: &str) -> Result<Option<SessionToken>, AuthError> {
        let hash = self.password_hash.clone();
        let candidate = password.to_owned();
        let matched = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|err| AuthError::Verification(err.to_string()))?;

        if !matched {
            return Ok(None);
        }

        Ok(Some(self.open_session(OffsetDateTime::now_utc())))
    }

    fn open_session(&self, now: OffsetDateTime) -> SessionToken {
        self.sessions.prune(now);

        let token = SessionToken::generate();
        self.sessions.insert(
            token.clone(),
            AdminSession {
                expires_at: now.saturating_add(self.ttl),
            },
        );
        debug!(
            target = "jotter::application::auth",
            active_sessions = self.sessions.len(),
            "admin session opened"
        );
        token
    }

    pub fn is_authenticated(&self, token: Option<&SessionToken>) -> bool {
        self.is_authenticated_at(token, OffsetDateTime::now_utc())
    }

    fn is_authenticated_at(&self, token: Option<&SessionToken>, now: OffsetDateTime) -> bool {
        token
            .and_then(|token| self.sessions.get_live(token, now))
            .is_some()
    }

    /// Close the session behind `token`. Unknown tokens are ignored.
    pub fn logout(&self, token: &SessionToken) {
        if self.sessions.remove(token) {
            debug!(target = "jotter::application::auth", "admin session closed");
        }
    }

    /// Run `operation` only for an authenticated session.
    pub async fn require_authenticated<F, Fut, T>(
        &self,
        token: Option<&SessionToken>,
        operation: F,
    ) -> Guarded<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if !self.is_authenticated(token) {
            return Guarded::Denied;
        }
        Guarded::Allowed(operation().await)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

/// Hash `password` with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hashing(err.to_string()))
}

/// Constant-time comparison of `password` against a PHC string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
