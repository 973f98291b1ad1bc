//! Admin authentication: password digests, credential checks and the local session flag.

pub mod digest;
pub mod session;

pub use digest::{digest_matches, hash_password};
pub use session::{AdminSession, FileSessionStore, MemorySessionStore, SESSION_KEY, SessionStore};

use crate::db::{AdminCredential, CredentialStore};
use crate::error::StoreError;
use tracing::{debug, error, info};

/// Outcome of reading the session key.
///
/// `Malformed` is folded into "no session" by [`AdminAuthManager::get_session`];
/// it exists so the fallback is visible at the type level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    Active(AdminSession),
    Absent,
    Malformed,
}

impl SessionLookup {
    pub fn into_active(self) -> Option<AdminSession> {
        match self {
            SessionLookup::Active(session) => Some(session),
            SessionLookup::Absent | SessionLookup::Malformed => None,
        }
    }
}

/// Composes a credential store and a session store into the admin login flow.
///
/// Built once at startup and handed to callers; holds no state of its own.
pub struct AdminAuthManager<C, S> {
    credentials: C,
    sessions: S,
}

impl<C, S> AdminAuthManager<C, S>
where
    C: CredentialStore,
    S: SessionStore,
{
    pub fn new(credentials: C, sessions: S) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn hash(&self, password: &str) -> String {
        hash_password(password)
    }

    /// Ensure an admin row exists for `email`. Existing rows are left untouched.
    pub async fn initialize_admin(&self, email: &str, password: &str) -> Result<(), StoreError> {
        let existing = self.credentials.find_by_email(email).await.inspect_err(|e| {
            error!("Email: {email}, admin lookup failed: {}", e);
        })?;
        if existing.is_some() {
            debug!("Email: {email}, admin already present; skip insert");
            return Ok(());
        }

        let credential = AdminCredential::new(email, hash_password(password));
        self.credentials
            .insert(&credential)
            .await
            .inspect_err(|e| {
                error!("Email: {email}, creating admin user failed: {}", e);
            })?;
        info!("Email: {email}, admin user created");
        Ok(())
    }

    /// Check a password against the stored digest. Unknown emails yield `Ok(false)`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<bool, StoreError> {
        let stored = self.credentials.find_by_email(email).await.inspect_err(|e| {
            error!("Email: {email}, authenticating admin failed: {}", e);
        })?;
        let Some(stored) = stored else {
            debug!("Email: {email}, no admin row");
            return Ok(false);
        };

        Ok(digest_matches(&stored.password_hash, &hash_password(password)))
    }

    /// Authenticate and, on success, record the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool, StoreError> {
        if !self.authenticate(email, password).await? {
            info!("Email: {email}, admin login rejected");
            return Ok(false);
        }
        self.set_session(email)?;
        info!("Email: {email}, admin logged in");
        Ok(true)
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        self.clear_session()?;
        info!("admin logged out");
        Ok(())
    }

    pub fn lookup_session(&self) -> SessionLookup {
        let Some(raw) = self.sessions.get(SESSION_KEY) else {
            return SessionLookup::Absent;
        };
        match serde_json::from_str::<AdminSession>(&raw) {
            Ok(session) => SessionLookup::Active(session),
            Err(e) => {
                debug!(error = %e, "stored admin session is malformed; treating as absent");
                SessionLookup::Malformed
            }
        }
    }

    pub fn get_session(&self) -> Option<AdminSession> {
        self.lookup_session().into_active()
    }

    /// Record `email` as the active admin, replacing any previous session.
    pub fn set_session(&self, email: &str) -> Result<(), StoreError> {
        let value = serde_json::to_string(&AdminSession {
            email: email.to_string(),
        })?;
        self.sessions.set(SESSION_KEY, &value)
    }

    pub fn clear_session(&self) -> Result<(), StoreError> {
        self.sessions.remove(SESSION_KEY)
    }

    /// Presence check only; the credential is not re-verified.
    pub fn is_authenticated(&self) -> bool {
        self.get_session().is_some()
    }
}
