//! Local Account Store
//!
//! Demo-grade sign-up / sign-in over two keys in an injected key-value namespace:
//!
//! | Key | Value |
//! |---|---|
//! | `demo_users_v1` | JSON `{"<email>": {"password": "<secret>"}}` |
//! | `demo_session_v1` | the signed-in email, absent when signed out |
//!
//! Failure policy:
//! - Reads fail open. A failed or corrupt read is logged and treated as
//!   "no accounts" / "no session"; it never reaches the caller. A sign-up
//!   that runs while the directory is unreadable therefore rewrites it with
//!   only the new account.
//! - Writes fail the operation with `StorageWriteFailure`. There is no retry.
//!   Sign-up writes the directory before the session pointer, so a failure
//!   between the two leaves an account that can sign in normally.
//! - Sign-out swallows storage errors and always ends signed out.
//!
//! Callers serialize operations; concurrent sign-ups racing on one email
//! are not guarded against.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::interface::{AccountError, KeyValueStore, Session, SessionState, StorageError};
use crate::models::AccountDirectory;

/// Key holding the serialized account directory
pub const USERS_KEY: &str = "demo_users_v1";
/// Key holding the active session's email
pub const SESSION_KEY: &str = "demo_session_v1";

/// Account directory plus session pointer in a persistent namespace.
///
/// The store exclusively owns both keys; nothing else should read or write them.
#[derive(uniffi::Object)]
pub struct AccountStore {
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

// Internal implementation (not exported via FFI)
impl AccountStore {
    fn require_fields(email: &str, password: &str) -> Result<(), AccountError> {
        if email.is_empty() || password.is_empty() {
            return Err(AccountError::MissingFields);
        }
        Ok(())
    }

    /// Current directory, or an empty one if the read fails or the payload is corrupt
    async fn load_directory(&self) -> AccountDirectory {
        let raw = match self.storage.get(USERS_KEY.to_string()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return AccountDirectory::default(),
            Err(e) => {
                warn!(
                    error = %e,
                    key = USERS_KEY,
                    "account directory read failed, treating as empty"
                );
                return AccountDirectory::default();
            }
        };

        AccountDirectory::from_json(&raw).unwrap_or_else(|e| {
            warn!(error = %e, key = USERS_KEY, "account directory is corrupt, treating as empty");
            AccountDirectory::default()
        })
    }

    async fn save_directory(&self, directory: &AccountDirectory) -> Result<(), AccountError> {
        let json = directory
            .to_json()
            .map_err(|e| AccountError::StorageWriteFailure(e.to_string()))?;
        self.storage.set(USERS_KEY.to_string(), json).await?;
        Ok(())
    }

    /// Persist the session pointer. `None` removes the key entirely.
    async fn save_session(&self, email: Option<&str>) -> Result<(), StorageError> {
        match email {
            Some(email) => self.storage.set(SESSION_KEY.to_string(), email.to_string()).await,
            None => self.storage.remove(SESSION_KEY.to_string()).await,
        }
    }

    async fn load_session(&self) -> Option<String> {
        match self.storage.get(SESSION_KEY.to_string()).await {
            Ok(email) => email.filter(|e| !e.is_empty()),
            Err(e) => {
                warn!(error = %e, key = SESSION_KEY, "session read failed, treating as signed out");
                None
            }
        }
    }

    fn signed_in(&self, email: &str) -> Session {
        *self.state.write() = SessionState::SignedIn { email: email.to_string() };
        Session { email: email.to_string() }
    }
}

#[uniffi::export]
impl AccountStore {
    /// Wrap an injected namespace. The session state starts `Unknown` until
    /// `restore_session` runs.
    #[uniffi::constructor]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionState::Unknown),
        }
    }

    /// Last known session state, without touching storage
    pub fn session_state(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Create an account and sign into it.
    ///
    /// Fails with `MissingFields` on empty input and `DuplicateAccount` if
    /// the email is taken; neither failure changes storage.
    pub async fn sign_up(&self, email: String, password: String) -> Result<Session, AccountError> {
        Self::require_fields(&email, &password)?;

        let mut directory = self.load_directory().await;
        if !directory.insert(&email, &password) {
            return Err(AccountError::DuplicateAccount);
        }

        self.save_directory(&directory).await?;
        self.save_session(Some(&email)).await?;

        debug!(email = %email, "account created");
        Ok(self.signed_in(&email))
    }

    /// Sign into an existing account.
    ///
    /// Unknown email and wrong password both fail with `InvalidCredentials`
    /// so the caller cannot tell which one was wrong.
    pub async fn sign_in(&self, email: String, password: String) -> Result<Session, AccountError> {
        Self::require_fields(&email, &password)?;

        let directory = self.load_directory().await;
        if !directory.verify(&email, &password) {
            return Err(AccountError::InvalidCredentials);
        }

        self.save_session(Some(&email)).await?;

        debug!(email = %email, "signed in");
        Ok(self.signed_in(&email))
    }

    /// Clear the session pointer. Never fails from the caller's side.
    pub async fn sign_out(&self) {
        if let Err(e) = self.save_session(None).await {
            warn!(error = %e, key = SESSION_KEY, "failed to clear session, ignoring");
        }
        *self.state.write() = SessionState::SignedOut;
        debug!("signed out");
    }

    /// Restore a session persisted by an earlier run.
    ///
    /// The stored pointer is trusted as-is; the password is not re-checked.
    pub async fn restore_session(&self) -> Option<Session> {
        let session = self.load_session().await.map(|email| Session { email });

        *self.state.write() = match &session {
            Some(s) => SessionState::SignedIn { email: s.email.clone() },
            None => SessionState::SignedOut,
        };

        session
    }
}
