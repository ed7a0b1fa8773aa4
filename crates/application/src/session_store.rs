//! Process-wide session state with write-through durable storage.

use std::sync::Arc;

use paas_core::{AppError, AppResult, NonEmptyString, UserIdentity};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{info, warn};

use crate::KeyValueStorage;

/// Storage key holding the raw bearer token.
pub const TOKEN_STORAGE_KEY: &str = "jwt_token";

/// Storage key holding the JSON identity blob `{email, is_admin}`.
pub const USER_STORAGE_KEY: &str = "paas_user";

/// Point-in-time copy of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Bearer credential, if signed in.
    pub token: Option<String>,
    /// Cached identity of the signed-in user.
    pub user: Option<UserIdentity>,
}

impl SessionSnapshot {
    /// Returns whether a non-empty token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }
}

/// Identity payload handed over by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityPayload {
    /// Email of the signed-in user.
    pub email: String,
    /// Admin flag; absent means not an admin.
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl IdentityPayload {
    /// Creates a payload from login data.
    #[must_use]
    pub fn new(email: impl Into<String>, is_admin: Option<bool>) -> Self {
        Self {
            email: email.into(),
            is_admin,
        }
    }

    fn into_identity(self) -> UserIdentity {
        UserIdentity::new(self.email, self.is_admin.unwrap_or(false))
    }
}

/// Read access to "is there a session", shared by the store and its snapshots.
pub trait AuthenticationState {
    /// Returns whether a usable token is present.
    fn is_authenticated(&self) -> bool;
}

impl AuthenticationState for SessionSnapshot {
    fn is_authenticated(&self) -> bool {
        SessionSnapshot::is_authenticated(self)
    }
}

#[derive(Debug, Deserialize)]
struct StoredIdentity {
    email: Option<String>,
    is_admin: Option<bool>,
}

/// Single source of truth for the current session.
///
/// Reads are served from memory. Mutations write through to storage while
/// holding the state lock, so readers see either the old or the new session.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    state: RwLock<SessionSnapshot>,
}

impl SessionStore {
    /// Creates a signed-out store; call [`SessionStore::initialize`] to restore.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionSnapshot::default()),
        }
    }

    /// Restores the session from durable storage and returns it.
    ///
    /// Unreadable or malformed stored state degrades to "no session" or
    /// "no identity" and is only logged.
    pub fn initialize(&self) -> SessionSnapshot {
        let token = match self.storage.get(TOKEN_STORAGE_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(error) => {
                warn!(error = %error, "failed to read stored session token, starting signed out");
                None
            }
        };

        let mut user = self.load_identity();
        if token.is_none() && user.is_some() {
            warn!("discarding stored identity without a session token");
            user = None;
        }

        let snapshot = SessionSnapshot { token, user };
        *self.state.write() = snapshot.clone();

        info!(
            authenticated = snapshot.is_authenticated(),
            has_identity = snapshot.user.is_some(),
            "session restored from storage"
        );

        snapshot
    }

    /// Stores a new token and, when supplied, the identity that goes with it.
    ///
    /// Without an identity payload the previously held identity is kept. On a
    /// storage failure the in-memory session is left untouched.
    pub fn set_session(
        &self,
        token: impl Into<String>,
        identity: Option<IdentityPayload>,
    ) -> AppResult<()> {
        let token = NonEmptyString::new(token).map_err(|_| {
            AppError::Validation("session token must not be empty".to_owned())
        })?;

        let mut state = self.state.write();
        let next = SessionSnapshot {
            token: Some(token.into()),
            user: identity
                .map(IdentityPayload::into_identity)
                .or_else(|| state.user.clone()),
        };

        if let Err(error) = self.write_snapshot(&next) {
            if let Err(rollback_error) = self.write_snapshot(&state) {
                warn!(error = %rollback_error, "failed to roll back partially stored session");
            }
            return Err(error);
        }

        *state = next;
        info!(
            email = state.user.as_ref().map(UserIdentity::email).unwrap_or_default(),
            is_admin = state.user.as_ref().is_some_and(UserIdentity::is_admin),
            "session established"
        );

        Ok(())
    }

    /// Removes the session from memory and storage.
    ///
    /// Memory is always cleared; a storage failure is reported afterwards.
    pub fn clear_session(&self) -> AppResult<()> {
        let mut state = self.state.write();
        let was_authenticated = state.is_authenticated();
        *state = SessionSnapshot::default();

        let token_result = self.storage.remove(TOKEN_STORAGE_KEY);
        let user_result = self.storage.remove(USER_STORAGE_KEY);
        drop(state);

        info!(was_authenticated, "session cleared");
        token_result.and(user_result)
    }

    /// Returns whether a usable token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Returns the current token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    /// Returns the cached identity.
    #[must_use]
    pub fn user(&self) -> Option<UserIdentity> {
        self.state.read().user.clone()
    }

    /// Returns a consistent copy of token and identity.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.read().clone()
    }

    fn load_identity(&self) -> Option<UserIdentity> {
        let raw = match self.storage.get(USER_STORAGE_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(error) => {
                warn!(error = %error, "failed to read stored identity");
                return None;
            }
        };

        match decode_stored_identity(raw.as_str()) {
            Ok(identity) => Some(identity),
            Err(error) => {
                warn!(error = %error, "ignoring stored identity");
                None
            }
        }
    }

    fn write_snapshot(&self, snapshot: &SessionSnapshot) -> AppResult<()> {
        match snapshot.token.as_deref() {
            Some(token) => self.storage.set(TOKEN_STORAGE_KEY, token)?,
            None => self.storage.remove(TOKEN_STORAGE_KEY)?,
        }

        match snapshot.user.as_ref() {
            Some(user) => {
                let encoded = serde_json::to_string(user).map_err(|error| {
                    AppError::Internal(format!("failed to encode session identity: {error}"))
                })?;
                self.storage.set(USER_STORAGE_KEY, encoded.as_str())
            }
            None => self.storage.remove(USER_STORAGE_KEY),
        }
    }
}

impl AuthenticationState for SessionStore {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }
}

fn decode_stored_identity(raw: &str) -> AppResult<UserIdentity> {
    let stored = serde_json::from_str::<StoredIdentity>(raw).map_err(|error| {
        AppError::MalformedStoredState(format!("identity blob is not valid JSON: {error}"))
    })?;

    let email = stored
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| {
            AppError::MalformedStoredState("identity blob has no email".to_owned())
        })?;

    Ok(UserIdentity::new(email, stored.is_admin.unwrap_or(false)))
}
