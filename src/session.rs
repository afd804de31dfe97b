//! Login validation and the persisted session, the identity surface the
//! ledger's callers scope their queries with.
//!
//! Logging out clears the session key only; the user's ledger data stays in
//! the store untouched.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{Credential, UserId},
    store::{CURRENT_USER_KEY, KeyValueStore},
};

/// The signed-in user, persisted under the `currentUser` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The email the user signed in with.
    pub email: String,
    /// The identifier scoping the user's ledger data.
    pub id: UserId,
}

/// Check an email and password against the registered user set.
///
/// Returns the matching session, or `None` for a wrong email or password.
/// Read failures degrade to `None` (logged): a broken store reads as "nobody
/// can sign in", never as a crash.
pub async fn validate_login<S: KeyValueStore>(
    store: &S,
    email: &str,
    password: &str,
) -> Option<Session> {
    let credentials = match Credential::load_all(store).await {
        Ok(credentials) => credentials,
        Err(error) => {
            tracing::warn!("could not read the user set while validating a login: {error}");
            return None;
        }
    };

    credentials
        .iter()
        .find(|credential| credential.email == email && credential.password == password)
        .map(|credential| Session {
            email: credential.email.clone(),
            id: UserId::new(&credential.email),
        })
}

/// Persist `session` as the signed-in user.
///
/// # Errors
/// Propagates [Error::StoreError] and [Error::JsonError] from the write.
pub async fn save_session<S: KeyValueStore>(store: &S, session: &Session) -> Result<(), Error> {
    let json = serde_json::to_string(session)?;

    store.set(CURRENT_USER_KEY, &json).await
}

/// Load the signed-in user, if any.
///
/// Read failures and a malformed stored session degrade to `None` (logged).
pub async fn current_session<S: KeyValueStore>(store: &S) -> Option<Session> {
    let raw = match store.get(CURRENT_USER_KEY).await {
        Ok(raw) => raw?,
        Err(error) => {
            tracing::warn!("could not read the current session: {error}");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(error) => {
            tracing::warn!("the stored session is malformed: {error}");
            None
        }
    }
}

/// The identifier of the signed-in user, if any.
///
/// This is the capability ledger callers need to scope their queries.
pub async fn current_user_id<S: KeyValueStore>(store: &S) -> Option<UserId> {
    current_session(store).await.map(|session| session.id)
}

/// Sign the current user out by clearing the persisted session.
///
/// The user's transactions and salary are not touched.
///
/// # Errors
/// Propagates [Error::StoreError] from the removal.
pub async fn clear_session<S: KeyValueStore>(store: &S) -> Result<(), Error> {
    store.remove(CURRENT_USER_KEY).await
}
