//! This file defines the types identifying a user of the tracker.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, store::{ALL_USERS_KEY, KeyValueStore}};

/// A newtype wrapper for user identifiers.
///
/// The tracker uses the registration email as both the login key and the
/// namespace under which the user's ledger data is stored. The wrapper keeps
/// user ids from being confused with other strings and gives key-derivation
/// functions a concrete type to hang off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered email and password pair, stored under the global user set.
///
/// Passwords are kept in plain text: the tracker is a single-user on-device
/// app and real credential security is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The registration email, also the user's ledger namespace.
    pub email: String,
    /// The password as entered at registration.
    pub password: String,
}

impl Credential {
    /// Load the global user set from the store.
    ///
    /// An absent key yields an empty set. A store or parse failure is
    /// propagated so that registration cannot silently clobber an existing
    /// user set it failed to read.
    pub(crate) async fn load_all<S: KeyValueStore>(store: &S) -> Result<Vec<Credential>, Error> {
        let raw = match store.get(ALL_USERS_KEY).await? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    /// Overwrite the global user set in the store.
    pub(crate) async fn save_all<S: KeyValueStore>(
        store: &S,
        credentials: &[Credential],
    ) -> Result<(), Error> {
        let json = serde_json::to_string(credentials)?;

        store.set(ALL_USERS_KEY, &json).await
    }
}
