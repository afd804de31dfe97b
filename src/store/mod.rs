//! Contains the persistence contract the ledger is written against and the
//! key space the tracker's data lives under.

mod memory;

use std::future::Future;

pub use memory::MemoryStore;

use crate::{Error, models::UserId};

/// Key holding the active session, a JSON object `{email, id}`.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Key holding the global user set, a JSON array of `{email, password}`.
pub const ALL_USERS_KEY: &str = "allUsers";

/// The key under which a user's transaction set is stored.
pub fn transactions_key(user: &UserId) -> String {
    format!("transactions:{user}")
}

/// The key under which a user's salary reference is stored.
pub fn salary_key(user: &UserId) -> String {
    format!("salary:{user}")
}

/// An asynchronous string-keyed store of string values.
///
/// This is the only persistence capability the ledger depends on. The
/// contract is deliberately weak, mirroring what on-device key-value
/// substrates actually guarantee: single-key last-write-wins, no
/// transactions, and no atomicity across keys. Any invariant spanning
/// multiple keys is best-effort sequential in the caller.
pub trait KeyValueStore {
    /// Fetch the value stored at `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send;

    /// Overwrite the value stored at `key`.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), Error>> + Send;

    /// Delete the value stored at `key`, if any.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send;
}
