//! This file defines the `Ledger`, the durable per-user record of
//! transactions and the salary reference.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    DepositGuard, Error, GuardVerdict,
    models::{Credential, Transaction, TransactionDraft, UserId, local_now},
    store::{KeyValueStore, salary_key, transactions_key},
};

/// The result of a guarded add-transaction attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The transaction was recorded.
    Committed(Transaction),
    /// Nothing was written: committing would push the month's deposits past
    /// the warning threshold. To proceed, confirm with the user and call
    /// [Ledger::add_transaction]; to cancel, simply drop the draft.
    ConfirmationRequired {
        /// The month-to-date deposit total the commit would produce.
        projected_total: f64,
    },
}

/// The per-user durable record of transactions and the salary reference.
///
/// Each user's transaction set is persisted as a single JSON blob under
/// `transactions:<userId>`, so recording a transaction is a
/// read-modify-write of the whole set. The ledger serializes those writes
/// per user through a keyed async lock, which closes the lost-update window
/// within one process. The underlying store offers no cross-process
/// isolation, so two separate processes writing the same user can still
/// race; last write wins.
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
    guard: DepositGuard,
    user_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Create a ledger over `store` with the default deposit guard.
    pub fn new(store: S) -> Self {
        Self::with_guard(store, DepositGuard::default())
    }

    /// Create a ledger over `store` with a custom deposit guard.
    pub fn with_guard(store: S, guard: DepositGuard) -> Self {
        Self {
            store,
            guard,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The deposit guard applied by [Ledger::add_transaction_checked].
    pub fn guard(&self) -> &DepositGuard {
        &self.guard
    }

    /// Load the user's transactions, most recent first.
    ///
    /// An absent key yields an empty set, as does a store failure or a
    /// malformed stored value; read problems are logged and degraded rather
    /// than surfaced, so a fresh or damaged ledger reads as empty. Records
    /// with a missing or unparseable timestamp come back with the current
    /// instant substituted.
    ///
    /// The result is sorted by timestamp descending with a stable sort, so
    /// records sharing a timestamp keep their storage order.
    pub async fn load_transactions(&self, user: &UserId) -> Vec<Transaction> {
        let raw = match self.store.get(&transactions_key(user)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!("could not read transactions for {user}: {error}");
                return Vec::new();
            }
        };

        let mut transactions: Vec<Transaction> = match serde_json::from_str(&raw) {
            Ok(transactions) => transactions,
            Err(error) => {
                tracing::warn!("stored transactions for {user} are malformed: {error}");
                return Vec::new();
            }
        };

        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        transactions
    }

    /// Overwrite the user's stored transaction set.
    ///
    /// This is a single-key write: the store's own last-write-wins guarantee
    /// is all the durability on offer.
    ///
    /// # Errors
    /// Returns [Error::JsonError] if the set cannot be serialized, or
    /// [Error::StoreError] if the store rejects the write.
    pub async fn save_transactions(
        &self,
        user: &UserId,
        transactions: &[Transaction],
    ) -> Result<(), Error> {
        let json = serde_json::to_string(transactions)?;

        self.store.set(&transactions_key(user), &json).await
    }

    /// Record a new transaction for the user.
    ///
    /// The draft is validated, stamped with a fresh UUID and the current
    /// instant, appended to the loaded set, and written back. The
    /// read-modify-write runs under a per-user lock so concurrent calls for
    /// the same user cannot drop each other's appends.
    ///
    /// This bypasses the deposit guard; use
    /// [Ledger::add_transaction_checked] on the ordinary write path and call
    /// this directly only once the user has confirmed a warned deposit.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] or [Error::EmptyBettingHouse] for
    /// an invalid draft, and propagates [Error::StoreError] /
    /// [Error::JsonError] from the write.
    pub async fn add_transaction(
        &self,
        user: &UserId,
        draft: TransactionDraft,
    ) -> Result<Transaction, Error> {
        draft.validate()?;

        let lock = self.write_lock(user);
        let _guard = lock.lock().await;

        let mut transactions = self.load_transactions(user).await;
        let transaction = draft.into_transaction(local_now());
        transactions.push(transaction.clone());

        self.save_transactions(user, &transactions).await?;

        Ok(transaction)
    }

    /// Record a new transaction, applying the monthly-deposit soft limit
    /// first.
    ///
    /// Deposits that would push the month-to-date total past the guard's
    /// threshold are not written; the caller gets
    /// [AddOutcome::ConfirmationRequired] with the projected total and is
    /// expected to ask the user before committing via
    /// [Ledger::add_transaction]. Withdrawals and unwarned deposits commit
    /// immediately.
    ///
    /// # Errors
    /// Same as [Ledger::add_transaction].
    pub async fn add_transaction_checked(
        &self,
        user: &UserId,
        draft: TransactionDraft,
    ) -> Result<AddOutcome, Error> {
        draft.validate()?;

        let transactions = self.load_transactions(user).await;

        match self.guard.check(&transactions, &draft, local_now()) {
            GuardVerdict::Warned { projected_total } => {
                Ok(AddOutcome::ConfirmationRequired { projected_total })
            }
            GuardVerdict::Clear => self
                .add_transaction(user, draft)
                .await
                .map(AddOutcome::Committed),
        }
    }

    /// Load the user's salary reference.
    ///
    /// Returns 0 when the salary is unset, unreadable, or unparseable; read
    /// problems are logged and degraded rather than surfaced.
    pub async fn load_salary(&self, user: &UserId) -> f64 {
        let raw = match self.store.get(&salary_key(user)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return 0.0,
            Err(error) => {
                tracing::warn!("could not read the salary for {user}: {error}");
                return 0.0;
            }
        };

        match raw.trim().parse() {
            Ok(salary) => salary,
            Err(error) => {
                tracing::warn!("stored salary for {user} is malformed (\"{raw}\"): {error}");
                0.0
            }
        }
    }

    /// Overwrite the user's salary reference.
    ///
    /// # Errors
    /// Returns [Error::InvalidSalary] if `salary` is negative or non-finite,
    /// and propagates [Error::StoreError] from the write.
    pub async fn save_salary(&self, user: &UserId, salary: f64) -> Result<(), Error> {
        if !salary.is_finite() || salary < 0.0 {
            return Err(Error::InvalidSalary(salary));
        }

        self.store.set(&salary_key(user), &salary.to_string()).await
    }

    /// Register a new user and zero-initialize their ledger.
    ///
    /// Appends the credential pair to the global user set, then writes an
    /// empty transaction set and a zero salary for the new user. The three
    /// writes are sequential and best-effort: the store has no cross-key
    /// atomicity, so a failure partway through is reported but not rolled
    /// back.
    ///
    /// # Errors
    /// Returns [Error::DuplicateEmail] if `email` is already registered, and
    /// propagates store and serialization failures. Unlike the read paths, a
    /// failure to read the existing user set fails the registration: a
    /// degraded-to-empty read here would let a new registration clobber
    /// every existing account.
    pub async fn register_user(&self, email: &str, password: &str) -> Result<(), Error> {
        let mut credentials = Credential::load_all(&self.store).await?;

        if credentials.iter().any(|credential| credential.email == email) {
            return Err(Error::DuplicateEmail(email.to_owned()));
        }

        credentials.push(Credential {
            email: email.to_owned(),
            password: password.to_owned(),
        });
        Credential::save_all(&self.store, &credentials).await?;

        let user = UserId::new(email);
        self.save_salary(&user, 0.0).await?;
        self.save_transactions(&user, &[]).await?;

        Ok(())
    }

    fn write_lock(&self, user: &UserId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.user_locks.lock().unwrap();

        locks.entry(user.as_str().to_owned()).or_default().clone()
    }
}
