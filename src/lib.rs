//! Stakeguard is the core of a local-first gambling-expense tracker: a
//! durable per-user ledger of deposits and withdrawals against betting
//! houses, a pure aggregation engine for spending summaries and behavioural
//! analytics, and a soft-limit guard that asks for confirmation before a
//! month's deposits run past a threshold.
//!
//! All state lives in an embedder-supplied [KeyValueStore] as JSON blobs;
//! there is no server and no sync. The presentation layer is expected to
//! drive the [Ledger] write path, render [Summary] values from
//! [summarize], and scope everything by the identity in [session].
//!
//! # Overview
//!
//! - [Ledger] — per-user transaction records and the salary reference,
//!   append-only, with per-user write serialization.
//! - [summarize] / [peak_deposit_hour] — pure computation over a loaded
//!   transaction set: totals, monthly breakdowns, most-used houses, percent
//!   of salary spent, peak deposit hour.
//! - [DepositGuard] — the monthly-deposit warning threshold, surfaced
//!   through [Ledger::add_transaction_checked].
//! - [session] — login validation and the persisted current-user session.
//! - [MemoryStore] — an in-memory [KeyValueStore] for tests and embedders
//!   with their own durability.

#![warn(missing_docs)]

mod deposit_guard;
mod error;
mod ledger;
mod models;
pub mod session;
mod store;
mod summary;

pub use deposit_guard::{DepositGuard, GuardVerdict, MONTHLY_DEPOSIT_WARNING_THRESHOLD};
pub use error::Error;
pub use ledger::{AddOutcome, Ledger};
pub use models::{Transaction, TransactionDraft, TransactionType, UserId, month_key};
pub use store::{
    ALL_USERS_KEY, CURRENT_USER_KEY, KeyValueStore, MemoryStore, salary_key, transactions_key,
};
pub use summary::{
    HouseUsage, MonthlySummary, NO_BETTING_HOUSE, NO_PEAK_HOUR, Summary, peak_deposit_hour,
    summarize,
};
