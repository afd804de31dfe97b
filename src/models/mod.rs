//! Defines the domain models: transactions, users, and the calendar keys
//! derived from transaction timestamps.

mod transaction;
mod user;

pub use transaction::{Transaction, TransactionDraft, TransactionType, month_key};
pub(crate) use transaction::local_now;
pub use user::{Credential, UserId};
