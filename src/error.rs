//! Defines the crate level error type.

/// The errors that may occur while recording or reading ledger data.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    /// A transaction draft was submitted with a zero, negative, or non-finite
    /// amount.
    ///
    /// Transactions record money actually moved, so the amount must be a
    /// finite value greater than zero.
    #[error("transaction amounts must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// A transaction draft was submitted without a betting house.
    #[error("a betting house must be provided")]
    EmptyBettingHouse,

    /// A negative or non-finite value was used to update the salary
    /// reference.
    #[error("salary must be a non-negative number, got {0}")]
    InvalidSalary(f64),

    /// The email used to register is already present in the user set. The
    /// client should try again with a different email address.
    #[error("the email \"{0}\" is already registered")]
    DuplicateEmail(String),

    /// The underlying key-value store reported a failure.
    ///
    /// Reads recover from this by degrading to an empty or zero default;
    /// writes propagate it so the caller can report the failed operation.
    #[error("the storage backend failed: {0}")]
    StoreError(String),

    /// A value could not be serialized as JSON before being written to the
    /// store.
    #[error("could not serialize as JSON: {0}")]
    JsonError(String),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JsonError(value.to_string())
    }
}
