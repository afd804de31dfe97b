//! This file defines the type `Transaction`, the core type of the ledger, and
//! the draft type used to create new transactions.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;

use crate::Error;

time::serde::format_description!(entry_date_format, Date, "[year]-[month]-[day]");
time::serde::format_description!(entry_time_format, Time, "[hour]:[minute]");

/// Whether money was paid into a betting house or taken back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money paid into a betting house.
    Deposit,
    /// Money withdrawn from a betting house.
    Withdraw,
}

/// One deposit or withdrawal event tied to a betting house and an instant in
/// time.
///
/// Transactions are append-only: they are created once via
/// [TransactionDraft] and never edited or deleted. The `timestamp` field is
/// the authoritative instant used for sorting, month bucketing, and the
/// hour-of-day analytics; `date` and `time` are the informational entry-form
/// fields captured alongside it.
///
/// The serde representation matches the persisted JSON layout: camelCase
/// field names, a lowercase `type` tag, and an RFC 3339 `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier, a UUID v4 rendered as text.
    pub id: String,
    /// The amount of money moved, always greater than zero.
    pub amount: f64,
    /// Whether this is a deposit or a withdrawal.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Display name of the betting house. Free-form; case and whitespace
    /// variants are treated as distinct houses.
    pub betting_house: String,
    /// The calendar date entered on the form.
    #[serde(with = "entry_date_format")]
    pub date: Date,
    /// The time of day entered on the form.
    #[serde(with = "entry_time_format")]
    pub time: Time,
    /// The instant the transaction was recorded. Set exactly once at
    /// creation. A stored record with a missing or unparseable timestamp is
    /// recovered with the current instant rather than rejected.
    #[serde(default = "OffsetDateTime::now_utc", with = "lossy_timestamp")]
    pub timestamp: OffsetDateTime,
    /// Convenience `YYYY-MM` key derived from the creation instant.
    #[serde(default)]
    pub month_year: String,
    /// Convenience `DD-HH` key derived from the creation instant.
    #[serde(default)]
    pub day_hour: String,
}

/// The fields a caller supplies to record a new transaction.
///
/// The id, timestamp, and derived calendar keys are filled in by
/// [Ledger::add_transaction](crate::Ledger::add_transaction) at commit time.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// The amount of money to record. Must be finite and greater than zero.
    pub amount: f64,
    /// Whether this is a deposit or a withdrawal.
    pub kind: TransactionType,
    /// Display name of the betting house. Must not be empty.
    pub betting_house: String,
    /// The calendar date entered on the form.
    pub date: Date,
    /// The time of day entered on the form.
    pub time: Time,
}

impl TransactionDraft {
    /// Create a draft with the form date and time defaulting to the current
    /// local wall clock.
    pub fn new(amount: f64, kind: TransactionType, betting_house: impl Into<String>) -> Self {
        let now = local_now();

        Self {
            amount,
            kind,
            betting_house: betting_house.into(),
            date: now.date(),
            time: now.time(),
        }
    }

    /// Set the form date for the draft.
    pub fn date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }

    /// Set the form time for the draft.
    pub fn time(mut self, time: Time) -> Self {
        self.time = time;
        self
    }

    /// Check the draft against the data-model invariants.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if the amount is not a finite value
    /// greater than zero, or [Error::EmptyBettingHouse] if the betting house
    /// is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if self.betting_house.trim().is_empty() {
            return Err(Error::EmptyBettingHouse);
        }

        Ok(())
    }

    /// Finalize the draft into a [Transaction] recorded at `now`.
    ///
    /// The id is a freshly generated UUID v4 and the calendar keys are
    /// derived from `now`, not from the form fields.
    pub(crate) fn into_transaction(self, now: OffsetDateTime) -> Transaction {
        Transaction {
            id: Uuid::new_v4().to_string(),
            amount: self.amount,
            kind: self.kind,
            betting_house: self.betting_house,
            date: self.date,
            time: self.time,
            timestamp: now,
            month_year: month_key(now),
            day_hour: day_hour_key(now),
        }
    }
}

/// The `YYYY-MM` calendar-month key for an instant, e.g. `2025-08`.
///
/// All month bucketing (summaries, the deposit guard's month-to-date total)
/// uses this key.
pub fn month_key(instant: OffsetDateTime) -> String {
    format!("{:04}-{:02}", instant.year(), u8::from(instant.month()))
}

/// The `DD-HH` day-of-month and hour-of-day key for an instant, e.g. `07-22`.
pub(crate) fn day_hour_key(instant: OffsetDateTime) -> String {
    format!("{:02}-{:02}", instant.day(), instant.hour())
}

/// The current instant with the local UTC offset, falling back to UTC when
/// the local offset cannot be determined.
pub(crate) fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Serde helpers for the authoritative timestamp.
///
/// Serializes as RFC 3339 text. Deserialization never fails: a value that
/// cannot be parsed is replaced with the current instant, matching the
/// silent-recovery contract for stored records.
mod lossy_timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    pub fn serialize<S: Serializer>(
        value: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text = value
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;

        Ok(text
            .and_then(|text| {
                OffsetDateTime::parse(&text, &Rfc3339)
                    .inspect_err(|error| {
                        tracing::warn!(
                            "substituting the current instant for unparseable timestamp \
                            \"{text}\": {error}"
                        );
                    })
                    .ok()
            })
            .unwrap_or_else(OffsetDateTime::now_utc))
    }
}
