//! Pure aggregation over a loaded transaction set: overall totals, monthly
//! breakdowns, most-used-house rankings, percent of salary spent, and the
//! peak deposit hour.
//!
//! Nothing in this module performs I/O; every function is a pure function of
//! the transactions, the salary reference, and an explicit `now` instant.

use std::collections::HashMap;

use time::OffsetDateTime;

use crate::models::{Transaction, TransactionType, month_key};

/// Sentinel house name reported when no transaction names a betting house.
pub const NO_BETTING_HOUSE: &str = "None";

/// Sentinel reported by [peak_deposit_hour] when no deposits are recorded.
pub const NO_PEAK_HOUR: &str = "no recorded time";

/// How often a betting house appears in a transaction set.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseUsage {
    /// The house's display name, or [NO_BETTING_HOUSE].
    pub name: String,
    /// How many transactions named the house.
    pub count: u32,
}

impl HouseUsage {
    fn none() -> Self {
        Self {
            name: NO_BETTING_HOUSE.to_owned(),
            count: 0,
        }
    }
}

/// Deposit and withdrawal totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    /// The month's `YYYY-MM` key.
    pub month: String,
    /// Sum of deposit amounts in the month.
    pub deposits: f64,
    /// Sum of withdrawal amounts in the month.
    pub withdrawals: f64,
    /// The most-used house among the month's transactions.
    pub most_used_house: HouseUsage,
}

/// The aggregated view of a user's ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Sum of all deposit amounts.
    pub total_deposited: f64,
    /// Sum of all withdrawal amounts.
    pub total_withdrawn: f64,
    /// The most-used house across the whole ledger.
    pub most_used_house: HouseUsage,
    /// Per-month breakdowns, most recent month first.
    pub months: Vec<MonthlySummary>,
    /// Percentage of the salary reference deposited in the calendar month of
    /// `now`, formatted to two decimal places. `"0.00"` whenever the salary
    /// is unset, so the figure never divides by zero.
    pub current_month_percent: String,
}

#[derive(Default)]
struct MonthBucket {
    deposits: f64,
    withdrawals: f64,
    houses: Vec<(String, u32)>,
}

/// Compute the aggregated view of `transactions` against a `salary`
/// reference, with "the current month" taken from `now`.
pub fn summarize(transactions: &[Transaction], salary: f64, now: OffsetDateTime) -> Summary {
    let mut total_deposited = 0.0;
    let mut total_withdrawn = 0.0;
    let mut overall_houses: Vec<(String, u32)> = Vec::new();
    let mut buckets: HashMap<String, MonthBucket> = HashMap::new();

    for transaction in transactions {
        let bucket = buckets
            .entry(month_key(transaction.timestamp))
            .or_default();

        match transaction.kind {
            TransactionType::Deposit => {
                bucket.deposits += transaction.amount;
                total_deposited += transaction.amount;
            }
            TransactionType::Withdraw => {
                bucket.withdrawals += transaction.amount;
                total_withdrawn += transaction.amount;
            }
        }

        // The ranking counts every transaction type, not only deposits,
        // matching the behaviour users already see. Records without a house
        // name are left out of the ranking entirely.
        if !transaction.betting_house.is_empty() {
            bump(&mut overall_houses, &transaction.betting_house);
            bump(&mut bucket.houses, &transaction.betting_house);
        }
    }

    let current_month_deposits = buckets
        .get(&month_key(now))
        .map(|bucket| bucket.deposits)
        .unwrap_or(0.0);
    let current_month_percent = if salary > 0.0 {
        format!("{:.2}", current_month_deposits / salary * 100.0)
    } else {
        "0.00".to_owned()
    };

    let most_used_house = most_used(&overall_houses);

    let mut months: Vec<MonthlySummary> = buckets
        .into_iter()
        .map(|(month, bucket)| MonthlySummary {
            month,
            deposits: bucket.deposits,
            withdrawals: bucket.withdrawals,
            most_used_house: most_used(&bucket.houses),
        })
        .collect();
    // Months are compared as parsed (year, month) pairs rather than as raw
    // strings, even though the two orders coincide for the YYYY-MM key.
    months.sort_by(|a, b| parse_month(&b.month).cmp(&parse_month(&a.month)));

    Summary {
        total_deposited,
        total_withdrawn,
        most_used_house,
        months,
        current_month_percent,
    }
}

/// The hour range in which the user deposits most often, e.g.
/// `"22:00 - 23:00"`, or [NO_PEAK_HOUR] when no deposits are recorded.
///
/// Only deposits count; the hour is taken from each transaction's timestamp
/// in the offset it was recorded with. Ties keep the hour seen first in the
/// input order.
pub fn peak_deposit_hour(transactions: &[Transaction]) -> String {
    let mut counts: Vec<(u8, u32)> = Vec::new();

    for transaction in transactions {
        if transaction.kind != TransactionType::Deposit {
            continue;
        }

        let hour = transaction.timestamp.hour();
        match counts.iter_mut().find(|(bucket, _)| *bucket == hour) {
            Some(entry) => entry.1 += 1,
            None => counts.push((hour, 1)),
        }
    }

    let mut peak: Option<(u8, u32)> = None;
    for &(hour, count) in &counts {
        if peak.map_or(true, |(_, best)| count > best) {
            peak = Some((hour, count));
        }
    }

    match peak {
        Some((hour, _)) => format!("{hour}:00 - {}:00", u32::from(hour) + 1),
        None => NO_PEAK_HOUR.to_owned(),
    }
}

fn bump(counts: &mut Vec<(String, u32)>, house: &str) {
    match counts.iter_mut().find(|(name, _)| name == house) {
        Some(entry) => entry.1 += 1,
        None => counts.push((house.to_owned(), 1)),
    }
}

// Strictly-greater comparison keeps the first house seen in input order on a
// tie.
fn most_used(counts: &[(String, u32)]) -> HouseUsage {
    let mut best = HouseUsage::none();

    for (name, count) in counts {
        if *count > best.count {
            best = HouseUsage {
                name: name.clone(),
                count: *count,
            };
        }
    }

    best
}

fn parse_month(key: &str) -> (i32, u8) {
    let mut parts = key.splitn(2, '-');
    let year = parts.next().and_then(|part| part.parse().ok()).unwrap_or(0);
    let month = parts.next().and_then(|part| part.parse().ok()).unwrap_or(0);

    (year, month)
}

#[cfg(test)]
mod summary_tests {
    use time::{OffsetDateTime, macros::datetime};

    use crate::models::{Transaction, TransactionDraft, TransactionType, month_key};

    use super::{NO_BETTING_HOUSE, NO_PEAK_HOUR, peak_deposit_hour, summarize};

    fn transaction_at(
        timestamp: OffsetDateTime,
        amount: f64,
        kind: TransactionType,
        house: &str,
    ) -> Transaction {
        TransactionDraft::new(amount, kind, house)
            .date(timestamp.date())
            .time(timestamp.time())
            .into_transaction(timestamp)
    }

    fn deposit_at(timestamp: OffsetDateTime, amount: f64, house: &str) -> Transaction {
        transaction_at(timestamp, amount, TransactionType::Deposit, house)
    }

    fn withdraw_at(timestamp: OffsetDateTime, amount: f64, house: &str) -> Transaction {
        transaction_at(timestamp, amount, TransactionType::Withdraw, house)
    }

    const NOW: OffsetDateTime = datetime!(2025-08-15 12:00 UTC);

    #[test]
    fn totals_sum_each_type_separately() {
        let transactions = vec![
            deposit_at(datetime!(2025-08-01 10:00 UTC), 100.0, "Bet365"),
            deposit_at(datetime!(2025-08-02 11:00 UTC), 50.5, "Blaze"),
            withdraw_at(datetime!(2025-08-03 12:00 UTC), 30.0, "Bet365"),
        ];

        let summary = summarize(&transactions, 0.0, NOW);

        assert_eq!(summary.total_deposited, 150.5);
        assert_eq!(summary.total_withdrawn, 30.0);
    }

    #[test]
    fn most_used_house_counts_all_transaction_types() {
        // A appears twice (one deposit, one withdrawal), B once.
        let transactions = vec![
            deposit_at(datetime!(2025-08-01 10:00 UTC), 10.0, "A"),
            deposit_at(datetime!(2025-08-02 10:00 UTC), 10.0, "B"),
            withdraw_at(datetime!(2025-08-03 10:00 UTC), 10.0, "A"),
        ];

        let summary = summarize(&transactions, 0.0, NOW);

        assert_eq!(summary.most_used_house.name, "A");
        assert_eq!(summary.most_used_house.count, 2);
    }

    #[test]
    fn most_used_house_tie_keeps_first_seen() {
        let transactions = vec![
            deposit_at(datetime!(2025-08-01 10:00 UTC), 10.0, "Betano"),
            deposit_at(datetime!(2025-08-02 10:00 UTC), 10.0, "Pixbet"),
            deposit_at(datetime!(2025-08-03 10:00 UTC), 10.0, "Pixbet"),
            deposit_at(datetime!(2025-08-04 10:00 UTC), 10.0, "Betano"),
        ];

        let summary = summarize(&transactions, 0.0, NOW);

        assert_eq!(summary.most_used_house.name, "Betano");
        assert_eq!(summary.most_used_house.count, 2);
    }

    #[test]
    fn most_used_house_is_sentinel_for_empty_ledger() {
        let summary = summarize(&[], 0.0, NOW);

        assert_eq!(summary.most_used_house.name, NO_BETTING_HOUSE);
        assert_eq!(summary.most_used_house.count, 0);
    }

    #[test]
    fn months_are_sorted_most_recent_first() {
        let transactions = vec![
            deposit_at(datetime!(2024-12-10 10:00 UTC), 10.0, "A"),
            deposit_at(datetime!(2025-02-10 10:00 UTC), 20.0, "A"),
            deposit_at(datetime!(2025-01-10 10:00 UTC), 30.0, "A"),
        ];

        let summary = summarize(&transactions, 0.0, NOW);

        let months: Vec<&str> = summary.months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2025-02", "2025-01", "2024-12"]);
    }

    #[test]
    fn monthly_breakdown_buckets_by_timestamp_month() {
        let transactions = vec![
            deposit_at(datetime!(2025-07-10 10:00 UTC), 100.0, "A"),
            withdraw_at(datetime!(2025-07-20 10:00 UTC), 40.0, "A"),
            deposit_at(datetime!(2025-08-05 10:00 UTC), 25.0, "B"),
        ];

        let summary = summarize(&transactions, 0.0, NOW);

        assert_eq!(summary.months.len(), 2);

        let august = &summary.months[0];
        assert_eq!(august.month, "2025-08");
        assert_eq!(august.deposits, 25.0);
        assert_eq!(august.withdrawals, 0.0);

        let july = &summary.months[1];
        assert_eq!(july.month, "2025-07");
        assert_eq!(july.deposits, 100.0);
        assert_eq!(july.withdrawals, 40.0);
    }

    #[test]
    fn monthly_most_used_house_is_scoped_to_the_month() {
        // B dominates overall, but July only ever saw A.
        let transactions = vec![
            deposit_at(datetime!(2025-07-10 10:00 UTC), 10.0, "A"),
            deposit_at(datetime!(2025-08-01 10:00 UTC), 10.0, "B"),
            deposit_at(datetime!(2025-08-02 10:00 UTC), 10.0, "B"),
            deposit_at(datetime!(2025-08-03 10:00 UTC), 10.0, "B"),
        ];

        let summary = summarize(&transactions, 0.0, NOW);

        let july = summary.months.iter().find(|m| m.month == "2025-07").unwrap();
        assert_eq!(july.most_used_house.name, "A");
        assert_eq!(july.most_used_house.count, 1);

        assert_eq!(summary.most_used_house.name, "B");
    }

    #[test]
    fn zero_salary_reports_zero_percent() {
        let transactions = vec![deposit_at(NOW, 10_000.0, "Bet365")];

        let summary = summarize(&transactions, 0.0, NOW);

        assert_eq!(summary.current_month_percent, "0.00");
    }

    #[test]
    fn percent_of_salary_is_rounded_to_two_decimals() {
        let transactions = vec![deposit_at(datetime!(2025-08-01 09:00 UTC), 1000.0, "Bet365")];

        let summary = summarize(&transactions, 3000.0, NOW);

        assert_eq!(summary.current_month_percent, "33.33");
    }

    #[test]
    fn percent_ignores_other_months_and_withdrawals() {
        let transactions = vec![
            deposit_at(datetime!(2025-07-01 09:00 UTC), 500.0, "Bet365"),
            withdraw_at(datetime!(2025-08-01 09:00 UTC), 500.0, "Bet365"),
            deposit_at(datetime!(2025-08-02 09:00 UTC), 250.0, "Bet365"),
        ];

        let summary = summarize(&transactions, 1000.0, NOW);

        assert_eq!(summary.current_month_percent, "25.00");
    }

    #[test]
    fn peak_hour_picks_the_busiest_deposit_hour() {
        let transactions = vec![
            deposit_at(datetime!(2025-08-01 10:15 UTC), 10.0, "A"),
            deposit_at(datetime!(2025-08-02 10:45 UTC), 10.0, "A"),
            deposit_at(datetime!(2025-08-03 14:00 UTC), 10.0, "A"),
        ];

        assert_eq!(peak_deposit_hour(&transactions), "10:00 - 11:00");
    }

    #[test]
    fn peak_hour_ignores_withdrawals() {
        let transactions = vec![
            withdraw_at(datetime!(2025-08-01 09:00 UTC), 10.0, "A"),
            withdraw_at(datetime!(2025-08-02 09:30 UTC), 10.0, "A"),
            deposit_at(datetime!(2025-08-03 14:00 UTC), 10.0, "A"),
        ];

        assert_eq!(peak_deposit_hour(&transactions), "14:00 - 15:00");
    }

    #[test]
    fn peak_hour_tie_keeps_first_seen_hour() {
        let transactions = vec![
            deposit_at(datetime!(2025-08-01 21:00 UTC), 10.0, "A"),
            deposit_at(datetime!(2025-08-02 09:00 UTC), 10.0, "A"),
        ];

        assert_eq!(peak_deposit_hour(&transactions), "21:00 - 22:00");
    }

    #[test]
    fn peak_hour_reports_sentinel_without_deposits() {
        assert_eq!(peak_deposit_hour(&[]), NO_PEAK_HOUR);

        let withdrawals_only = vec![withdraw_at(datetime!(2025-08-01 09:00 UTC), 10.0, "A")];
        assert_eq!(peak_deposit_hour(&withdrawals_only), NO_PEAK_HOUR);
    }

    #[test]
    fn current_month_key_matches_now() {
        // Guards the bucketing convention the percent figure relies on.
        assert_eq!(month_key(NOW), "2025-08");
    }
}
