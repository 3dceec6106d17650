use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike as _};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::LedgerError;
use crate::ledger::Transaction;

/// Synthetic wallet holding the sum over all wallets.
pub const TOTAL_WALLET: &str = "Total";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[value(alias = "H")]
    Hourly,
    #[default]
    #[value(alias = "D")]
    Daily,
}

impl Frequency {
    /// Start of the bucket `date` falls into.
    pub fn floor(&self, date: NaiveDateTime) -> NaiveDateTime {
        let midnight = NaiveDateTime::new(date.date(), NaiveTime::MIN);
        match self {
            Self::Hourly => midnight + Duration::hours(i64::from(date.hour())),
            Self::Daily => midnight,
        }
    }

    pub fn step(&self) -> Duration {
        match self {
            Self::Hourly => Duration::hours(1),
            Self::Daily => Duration::days(1),
        }
    }

    /// Bucket starts from `floor(first)` to `floor(last)`, both inclusive.
    pub fn buckets(&self, first: NaiveDateTime, last: NaiveDateTime) -> Vec<NaiveDateTime> {
        let last = self.floor(last);
        let mut bucket = self.floor(first);
        let mut buckets = Vec::new();
        while bucket <= last {
            buckets.push(bucket);
            bucket += self.step();
        }
        buckets
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BalanceRow {
    pub date: NaiveDateTime,
    pub wallet: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub period_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
}

/// Running balance per wallet and for [TOTAL_WALLET] on a regular time grid.
///
/// Every wallet gets a row for every bucket between the first and the last entry,
/// with a zero `period_amount` for buckets without activity. Rows are ordered by
/// date, and within a date by first appearance of the wallet in `entries`, with
/// the total last.
pub fn balance_over_time(
    entries: &[Transaction],
    frequency: Frequency,
) -> Result<Vec<BalanceRow>, LedgerError> {
    let (Some(first), Some(last)) = (
        entries.iter().map(|entry| entry.date).min(),
        entries.iter().map(|entry| entry.date).max(),
    ) else {
        return Ok(vec![]);
    };

    let wallets = wallets_with_total(entries);
    let sums = period_sums(entries, frequency)?;
    let buckets = frequency.buckets(first, last);

    let mut balances = vec![Decimal::ZERO; wallets.len()];
    let mut rows = Vec::with_capacity(buckets.len() * wallets.len());
    for bucket in buckets {
        for (wallet, balance) in wallets.iter().zip(balances.iter_mut()) {
            let period_amount = sums
                .get(&(*wallet, bucket))
                .copied()
                .unwrap_or(Decimal::ZERO);
            *balance = balance
                .checked_add(period_amount)
                .ok_or_else(|| overflow(wallet, bucket))?;
            rows.push(BalanceRow {
                date: bucket,
                wallet: wallet.to_string(),
                period_amount,
                balance: *balance,
            });
        }
    }
    Ok(rows)
}

fn wallets_with_total(entries: &[Transaction]) -> Vec<&str> {
    let mut wallets: Vec<&str> = Vec::new();
    for entry in entries {
        if !wallets.contains(&entry.wallet.as_str()) {
            wallets.push(&entry.wallet);
        }
    }
    if wallets.contains(&TOTAL_WALLET) {
        log::warn!("A wallet is called '{TOTAL_WALLET}', its balance will be merged with the total");
        wallets.retain(|wallet| *wallet != TOTAL_WALLET);
    }
    wallets.push(TOTAL_WALLET);
    wallets
}

/// Sum of amounts per (wallet, bucket). Each entry counts for its own wallet and
/// for the total, entries of a wallet called [TOTAL_WALLET] only once. Buckets
/// without entries are absent.
fn period_sums(
    entries: &[Transaction],
    frequency: Frequency,
) -> Result<HashMap<(&str, NaiveDateTime), Decimal>, LedgerError> {
    let mut sums: HashMap<(&str, NaiveDateTime), Decimal> = HashMap::new();
    for entry in entries {
        let bucket = frequency.floor(entry.date);
        add_to_sum(&mut sums, (entry.wallet.as_str(), bucket), entry.amount)?;
        if entry.wallet != TOTAL_WALLET {
            add_to_sum(&mut sums, (TOTAL_WALLET, bucket), entry.amount)?;
        }
    }
    Ok(sums)
}

fn add_to_sum<'a>(
    sums: &mut HashMap<(&'a str, NaiveDateTime), Decimal>,
    key: (&'a str, NaiveDateTime),
    amount: Decimal,
) -> Result<(), LedgerError> {
    let sum = sums.entry(key).or_default();
    *sum = sum
        .checked_add(amount)
        .ok_or_else(|| overflow(key.0, key.1))?;
    Ok(())
}

fn overflow(wallet: &str, date: NaiveDateTime) -> LedgerError {
    LedgerError::BalanceOverflow {
        wallet: wallet.to_string(),
        date,
    }
}
