use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// Where a ledger entry comes from.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[default]
    Export,
    OpeningBalance,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDateTime,
    pub wallet: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub label: Option<String>,
    /// The export's `type` column, e.g. "Expense" or "Incoming Transfer".
    pub kind: Option<String>,
    pub category: Option<String>,
    pub origin: Origin,
}

impl Transaction {
    pub fn opening_balance(wallet: String, date: NaiveDateTime, amount: Decimal) -> Self {
        Self {
            date,
            wallet,
            amount,
            label: None,
            kind: None,
            category: None,
            origin: Origin::OpeningBalance,
        }
    }

    pub fn is_opening_balance(&self) -> bool {
        self.origin == Origin::OpeningBalance
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses the date formats found in wallet exports. Timestamps with a UTC
/// offset keep their local wall-clock time.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|date| date.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
