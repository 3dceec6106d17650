use chrono::NaiveDateTime;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A child wallet is folded into more than one parent.
    AmbiguousWalletMapping { child: String, parents: Vec<String> },
    /// A parent wallet is itself listed as the child of another parent.
    NestedWalletMapping { wallet: String, parent: String },
    /// A wallet appears in the data but has no initial balance entry.
    MissingInitialBalance { wallet: String },
    /// An initial balance override couldn't be parsed.
    InvalidInitialBalance { variable: String, value: String },
    /// Required columns are missing from the input.
    MissingColumns { source: String, columns: Vec<String> },
    InvalidDate { row: usize, value: String },
    InvalidAmount { row: usize, value: String },
    NoInputFiles { path: PathBuf },
    /// A period sum or running balance doesn't fit into a decimal.
    BalanceOverflow { wallet: String, date: NaiveDateTime },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousWalletMapping { child, parents } => write!(
                f,
                "wallet '{child}' is mapped into more than one parent: {}",
                parents.join(", ")
            ),
            Self::NestedWalletMapping { wallet, parent } => write!(
                f,
                "wallet '{wallet}' is a parent but also a child of '{parent}', nested wallet mappings are not supported"
            ),
            Self::MissingInitialBalance { wallet } => {
                write!(f, "no initial balance configured for wallet '{wallet}'")
            }
            Self::InvalidInitialBalance { variable, value } => {
                write!(f, "initial balance {variable}={value:?} is not a number")
            }
            Self::MissingColumns { source, columns } => {
                write!(f, "{source}: missing columns {}", columns.join(", "))
            }
            Self::InvalidDate { row, value } => {
                write!(f, "row {row}: cannot parse date {value:?}")
            }
            Self::InvalidAmount { row, value } => {
                write!(f, "row {row}: cannot parse amount {value:?}")
            }
            Self::NoInputFiles { path } => {
                write!(f, "no CSV files found in {}", path.display())
            }
            Self::BalanceOverflow { wallet, date } => {
                write!(f, "balance of wallet '{wallet}' overflows at {date}")
            }
        }
    }
}

impl std::error::Error for LedgerError {}
