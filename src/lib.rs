pub mod args;
pub mod balance;
pub mod cli;
pub mod error;
pub mod export;
pub mod ledger;
pub mod loader;
pub mod registry;
pub mod schema;
mod terminal;

pub use balance::{balance_over_time, BalanceRow, Frequency, TOTAL_WALLET};
pub use error::LedgerError;
pub use ledger::{LedgerView, Origin, Transaction, WalletGroup, WalletLedger};
pub use loader::{CsvDirectory, LedgerSource, RawTable};
pub use registry::{WalletMapping, WalletRegistry};
pub use schema::ColumnSchema;
