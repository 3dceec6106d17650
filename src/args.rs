use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::balance::Frequency;
use crate::export::OutputFormat;

/// Reconstruct wallet balances over time from per-wallet transaction exports.
///
/// Initial balances are read from one environment variable per wallet (e.g.
/// `CASH_WALLET=12.50`), defaulting to 0.
#[derive(Parser, Debug)]
pub struct Args {
    /// Directory with one CSV export per wallet
    #[clap(short, long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// YAML file replacing the built-in wallet registry
    #[clap(short, long, global = true)]
    pub registry: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the configured wallets, how they're grouped and their initial balances
    Wallets,

    /// Print the processed transactions
    Transactions {
        /// Only show these wallets (after grouping). Can be given multiple times.
        #[clap(short, long = "wallet")]
        wallets: Vec<String>,
    },

    /// Compute the balance of every wallet over time
    Balances {
        #[clap(short, long, value_enum, default_value_t)]
        freq: Frequency,

        #[clap(long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
