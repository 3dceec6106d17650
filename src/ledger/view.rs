use std::collections::HashSet;

use super::Transaction;

/// Read access to a processed ledger.
pub trait LedgerView {
    fn entries(&self) -> &[Transaction];

    /// Entries booked on one of the given wallets, in ledger order.
    fn filter_wallets(&self, wallets: &[impl AsRef<str>]) -> Vec<Transaction> {
        filter_wallets(self.entries(), wallets)
    }

    /// Wallets that have at least one entry, in order of first appearance.
    fn distinct_wallets(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries()
            .iter()
            .map(|entry| entry.wallet.as_str())
            .filter(|wallet| seen.insert(*wallet))
            .collect()
    }
}

pub fn filter_wallets(entries: &[Transaction], wallets: &[impl AsRef<str>]) -> Vec<Transaction> {
    let wallets: HashSet<&str> = wallets.iter().map(|wallet| wallet.as_ref()).collect();
    entries
        .iter()
        .filter(|entry| wallets.contains(entry.wallet.as_str()))
        .cloned()
        .collect()
}

/// A read-only slice of an already processed [super::WalletLedger].
///
/// The entries are taken as they are: opening balances and wallet remapping
/// already happened on the full ledger.
#[derive(Debug, Clone)]
pub struct WalletGroup {
    wallets: Vec<String>,
    entries: Vec<Transaction>,
}

impl WalletGroup {
    pub(super) fn new(wallets: Vec<String>, entries: Vec<Transaction>) -> Self {
        Self { wallets, entries }
    }

    /// The wallets this group was created for.
    pub fn wallets(&self) -> &[String] {
        &self.wallets
    }
}

impl LedgerView for WalletGroup {
    fn entries(&self) -> &[Transaction] {
        &self.entries
    }
}
