use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use crate::error::LedgerError;

pub mod catalog;
mod file;
mod mapping;

pub use file::{RegistryFile, WalletConfig};
pub use mapping::WalletMapping;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletRole {
    Parent,
    Child { parent: String },
    Standalone,
}

/// The set of known wallets, their initial balances and how they're grouped.
///
/// Built once and shared read-only between ledgers.
#[derive(Debug, Clone)]
pub struct WalletRegistry {
    all_wallets: BTreeSet<String>,
    initial_balances: HashMap<String, Decimal>,
    wallet_mapping: WalletMapping,
    reverse_mapping: HashMap<String, String>,
}

impl WalletRegistry {
    pub fn new(
        all_wallets: BTreeSet<String>,
        initial_balances: HashMap<String, Decimal>,
        wallet_mapping: WalletMapping,
    ) -> Result<Self, LedgerError> {
        let reverse_mapping = wallet_mapping.reverse()?;
        Ok(Self {
            all_wallets,
            initial_balances,
            wallet_mapping,
            reverse_mapping,
        })
    }

    /// The built-in wallet catalog with initial balances read from the environment.
    pub fn from_env() -> Result<Self, LedgerError> {
        Self::from_env_with(|variable| std::env::var(variable).ok())
    }

    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LedgerError> {
        let mut initial_balances = HashMap::new();
        for &(wallet, variable) in catalog::WALLETS {
            let balance = parse_initial_balance(variable, lookup(variable))?.unwrap_or(Decimal::ZERO);
            initial_balances.insert(wallet.to_string(), balance);
        }
        let all_wallets = initial_balances.keys().cloned().collect();
        Self::new(all_wallets, initial_balances, catalog::wallet_mapping())
    }

    pub fn all_wallets(&self) -> &BTreeSet<String> {
        &self.all_wallets
    }

    pub fn initial_balances(&self) -> &HashMap<String, Decimal> {
        &self.initial_balances
    }

    pub fn wallet_mapping(&self) -> &WalletMapping {
        &self.wallet_mapping
    }

    pub fn reverse_mapping(&self) -> &HashMap<String, String> {
        &self.reverse_mapping
    }

    pub fn initial_balance(&self, wallet: &str) -> Decimal {
        self.initial_balances
            .get(wallet)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Like [Self::initial_balance], but a wallet without an entry is an error.
    pub fn lookup_initial_balance(&self, wallet: &str) -> Result<Decimal, LedgerError> {
        self.initial_balances
            .get(wallet)
            .copied()
            .ok_or_else(|| LedgerError::MissingInitialBalance {
                wallet: wallet.to_string(),
            })
    }

    pub fn role(&self, wallet: &str) -> WalletRole {
        if self.wallet_mapping.is_parent(wallet) {
            WalletRole::Parent
        } else if let Some(parent) = self.reverse_mapping.get(wallet) {
            WalletRole::Child {
                parent: parent.clone(),
            }
        } else {
            WalletRole::Standalone
        }
    }
}

pub(crate) fn parse_initial_balance(
    variable: &str,
    value: Option<String>,
) -> Result<Option<Decimal>, LedgerError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(Some)
        .map_err(|_| LedgerError::InvalidInitialBalance {
            variable: variable.to_string(),
            value,
        })
}
