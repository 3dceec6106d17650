use anyhow::{ensure, Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use super::{parse_initial_balance, WalletMapping, WalletRegistry};

/// A wallet registry read from a YAML file, replacing the built-in catalog.
///
/// ```yaml
/// wallets:
///   - name: Checking
///     env: CHECKING_WALLET
///     initial_balance: 250
///   - name: Groceries
/// wallet_mapping:
///   Checking: [Groceries]
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistryFile {
    pub wallets: Vec<WalletConfig>,
    #[serde(default)]
    pub wallet_mapping: WalletMapping,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    pub name: String,
    /// Environment variable that overrides `initial_balance` when set.
    #[serde(default)]
    pub env: Option<String>,
    #[serde(default)]
    pub initial_balance: Option<Decimal>,
}

impl RegistryFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading wallet registry from {}...", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        log::info!("Loading wallet registry...done");
        Ok(file)
    }

    pub fn into_registry(self, lookup: impl Fn(&str) -> Option<String>) -> Result<WalletRegistry> {
        let mut all_wallets = BTreeSet::new();
        let mut initial_balances = HashMap::new();
        for wallet in self.wallets {
            ensure!(
                !all_wallets.contains(&wallet.name),
                "Wallet '{}' is listed more than once",
                wallet.name
            );
            let from_env = match &wallet.env {
                Some(variable) => parse_initial_balance(variable, lookup(variable))?,
                None => None,
            };
            let balance = from_env
                .or(wallet.initial_balance)
                .unwrap_or(Decimal::ZERO);
            initial_balances.insert(wallet.name.clone(), balance);
            all_wallets.insert(wallet.name);
        }
        Ok(WalletRegistry::new(
            all_wallets,
            initial_balances,
            self.wallet_mapping,
        )?)
    }
}
