use chrono::Duration;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use crate::balance::{self, BalanceRow, Frequency};
use crate::error::LedgerError;
use crate::loader::RawTable;
use crate::registry::{WalletMapping, WalletRegistry};
use crate::schema::{Column, ColumnSchema};

mod transaction;
mod view;

pub use transaction::{parse_date, Origin, Transaction};
pub use view::{filter_wallets, LedgerView, WalletGroup};

/// Problems found when checking a raw table against the registry and schema.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    /// Wallets that are configured but absent from the data, or the other way round.
    pub wallet_mismatch: BTreeSet<String>,
    pub missing_columns: Vec<Column>,
}

/// The processed transactions of all wallets: typed, prefixed with one opening
/// balance per wallet, and with child wallets folded into their parents.
#[derive(Debug, Clone)]
pub struct WalletLedger {
    registry: Arc<WalletRegistry>,
    entries: Vec<Transaction>,
}

impl WalletLedger {
    pub fn new(
        raw: &RawTable,
        registry: Arc<WalletRegistry>,
        schema: &ColumnSchema,
    ) -> Result<Self, LedgerError> {
        let diagnostics = validate(raw, &registry, schema);
        if !diagnostics.missing_columns.is_empty() {
            return Err(LedgerError::MissingColumns {
                source: "transaction table".to_string(),
                columns: diagnostics
                    .missing_columns
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect(),
            });
        }

        let entries = project(raw, schema)?;
        log::info!("Total amount of transactions = {}", entries.len());
        if let (Some(first), Some(last)) = (
            entries.iter().map(|entry| entry.date).min(),
            entries.iter().map(|entry| entry.date).max(),
        ) {
            log::info!("Data spans from {first} until {last}");
        }
        let entries = add_initial_balances(entries, &registry)?;
        let entries = combine_wallets(entries, registry.reverse_mapping());
        Ok(Self { registry, entries })
    }

    pub fn registry(&self) -> &WalletRegistry {
        &self.registry
    }

    /// Applies another grouping on top of this ledger's entries.
    pub fn combine_wallets(&self, mapping: &WalletMapping) -> Result<Vec<Transaction>, LedgerError> {
        log::debug!("Combining wallets: {mapping:?}");
        Ok(combine_wallets(self.entries.clone(), &mapping.reverse()?))
    }

    pub fn subgroup(&self, wallets: &[impl AsRef<str>]) -> WalletGroup {
        let wallets: Vec<String> = wallets.iter().map(|w| w.as_ref().to_string()).collect();
        log::debug!("Creating a wallet group with wallets: {wallets:?}");
        let entries = self.filter_wallets(&wallets);
        WalletGroup::new(wallets, entries)
    }

    pub fn balance_over_time(&self, frequency: Frequency) -> Result<Vec<BalanceRow>, LedgerError> {
        log::debug!("Retrieving balance over time");
        balance::balance_over_time(&self.entries, frequency)
    }
}

impl LedgerView for WalletLedger {
    fn entries(&self) -> &[Transaction] {
        &self.entries
    }
}

/// Compares the raw table with the configured wallets and columns.
///
/// Only logs. It's up to the caller to decide what's fatal.
pub fn validate(raw: &RawTable, registry: &WalletRegistry, schema: &ColumnSchema) -> Diagnostics {
    log::debug!("Testing the data");
    let data_wallets: BTreeSet<String> = raw
        .distinct_values(Column::Wallet.name())
        .into_iter()
        .map(str::to_string)
        .collect();
    let wallet_mismatch: BTreeSet<String> = registry
        .all_wallets()
        .symmetric_difference(&data_wallets)
        .cloned()
        .collect();
    if !wallet_mismatch.is_empty() {
        log::warn!("Difference in wallets between config and data: {wallet_mismatch:?}");
    }

    let missing_columns: Vec<Column> = schema
        .required()
        .iter()
        .copied()
        .filter(|column| raw.column_index(column.name()).is_none())
        .collect();
    if !missing_columns.is_empty() {
        log::error!("Columns found in config but not in data: {missing_columns:?}");
    }

    Diagnostics {
        wallet_mismatch,
        missing_columns,
    }
}

/// Keeps the schema's required columns and parses them into transactions.
pub fn project(raw: &RawTable, schema: &ColumnSchema) -> Result<Vec<Transaction>, LedgerError> {
    let index = |column: Column| {
        if schema.required().contains(&column) {
            raw.column_index(column.name())
        } else {
            None
        }
    };
    let (date, amount, wallet) = match (index(Column::Date), index(Column::Amount), index(Column::Wallet)) {
        (Some(date), Some(amount), Some(wallet)) => (date, amount, wallet),
        (date, amount, wallet) => {
            return Err(LedgerError::MissingColumns {
                source: "transaction table".to_string(),
                columns: [(Column::Date, date), (Column::Amount, amount), (Column::Wallet, wallet)]
                    .into_iter()
                    .filter(|(_, index)| index.is_none())
                    .map(|(column, _)| column.name().to_string())
                    .collect(),
            })
        }
    };
    let (label, kind, category) = (index(Column::Label), index(Column::Kind), index(Column::Category));

    raw.rows()
        .iter()
        .enumerate()
        .map(|(row_number, row)| {
            let row_number = row_number + 1;
            Ok(Transaction {
                date: parse_date(&row[date]).ok_or_else(|| LedgerError::InvalidDate {
                    row: row_number,
                    value: row[date].clone(),
                })?,
                wallet: row[wallet].clone(),
                amount: parse_amount(&row[amount]).ok_or_else(|| LedgerError::InvalidAmount {
                    row: row_number,
                    value: row[amount].clone(),
                })?,
                label: label.map(|index| row[index].clone()),
                kind: kind.map(|index| row[index].clone()),
                category: category.map(|index| row[index].clone()),
                origin: Origin::Export,
            })
        })
        .collect()
}

fn parse_amount(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

/// Prepends one opening balance per wallet, dated one day before the earliest
/// entry of any wallet.
pub fn add_initial_balances(
    entries: Vec<Transaction>,
    registry: &WalletRegistry,
) -> Result<Vec<Transaction>, LedgerError> {
    log::debug!("Adding initial balances");
    let Some(first_date) = entries.iter().map(|entry| entry.date).min() else {
        return Ok(entries);
    };
    let date = first_date - Duration::days(1);

    let mut wallets: Vec<&str> = Vec::new();
    for entry in &entries {
        if !wallets.contains(&entry.wallet.as_str()) {
            wallets.push(&entry.wallet);
        }
    }
    let mut result = wallets
        .into_iter()
        .map(|wallet| {
            let amount = registry.lookup_initial_balance(wallet.trim())?;
            Ok(Transaction::opening_balance(wallet.to_string(), date, amount))
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;
    result.extend(entries);
    Ok(result)
}

/// Renames child wallets to their parent. Wallets without a parent are kept.
pub fn combine_wallets(
    mut entries: Vec<Transaction>,
    reverse_mapping: &HashMap<String, String>,
) -> Vec<Transaction> {
    for entry in &mut entries {
        if let Some(parent) = reverse_mapping.get(&entry.wallet) {
            entry.wallet = parent.clone();
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use common_macros::hash_map;
    use std::collections::HashSet;

    use super::*;
    use crate::registry::catalog::*;

    const COLUMNS: [&str; 6] = ["date", "label", "type", "amount", "wallet", "category"];

    fn raw_table(rows: &[(&str, &str, &str)]) -> RawTable {
        RawTable::new(
            COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .enumerate()
                .map(|(i, (date, amount, wallet))| {
                    vec![
                        date.to_string(),
                        format!("Label{i}"),
                        ["Incoming Transfer", "Outgoing Transfer", "Expense", "Income"][i % 4].to_string(),
                        amount.to_string(),
                        wallet.to_string(),
                        format!("Category{}", i % 3),
                    ]
                })
                .collect(),
        )
    }

    fn sample_data() -> RawTable {
        raw_table(&[
            ("2023-01-01", "100", DUO_DEBT_WALLET),
            ("2023-01-01", "-50", WBW_SISTER),
            ("2023-01-01", "75", WBW_FRIENDS),
            ("2023-01-01", "-30", WBW_DISPUUT),
            ("2023-01-01", "200", CASH_WALLET),
            ("2023-01-02", "-10", ING_WALLET),
            ("2023-01-02", "30", KOOPZEGEL_WALLET),
            ("2023-01-02", "-25", REVOLUT_WALLET),
            ("2023-01-02", "-50", ASN_WALLET),
            ("2023-01-02", "100", FIXED_CHARGES_WALLET),
            ("2023-01-03", "75", EXPECTED_TAXES_WALLET),
            ("2023-01-03", "-20", DEBIT_WALLET),
            ("2023-01-03", "150", DUO_INVEST_WALLET),
            ("2023-01-03", "-60", SPLIT_WALLET),
            ("2023-01-03", "40", INVEST_WALLET),
            ("2023-01-04", "20", CRYPTO_WALLET),
            ("2023-01-04", "-80", SAVINGS_WALLET),
            ("2023-01-04", "10", DUO_DEBT_WALLET),
            ("2023-01-04", "5", WBW_SISTER),
            ("2023-01-04", "-15", WBW_FRIENDS),
            ("2023-01-05", "120", DUO_DEBT_WALLET),
            ("2023-01-05", "-70", WBW_SISTER),
            ("2023-01-05", "50", INVEST_WALLET),
            ("2023-01-05", "60", CRYPTO_WALLET),
            ("2023-01-05", "-45", SAVINGS_WALLET),
        ])
    }

    fn catalog_registry() -> Arc<WalletRegistry> {
        Arc::new(WalletRegistry::from_env_with(|_| None).unwrap())
    }

    fn registry(balances: HashMap<String, Decimal>, mapping: WalletMapping) -> Arc<WalletRegistry> {
        Arc::new(
            WalletRegistry::new(balances.keys().cloned().collect(), balances, mapping).unwrap(),
        )
    }

    fn sample_ledger() -> WalletLedger {
        WalletLedger::new(&sample_data(), catalog_registry(), &ColumnSchema::default()).unwrap()
    }

    fn day(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn distinct(entries: &[Transaction]) -> HashSet<&str> {
        entries.iter().map(|entry| entry.wallet.as_str()).collect()
    }

    #[test]
    fn initialization() {
        let ledger = sample_ledger();
        assert_eq!(25 + 17, ledger.entries().len());
        assert_eq!(17, ledger.registry().all_wallets().len());
    }

    #[test]
    fn initial_balances_are_prepended() {
        let registry = registry(
            hash_map!["A".to_string() => Decimal::new(100, 0), "B".to_string() => Decimal::new(-5, 0)],
            WalletMapping::default(),
        );
        let entries = project(
            &raw_table(&[("2023-01-03", "1", "B"), ("2023-01-02", "2", "A"), ("2023-01-04", "3", "B")]),
            &ColumnSchema::default(),
        )
        .unwrap();
        let entries = add_initial_balances(entries, &registry).unwrap();
        assert_eq!(5, entries.len());
        assert_eq!(
            vec![
                Transaction::opening_balance("B".to_string(), day(1), Decimal::new(-5, 0)),
                Transaction::opening_balance("A".to_string(), day(1), Decimal::new(100, 0)),
            ],
            entries[..2]
        );
        assert!(entries[2..].iter().all(|entry| !entry.is_opening_balance()));
    }

    #[test]
    fn one_opening_balance_per_raw_wallet() {
        let raw = sample_data();
        let entries = project(&raw, &ColumnSchema::default()).unwrap();
        let entries = add_initial_balances(entries, &catalog_registry()).unwrap();
        let opening: Vec<&Transaction> = entries.iter().filter(|e| e.is_opening_balance()).collect();
        assert_eq!(raw.distinct_values("wallet").len(), opening.len());
        assert_eq!(opening.len(), distinct(&entries).len());
        assert!(opening.iter().all(|entry| entry.date == NaiveDate::from_ymd_opt(2022, 12, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()));
    }

    #[test]
    fn initial_balance_lookup_trims_wallet_name() {
        let registry = registry(hash_map!["A".to_string() => Decimal::new(7, 0)], WalletMapping::default());
        let entries = project(&raw_table(&[("2023-01-02", "1", " A ")]), &ColumnSchema::default()).unwrap();
        let entries = add_initial_balances(entries, &registry).unwrap();
        assert_eq!(
            Transaction::opening_balance(" A ".to_string(), day(1), Decimal::new(7, 0)),
            entries[0]
        );
    }

    #[test]
    fn unknown_wallet_fails_initial_balance_lookup() {
        let registry = registry(hash_map!["A".to_string() => Decimal::ZERO], WalletMapping::default());
        let err = WalletLedger::new(
            &raw_table(&[("2023-01-02", "1", "A"), ("2023-01-02", "1", "Z")]),
            registry,
            &ColumnSchema::default(),
        )
        .unwrap_err();
        assert_eq!(
            LedgerError::MissingInitialBalance {
                wallet: "Z".to_string()
            },
            err
        );
    }

    #[test]
    fn filter_wallets() {
        let ledger = sample_ledger();
        let filtered = ledger.filter_wallets(&[DUO_DEBT_WALLET, ASN_WALLET]);
        assert_eq!(2, distinct(&filtered).len());
        assert!(filtered
            .iter()
            .all(|entry| entry.wallet == DUO_DEBT_WALLET || entry.wallet == ASN_WALLET));
    }

    #[test]
    fn filter_supplied_table() {
        let entries = project(&sample_data(), &ColumnSchema::default()).unwrap();
        let filtered = super::filter_wallets(&entries, &[CASH_WALLET]);
        assert_eq!(1, filtered.len());
        assert_eq!(entries[4], filtered[0]);
    }

    #[test]
    fn balance_over_time() {
        let ledger = sample_ledger();
        let rows = ledger.balance_over_time(Frequency::Daily).unwrap();
        // 6 wallets after combining, plus the total, over 2022-12-31..=2023-01-05
        assert_eq!(7 * 6, rows.len());
        let total = rows.iter().filter(|row| row.wallet == "Total").last().unwrap();
        let sum: Decimal = ledger.entries().iter().map(|entry| entry.amount).sum();
        assert_eq!(sum, total.balance);
    }

    #[test]
    fn balances_for_two_wallets() {
        let registry = registry(
            hash_map!["A".to_string() => Decimal::new(100, 0), "B".to_string() => Decimal::ZERO],
            WalletMapping::default(),
        );
        let ledger = WalletLedger::new(
            &raw_table(&[("2023-01-02", "-20", "A"), ("2023-01-03", "50", "B")]),
            registry,
            &ColumnSchema::default(),
        )
        .unwrap();
        let rows = ledger.balance_over_time(Frequency::Daily).unwrap();
        let balances: Vec<(NaiveDateTime, &str, Decimal)> = rows
            .iter()
            .map(|row| (row.date, row.wallet.as_str(), row.balance))
            .collect();
        let expected: Vec<(NaiveDateTime, &str, Decimal)> = vec![
            (day(1), "A", Decimal::new(100, 0)),
            (day(1), "B", Decimal::ZERO),
            (day(1), "Total", Decimal::new(100, 0)),
            (day(2), "A", Decimal::new(80, 0)),
            (day(2), "B", Decimal::ZERO),
            (day(2), "Total", Decimal::new(80, 0)),
            (day(3), "A", Decimal::new(80, 0)),
            (day(3), "B", Decimal::new(50, 0)),
            (day(3), "Total", Decimal::new(130, 0)),
        ];
        assert_eq!(expected, balances);
    }

    #[test]
    fn combine_wallets() {
        let entries = project(&sample_data(), &ColumnSchema::default()).unwrap();
        let mapping = wallet_mapping();
        let children: HashSet<&str> = mapping
            .parents()
            .flat_map(|(_, children)| children.iter().map(String::as_str))
            .collect();
        let before = distinct(&entries);
        let children_present = before.intersection(&children).count();
        assert_eq!(11, children_present);

        let combined = super::combine_wallets(entries.clone(), &mapping.reverse().unwrap());
        assert_eq!(before.len() - children_present, distinct(&combined).len());
        assert!(distinct(&combined).is_disjoint(&children));
        assert_eq!(entries.len(), combined.len());
    }

    #[test]
    fn combine_on_top_of_ledger() {
        let ledger = sample_ledger();
        let combined = ledger
            .combine_wallets(&WalletMapping::from_iter([(ASN_WALLET, [DEBIT_WALLET])]))
            .unwrap();
        assert!(!distinct(&combined).contains(DEBIT_WALLET));
        assert_eq!(distinct(ledger.entries()).len() - 1, distinct(&combined).len());
    }

    #[test]
    fn no_child_wallet_remains() {
        let ledger = sample_ledger();
        let registry = ledger.registry();
        let wallets = ledger.distinct_wallets();
        assert!(wallets
            .iter()
            .all(|wallet| !registry.reverse_mapping().contains_key(*wallet)));
        for wallet in sample_data().distinct_values("wallet") {
            let expected = registry
                .reverse_mapping()
                .get(wallet)
                .map(String::as_str)
                .unwrap_or(wallet);
            assert!(wallets.contains(&expected));
        }
    }

    #[test]
    fn combine_wallets_is_idempotent() {
        let reverse = wallet_mapping().reverse().unwrap();
        let entries = project(&sample_data(), &ColumnSchema::default()).unwrap();
        let once = super::combine_wallets(entries, &reverse);
        let twice = super::combine_wallets(once.clone(), &reverse);
        assert_eq!(once, twice);
    }

    #[test]
    fn combine_keeps_unmapped_wallets() {
        let reverse = hash_map!["b".to_string() => "a".to_string()];
        let entries = project(
            &raw_table(&[("2023-01-01", "1", "b"), ("2023-01-01", "2", "c")]),
            &ColumnSchema::default(),
        )
        .unwrap();
        let combined = super::combine_wallets(entries, &reverse);
        assert_eq!(
            vec!["a", "c"],
            combined.iter().map(|entry| entry.wallet.as_str()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn wallet_subgroup() {
        let ledger = sample_ledger();
        let group = ledger.subgroup(&[DUO_DEBT_WALLET, WBW_SISTER]);
        assert_eq!(&[DUO_DEBT_WALLET.to_string(), WBW_SISTER.to_string()], group.wallets());
        // WBW_SISTER was folded into the debit wallet, so only DUO_DEBT_WALLET is left
        assert_eq!(vec![DUO_DEBT_WALLET], group.distinct_wallets());
        assert!(group
            .entries()
            .iter()
            .all(|entry| ledger.entries().contains(entry)));
        // The opening balances of DUO_DEBT_WALLET and its child, nothing re-injected
        assert_eq!(
            2,
            group.entries().iter().filter(|e| e.is_opening_balance()).count()
        );
        assert_eq!(ledger.filter_wallets(&[DUO_DEBT_WALLET, WBW_SISTER]), group.entries());
    }

    #[test]
    fn wallet_mismatch_is_not_fatal() {
        let registry = registry(
            hash_map!["A".to_string() => Decimal::ZERO, "unused".to_string() => Decimal::ZERO],
            WalletMapping::default(),
        );
        let raw = raw_table(&[("2023-01-01", "1", "A")]);
        let diagnostics = validate(&raw, &registry, &ColumnSchema::default());
        assert_eq!(
            Diagnostics {
                wallet_mismatch: ["unused".to_string()].into_iter().collect(),
                missing_columns: vec![],
            },
            diagnostics
        );
        assert!(WalletLedger::new(&raw, registry, &ColumnSchema::default()).is_ok());
    }

    #[test]
    fn missing_column_is_fatal() {
        let raw = RawTable::new(
            vec!["date".to_string(), "amount".to_string(), "wallet".to_string()],
            vec![vec!["2023-01-01".to_string(), "1".to_string(), ASN_WALLET.to_string()]],
        );
        let diagnostics = validate(&raw, &catalog_registry(), &ColumnSchema::default());
        assert_eq!(
            vec![Column::Label, Column::Kind, Column::Category],
            diagnostics.missing_columns
        );
        assert_eq!(
            LedgerError::MissingColumns {
                source: "transaction table".to_string(),
                columns: vec!["label".to_string(), "type".to_string(), "category".to_string()],
            },
            WalletLedger::new(&raw, catalog_registry(), &ColumnSchema::default()).unwrap_err()
        );
    }

    #[test]
    fn projection_drops_other_columns() {
        let schema = ColumnSchema::new(
            vec![],
            vec![Column::Date, Column::Amount, Column::Wallet, Column::Label],
        );
        let raw = RawTable::new(
            COLUMNS.iter().map(|c| c.to_string()).collect(),
            vec![["2023-01-01", "l", "Income", "1.5", "A", "c"]
                .into_iter()
                .map(String::from)
                .collect()],
        );
        assert_eq!(
            vec![Transaction {
                date: day(1),
                wallet: "A".to_string(),
                amount: Decimal::new(15, 1),
                label: Some("l".to_string()),
                kind: None,
                category: None,
                origin: Origin::Export,
            }],
            project(&raw, &schema).unwrap()
        );
    }

    #[test]
    fn schema_without_kind_keeps_origin() {
        let schema = ColumnSchema::new(
            vec![],
            vec![Column::Date, Column::Amount, Column::Wallet, Column::Label],
        );
        let registry = registry(hash_map!["A".to_string() => Decimal::new(3, 0)], WalletMapping::default());
        let ledger = WalletLedger::new(
            &raw_table(&[("2023-01-02", "1", "A"), ("2023-01-03", "2", "A")]),
            registry,
            &schema,
        )
        .unwrap();
        let opening: Vec<bool> = ledger
            .entries()
            .iter()
            .map(|entry| entry.is_opening_balance())
            .collect();
        assert_eq!(vec![true, false, false], opening);
        assert!(ledger.entries().iter().all(|entry| entry.kind.is_none()));
    }

    #[test]
    fn invalid_cells_are_errors() {
        let schema = ColumnSchema::default();
        assert_eq!(
            Err(LedgerError::InvalidDate {
                row: 2,
                value: "soon".to_string()
            }),
            project(&raw_table(&[("2023-01-01", "1", "A"), ("soon", "1", "A")]), &schema)
        );
        assert_eq!(
            Err(LedgerError::InvalidAmount {
                row: 1,
                value: "1,5".to_string()
            }),
            project(&raw_table(&[("2023-01-01", "1,5", "A")]), &schema)
        );
    }

    #[test]
    fn empty_table() {
        let ledger = WalletLedger::new(
            &raw_table(&[]),
            catalog_registry(),
            &ColumnSchema::default(),
        )
        .unwrap();
        assert!(ledger.entries().is_empty());
        assert_eq!(Ok(vec![]), ledger.balance_over_time(Frequency::Hourly));
    }
}
