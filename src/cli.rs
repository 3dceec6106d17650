use anyhow::{Context as _, Result};
use console::{pad_str, style, Alignment, StyledObject};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use crate::args::{Args, Command};
use crate::export;
use crate::ledger::{LedgerView, Transaction, WalletLedger};
use crate::loader::{CsvDirectory, LedgerSource as _};
use crate::registry::{RegistryFile, WalletRegistry, WalletRole};
use crate::schema::ColumnSchema;
use crate::terminal::{BulletPointPrinter, LineWriter};

pub fn main(args: Args) -> Result<()> {
    let registry = Arc::new(load_registry(args.registry.as_deref())?);
    match args.command {
        Command::Wallets => {
            println!("{}", style_header("Wallets:"));
            print_registry(&BulletPointPrinter::new_stdout(), &registry);
        }
        Command::Transactions { wallets } => {
            let ledger = load_ledger(&args.data_dir, registry)?;
            println!("{}", style_header("Transactions:"));
            let printer = BulletPointPrinter::new_stdout();
            if wallets.is_empty() {
                print_transactions(&printer, &ledger);
            } else {
                print_transactions(&printer, &ledger.subgroup(&wallets));
            }
        }
        Command::Balances {
            freq,
            format,
            output,
        } => {
            let ledger = load_ledger(&args.data_dir, registry)?;
            let rows = ledger.balance_over_time(freq)?;
            log::info!("Computed {} balance rows", rows.len());
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    export::write(&rows, format, BufWriter::new(file))?;
                    log::info!("Wrote balances to {}", path.display());
                }
                None => export::write(&rows, format, std::io::stdout().lock())?,
            }
        }
    }
    Ok(())
}

fn load_registry(path: Option<&Path>) -> Result<WalletRegistry> {
    match path {
        None => Ok(WalletRegistry::from_env()?),
        Some(path) => RegistryFile::load(path)?.into_registry(|variable| std::env::var(variable).ok()),
    }
}

fn load_ledger(data_dir: &Path, registry: Arc<WalletRegistry>) -> Result<WalletLedger> {
    let schema = ColumnSchema::default();
    let raw = CsvDirectory::new(data_dir, schema.clone())
        .load()
        .with_context(|| format!("Failed to load transactions from {}", data_dir.display()))?;
    Ok(WalletLedger::new(&raw, registry, &schema)?)
}

fn print_registry(printer: &BulletPointPrinter<impl LineWriter + Clone>, registry: &WalletRegistry) {
    for (parent, children) in registry.wallet_mapping().parents() {
        printer.print_item(style_wallet_with_balance(registry, parent));
        printer
            .indent()
            .print_items(children.iter().map(|child| style_wallet_with_balance(registry, child)));
    }
    for wallet in registry.all_wallets() {
        if registry.role(wallet) == WalletRole::Standalone {
            printer.print_item(style_wallet_with_balance(registry, wallet));
        }
    }
}

fn print_transactions(printer: &BulletPointPrinter<impl LineWriter + Clone>, view: &impl LedgerView) {
    let wallets = view.distinct_wallets();
    if wallets.is_empty() {
        printer.print_item(style("(none)").italic());
    }
    for wallet in wallets {
        printer.print_item(style_wallet(wallet));
        let printer = printer.indent();
        for transaction in view.filter_wallets(&[wallet]) {
            print_transaction(&printer, &transaction);
        }
    }
}

fn print_transaction(printer: &BulletPointPrinter<impl LineWriter + Clone>, transaction: &Transaction) {
    let description = if transaction.is_opening_balance() {
        style("opening balance".to_string()).italic()
    } else {
        style_label(transaction.label.as_deref().unwrap_or_default())
    };
    let category = transaction
        .category
        .as_deref()
        .filter(|category| !category.is_empty())
        .map(|category| format!(" [{category}]"))
        .unwrap_or_default();
    printer.print_item(format!(
        "{} {} {}{}",
        pad_str(
            &style_date(transaction).to_string(),
            16,
            Alignment::Left,
            None
        ),
        pad_str(
            &style_amount(transaction.amount).to_string(),
            12,
            Alignment::Right,
            None
        ),
        description,
        style_category(&category),
    ));
}

fn style_header(header: &str) -> StyledObject<&str> {
    style(header).bold().underlined()
}

fn style_wallet(wallet: &str) -> StyledObject<&str> {
    style(wallet).cyan().bold()
}

fn style_wallet_with_balance(registry: &WalletRegistry, wallet: &str) -> String {
    format!(
        "{} {}",
        style_wallet(wallet),
        style_amount(registry.initial_balance(wallet)),
    )
}

fn style_date(transaction: &Transaction) -> StyledObject<String> {
    style(transaction.date.format("%Y-%m-%d %H:%M").to_string())
}

fn style_amount(amount: Decimal) -> StyledObject<String> {
    let result = style(amount.to_string()).bold();
    if amount < Decimal::ZERO {
        result.red()
    } else {
        result.green()
    }
}

fn style_label(label: &str) -> StyledObject<String> {
    style(format!("\"{label}\"")).blue()
}

fn style_category(category: &str) -> StyledObject<&str> {
    style(category).magenta()
}
