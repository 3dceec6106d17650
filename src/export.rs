use anyhow::Result;
use console::{pad_str, Alignment};
use std::io::Write;

use crate::balance::BalanceRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading in a terminal
    #[default]
    Table,
    Csv,
    Json,
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_WIDTH: usize = 19;
const AMOUNT_WIDTH: usize = 14;

pub fn write(rows: &[BalanceRow], format: OutputFormat, mut writer: impl Write) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(rows, &mut writer)?,
        OutputFormat::Csv => write_csv(rows, &mut writer)?,
        OutputFormat::Json => write_json(rows, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

pub fn write_table(rows: &[BalanceRow], mut writer: impl Write) -> Result<()> {
    let wallet_width = rows
        .iter()
        .map(|row| row.wallet.chars().count())
        .chain(["wallet".len()])
        .max()
        .unwrap_or_default();
    let line = |date: &str, wallet: &str, period_amount: &str, balance: &str| {
        format!(
            "{}  {}  {}  {}",
            pad_str(date, DATE_WIDTH, Alignment::Left, None),
            pad_str(wallet, wallet_width, Alignment::Left, None),
            pad_str(period_amount, AMOUNT_WIDTH, Alignment::Right, None),
            pad_str(balance, AMOUNT_WIDTH, Alignment::Right, None),
        )
    };
    writeln!(writer, "{}", line("date", "wallet", "period_amount", "balance"))?;
    for row in rows {
        writeln!(
            writer,
            "{}",
            line(
                &row.date.format(DATE_FORMAT).to_string(),
                &row.wallet,
                &row.period_amount.to_string(),
                &row.balance.to_string(),
            )
        )?;
    }
    Ok(())
}

pub fn write_csv(rows: &[BalanceRow], writer: impl Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json(rows: &[BalanceRow], mut writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    Ok(())
}
