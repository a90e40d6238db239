//! Ticket-to-ledger conversion CLI
//!
//! Reads a JSON array of ticket rows and prints the back-office header and
//! one row per record as JSON arrays, one per line.
//!
//! Usage:
//!   ticket-ledger repo tickets.json
//!   ticket-ledger bond tickets.json --config ledger.json
//!   RUST_LOG=debug ticket-ledger fx tickets.json
//!   ticket-ledger recon --date 2020-10-30 cash.json bonds.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledger_core::{
    Config, TicketRow, CASH_RECON_HEADERS, FX_HEADERS, POSITION_RECON_HEADERS, REPO_HEADERS,
    TRADE_HEADERS,
};
use ledger_pipeline::{logging, BondPipeline, FxPipeline, ReconPipeline, RepoPipeline};
use ledger_reference::{BrokerSsiIndex, CsvFileSource};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ticket-ledger")]
#[command(about = "Convert upstream trade tickets to back-office ledger records")]
struct Args {
    /// Configuration file (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Repo tickets to canonical repo trades
    Repo { tickets: PathBuf },
    /// Bond/equity tickets to trade records
    Bond { tickets: PathBuf },
    /// FX tickets to FX records
    Fx { tickets: PathBuf },
    /// Valuation report positions to cash and holding reconciliation records
    Recon {
        /// Valuation date stamped on every record
        #[arg(long)]
        date: String,
        /// Cash positions (JSON array)
        cash: PathBuf,
        /// Bond positions (JSON array)
        bonds: PathBuf,
    },
}

fn main() -> Result<()> {
    logging::init("info");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &args.command {
        Commands::Repo { tickets } => {
            let rows = read_tickets(tickets)?;
            let report = RepoPipeline::new(&config)?.run(&rows)?;
            for failure in &report.failures {
                warn!(group_key = %failure.group_key, "{}", failure.message);
            }
            write_rows(&mut out, &REPO_HEADERS, report.trades.iter().map(|t| t.to_row()))?;
        }
        Commands::Bond { tickets } => {
            let rows = read_tickets(tickets)?;
            let source = CsvFileSource::new(&config.reference.reference_dir);
            let index = Arc::new(BrokerSsiIndex::from_config(source, &config.reference));
            let conversion = BondPipeline::new(&config, index).convert(&rows)?;
            if !conversion.multiple_ssi.is_empty() {
                warn!(
                    "Trades with multiple broker SSI, please check: {}",
                    conversion.multiple_ssi.join(", ")
                );
            }
            write_rows(
                &mut out,
                &TRADE_HEADERS,
                conversion.trades.iter().map(|t| t.to_row()),
            )?;
        }
        Commands::Fx { tickets } => {
            let rows = read_tickets(tickets)?;
            let trades = FxPipeline::new().convert(&rows)?;
            write_rows(&mut out, &FX_HEADERS, trades.iter().map(|t| t.to_row()))?;
        }
        Commands::Recon { date, cash, bonds } => {
            let cash = read_tickets(cash)?;
            let bonds = read_tickets(bonds)?;
            let records = ReconPipeline::new(&config).convert(date, &cash, &bonds)?;
            write_rows(
                &mut out,
                &CASH_RECON_HEADERS,
                records.cash.iter().map(|r| r.to_row()),
            )?;
            write_rows(
                &mut out,
                &POSITION_RECON_HEADERS,
                records.positions.iter().map(|r| r.to_row()),
            )?;
        }
    }

    out.flush()?;
    Ok(())
}

fn read_tickets(path: &Path) -> Result<Vec<TicketRow>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tickets: {}", path.display()))?;
    let rows: Vec<TicketRow> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse tickets: {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "read tickets");
    Ok(rows)
}

fn write_rows<W: Write>(
    out: &mut W,
    headers: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(headers)?)?;
    for row in rows {
        writeln!(out, "{}", serde_json::to_string(&row)?)?;
    }
    Ok(())
}
