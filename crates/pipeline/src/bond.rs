//! Bond/equity ticket batch conversion.

use ledger_convert::{bond_trade, AccountMap, BondTicket};
use ledger_core::{BondTrade, Config, Result, TicketRow};
use ledger_reference::{BrokerSsiIndex, SsiSource};
use std::sync::Arc;
use tracing::{info, warn};

/// Converted bond/equity trades.
#[derive(Debug, Clone, Default)]
pub struct BondConversion {
    /// Every converted trade, in input order.
    pub trades: Vec<BondTrade>,
    /// Reference numbers of trades whose broker has more than one SSI entry.
    pub multiple_ssi: Vec<String>,
    /// Per-trade multiple-SSI flag, parallel to `trades`.
    flagged: Vec<bool>,
}

impl BondConversion {
    /// Trades whose broker has a single SSI entry.
    pub fn clean_trades(&self) -> impl Iterator<Item = &BondTrade> + '_ {
        self.trades
            .iter()
            .zip(&self.flagged)
            .filter(|(_, &flagged)| !flagged)
            .map(|(trade, _)| trade)
    }
}

/// Converts bond/equity ticket rows using a shared SSI index.
pub struct BondPipeline<S> {
    accounts: AccountMap,
    index: Arc<BrokerSsiIndex<S>>,
    ssi_file: String,
}

impl<S: SsiSource> BondPipeline<S> {
    pub fn new(config: &Config, index: Arc<BrokerSsiIndex<S>>) -> Self {
        Self {
            accounts: AccountMap::from_config(&config.accounts),
            index,
            ssi_file: config.reference.broker_ssi_file.clone(),
        }
    }

    /// Convert a batch. Any bad ticket fails the batch.
    pub fn convert(&self, rows: &[TicketRow]) -> Result<BondConversion> {
        let table = self.index.table(&self.ssi_file)?;

        let trades = rows
            .iter()
            .map(|row| bond_trade(&BondTicket::from_row(row)?, &self.accounts, &*table))
            .collect::<Result<Vec<_>>>()?;

        let flagged: Vec<bool> = trades
            .iter()
            .map(|t| table.has_multiple_ssi(&t.broker_short_name))
            .collect();
        let multiple_ssi: Vec<String> = trades
            .iter()
            .zip(&flagged)
            .filter(|(_, &flagged)| flagged)
            .map(|(t, _)| t.trade_reference_number.clone())
            .collect();

        if !multiple_ssi.is_empty() {
            warn!(
                references = ?multiple_ssi,
                "trades whose broker has multiple SSI entries"
            );
        }
        info!(
            tickets = rows.len(),
            flagged = multiple_ssi.len(),
            "converted bond batch"
        );

        Ok(BondConversion {
            trades,
            multiple_ssi,
            flagged,
        })
    }
}
