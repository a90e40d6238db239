//! FX ticket batch conversion.

use ledger_convert::{fx_trade, FxTicket};
use ledger_core::{FxTrade, Result, TicketRow};
use tracing::info;

/// Converts FX ticket rows one to one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FxPipeline;

impl FxPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Convert a batch. Any bad ticket fails the batch.
    pub fn convert(&self, rows: &[TicketRow]) -> Result<Vec<FxTrade>> {
        let trades = rows
            .iter()
            .map(|row| fx_trade(&FxTicket::from_row(row)?))
            .collect::<Result<Vec<_>>>()?;

        info!(tickets = rows.len(), "converted fx batch");
        Ok(trades)
    }
}
