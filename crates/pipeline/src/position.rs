//! Position reconciliation from one valuation report.

use ledger_convert::ReconMapper;
use ledger_core::{CashReconRecord, Config, PositionReconRecord, Result, TicketRow};
use tracing::info;

/// Reconciliation records of one valuation date.
#[derive(Debug, Clone, Default)]
pub struct ReconRecords {
    pub cash: Vec<CashReconRecord>,
    pub positions: Vec<PositionReconRecord>,
}

/// Converts the cash and bond positions of a valuation report.
#[derive(Debug, Clone)]
pub struct ReconPipeline {
    mapper: ReconMapper,
}

impl ReconPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            mapper: ReconMapper::from_config(&config.recon),
        }
    }

    /// Convert both position lists for `date`. Any bad position fails the
    /// whole report.
    pub fn convert(
        &self,
        date: &str,
        cash_positions: &[TicketRow],
        bond_positions: &[TicketRow],
    ) -> Result<ReconRecords> {
        let cash = cash_positions
            .iter()
            .map(|p| self.mapper.cash_recon(date, p))
            .collect::<Result<Vec<_>>>()?;
        let positions = bond_positions
            .iter()
            .map(|p| self.mapper.position_recon(date, p))
            .collect::<Result<Vec<_>>>()?;

        info!(
            date,
            portfolio = self.mapper.portfolio(),
            cash = cash.len(),
            positions = positions.len(),
            "converted valuation report"
        );
        Ok(ReconRecords { cash, positions })
    }
}
