//! Valuation report positions to reconciliation records.
//!
//! Cash positions become balance lines and bond positions become holding
//! lines. Every record carries the configured portfolio name and the
//! valuation date of the report it came from.

use ledger_core::config::ReconConfig;
use ledger_core::types::columns;
use ledger_core::{CashReconRecord, PositionReconRecord, Result, TicketRow};

/// Maps valuation report positions for one portfolio.
#[derive(Debug, Clone)]
pub struct ReconMapper {
    portfolio: String,
}

impl ReconMapper {
    pub fn new(portfolio: impl Into<String>) -> Self {
        Self {
            portfolio: portfolio.into(),
        }
    }

    pub fn from_config(config: &ReconConfig) -> Self {
        Self::new(config.portfolio.clone())
    }

    pub fn portfolio(&self) -> &str {
        &self.portfolio
    }

    /// Map one cash position.
    pub fn cash_recon(&self, date: &str, position: &TicketRow) -> Result<CashReconRecord> {
        Ok(CashReconRecord {
            portfolio: self.portfolio.clone(),
            date: date.to_string(),
            currency: position.text(columns::DEAL_CURRENCY)?,
            balance: position.number(columns::BOOK_COST)?,
        })
    }

    /// Map one bond position.
    pub fn position_recon(&self, date: &str, bond: &TicketRow) -> Result<PositionReconRecord> {
        Ok(PositionReconRecord {
            portfolio: self.portfolio.clone(),
            date: date.to_string(),
            isin: bond.identifier(columns::ISIN_CODE)?,
            name: bond.text(columns::INVESTMENT)?,
            currency: bond.text(columns::DEAL_CURRENCY)?,
            quantity: bond.number(columns::NOMINAL_QUANTITY)?,
        })
    }
}
