//! Ticket-to-record conversion for the ledger system.
//!
//! This crate handles:
//! - Repo lifecycle classification (Open, Close, Change Rate)
//! - Canonical repo trade derivation per lifecycle state
//! - Fund to account number mapping
//! - Bond/equity and FX single-ticket mappings
//! - Valuation report positions to reconciliation records

pub mod accounts;
pub mod bond;
pub mod classifier;
pub mod fx;
pub mod position;
pub mod repo;

pub use accounts::AccountMap;
pub use bond::{bond_trade, BondTicket};
pub use classifier::{classify, ClassificationStats};
pub use fx::{fx_trade, FxTicket};
pub use position::ReconMapper;
pub use repo::RepoTradeDeriver;
