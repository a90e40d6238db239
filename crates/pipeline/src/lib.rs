//! Batch conversion of ticket rows to back-office records.
//!
//! This crate wires the other crates together:
//! - Repo tickets: group, select, classify, derive (parallel per group)
//! - Bond/equity tickets: map and flag brokers with several SSI entries
//! - FX tickets: map
//! - Valuation report positions: cash and holding reconciliation records
//! - Logging setup for binaries

pub mod bond;
pub mod fx;
pub mod logging;
pub mod position;
pub mod repo;

pub use bond::{BondConversion, BondPipeline};
pub use fx::FxPipeline;
pub use position::{ReconPipeline, ReconRecords};
pub use repo::{BatchReport, GroupFailure, RepoPipeline};
