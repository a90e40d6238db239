//! Broker SSI reference tables.
//!
//! This crate provides:
//! - Reference row sources (CSV files, in-memory tables)
//! - The parsed broker SSI table with its multiplicity set
//! - A bounded, single-flight cache of loaded tables

pub mod index;
pub mod source;
pub mod ssi;

pub use index::BrokerSsiIndex;
pub use source::{CsvFileSource, InMemorySource, SsiSource};
pub use ssi::SsiTable;
