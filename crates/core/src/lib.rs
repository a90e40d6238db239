//! Core types and configuration for the ticket-to-ledger conversion system.
//!
//! This crate provides shared types used across all other crates:
//! - Ticket rows and typed ticket views (repo, bond/equity, FX)
//! - Canonical output records and their fixed header sets
//! - Ticket amount and key-component normalization
//! - Date-serial formatting
//! - Configuration structures
//! - Common error types

pub mod amount;
pub mod config;
pub mod dates;
pub mod error;
pub mod records;
pub mod types;

pub use amount::{key_component, normalize_amount};
pub use config::Config;
pub use dates::{format_date_field, format_date_serial, OPEN_ENDED_MATURITY};
pub use error::{Error, ErrorKind, Result};
pub use records::*;
pub use types::*;
