//! Repo ticket ingestion for the conversion system.
//!
//! This crate handles:
//! - Group key construction
//! - Partitioning tickets into groups (one group per logical trade event)
//! - Role-based selection of one representative record per group

pub mod grouper;
pub mod selector;

pub use grouper::{group_key, TicketGroup, TicketGrouper};
pub use selector::{select_representative, Representative, RoleIndex};
