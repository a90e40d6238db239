//! Repo lifecycle classification.
//!
//! Each representative record is classified once:
//! 1. `Close` if its status is `Closed`;
//! 2. `ChangeRate` if the trade date is after the settlement date;
//! 3. `Open` otherwise.
//!
//! Dates are compared as serial numbers. A closed group is never checked for
//! a rate change.

use ledger_core::{RepoEvent, RepoStatus, RepoTicket};

/// Classify a representative repo ticket.
pub fn classify(ticket: &RepoTicket) -> RepoEvent {
    if ticket.status == RepoStatus::Closed {
        RepoEvent::Close
    } else if ticket.trade_date > ticket.settlement_date {
        RepoEvent::ChangeRate
    } else {
        RepoEvent::Open
    }
}

/// Counts of classified events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    /// Total records classified.
    pub total: u64,
    /// New financings.
    pub open: u64,
    /// Unwinds.
    pub close: u64,
    /// Rerates.
    pub change_rate: u64,
}

impl ClassificationStats {
    /// Count one event.
    pub fn record(&mut self, event: RepoEvent) {
        self.total += 1;
        match event {
            RepoEvent::Open => self.open += 1,
            RepoEvent::Close => self.close += 1,
            RepoEvent::ChangeRate => self.change_rate += 1,
        }
    }

    /// Reset statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
