//! Role-based reduction of a ticket group to one representative record.
//!
//! Active groups: the rate ticket (`RT`) carries the current economics and
//! takes its ticket number from the master contract reference (`MRC`).
//! Any other status: the close record (`CR`) takes its original ticket
//! number from the master close reference (`KMR`).

use crate::grouper::TicketGroup;
use ledger_core::{Error, RepoStatus, RepoTicket, Result, TicketRole};
use std::collections::BTreeMap;
use tracing::debug;

/// First ticket carrying each role within a group.
#[derive(Debug)]
pub struct RoleIndex<'a> {
    group_key: &'a str,
    by_role: BTreeMap<TicketRole, &'a RepoTicket>,
}

impl<'a> RoleIndex<'a> {
    /// Index a group. Later tickets with an already-seen role are ignored,
    /// as are tickets with unknown tags.
    pub fn build(group: &'a TicketGroup) -> Self {
        let mut by_role = BTreeMap::new();
        for ticket in group.tickets() {
            if let Some(role) = ticket.role() {
                by_role.entry(role).or_insert(ticket);
            }
        }

        Self {
            group_key: group.key(),
            by_role,
        }
    }

    /// Ticket for a role, if present.
    pub fn get(&self, role: TicketRole) -> Option<&'a RepoTicket> {
        self.by_role.get(&role).copied()
    }

    /// Ticket for a role the group must contain.
    pub fn require(&self, role: TicketRole) -> Result<&'a RepoTicket> {
        self.get(role)
            .ok_or_else(|| Error::missing_role(role.tag(), self.group_key))
    }

    /// Roles present.
    pub fn roles(&self) -> impl Iterator<Item = TicketRole> + '_ {
        self.by_role.keys().copied()
    }
}

/// Merged view of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Representative {
    /// Key of the group this record stands for.
    pub group_key: String,
    /// Merged ticket.
    pub ticket: RepoTicket,
}

/// Reduce a group to its representative record.
///
/// Fails with [`Error::MissingRole`] when a role required by the group's
/// status is absent.
pub fn select_representative(group: &TicketGroup) -> Result<Representative> {
    let roles = RoleIndex::build(group);

    let ticket = match group.status() {
        RepoStatus::Active => {
            let rate = roles.require(TicketRole::Rt)?;
            let master = roles.require(TicketRole::Mrc)?;

            let mut merged = rate.clone();
            merged.ticket_number = Some(master.require_ticket_number()?.clone());
            merged
        }
        RepoStatus::Closed | RepoStatus::Other(_) => {
            let close = roles.require(TicketRole::Cr)?;
            let master = roles.require(TicketRole::Kmr)?;

            let mut merged = close.clone();
            merged.original_ticket = Some(master.require_original_ticket()?.clone());
            merged
        }
    };

    debug!(
        group_key = group.key(),
        members = group.len(),
        status = group.status().as_str(),
        "selected representative"
    );

    Ok(Representative {
        group_key: group.key().to_string(),
        ticket,
    })
}
