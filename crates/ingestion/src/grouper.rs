//! Partitioning of repo tickets into logical trade events.
//!
//! Tickets sharing fund, dates, currency, broker, rate, term money and status
//! are sub-events of one trade. Groups come out in order of first appearance
//! of their key; members keep input order.

use ledger_core::amount::render_number;
use ledger_core::{RepoStatus, RepoTicket};
use std::collections::HashMap;

const KEY_SEPARATOR: char = '|';

/// Composite business key of a repo ticket.
///
/// Numeric components go through [`render_number`] so float formatting noise
/// (`1.255 * 100`) never splits a group.
pub fn group_key(ticket: &RepoTicket) -> String {
    let components = [
        ticket.fund.clone(),
        render_number(ticket.trade_date),
        render_number(ticket.settlement_date),
        ticket.currency.clone(),
        ticket.broker_id.clone(),
        render_number(100.0 * ticket.repo_rate),
        render_number(ticket.term_money),
        ticket.status.as_str().to_string(),
    ];

    let mut key = String::with_capacity(components.iter().map(String::len).sum::<usize>() + 8);
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(component);
    }
    key
}

/// Tickets sharing one group key. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketGroup {
    key: String,
    tickets: Vec<RepoTicket>,
    /// Input position of the first member.
    first_index: usize,
}

impl TicketGroup {
    fn new(key: String, first: RepoTicket, first_index: usize) -> Self {
        Self {
            key,
            tickets: vec![first],
            first_index,
        }
    }

    /// Group key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Members in input order.
    pub fn tickets(&self) -> &[RepoTicket] {
        &self.tickets
    }

    /// Input position of the first member.
    pub fn first_index(&self) -> usize {
        self.first_index
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// Always false; groups are created with one member.
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Repo status shared by all members (part of the key).
    pub fn status(&self) -> &RepoStatus {
        &self.tickets[0].status
    }
}

/// Incremental grouper.
#[derive(Debug, Default)]
pub struct TicketGrouper {
    /// Groups in order of first appearance.
    groups: Vec<TicketGroup>,
    /// Key -> position in `groups`.
    index: HashMap<String, usize>,
    /// Tickets added so far.
    ticket_count: usize,
}

impl TicketGrouper {
    /// Create an empty grouper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition tickets in one call.
    pub fn group(tickets: impl IntoIterator<Item = RepoTicket>) -> Vec<TicketGroup> {
        let mut grouper = Self::new();
        grouper.add_tickets(tickets);
        grouper.finish()
    }

    /// Add a ticket to its group.
    pub fn add_ticket(&mut self, ticket: RepoTicket) {
        let key = group_key(&ticket);
        match self.index.get(&key) {
            Some(&pos) => self.groups[pos].tickets.push(ticket),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(TicketGroup::new(key, ticket, self.ticket_count));
            }
        }
        self.ticket_count += 1;
    }

    /// Add multiple tickets.
    pub fn add_tickets(&mut self, tickets: impl IntoIterator<Item = RepoTicket>) {
        for ticket in tickets {
            self.add_ticket(ticket);
        }
    }

    /// Number of groups so far.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of tickets added so far.
    pub fn ticket_count(&self) -> usize {
        self.ticket_count
    }

    /// Consume the grouper and return its groups.
    pub fn finish(self) -> Vec<TicketGroup> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::TicketValue;

    fn make_ticket(fund: &str, rate: f64, status: RepoStatus, tag: &str, number: f64) -> RepoTicket {
        RepoTicket {
            fund: fund.to_string(),
            trade_date: 44133.0,
            settlement_date: 44134.0,
            maturity: None,
            currency: "USD".to_string(),
            broker_id: "SOCG-REPO".to_string(),
            repo_rate: rate,
            term_money: 3209280.0,
            loan_amount: Some(3209280.0),
            status,
            role_tag: tag.to_string(),
            ticket_number: Some(TicketValue::from(number)),
            original_ticket: None,
            isin: Some("XS2211674143".to_string()),
            collateral_amount: Some(TicketValue::from("4M")),
        }
    }

    #[test]
    fn test_group_key_components() {
        let ticket = make_ticket("40017-B", 1.0, RepoStatus::Active, "RT", 1.0);
        assert_eq!(
            group_key(&ticket),
            "40017-B|44133|44134|USD|SOCG-REPO|100|3209280|Active"
        );
    }

    #[test]
    fn test_rate_formatting_noise_ignored() {
        let a = make_ticket("F", 1.255, RepoStatus::Active, "RT", 1.0);
        let b = make_ticket("F", 1.2550000000001, RepoStatus::Active, "MRC", 2.0);
        assert_eq!(group_key(&a), group_key(&b));
    }

    #[test]
    fn test_role_and_ticket_number_not_in_key() {
        let a = make_ticket("F", 1.0, RepoStatus::Active, "RT", 1.0);
        let b = make_ticket("F", 1.0, RepoStatus::Active, "MRC", 2.0);
        assert_eq!(group_key(&a), group_key(&b));

        let c = make_ticket("F", 1.0, RepoStatus::Closed, "CR", 3.0);
        assert_ne!(group_key(&a), group_key(&c));
    }

    #[test]
    fn test_grouping_is_partition() {
        let tickets = vec![
            make_ticket("A", 1.0, RepoStatus::Active, "RT", 1.0),
            make_ticket("B", 1.0, RepoStatus::Active, "RT", 2.0),
            make_ticket("A", 1.0, RepoStatus::Active, "MRC", 3.0),
            make_ticket("A", 1.5, RepoStatus::Active, "RT", 4.0),
            make_ticket("B", 1.0, RepoStatus::Active, "MRC", 5.0),
        ];
        let total = tickets.len();

        let groups = TicketGrouper::group(tickets);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups.iter().map(TicketGroup::len).sum::<usize>(), total);

        // First-appearance order, members in input order
        assert_eq!(groups[0].tickets()[0].role_tag, "RT");
        assert_eq!(groups[0].tickets()[1].role_tag, "MRC");
        assert_eq!(groups[0].first_index(), 0);
        assert_eq!(groups[1].first_index(), 1);
        assert_eq!(groups[2].first_index(), 3);
        assert_eq!(groups[2].len(), 1);
    }

    #[test]
    fn test_incremental_counts() {
        let mut grouper = TicketGrouper::new();
        grouper.add_ticket(make_ticket("A", 1.0, RepoStatus::Active, "RT", 1.0));
        grouper.add_ticket(make_ticket("A", 1.0, RepoStatus::Active, "MRC", 2.0));
        assert_eq!(grouper.ticket_count(), 2);
        assert_eq!(grouper.group_count(), 1);
        assert_eq!(grouper.finish()[0].status(), &RepoStatus::Active);
    }

    #[test]
    fn test_empty_input() {
        assert!(TicketGrouper::group(Vec::new()).is_empty());
    }
}
