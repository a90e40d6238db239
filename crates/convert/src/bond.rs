//! Bond/equity ticket mapping.
//!
//! One upstream ticket becomes one back-office trade. The broker code is the
//! SSI code of the ticket's broker short name; the short name also stays on
//! the record so the caller can flag brokers with several SSI entries.

use crate::accounts::AccountMap;
use ledger_core::types::columns;
use ledger_core::{format_date_field, BondTrade, BrokerCodeLookup, DateSerial, Result, TicketRow};

/// Typed view of one bond/equity ticket row.
#[derive(Debug, Clone, PartialEq)]
pub struct BondTicket {
    pub fund: String,
    pub sedol: String,
    pub isin: String,
    pub short_name: String,
    pub side: String,
    pub quantity: f64,
    pub as_of_date: DateSerial,
    pub settlement_date: DateSerial,
    pub currency: String,
    pub price: f64,
    pub accrued_interest: f64,
    pub settlement_amount: f64,
    pub ticket_number: String,
    pub broker_short_name: String,
    pub broker_long_name: String,
}

impl BondTicket {
    /// Parse a bond/equity ticket from a raw row.
    pub fn from_row(row: &TicketRow) -> Result<Self> {
        Ok(Self {
            fund: row.identifier(columns::FUND)?,
            sedol: row.identifier(columns::SEDOL)?,
            isin: row.identifier(columns::ISIN)?,
            short_name: row.text(columns::SHORT_NAME)?,
            side: row.text(columns::SIDE)?,
            quantity: row.number(columns::QUANTITY)?,
            as_of_date: row.number(columns::AS_OF_DATE)?,
            settlement_date: row.number(columns::SETTLEMENT_DATE)?,
            currency: row.text(columns::SETTLE_CURRENCY)?,
            price: row.number(columns::PRICE)?,
            accrued_interest: row.number(columns::ACCRUED_INTEREST)?,
            settlement_amount: row.number(columns::SETTLE_AMOUNT)?,
            ticket_number: row.identifier(columns::TICKET_NUMBER)?,
            broker_short_name: row.identifier(columns::BROKER_SHORT_NAME)?.trim().to_string(),
            broker_long_name: row.text(columns::BROKER_LONG_NAME)?,
        })
    }
}

/// Map a bond/equity ticket to its back-office record.
///
/// Only bond economics are mapped: commission is zero and the stamp duty,
/// levy, clearing fee, sales tax and CCASS fee cells stay empty.
pub fn bond_trade(
    ticket: &BondTicket,
    accounts: &AccountMap,
    brokers: &dyn BrokerCodeLookup,
) -> Result<BondTrade> {
    Ok(BondTrade {
        account: accounts.account_number(&ticket.fund)?.to_string(),
        sedol: ticket.sedol.clone(),
        isin: ticket.isin.clone(),
        name: ticket.short_name.clone(),
        tran_type: ticket.side.clone(),
        quantity: ticket.quantity,
        trade_date: format_date_field(ticket.as_of_date, columns::AS_OF_DATE)?,
        settlement_date: format_date_field(ticket.settlement_date, columns::SETTLEMENT_DATE)?,
        currency: ticket.currency.clone(),
        price: ticket.price,
        accrued_interest: ticket.accrued_interest,
        settlement_amount: ticket.settlement_amount,
        commission: 0.0,
        trade_reference_number: ticket.ticket_number.clone(),
        broker_code: brokers.broker_code(&ticket.broker_short_name)?,
        broker_name: ticket.broker_long_name.clone(),
        broker_short_name: ticket.broker_short_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::Error;
    use std::collections::HashMap;

    struct FixedCodes(HashMap<&'static str, &'static str>);

    impl BrokerCodeLookup for FixedCodes {
        fn broker_code(&self, broker: &str) -> Result<String> {
            self.0
                .get(broker)
                .map(|c| c.to_string())
                .ok_or_else(|| Error::unknown_broker(broker))
        }
    }

    fn bond_row() -> TicketRow {
        TicketRow::new()
            .with(columns::FUND, 40019.0)
            .with(columns::SEDOL, "BK5JS96")
            .with(columns::ISIN, "XS1813551584")
            .with(columns::SHORT_NAME, "HOPSON DEVELOP")
            .with(columns::SIDE, "S")
            .with(columns::QUANTITY, 1996000.0)
            .with(columns::AS_OF_DATE, 44111.0)
            .with(columns::SETTLEMENT_DATE, 44113.0)
            .with(columns::SETTLE_CURRENCY, "USD")
            .with(columns::PRICE, 100.58)
            .with(columns::ACCRUED_INTEREST, 42415.0)
            .with(columns::SETTLE_AMOUNT, 2049991.80)
            .with(columns::TICKET_NUMBER, 281305.0)
            .with(columns::BROKER_SHORT_NAME, "GSI ")
            .with(columns::BROKER_LONG_NAME, "GOLDMAN SACHS")
    }

    fn codes() -> FixedCodes {
        FixedCodes(HashMap::from([("GSI", "94589")]))
    }

    #[test]
    fn test_bond_trade_mapping() {
        let ticket = BondTicket::from_row(&bond_row()).unwrap();
        let accounts = AccountMap::new([("40019", "12345678")]);

        let trade = bond_trade(&ticket, &accounts, &codes()).unwrap();

        assert_eq!(trade.account, "12345678");
        assert_eq!(trade.sedol, "BK5JS96");
        assert_eq!(trade.isin, "XS1813551584");
        assert_eq!(trade.name, "HOPSON DEVELOP");
        assert_eq!(trade.tran_type, "S");
        assert_eq!(trade.quantity, 1996000.0);
        assert_eq!(trade.trade_date, "07/10/2020");
        assert_eq!(trade.settlement_date, "09/10/2020");
        assert_eq!(trade.currency, "USD");
        assert_eq!(trade.price, 100.58);
        assert_eq!(trade.accrued_interest, 42415.0);
        assert_eq!(trade.settlement_amount, 2049991.80);
        assert_eq!(trade.commission, 0.0);
        assert_eq!(trade.trade_reference_number, "281305");
        assert_eq!(trade.broker_code, "94589");
        assert_eq!(trade.broker_name, "GOLDMAN SACHS");
        assert_eq!(trade.broker_short_name, "GSI");
    }

    #[test]
    fn test_unknown_broker() {
        let row = bond_row().with(columns::BROKER_SHORT_NAME, "NOPE");
        let ticket = BondTicket::from_row(&row).unwrap();
        let accounts = AccountMap::new([("40019", "12345678")]);

        assert!(matches!(
            bond_trade(&ticket, &accounts, &codes()),
            Err(Error::UnknownBroker(b)) if b == "NOPE"
        ));
    }

    #[test]
    fn test_missing_column() {
        let mut row = bond_row();
        row.remove(columns::PRICE);
        assert!(matches!(
            BondTicket::from_row(&row),
            Err(Error::FieldMissing { .. })
        ));
    }
}
