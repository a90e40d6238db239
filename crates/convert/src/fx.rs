//! FX ticket mapping.
//!
//! The currency pair comes from the ticket's short name (`"USD/HKD 10/09/20"`).
//! A buy takes the pair as written, a sell swaps it. The dealt amount sits on
//! the leg whose currency matches the ticket currency; the other leg is the
//! amount times the price.

use ledger_core::dates::format_short_date;
use ledger_core::types::columns;
use ledger_core::{format_date_field, Error, FxTrade, Result, TicketRow, TicketValue};

const BUY: &str = "B";

/// Typed view of one FX ticket row.
#[derive(Debug, Clone, PartialEq)]
pub struct FxTicket {
    pub fund: String,
    pub ticket_number: String,
    /// Date serial or `dd/mm/yy` text.
    pub trade_date: TicketValue,
    /// Date serial or `dd/mm/yy` text.
    pub settlement_date: TicketValue,
    pub deal_type: String,
    pub short_name: String,
    pub side: String,
    pub currency: String,
    pub amount: f64,
    pub price: f64,
}

impl FxTicket {
    /// Parse an FX ticket from a raw row.
    pub fn from_row(row: &TicketRow) -> Result<Self> {
        Ok(Self {
            fund: row.identifier(columns::FUND)?,
            ticket_number: row.identifier(columns::TICKET_NUMBER)?,
            trade_date: row.value(columns::AS_OF_DATE)?.clone(),
            settlement_date: row.value(columns::SETTLEMENT_DATE)?.clone(),
            deal_type: row.text(columns::FX_DEAL_TYPE)?,
            short_name: row.text(columns::SHORT_NAME)?,
            side: row.text(columns::SIDE)?,
            currency: row.text(columns::CURRENCY)?,
            amount: row.number(columns::QUANTITY)?,
            price: row.number(columns::PRICE)?,
        })
    }

    /// (buy currency, sell currency).
    pub fn buy_sell_currencies(&self) -> Result<(String, String)> {
        let pair = self.short_name.split_whitespace().next().unwrap_or_default();
        let (first, second) = pair
            .split_once('/')
            .filter(|(a, b)| !a.is_empty() && !b.is_empty() && !b.contains('/'))
            .ok_or_else(|| {
                Error::invalid_field(
                    columns::SHORT_NAME,
                    format!("no currency pair in {:?}", self.short_name),
                )
            })?;

        if self.side == BUY {
            Ok((first.to_string(), second.to_string()))
        } else {
            Ok((second.to_string(), first.to_string()))
        }
    }
}

fn fx_date(value: &TicketValue, column: &str) -> Result<String> {
    match value {
        TicketValue::Number(n) => format_date_field(n.into_inner(), column),
        TicketValue::Text(text) => format_short_date(text).map_err(|e| match e {
            Error::InvalidField { reason, .. } => Error::invalid_field(column, reason),
            other => other,
        }),
    }
}

/// Map an FX ticket to its back-office record.
pub fn fx_trade(ticket: &FxTicket) -> Result<FxTrade> {
    let (buy_currency, sell_currency) = ticket.buy_sell_currencies()?;
    let counter_amount = ticket.amount * ticket.price;
    let (buy_amount, sell_amount) = if buy_currency == ticket.currency {
        (ticket.amount, counter_amount)
    } else {
        (counter_amount, ticket.amount)
    };

    Ok(FxTrade {
        portfolio_code: ticket.fund.clone(),
        contract_number: ticket.ticket_number.clone(),
        trade_date: fx_date(&ticket.trade_date, columns::AS_OF_DATE)?,
        settlement_date: fx_date(&ticket.settlement_date, columns::SETTLEMENT_DATE)?,
        transaction_type: ticket.deal_type.clone(),
        buy_currency,
        buy_amount,
        sell_currency,
        sell_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fx_row(side: &str, currency: &str) -> TicketRow {
        TicketRow::new()
            .with(columns::FUND, "40019")
            .with(columns::TICKET_NUMBER, 300123.0)
            .with(columns::AS_OF_DATE, 44111.0)
            .with(columns::SETTLEMENT_DATE, "09/10/20")
            .with(columns::FX_DEAL_TYPE, "Spot")
            .with(columns::SHORT_NAME, "USD/HKD 10/09/20")
            .with(columns::SIDE, side)
            .with(columns::CURRENCY, currency)
            .with(columns::QUANTITY, 1000.0)
            .with(columns::PRICE, 7.75)
    }

    #[test]
    fn test_buy_in_base_currency() {
        let ticket = FxTicket::from_row(&fx_row("B", "USD")).unwrap();
        let trade = fx_trade(&ticket).unwrap();

        assert_eq!(trade.portfolio_code, "40019");
        assert_eq!(trade.contract_number, "300123");
        assert_eq!(trade.trade_date, "07/10/2020");
        assert_eq!(trade.settlement_date, "09/10/2020");
        assert_eq!(trade.transaction_type, "Spot");
        assert_eq!(trade.buy_currency, "USD");
        assert_eq!(trade.sell_currency, "HKD");
        assert_relative_eq!(trade.buy_amount, 1000.0);
        assert_relative_eq!(trade.sell_amount, 7750.0);
    }

    #[test]
    fn test_sell_swaps_pair() {
        let ticket = FxTicket::from_row(&fx_row("S", "USD")).unwrap();
        let trade = fx_trade(&ticket).unwrap();

        assert_eq!(trade.buy_currency, "HKD");
        assert_eq!(trade.sell_currency, "USD");
        assert_relative_eq!(trade.buy_amount, 7750.0);
        assert_relative_eq!(trade.sell_amount, 1000.0);
    }

    #[test]
    fn test_bad_pair() {
        let row = fx_row("B", "USD").with(columns::SHORT_NAME, "USDHKD");
        let ticket = FxTicket::from_row(&row).unwrap();
        assert!(matches!(
            fx_trade(&ticket),
            Err(Error::InvalidField { field, .. }) if field == "Shrt Name"
        ));
    }

    #[test]
    fn test_bad_text_date() {
        let row = fx_row("B", "USD").with(columns::SETTLEMENT_DATE, "2020-10-09");
        let ticket = FxTicket::from_row(&row).unwrap();
        assert!(matches!(
            fx_trade(&ticket),
            Err(Error::InvalidField { field, .. }) if field == "Stl Date"
        ));
    }
}
