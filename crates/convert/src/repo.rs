//! Canonical repo trade derivation.
//!
//! Field population per lifecycle state:
//!
//! | Field | Close | Change Rate | Open |
//! |---|---|---|---|
//! | Trade / settle date | - | - | formatted |
//! | Maturity | trade date | - | term date, or `31/12/2049` if open-ended |
//! | Currency / amount | - | - | currency / loan amount |
//! | Effective date | - | trade date | settlement date |
//! | Rate / day count | - | rate / `ACT/360` | rate / `ACT/360` |
//! | Collateral ISIN / qty / broker | - | - | ISIN / 1000 x amount / broker |
//! | Reference | original ticket | ticket number | ticket number |

use crate::accounts::AccountMap;
use crate::classifier::classify;
use ledger_core::types::columns;
use ledger_core::{
    format_date_field, key_component, normalize_amount, CanonicalRepoTrade, Error, Maturity,
    RepoEvent, RepoTicket, Result, OPEN_ENDED_MATURITY, REPO_DAY_COUNT, REPO_TXN_TYPE,
};
use ledger_ingestion::Representative;
use tracing::debug;

/// Collateral quantities are quoted in thousands.
const COLLATERAL_QTY_SCALE: f64 = 1000.0;

fn required<'t, T>(value: &'t Option<T>, column: &str) -> Result<&'t T> {
    value.as_ref().ok_or_else(|| Error::field_missing(column))
}

/// Derives canonical repo trades from representative records.
#[derive(Debug, Clone)]
pub struct RepoTradeDeriver {
    accounts: AccountMap,
}

impl RepoTradeDeriver {
    /// Create a deriver using the given account mapping.
    pub fn new(accounts: AccountMap) -> Self {
        Self { accounts }
    }

    /// Classify a representative and derive its trade record.
    pub fn derive(&self, representative: &Representative) -> Result<CanonicalRepoTrade> {
        let ticket = &representative.ticket;
        let event = classify(ticket);
        let trade = self.derive_event(event, ticket)?;

        debug!(
            group_key = %representative.group_key,
            event = %event,
            cust_ref = %trade.cust_ref,
            "derived repo trade"
        );

        Ok(trade)
    }

    /// Derive the record for an already classified ticket.
    pub fn derive_event(&self, event: RepoEvent, ticket: &RepoTicket) -> Result<CanonicalRepoTrade> {
        let portfolio_code = self.accounts.account_number(&ticket.fund)?.to_string();
        let mut trade = CanonicalRepoTrade {
            portfolio_code,
            txn_type: REPO_TXN_TYPE.to_string(),
            txn_sub_type: event.sub_type().to_string(),
            trade_date: None,
            settle_date: None,
            mature_date: None,
            loan_ccy: None,
            amount: None,
            eff_date: None,
            int_rate: None,
            int_mode: None,
            col_isin: None,
            col_qty: None,
            broker: None,
            cust_ref: String::new(),
        };

        match event {
            RepoEvent::Close => {
                let trade_date = format_date_field(ticket.trade_date, columns::TRADE_DATE)?;
                trade.mature_date = Some(trade_date);
                trade.cust_ref = key_component(ticket.require_original_ticket()?);
            }
            RepoEvent::ChangeRate => {
                let trade_date = format_date_field(ticket.trade_date, columns::TRADE_DATE)?;
                trade.eff_date = Some(trade_date);
                trade.int_rate = Some(ticket.repo_rate);
                trade.int_mode = Some(REPO_DAY_COUNT.to_string());
                trade.cust_ref = key_component(ticket.require_ticket_number()?);
            }
            RepoEvent::Open => {
                let trade_date = format_date_field(ticket.trade_date, columns::TRADE_DATE)?;
                let settle =
                    format_date_field(ticket.settlement_date, columns::SETTLEMENT_DATE)?;
                let maturity = match required(&ticket.maturity, columns::TERM_DATE)? {
                    Maturity::OpenEnded => OPEN_ENDED_MATURITY.to_string(),
                    Maturity::Date(serial) => format_date_field(*serial, columns::TERM_DATE)?,
                };
                let collateral = required(&ticket.collateral_amount, columns::COLLATERAL_AMOUNT)?;

                trade.trade_date = Some(trade_date);
                trade.settle_date = Some(settle.clone());
                trade.mature_date = Some(maturity);
                trade.loan_ccy = Some(ticket.currency.clone());
                trade.amount = Some(*required(&ticket.loan_amount, columns::LOAN_AMOUNT)?);
                trade.eff_date = Some(settle);
                trade.int_rate = Some(ticket.repo_rate);
                trade.int_mode = Some(REPO_DAY_COUNT.to_string());
                trade.col_isin = Some(required(&ticket.isin, columns::ISIN)?.clone());
                trade.col_qty = Some(COLLATERAL_QTY_SCALE * normalize_amount(collateral)?);
                trade.broker = Some(ticket.broker_id.clone());
                trade.cust_ref = key_component(ticket.require_ticket_number()?);
            }
        }

        Ok(trade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ledger_core::{RepoStatus, TicketValue};

    fn deriver() -> RepoTradeDeriver {
        RepoTradeDeriver::new(AccountMap::new([("40017-B", "666666")]))
    }

    fn base_ticket() -> RepoTicket {
        RepoTicket {
            fund: "40017-B".to_string(),
            trade_date: 44133.0,
            settlement_date: 44134.0,
            maturity: Some(Maturity::Date(44200.0)),
            currency: "USD".to_string(),
            broker_id: "SOCG-REPO".to_string(),
            repo_rate: 1.0,
            term_money: 3209280.0,
            loan_amount: Some(3209280.0),
            status: RepoStatus::Active,
            role_tag: "RT".to_string(),
            ticket_number: Some(TicketValue::from(285050.0)),
            original_ticket: None,
            isin: Some("XS2211674143".to_string()),
            collateral_amount: Some(TicketValue::from("4M")),
        }
    }

    fn representative(ticket: RepoTicket) -> Representative {
        Representative {
            group_key: "test".to_string(),
            ticket,
        }
    }

    #[test]
    fn test_open_trade() {
        let trade = deriver().derive(&representative(base_ticket())).unwrap();

        assert_eq!(trade.portfolio_code, "666666");
        assert_eq!(trade.txn_type, "REPO");
        assert_eq!(trade.txn_sub_type, "Open");
        assert_eq!(trade.trade_date.as_deref(), Some("29/10/2020"));
        assert_eq!(trade.settle_date.as_deref(), Some("30/10/2020"));
        assert_eq!(trade.mature_date.as_deref(), Some("04/01/2021"));
        assert_eq!(trade.loan_ccy.as_deref(), Some("USD"));
        assert_eq!(trade.amount, Some(3209280.0));
        assert_eq!(trade.eff_date.as_deref(), Some("30/10/2020"));
        assert_eq!(trade.int_rate, Some(1.0));
        assert_eq!(trade.int_mode.as_deref(), Some("ACT/360"));
        assert_eq!(trade.col_isin.as_deref(), Some("XS2211674143"));
        assert_relative_eq!(trade.col_qty.unwrap(), 4_000_000.0);
        assert_eq!(trade.broker.as_deref(), Some("SOCG-REPO"));
        assert_eq!(trade.cust_ref, "285050");
    }

    #[test]
    fn test_open_ended_maturity_sentinel() {
        let mut ticket = base_ticket();
        ticket.maturity = Some(Maturity::OpenEnded);

        let trade = deriver().derive(&representative(ticket)).unwrap();
        assert_eq!(trade.mature_date.as_deref(), Some("31/12/2049"));
    }

    #[test]
    fn test_close_trade() {
        let mut ticket = base_ticket();
        ticket.status = RepoStatus::Closed;
        ticket.trade_date = 43894.0;
        ticket.settlement_date = 43800.0;
        ticket.original_ticket = Some(TicketValue::from(226819.0));

        let trade = deriver().derive(&representative(ticket)).unwrap();

        assert_eq!(trade.txn_sub_type, "Close");
        assert_eq!(trade.mature_date.as_deref(), Some("04/03/2020"));
        assert_eq!(trade.cust_ref, "226819");
        assert!(trade.trade_date.is_none());
        assert!(trade.settle_date.is_none());
        assert!(trade.loan_ccy.is_none());
        assert!(trade.amount.is_none());
        assert!(trade.eff_date.is_none());
        assert!(trade.int_rate.is_none());
        assert!(trade.int_mode.is_none());
        assert!(trade.col_isin.is_none());
        assert!(trade.col_qty.is_none());
        assert!(trade.broker.is_none());
    }

    #[test]
    fn test_change_rate_trade() {
        let mut ticket = base_ticket();
        ticket.trade_date = 44020.0;
        ticket.settlement_date = 44018.0;
        ticket.repo_rate = 1.2;
        ticket.ticket_number = Some(TicketValue::from(218783.0));

        let trade = deriver().derive(&representative(ticket)).unwrap();

        assert_eq!(trade.txn_sub_type, "Change Rate");
        assert_eq!(trade.eff_date.as_deref(), Some("08/07/2020"));
        assert_eq!(trade.int_rate, Some(1.2));
        assert_eq!(trade.int_mode.as_deref(), Some("ACT/360"));
        assert_eq!(trade.cust_ref, "218783");
        assert!(trade.trade_date.is_none());
        assert!(trade.settle_date.is_none());
        assert!(trade.mature_date.is_none());
        assert!(trade.loan_ccy.is_none());
        assert!(trade.amount.is_none());
        assert!(trade.col_isin.is_none());
        assert!(trade.col_qty.is_none());
        assert!(trade.broker.is_none());
    }

    #[test]
    fn test_change_rate_does_not_need_open_fields() {
        let mut ticket = base_ticket();
        ticket.trade_date = 44020.0;
        ticket.settlement_date = 44018.0;
        ticket.maturity = None;
        ticket.loan_amount = None;
        ticket.isin = None;
        ticket.collateral_amount = None;

        assert!(deriver().derive(&representative(ticket)).is_ok());
    }

    #[test]
    fn test_open_missing_collateral_amount() {
        let mut ticket = base_ticket();
        ticket.collateral_amount = None;

        match deriver().derive(&representative(ticket)) {
            Err(Error::FieldMissing { field }) => assert_eq!(field, "Amount"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_open_bad_collateral_amount() {
        let mut ticket = base_ticket();
        ticket.collateral_amount = Some(TicketValue::from("lots"));

        assert!(matches!(
            deriver().derive(&representative(ticket)),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_open_overflowing_collateral_amount() {
        let mut ticket = base_ticket();
        let amount = format!("5{}", "M".repeat(120));
        ticket.collateral_amount = Some(TicketValue::from(amount));

        assert!(matches!(
            deriver().derive(&representative(ticket)),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_close_missing_original_ticket() {
        let mut ticket = base_ticket();
        ticket.status = RepoStatus::Closed;

        assert!(matches!(
            deriver().derive(&representative(ticket)),
            Err(Error::FieldMissing { .. })
        ));
    }

    #[test]
    fn test_unknown_fund() {
        let mut ticket = base_ticket();
        ticket.fund = "99999".to_string();

        assert!(matches!(
            deriver().derive(&representative(ticket)),
            Err(Error::UnknownFund(_))
        ));
    }

    #[test]
    fn test_bad_date_reports_column() {
        let mut ticket = base_ticket();
        ticket.settlement_date = f64::INFINITY;
        ticket.trade_date = 1.0;

        match deriver().derive(&representative(ticket)) {
            Err(Error::InvalidField { field, .. }) => assert_eq!(field, "Stl Date"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
