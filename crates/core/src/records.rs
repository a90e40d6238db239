//! Canonical output records and their fixed header sets.
//!
//! Serializers consume `*_HEADERS` together with each record's `to_row()`,
//! which renders cells in header order. Fields that do not apply to a record
//! are `None` and render as empty cells.

use serde::{Deserialize, Serialize};

/// Header set of the repo trade file, in output order.
pub const REPO_HEADERS: [&str; 21] = [
    "Portfolio_code",
    "Txn_type",
    "Txn_sub_type",
    "Trade_date",
    "Settle_date",
    "Mature_date",
    "Loan_ccy",
    "Amount",
    "Eff_date",
    "Int_rate",
    "Int_mode",
    "Col_ISIN",
    "Col_SEDOL",
    "Col_Bloomberg",
    "Col_LocalCode",
    "Col_CMUCode",
    "Col_desc",
    "Col_Qty",
    "Broker",
    "Exchange",
    "Cust_ref",
];

/// Header set of the bond/equity trade file, in output order.
pub const TRADE_HEADERS: [&str; 21] = [
    "Account",
    "SEDOL",
    "ISIN",
    "Name",
    "TranType",
    "Quantity",
    "TradeDate",
    "SettlementDate",
    "Currency",
    "Price",
    "AccurredInterest",
    "SettlementAmount",
    "Commission",
    "StampDuty",
    "TransactionLevy",
    "ClearingFee",
    "SalesTax",
    "HongKongCCASSFee",
    "TradeReferenceNumber",
    "BrokerCode",
    "BrokerName",
];

/// Header set of the FX trade file, in output order.
pub const FX_HEADERS: [&str; 16] = [
    "Portfolio Code",
    "Settlement Account",
    "FXS Contract No.",
    "Spot Deal Ref No.",
    "Trade Date",
    "Settlement Date",
    "Transaction Type",
    "Exchange Code",
    "Client Buy Currency",
    "Client Buy Amount",
    "Client Sell Currency",
    "Client Sell Amount",
    "Exchange Rate",
    "Source Application ID",
    "Broker Code",
    "Class Code",
];

/// Header set of the cash reconciliation file, in output order.
pub const CASH_RECON_HEADERS: [&str; 5] = ["portfolio", "custodian", "date", "currency", "balance"];

/// Header set of the holding reconciliation file, in output order.
pub const POSITION_RECON_HEADERS: [&str; 9] = [
    "portfolio",
    "custodian",
    "date",
    "geneva_investment_id",
    "ISIN",
    "bloomberg_figi",
    "name",
    "currency",
    "quantity",
];

/// Transaction type of every record in the repo flow.
pub const REPO_TXN_TYPE: &str = "REPO";

/// Day-count convention for repo interest.
pub const REPO_DAY_COUNT: &str = "ACT/360";

fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Back-office repo trade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRepoTrade {
    pub portfolio_code: String,
    pub txn_type: String,
    pub txn_sub_type: String,
    pub trade_date: Option<String>,
    pub settle_date: Option<String>,
    pub mature_date: Option<String>,
    pub loan_ccy: Option<String>,
    pub amount: Option<f64>,
    pub eff_date: Option<String>,
    pub int_rate: Option<f64>,
    pub int_mode: Option<String>,
    pub col_isin: Option<String>,
    pub col_qty: Option<f64>,
    pub broker: Option<String>,
    pub cust_ref: String,
}

impl CanonicalRepoTrade {
    /// Cells in [`REPO_HEADERS`] order. Collateral SEDOL, Bloomberg, local
    /// code, CMU code, description and exchange have no source yet and are
    /// always empty.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.portfolio_code.clone(),
            self.txn_type.clone(),
            self.txn_sub_type.clone(),
            cell(&self.trade_date),
            cell(&self.settle_date),
            cell(&self.mature_date),
            cell(&self.loan_ccy),
            cell(&self.amount),
            cell(&self.eff_date),
            cell(&self.int_rate),
            cell(&self.int_mode),
            cell(&self.col_isin),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            cell(&self.col_qty),
            cell(&self.broker),
            String::new(),
            self.cust_ref.clone(),
        ]
    }
}

/// Back-office bond/equity trade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondTrade {
    pub account: String,
    pub sedol: String,
    pub isin: String,
    pub name: String,
    pub tran_type: String,
    pub quantity: f64,
    pub trade_date: String,
    pub settlement_date: String,
    pub currency: String,
    pub price: f64,
    pub accrued_interest: f64,
    pub settlement_amount: f64,
    pub commission: f64,
    pub trade_reference_number: String,
    pub broker_code: String,
    pub broker_name: String,
    /// Broker short name, used to detect multiple SSI entries. Not an output column.
    pub broker_short_name: String,
}

impl BondTrade {
    /// Cells in [`TRADE_HEADERS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.account.clone(),
            self.sedol.clone(),
            self.isin.clone(),
            self.name.clone(),
            self.tran_type.clone(),
            self.quantity.to_string(),
            self.trade_date.clone(),
            self.settlement_date.clone(),
            self.currency.clone(),
            self.price.to_string(),
            self.accrued_interest.to_string(),
            self.settlement_amount.to_string(),
            self.commission.to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            self.trade_reference_number.clone(),
            self.broker_code.clone(),
            self.broker_name.clone(),
        ]
    }
}

/// Back-office FX trade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxTrade {
    pub portfolio_code: String,
    pub contract_number: String,
    pub trade_date: String,
    pub settlement_date: String,
    pub transaction_type: String,
    pub buy_currency: String,
    pub buy_amount: f64,
    pub sell_currency: String,
    pub sell_amount: f64,
}

impl FxTrade {
    /// Cells in [`FX_HEADERS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.portfolio_code.clone(),
            String::new(),
            self.contract_number.clone(),
            String::new(),
            self.trade_date.clone(),
            self.settlement_date.clone(),
            self.transaction_type.clone(),
            String::new(),
            self.buy_currency.clone(),
            self.buy_amount.to_string(),
            self.sell_currency.clone(),
            self.sell_amount.to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]
    }
}

/// Cash balance line of a reconciliation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashReconRecord {
    pub portfolio: String,
    pub date: String,
    pub currency: String,
    pub balance: f64,
}

impl CashReconRecord {
    /// Cells in [`CASH_RECON_HEADERS`] order. Custodian is always empty.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.portfolio.clone(),
            String::new(),
            self.date.clone(),
            self.currency.clone(),
            self.balance.to_string(),
        ]
    }
}

/// Bond holding line of a reconciliation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReconRecord {
    pub portfolio: String,
    pub date: String,
    pub isin: String,
    pub name: String,
    pub currency: String,
    pub quantity: f64,
}

impl PositionReconRecord {
    /// Cells in [`POSITION_RECON_HEADERS`] order. Custodian, investment id
    /// and FIGI are not in the valuation report and stay empty.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.portfolio.clone(),
            String::new(),
            self.date.clone(),
            String::new(),
            self.isin.clone(),
            String::new(),
            self.name.clone(),
            self.currency.clone(),
            self.quantity.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_trade() -> CanonicalRepoTrade {
        CanonicalRepoTrade {
            portfolio_code: "666666".to_string(),
            txn_type: REPO_TXN_TYPE.to_string(),
            txn_sub_type: "Close".to_string(),
            trade_date: None,
            settle_date: None,
            mature_date: Some("04/03/2020".to_string()),
            loan_ccy: None,
            amount: None,
            eff_date: None,
            int_rate: None,
            int_mode: None,
            col_isin: None,
            col_qty: None,
            broker: None,
            cust_ref: "226819".to_string(),
        }
    }

    fn header_index(headers: &[&str], name: &str) -> usize {
        headers.iter().position(|h| *h == name).unwrap()
    }

    #[test]
    fn test_repo_row_follows_headers() {
        let row = close_trade().to_row();
        assert_eq!(row.len(), REPO_HEADERS.len());
        assert_eq!(row[header_index(&REPO_HEADERS, "Txn_sub_type")], "Close");
        assert_eq!(row[header_index(&REPO_HEADERS, "Mature_date")], "04/03/2020");
        assert_eq!(row[header_index(&REPO_HEADERS, "Cust_ref")], "226819");
        assert_eq!(row[header_index(&REPO_HEADERS, "Trade_date")], "");
        assert_eq!(row[header_index(&REPO_HEADERS, "Col_SEDOL")], "");
    }

    #[test]
    fn test_numbers_render_without_trailing_fraction() {
        let mut trade = close_trade();
        trade.amount = Some(3209280.0);
        trade.int_rate = Some(1.2);
        let row = trade.to_row();
        assert_eq!(row[header_index(&REPO_HEADERS, "Amount")], "3209280");
        assert_eq!(row[header_index(&REPO_HEADERS, "Int_rate")], "1.2");
    }

    #[test]
    fn test_fx_row_length() {
        let trade = FxTrade {
            portfolio_code: "40019".to_string(),
            contract_number: "1".to_string(),
            trade_date: "07/10/2020".to_string(),
            settlement_date: "09/10/2020".to_string(),
            transaction_type: "Spot".to_string(),
            buy_currency: "USD".to_string(),
            buy_amount: 100.0,
            sell_currency: "HKD".to_string(),
            sell_amount: 775.0,
        };
        let row = trade.to_row();
        assert_eq!(row.len(), FX_HEADERS.len());
        assert_eq!(row[header_index(&FX_HEADERS, "Client Sell Amount")], "775");
    }

    #[test]
    fn test_position_row_leaves_unknown_ids_empty() {
        let record = PositionReconRecord {
            portfolio: "Short Term Bond Fund".to_string(),
            date: "2020-10-30".to_string(),
            isin: "XS1813551584".to_string(),
            name: "HOPSON DEVELOP 7% 2021".to_string(),
            currency: "USD".to_string(),
            quantity: 2000000.0,
        };
        let row = record.to_row();
        assert_eq!(row.len(), POSITION_RECON_HEADERS.len());
        assert_eq!(row[header_index(&POSITION_RECON_HEADERS, "ISIN")], "XS1813551584");
        assert_eq!(row[header_index(&POSITION_RECON_HEADERS, "quantity")], "2000000");
        assert_eq!(row[header_index(&POSITION_RECON_HEADERS, "geneva_investment_id")], "");
        assert_eq!(row[header_index(&POSITION_RECON_HEADERS, "bloomberg_figi")], "");
    }
}
