//! Core data types for the conversion system.

use crate::amount::key_component;
use crate::error::{Error, Result};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Spreadsheet date serial (days since 1899-12-30).
pub type DateSerial = f64;

/// Upstream column names.
pub mod columns {
    pub const FUND: &str = "Fund";
    pub const TRADE_DATE: &str = "Trd Dt";
    pub const SETTLEMENT_DATE: &str = "Stl Date";
    pub const TERM_DATE: &str = "Trm Date";
    pub const CURRENCY: &str = "Crcy";
    pub const BROKER_ID: &str = "Broker ID";
    pub const REPO_RATE: &str = "Repo Rte";
    pub const TERM_MONEY: &str = "Unadj Term Money";
    pub const LOAN_AMOUNT: &str = "Loan Amount";
    pub const REPO_STATUS: &str = "Repo Sta";
    pub const ROLE: &str = "Type";
    pub const TICKET_NUMBER: &str = "Tkt #";
    pub const ORIGINAL_TICKET: &str = "Orig Tkt";
    pub const ISIN: &str = "ISIN";
    pub const COLLATERAL_AMOUNT: &str = "Amount";

    pub const SEDOL: &str = "Sedol";
    pub const SHORT_NAME: &str = "Shrt Name";
    pub const SIDE: &str = "B/S";
    pub const QUANTITY: &str = "Amount Pennies";
    pub const AS_OF_DATE: &str = "As of Dt";
    pub const SETTLE_CURRENCY: &str = "VCurr";
    pub const PRICE: &str = "Price";
    pub const ACCRUED_INTEREST: &str = "Accr Int";
    pub const SETTLE_AMOUNT: &str = "Settle Amount";
    pub const BROKER_SHORT_NAME: &str = "FACC Short Name";
    pub const BROKER_LONG_NAME: &str = "FACC Long Name";
    pub const FX_DEAL_TYPE: &str = "FX Trade Deal Type";

    // Valuation report positions.
    pub const DEAL_CURRENCY: &str = "DEAL CCY";
    pub const BOOK_COST: &str = "ORIG CURR BOOK COST";
    pub const ISIN_CODE: &str = "ISIN CODE";
    pub const INVESTMENT: &str = "INVESTMENT";
    pub const NOMINAL_QUANTITY: &str = "NOMINAL QUANTITY";

    /// Term date text marking an open-ended repo.
    pub const OPEN_TERM: &str = "OPEN";
}

/// One cell of an upstream ticket row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketValue {
    /// Numeric cell (amounts, rates, date serials).
    Number(OrderedFloat<f64>),
    /// Text cell.
    Text(String),
}

impl TicketValue {
    /// Numeric content, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TicketValue::Number(n) => Some(n.into_inner()),
            TicketValue::Text(_) => None,
        }
    }

    /// Text content, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TicketValue::Text(s) => Some(s),
            TicketValue::Number(_) => None,
        }
    }
}

impl From<f64> for TicketValue {
    fn from(v: f64) -> Self {
        TicketValue::Number(OrderedFloat(v))
    }
}

impl From<&str> for TicketValue {
    fn from(v: &str) -> Self {
        TicketValue::Text(v.to_string())
    }
}

impl From<String> for TicketValue {
    fn from(v: String) -> Self {
        TicketValue::Text(v)
    }
}

impl fmt::Display for TicketValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&key_component(self))
    }
}

/// A raw upstream row: column name -> cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketRow {
    fields: BTreeMap<String, TicketValue>,
}

impl TicketRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: &str, value: impl Into<TicketValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field.
    pub fn insert(&mut self, field: &str, value: impl Into<TicketValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Remove a field.
    pub fn remove(&mut self, field: &str) -> Option<TicketValue> {
        self.fields.remove(field)
    }

    /// Cell for a field, if present.
    pub fn get(&self, field: &str) -> Option<&TicketValue> {
        self.fields.get(field)
    }

    /// Cell for a required field.
    pub fn value(&self, field: &str) -> Result<&TicketValue> {
        self.get(field).ok_or_else(|| Error::field_missing(field))
    }

    /// Required numeric field.
    pub fn number(&self, field: &str) -> Result<f64> {
        self.value(field)?
            .as_number()
            .ok_or_else(|| Error::invalid_field(field, "expected a number"))
    }

    /// Required text field.
    pub fn text(&self, field: &str) -> Result<String> {
        self.value(field)?
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| Error::invalid_field(field, "expected text"))
    }

    /// Required identifier: text as-is, numbers in key form (`40019.0` -> `40019`).
    pub fn identifier(&self, field: &str) -> Result<String> {
        self.value(field).map(key_component)
    }

    /// Optional identifier.
    pub fn opt_identifier(&self, field: &str) -> Option<String> {
        self.get(field).map(key_component)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Role of a sub-ticket within a repo group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TicketRole {
    /// Master contract reference (open path).
    Mrc,
    /// Rate ticket, carries current economics (open path).
    Rt,
    /// Master close reference (close path).
    Kmr,
    /// Close record (close path).
    Cr,
}

impl TicketRole {
    /// Parse an upstream role tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "MRC" => Some(TicketRole::Mrc),
            "RT" => Some(TicketRole::Rt),
            "KMR" => Some(TicketRole::Kmr),
            "CR" => Some(TicketRole::Cr),
            _ => None,
        }
    }

    /// Upstream tag text.
    pub fn tag(self) -> &'static str {
        match self {
            TicketRole::Mrc => "MRC",
            TicketRole::Rt => "RT",
            TicketRole::Kmr => "KMR",
            TicketRole::Cr => "CR",
        }
    }
}

impl fmt::Display for TicketRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Repo status column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepoStatus {
    Active,
    Closed,
    /// Any other upstream value, kept verbatim.
    Other(String),
}

impl RepoStatus {
    /// Parse the upstream status text.
    pub fn parse(text: &str) -> Self {
        match text {
            "Active" => RepoStatus::Active,
            "Closed" => RepoStatus::Closed,
            other => RepoStatus::Other(other.to_string()),
        }
    }

    /// Upstream status text.
    pub fn as_str(&self) -> &str {
        match self {
            RepoStatus::Active => "Active",
            RepoStatus::Closed => "Closed",
            RepoStatus::Other(s) => s,
        }
    }
}

/// Term date of a repo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Maturity {
    /// Fixed maturity date.
    Date(DateSerial),
    /// No fixed maturity.
    OpenEnded,
}

impl Maturity {
    fn from_value(value: &TicketValue) -> Result<Self> {
        match value {
            TicketValue::Number(n) => Ok(Maturity::Date(n.into_inner())),
            TicketValue::Text(s) if s.trim() == columns::OPEN_TERM => Ok(Maturity::OpenEnded),
            TicketValue::Text(s) => Err(Error::invalid_field(
                columns::TERM_DATE,
                format!("expected a date serial or {}, got {:?}", columns::OPEN_TERM, s),
            )),
        }
    }
}

/// Typed view of one repo ticket row.
///
/// Fields only some classification branches need are optional here and
/// checked by the branch that uses them.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoTicket {
    pub fund: String,
    pub trade_date: DateSerial,
    pub settlement_date: DateSerial,
    pub maturity: Option<Maturity>,
    pub currency: String,
    pub broker_id: String,
    pub repo_rate: f64,
    pub term_money: f64,
    pub loan_amount: Option<f64>,
    pub status: RepoStatus,
    /// Role tag as written upstream.
    pub role_tag: String,
    pub ticket_number: Option<TicketValue>,
    pub original_ticket: Option<TicketValue>,
    pub isin: Option<String>,
    /// Collateral amount, possibly with magnitude suffix.
    pub collateral_amount: Option<TicketValue>,
}

impl RepoTicket {
    /// Parse a repo ticket from a raw row.
    pub fn from_row(row: &TicketRow) -> Result<Self> {
        let loan_amount = match row.get(columns::LOAN_AMOUNT) {
            Some(_) => Some(row.number(columns::LOAN_AMOUNT)?),
            None => None,
        };

        Ok(Self {
            fund: row.identifier(columns::FUND)?,
            trade_date: row.number(columns::TRADE_DATE)?,
            settlement_date: row.number(columns::SETTLEMENT_DATE)?,
            maturity: row
                .get(columns::TERM_DATE)
                .map(Maturity::from_value)
                .transpose()?,
            currency: row.text(columns::CURRENCY)?,
            broker_id: row.identifier(columns::BROKER_ID)?,
            repo_rate: row.number(columns::REPO_RATE)?,
            term_money: row.number(columns::TERM_MONEY)?,
            loan_amount,
            status: RepoStatus::parse(&row.text(columns::REPO_STATUS)?),
            role_tag: row.text(columns::ROLE)?,
            ticket_number: row.get(columns::TICKET_NUMBER).cloned(),
            original_ticket: row.get(columns::ORIGINAL_TICKET).cloned(),
            isin: row.opt_identifier(columns::ISIN),
            collateral_amount: row.get(columns::COLLATERAL_AMOUNT).cloned(),
        })
    }

    /// Parsed role, `None` for tags outside the known set.
    pub fn role(&self) -> Option<TicketRole> {
        TicketRole::from_tag(&self.role_tag)
    }

    /// Ticket number, required.
    pub fn require_ticket_number(&self) -> Result<&TicketValue> {
        self.ticket_number
            .as_ref()
            .ok_or_else(|| Error::field_missing(columns::TICKET_NUMBER))
    }

    /// Original ticket number, required.
    pub fn require_original_ticket(&self) -> Result<&TicketValue> {
        self.original_ticket
            .as_ref()
            .ok_or_else(|| Error::field_missing(columns::ORIGINAL_TICKET))
    }
}

/// Lifecycle state of a repo trade event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepoEvent {
    /// New financing.
    Open,
    /// Unwind.
    Close,
    /// Rerate of an existing open financing.
    ChangeRate,
}

impl RepoEvent {
    /// Transaction sub-type label.
    pub fn sub_type(self) -> &'static str {
        match self {
            RepoEvent::Open => "Open",
            RepoEvent::Close => "Close",
            RepoEvent::ChangeRate => "Change Rate",
        }
    }
}

impl fmt::Display for RepoEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sub_type())
    }
}

/// Resolves a broker's settlement standing instruction code.
pub trait BrokerCodeLookup {
    /// SSI code for a broker. Fails with [`Error::UnknownBroker`] when absent.
    fn broker_code(&self, broker: &str) -> Result<String>;
}
