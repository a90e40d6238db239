//! Error types for the ticket-to-ledger conversion system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the conversion system.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed numeric ticket amount.
    #[error("Format error: {0}")]
    Format(String),

    /// A group lacks a sub-ticket role required by its status.
    #[error("Lookup error: missing required sub-ticket role {role} in group {group_key}")]
    MissingRole { role: String, group_key: String },

    /// Broker not present in the SSI reference table.
    #[error("Lookup error: unknown broker {0}")]
    UnknownBroker(String),

    /// Fund code with no account number mapping.
    #[error("Lookup error: unknown fund {0}")]
    UnknownFund(String),

    /// Ticket field absent.
    #[error("Field missing: {field}")]
    FieldMissing { field: String },

    /// Ticket field present but unusable.
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reference table could not be read.
    #[error("Reference table error: {0}")]
    Reference(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Coarse error classification used by callers deciding how to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed amount.
    Format,
    /// Missing role, broker or fund.
    Lookup,
    /// Missing or malformed ticket field.
    FieldMissing,
    /// Configuration, I/O and everything else.
    Ambient,
}

impl Error {
    /// Create a format error.
    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    /// Create a missing-role error.
    pub fn missing_role(role: impl Into<String>, group_key: impl Into<String>) -> Self {
        Error::MissingRole {
            role: role.into(),
            group_key: group_key.into(),
        }
    }

    /// Create an unknown-broker error.
    pub fn unknown_broker(broker: impl Into<String>) -> Self {
        Error::UnknownBroker(broker.into())
    }

    /// Create an unknown-fund error.
    pub fn unknown_fund(fund: impl Into<String>) -> Self {
        Error::UnknownFund(fund.into())
    }

    /// Create a field-missing error.
    pub fn field_missing(field: impl Into<String>) -> Self {
        Error::FieldMissing {
            field: field.into(),
        }
    }

    /// Create an invalid-field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a reference table error.
    pub fn reference(msg: impl Into<String>) -> Self {
        Error::Reference(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format(_) => ErrorKind::Format,
            Error::MissingRole { .. } | Error::UnknownBroker(_) | Error::UnknownFund(_) => {
                ErrorKind::Lookup
            }
            Error::FieldMissing { .. } | Error::InvalidField { .. } => ErrorKind::FieldMissing,
            Error::Config(_)
            | Error::Reference(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Other(_) => ErrorKind::Ambient,
        }
    }
}
