//! Fund code to back-office account number mapping.

use ledger_core::config::AccountConfig;
use ledger_core::{Error, Result};
use std::collections::BTreeMap;

/// Lookup table from upstream fund code to account number.
#[derive(Debug, Clone, Default)]
pub struct AccountMap {
    mapping: BTreeMap<String, String>,
}

impl AccountMap {
    /// Build from explicit pairs.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            mapping: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Build from configuration.
    pub fn from_config(config: &AccountConfig) -> Self {
        Self {
            mapping: config.mapping.clone(),
        }
    }

    /// Account number for a fund.
    pub fn account_number(&self, fund: &str) -> Result<&str> {
        self.mapping
            .get(fund)
            .map(String::as_str)
            .ok_or_else(|| Error::unknown_fund(fund))
    }

    /// Number of mapped funds.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Whether no fund is mapped.
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let accounts = AccountMap::from_config(&AccountConfig::default());
        assert_eq!(accounts.account_number("60001").unwrap(), "CLAMC STBD");
        assert_eq!(accounts.account_number("19437-A").unwrap(), "19437A");
    }

    #[test]
    fn test_unknown_fund() {
        let accounts = AccountMap::new([("A", "1")]);
        assert!(matches!(
            accounts.account_number("B"),
            Err(Error::UnknownFund(f)) if f == "B"
        ));
    }
}
