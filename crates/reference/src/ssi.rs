//! Parsed broker SSI table.
//!
//! A broker is in the multiplicity set when its sub-broker id occurs on more
//! than one row, whether or not the SSI codes on those rows differ.

use ledger_core::{BrokerCodeLookup, Error, Result};
use std::collections::{BTreeSet, HashMap};

/// Broker SSI table loaded from one reference file.
#[derive(Debug, Clone, Default)]
pub struct SsiTable {
    /// (sub-broker id, SSI code) in file order.
    entries: Vec<(String, String)>,
    /// Last-write-wins mapping.
    codes: HashMap<String, String>,
    /// Ids seen on more than one row.
    multiple: BTreeSet<String>,
}

/// SSI codes exported as floats (`94589.0`) are compared as `94589`. Any
/// other text, leading zeros included, is kept as written.
fn normalize_code(cell: &str) -> String {
    let cell = cell.trim();
    match cell.split_once('.') {
        Some((whole, fraction))
            if !whole.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && !fraction.is_empty()
                && fraction.bytes().all(|b| b == b'0') =>
        {
            whole.to_string()
        }
        _ => cell.to_string(),
    }
}

impl SsiTable {
    /// Build from raw rows. The first row is a header and is skipped, as are
    /// rows with no sub-broker id.
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let entries = rows
            .iter()
            .skip(1)
            .filter_map(|row| {
                let broker = row.first()?.trim();
                let code = row.last()?;
                (!broker.is_empty()).then(|| (broker.to_string(), normalize_code(code)))
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Build from already parsed pairs.
    pub fn from_entries(entries: Vec<(String, String)>) -> Self {
        let mut codes = HashMap::with_capacity(entries.len());
        let mut multiple = BTreeSet::new();

        for (broker, code) in &entries {
            if codes.insert(broker.clone(), code.clone()).is_some() {
                multiple.insert(broker.clone());
            }
        }

        Self {
            entries,
            codes,
            multiple,
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SSI code of a broker (last row wins).
    pub fn ssi_code(&self, broker: &str) -> Result<&str> {
        self.codes
            .get(broker)
            .map(String::as_str)
            .ok_or_else(|| Error::unknown_broker(broker))
    }

    pub fn has_multiple_ssi(&self, broker: &str) -> bool {
        self.multiple.contains(broker)
    }

    /// The multiplicity set.
    pub fn brokers_with_multiple_ssi(&self) -> &BTreeSet<String> {
        &self.multiple
    }
}

impl BrokerCodeLookup for SsiTable {
    fn broker_code(&self, broker: &str) -> Result<String> {
        self.ssi_code(broker).map(str::to_string)
    }
}
