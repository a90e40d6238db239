//! Bounded cache of loaded SSI tables.
//!
//! Each cached file owns a slot. The index lock only guards LRU bookkeeping
//! and is never held while a file loads; the slot lock is held for the load,
//! so concurrent readers of the same file wait for one load instead of
//! starting their own. A failed load leaves the slot empty and removes it.

use crate::source::SsiSource;
use crate::ssi::SsiTable;
use ledger_core::config::ReferenceConfig;
use ledger_core::Result;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

type Slot = Arc<Mutex<Option<Arc<SsiTable>>>>;

/// LRU bookkeeping: most recently used file at the back.
#[derive(Debug)]
struct LruSlots {
    order: VecDeque<String>,
    slots: HashMap<String, Slot>,
    capacity: usize,
}

impl LruSlots {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    fn touch(&mut self, file: &str) {
        if let Some(pos) = self.order.iter().position(|f| f == file) {
            if let Some(key) = self.order.remove(pos) {
                self.order.push_back(key);
            }
        }
    }

    /// Existing slot for `file`, or a fresh one after evicting the oldest.
    fn slot(&mut self, file: &str) -> Slot {
        if let Some(slot) = self.slots.get(file).cloned() {
            self.touch(file);
            return slot;
        }

        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(evicted) => {
                    self.slots.remove(&evicted);
                    debug!(file = %evicted, "evicted reference table");
                }
                None => break,
            }
        }

        let slot = Slot::default();
        self.order.push_back(file.to_string());
        self.slots.insert(file.to_string(), Arc::clone(&slot));
        slot
    }

    /// Drop `file` if it still maps to `slot`.
    fn discard(&mut self, file: &str, slot: &Slot) {
        if self.slots.get(file).is_some_and(|s| Arc::ptr_eq(s, slot)) {
            self.slots.remove(file);
            self.order.retain(|f| f != file);
        }
    }
}

/// Broker SSI tables keyed by reference file, loaded on first use.
pub struct BrokerSsiIndex<S> {
    source: S,
    state: Mutex<LruSlots>,
    loads: AtomicU64,
}

impl<S: SsiSource> BrokerSsiIndex<S> {
    /// Create an index keeping at most `capacity` files loaded.
    pub fn new(source: S, capacity: usize) -> Self {
        Self {
            source,
            state: Mutex::new(LruSlots::new(capacity.max(1))),
            loads: AtomicU64::new(0),
        }
    }

    /// Create an index sized by configuration.
    pub fn from_config(source: S, config: &ReferenceConfig) -> Self {
        Self::new(source, config.cache_capacity)
    }

    /// Table for `file`, loading it if not cached.
    ///
    /// While the file stays cached every call returns the same `Arc`.
    pub fn table(&self, file: &str) -> Result<Arc<SsiTable>> {
        let slot = self.state.lock().slot(file);

        let mut guard = slot.lock();
        if let Some(table) = guard.as_ref() {
            return Ok(Arc::clone(table));
        }

        match self.source.load_rows(file) {
            Ok(rows) => {
                let table = Arc::new(SsiTable::from_rows(&rows));
                self.loads.fetch_add(1, Ordering::Relaxed);
                info!(
                    file,
                    entries = table.len(),
                    multiple_ssi = table.brokers_with_multiple_ssi().len(),
                    "loaded broker SSI table"
                );
                *guard = Some(Arc::clone(&table));
                Ok(table)
            }
            Err(e) => {
                drop(guard);
                warn!(file, error = %e, "failed to load broker SSI table");
                self.state.lock().discard(file, &slot);
                Err(e)
            }
        }
    }

    /// SSI code of `broker` in `file`.
    pub fn ssi_code(&self, file: &str, broker: &str) -> Result<String> {
        Ok(self.table(file)?.ssi_code(broker)?.to_string())
    }

    /// Whether `broker` has more than one row in `file`.
    pub fn has_multiple_ssi(&self, file: &str, broker: &str) -> Result<bool> {
        Ok(self.table(file)?.has_multiple_ssi(broker))
    }

    /// Files currently cached, least recently used first.
    pub fn cached_files(&self) -> Vec<String> {
        self.state.lock().order.iter().cloned().collect()
    }

    /// Number of successful loads so far.
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
