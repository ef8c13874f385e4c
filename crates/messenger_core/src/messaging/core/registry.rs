//! In-memory registry handing out unique identifiers.
//!
//! The registry maps a 64-bit identifier to a caller-supplied value. Identifiers
//! are allocated by the registry itself from an atomic sequence and are never
//! reused. Identifier `0` is never allocated: callers use it as the "unset"
//! sentinel and reject it before reaching the registry.
//!
//! ## Concurrency
//!
//! All entries live behind a single reader/writer lock. [`Registry::insert`]
//! allocates the identifier and stores the value within one exclusive critical
//! section, so no reader can ever observe an allocated identifier before its
//! value. [`Registry::get`] only takes the shared lock: concurrent lookups never
//! wait on each other, only on an in-flight insertion.
//!
//! The registry is owned by the service stack that uses it (usually behind an
//! [`Arc`](std::sync::Arc)) and lives as long as the process. Nothing is
//! persisted.

use std::{
    collections::HashMap,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::debug;

/// First identifier allocated by an empty registry.
pub const FIRST_ID: u64 = 1;

/// Concurrency-safe identifier-keyed store.
#[derive(Debug)]
pub struct Registry<V> {
    entries: RwLock<HashMap<u64, V>>,
    /// Last allocated identifier, `FIRST_ID - 1` while empty.
    sequence: AtomicU64,
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self { entries: RwLock::new(HashMap::new()), sequence: AtomicU64::new(FIRST_ID - 1) }
    }
}

impl<V> Registry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under a freshly allocated identifier and return it.
    ///
    /// Never fails. Identifiers strictly increase in allocation order.
    pub fn insert(&self, value: V) -> u64 {
        // Critical sections never leave the map half-written.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Allocation and store happen under the same write lock.
        let id = self.sequence.fetch_add(1, Ordering::AcqRel) + 1;
        entries.insert(id, value);
        debug!("[registry] allocated id {id}");
        id
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Registry<V> {
    /// Look up the value stored under `id`.
    ///
    /// Returns `None` if `id` was never allocated, which includes `0`.
    pub fn get(&self, id: u64) -> Option<V> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).get(&id).cloned()
    }
}
