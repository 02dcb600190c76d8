//! # Cart Store
//!
//! Single source of truth for the pending purchase.
//!
//! Every mutator follows the same sequence:
//!
//! 1. mutate the in-memory lines under the lock,
//! 2. persist the full snapshot (best effort: failures are logged only),
//! 3. notify subscribers, in registration order, with the new snapshot.
//!
//! Calls that do not change anything (removing an absent line, clearing an
//! empty cart, adding zero) neither persist nor notify, so each notification
//! corresponds to exactly one state change.
//!
//! Mutations from different threads are serialized from step 1 through
//! step 3, so subscribers see snapshots in commit order and the last snapshot
//! delivered always equals the current cart. Callbacks may read the cart but
//! must not mutate it: a mutation from inside a callback would wait on itself.

use crate::cart::storage::KeyValueStore;
use crate::framework::{ObserverList, Subscription};
use crate::model::{CartLine, ItemType, LineKey, SellableItem};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Reads the persisted cart under `key`.
///
/// Never fails: a missing key, unreadable storage or corrupt contents all
/// yield an empty cart. Lines with zero quantity are dropped and duplicate
/// `(id, type)` lines are merged.
pub fn load_from_storage(storage: &dyn KeyValueStore, key: &str) -> Vec<CartLine> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Cart storage unreadable, starting empty");
            return Vec::new();
        }
    };

    let stored: Vec<CartLine> = match serde_json::from_str(&raw) {
        Ok(lines) => lines,
        Err(e) => {
            warn!(key, error = %e, "Corrupt cart in storage, starting empty");
            return Vec::new();
        }
    };

    let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
    for line in stored.into_iter().filter(|line| line.quantity > 0) {
        let key = line.key();
        match lines.iter_mut().find(|existing| existing.matches(&key)) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    lines
}

#[derive(Clone)]
pub struct CartStore {
    lines: Arc<Mutex<Vec<CartLine>>>,
    /// Held from mutation through notification.
    commits: Arc<Mutex<()>>,
    storage: Arc<dyn KeyValueStore>,
    key: Arc<str>,
    observers: ObserverList<[CartLine]>,
}

impl CartStore {
    /// Opens the cart persisted under `key`, recovering to empty if needed.
    pub fn open(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key: Arc<str> = Arc::from(key.into());
        let lines = load_from_storage(storage.as_ref(), &key);
        info!(key = %key, lines = lines.len(), "Cart opened");
        Self {
            lines: Arc::new(Mutex::new(lines)),
            commits: Arc::new(Mutex::new(())),
            storage,
            key,
            observers: ObserverList::new(),
        }
    }

    /// The snapshot currently in storage, for first paint.
    pub fn load_from_storage(&self) -> Vec<CartLine> {
        load_from_storage(self.storage.as_ref(), &self.key)
    }

    /// Adds `quantity` of `item`, merging into an existing line with the same
    /// `(id, type)`. The existing line keeps its original price snapshot.
    pub fn add_item(&self, item: SellableItem, quantity: u32, item_type: ItemType) {
        if quantity == 0 {
            warn!(item_id = %item.id, "Ignoring add of zero quantity");
            return;
        }
        self.commit("add_item", |lines| {
            let key = LineKey::new(item.id.clone(), item_type);
            match lines.iter_mut().find(|line| line.matches(&key)) {
                Some(line) => line.quantity = line.quantity.saturating_add(quantity),
                None => lines.push(CartLine {
                    item,
                    item_type,
                    quantity,
                }),
            }
            true
        });
    }

    /// Sets the quantity of a line exactly. Zero removes the line.
    pub fn update_quantity(&self, key: &LineKey, quantity: u32) {
        if quantity == 0 {
            self.remove_item(key);
            return;
        }
        self.commit("update_quantity", |lines| {
            match lines.iter_mut().find(|line| line.matches(key)) {
                Some(line) if line.quantity != quantity => {
                    line.quantity = quantity;
                    true
                }
                _ => false,
            }
        });
    }

    /// Removes a line. Removing an absent line is a no-op.
    pub fn remove_item(&self, key: &LineKey) {
        self.commit("remove_item", |lines| {
            let before = lines.len();
            lines.retain(|line| !line.matches(key));
            lines.len() != before
        });
    }

    pub fn clear(&self) {
        self.commit("clear", |lines| {
            if lines.is_empty() {
                return false;
            }
            lines.clear();
            true
        });
    }

    /// Registers `callback` to receive the cart after every mutation.
    pub fn subscribe(&self, callback: impl Fn(&[CartLine]) + Send + Sync + 'static) -> Subscription {
        self.observers.subscribe(callback)
    }

    /// Snapshot of the current lines.
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().clone()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.lock()
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    pub fn subtotal(&self) -> f64 {
        self.lock().iter().map(CartLine::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CartLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(&self, op: &'static str, mutate: impl FnOnce(&mut Vec<CartLine>) -> bool) {
        let _commit = self.commits.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = {
            let mut lines = self.lock();
            if !mutate(&mut lines) {
                debug!(op, "Cart unchanged");
                return;
            }
            let snapshot = lines.clone();
            self.persist(&snapshot);
            snapshot
        };
        debug!(op, lines = snapshot.len(), "Cart updated");
        self.observers.notify(&snapshot[..]);
    }

    fn persist(&self, lines: &[CartLine]) {
        let result = serde_json::to_string(lines)
            .map_err(Into::into)
            .and_then(|raw| self.storage.set(&self.key, &raw));
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to persist cart, keeping in-memory state");
        }
    }
}
