//! # Observer Lists
//!
//! A plain observer-list pattern shared by the cart store and the order
//! simulation. Callbacks are invoked synchronously, in registration order,
//! after each committed mutation.
//!
//! `notify` clones the callback handles out of the lock before invoking them,
//! so a callback may read from the store it observes (or subscribe/unsubscribe)
//! without deadlocking.
//!
//! A callback that panics is logged and skipped; the remaining callbacks
//! still run and the notifier (the cart, or the simulation actor's task)
//! keeps going.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::error;

struct Entry<T: ?Sized> {
    id: u64,
    callback: Arc<dyn Fn(&T) + Send + Sync>,
}

struct Inner<T: ?Sized> {
    entries: Mutex<Vec<Entry<T>>>,
    next_id: AtomicU64,
}

/// Removal side of an observer list, type-erased so that [`Subscription`]
/// does not need to carry the event type.
trait Detach: Send + Sync {
    fn detach(&self, id: u64) -> bool;
}

impl<T: ?Sized + 'static> Detach for Inner<T> {
    fn detach(&self, id: u64) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }
}

/// An ordered list of observers for events of type `T`.
///
/// Cloning an `ObserverList` yields another handle to the same list.
pub struct ObserverList<T: ?Sized> {
    inner: Arc<Inner<T>>,
}

impl<T: ?Sized> Clone for ObserverList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized + 'static> Default for ObserverList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> ObserverList<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Registers `callback` at the end of the list.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Entry {
                id,
                callback: Arc::new(callback),
            });

        let list: Weak<dyn Detach> = Arc::downgrade(&self.inner) as Weak<dyn Detach>;
        Subscription { id, list }
    }

    /// Invokes every registered callback with `event`, in registration order.
    ///
    /// Returns the number of callbacks that completed without panicking.
    pub fn notify(&self, event: &T) -> usize {
        let callbacks: Vec<Arc<dyn Fn(&T) + Send + Sync>> = self
            .inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|entry| Arc::clone(&entry.callback))
            .collect();

        let mut completed = 0;
        for callback in &callbacks {
            match catch_unwind(AssertUnwindSafe(|| callback(event))) {
                Ok(()) => completed += 1,
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    error!(reason = %reason, "Observer callback panicked, skipping");
                }
            }
        }
        completed
    }

    pub fn len(&self) -> usize {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by `subscribe`. Call [`Subscription::unsubscribe`] to stop
/// receiving events.
///
/// Dropping the handle does **not** unsubscribe; the observer stays registered
/// until `unsubscribe` is called or the list itself is dropped.
#[must_use = "keep the subscription to be able to unsubscribe later"]
pub struct Subscription {
    id: u64,
    list: Weak<dyn Detach>,
}

impl Subscription {
    /// Removes the observer. Safe to call any number of times; every call
    /// after the first is a no-op.
    ///
    /// Returns `true` only for the call that actually removed the observer.
    pub fn unsubscribe(&self) -> bool {
        match self.list.upgrade() {
            Some(list) => list.detach(self.id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
