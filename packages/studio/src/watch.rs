//! Observer registry used by stores to push changes to interested views.
//!
//! A callback registered with [`Watchers::subscribe`] stays registered for as
//! long as the returned [`Subscription`] is alive. Dropping the guard (or
//! calling [`Subscription::unsubscribe`]) removes the callback, so a view that
//! goes away releases its subscription deterministically.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T: ?Sized> {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback<T>>,
}

/// Set of callbacks notified with a `&T` on every change.
pub struct Watchers<T: ?Sized> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: ?Sized> Clone for Watchers<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T: ?Sized> Default for Watchers<T> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                callbacks: BTreeMap::new(),
            })),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Watchers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watchers")
            .field("subscribers", &lock(&self.registry).callbacks.len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: ?Sized + 'static> Watchers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; it is invoked on every [`notify`](Self::notify)
    /// until the returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.callbacks.insert(id, Arc::new(callback));
            id
        };

        let registry = Arc::downgrade(&self.registry);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    lock(&registry).callbacks.remove(&id);
                }
            })),
        }
    }

    /// Invoke every registered callback with `value`.
    ///
    /// Callbacks run outside the registry lock, so a callback may subscribe or
    /// unsubscribe without deadlocking.
    pub fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = lock(&self.registry).callbacks.values().cloned().collect();
        for callback in callbacks {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.registry).callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guard for a registered callback. Unregisters on drop.
#[must_use = "dropping a Subscription immediately unregisters its callback"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Explicitly unregister the callback.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn notifies_until_dropped() {
        let watchers: Watchers<str> = Watchers::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let sub = watchers.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        watchers.notify("first");
        watchers.notify("second");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(watchers.len(), 1);

        drop(sub);
        watchers.notify("third");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(watchers.is_empty());
    }

    #[test]
    fn explicit_unsubscribe_only_removes_own_callback() {
        let watchers: Watchers<u32> = Watchers::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let a_seen = Arc::clone(&seen);
        let a = watchers.subscribe(move |v| lock(&a_seen).push(("a", *v)));
        let b_seen = Arc::clone(&seen);
        let _b = watchers.subscribe(move |v| lock(&b_seen).push(("b", *v)));

        watchers.notify(&1);
        a.unsubscribe();
        watchers.notify(&2);

        assert_eq!(*lock(&seen), vec![("a", 1), ("b", 1), ("b", 2)]);
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let watchers: Watchers<u32> = Watchers::new();
        let sub = watchers.subscribe(|_| {});
        drop(watchers);
        drop(sub);
    }
}
