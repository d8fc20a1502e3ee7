#![forbid(unsafe_code)]

//! Single-threaded observable cell with change notification.
//!
//! [`Observable<T>`] keeps a value plus a version counter in shared
//! `Rc<RefCell<..>>` storage. Writes that change the value (by `PartialEq`)
//! bump the version and call every live subscriber in registration order.
//!
//! Subscribers are held weakly; the strong side lives in the
//! [`Subscription`] guard returned by [`Observable::subscribe`], so dropping
//! the guard is all it takes to unsubscribe. Dead entries are pruned on the
//! next notification.
//!
//! Calling `set` from inside a subscriber callback is not supported: the
//! callback runs after the write borrow is released, but a nested write
//! would re-notify while the outer notification is still iterating.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;
type WeakCallback<T> = Weak<dyn Fn(&T)>;

struct Shared<T> {
    value: T,
    version: u64,
    subscribers: Vec<WeakCallback<T>>,
}

/// Shared value with version tracking and subscriber notification.
///
/// Clones are handles to the same cell.
pub struct Observable<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Observable")
            .field("value", &shared.value)
            .field("version", &shared.version)
            .field("subscribers", &shared.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Wrap `value` at version 0 with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.borrow().value)
    }

    /// Replace the value. Returns `true` if it changed (and subscribers ran).
    pub fn set(&self, value: T) -> bool {
        {
            let mut shared = self.shared.borrow_mut();
            if shared.value == value {
                return false;
            }
            shared.value = value;
            shared.version += 1;
        }
        self.notify();
        true
    }

    /// Mutate the value in place. Returns `true` if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let changed = {
            let mut shared = self.shared.borrow_mut();
            let before = shared.value.clone();
            f(&mut shared.value);
            let changed = shared.value != before;
            if changed {
                shared.version += 1;
            }
            changed
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Register `callback` to run after every change.
    ///
    /// The callback stays registered for as long as the returned guard lives.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Callback<T> = Rc::new(callback);
        self.shared
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _keep_alive: Box::new(strong),
        }
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.borrow().version
    }

    /// Registered subscribers, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.borrow().subscribers.len()
    }

    fn notify(&self) {
        let (live, value) = {
            let mut shared = self.shared.borrow_mut();
            shared.subscribers.retain(|w| w.strong_count() > 0);
            let live: Vec<Callback<T>> = shared
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect();
            (live, shared.value.clone())
        };
        for callback in &live {
            callback(&value);
        }
    }
}

/// Guard that keeps a subscriber callback registered.
pub struct Subscription {
    _keep_alive: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_bumps_version_only_on_change() {
        let obs = Observable::new(1);
        assert_eq!(obs.version(), 0);

        assert!(!obs.set(1));
        assert_eq!(obs.version(), 0);

        assert!(obs.set(2));
        assert_eq!(obs.get(), 2);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn update_in_place() {
        let obs = Observable::new(vec![3, 1, 2]);
        assert!(obs.update(|v| v.sort_unstable()));
        assert_eq!(obs.with(|v| v.clone()), vec![1, 2, 3]);
        assert!(!obs.update(|v| v.sort_unstable()));
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let log = Rc::clone(&log);
            obs.subscribe(move |v| log.borrow_mut().push(("first", *v)))
        };
        let second = {
            let log = Rc::clone(&log);
            obs.subscribe(move |v| log.borrow_mut().push(("second", *v)))
        };

        obs.set(5);
        assert_eq!(*log.borrow(), vec![("first", 5), ("second", 5)]);
        drop((first, second));
    }

    #[test]
    fn dropping_guard_unsubscribes() {
        let obs = Observable::new(0);
        let hits = Rc::new(Cell::new(0));

        let guard = {
            let hits = Rc::clone(&hits);
            obs.subscribe(move |_| hits.set(hits.get() + 1))
        };
        obs.set(1);
        assert_eq!(hits.get(), 1);

        drop(guard);
        obs.set(2);
        assert_eq!(hits.get(), 1);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn clones_share_state() {
        let a = Observable::new("x".to_string());
        let b = a.clone();
        b.set("y".to_string());
        assert_eq!(a.get(), "y");
        assert_eq!(a.version(), 1);
    }
}
