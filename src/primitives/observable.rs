// ============================================================================
// store-hooks - Observable Primitive
// Minimal value holder with get/set/subscribe
// ============================================================================
//
// This is a reference engine for the ObservableState contract, not a
// reactive graph: there is no dependency tracking, batching, or equality
// short-circuit. Every write notifies every live listener, synchronously,
// in registration order.
//
// Notification never holds a borrow while listeners run. The value is
// cloned into a snapshot and the listener list is copied first, so a
// listener may read, write, subscribe or unsubscribe freely. A listener
// removed mid-cycle is skipped for the rest of that cycle.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::core::types::{Listener, ObservableId, ObservableState};
use crate::primitives::subscription::Subscription;

// =============================================================================
// LISTENER ENTRY
// =============================================================================

struct ListenerEntry<T> {
    key: u64,
    live: Cell<bool>,
    callback: Listener<T>,
}

// =============================================================================
// OBSERVABLE INNER
// =============================================================================

/// Shared state behind an [`Observable`] handle
pub struct ObservableInner<T> {
    id: ObservableId,
    value: RefCell<T>,
    listeners: RefCell<Vec<Rc<ListenerEntry<T>>>>,
    next_key: Cell<u64>,
}

impl<T> ObservableInner<T> {
    fn new(value: T) -> Self {
        Self {
            id: ObservableId::next(),
            value: RefCell::new(value),
            listeners: RefCell::new(Vec::new()),
            next_key: Cell::new(0),
        }
    }

    fn remove_listener(&self, key: u64) {
        self.listeners.borrow_mut().retain(|entry| {
            if entry.key == key {
                entry.live.set(false);
                false
            } else {
                true
            }
        });
    }
}

// =============================================================================
// OBSERVABLE<T> - The public handle
// =============================================================================

/// A shared value that notifies listeners on every write.
///
/// Cloning the handle shares the value; identity is preserved across
/// clones (see [`id`](Self::id)).
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use store_hooks::create_observable;
///
/// let count = create_observable(0);
/// let seen = Rc::new(Cell::new(0));
///
/// let seen_clone = seen.clone();
/// let subscription = count.subscribe(move |value| seen_clone.set(*value));
///
/// count.set(3);
/// assert_eq!(seen.get(), 3);
///
/// subscription.unsubscribe();
/// count.set(4);
/// assert_eq!(seen.get(), 3);
/// ```
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> Observable<T> {
    /// Create an observable holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ObservableInner::new(value)),
        }
    }

    /// Stable identity of the underlying entity
    pub fn id(&self) -> ObservableId {
        self.inner.id
    }

    /// Check whether two handles point at the same entity
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Get the current value (cloning).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Access the current value with a closure (avoids cloning).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.value.borrow())
    }

    /// Replace the value and notify listeners.
    pub fn set(&self, value: T)
    where
        T: Clone,
    {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Update the value in place and notify listeners.
    ///
    /// # Example
    ///
    /// ```
    /// use store_hooks::create_observable;
    ///
    /// let items = create_observable(vec![1, 2]);
    /// items.update(|v| v.push(3));
    /// assert_eq!(items.get(), vec![1, 2, 3]);
    /// ```
    pub fn update(&self, f: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        f(&mut *self.inner.value.borrow_mut());
        self.notify();
    }

    /// Register a listener called with the new value after every write.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let key = self.inner.next_key.get();
        self.inner.next_key.set(key + 1);

        self.inner.listeners.borrow_mut().push(Rc::new(ListenerEntry {
            key,
            live: Cell::new(true),
            callback: Box::new(listener),
        }));
        trace!(observable = %self.inner.id, listener = key, "subscribed");

        let weak: Weak<ObservableInner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove_listener(key);
                trace!(observable = %inner.id, listener = key, "unsubscribed");
            }
        })
    }

    /// Number of listeners currently registered
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self)
    where
        T: Clone,
    {
        let snapshot = self.inner.value.borrow().clone();
        let listeners: Vec<_> = self.inner.listeners.borrow().clone();
        trace!(observable = %self.inner.id, listeners = listeners.len(), "notify");

        for entry in listeners {
            if entry.live.get() {
                (entry.callback)(&snapshot);
            }
        }
    }
}

impl<T: Clone + 'static> ObservableState for Observable<T> {
    type Value = T;

    fn id(&self) -> ObservableId {
        self.inner.id
    }

    fn get(&self) -> T {
        Observable::get(self)
    }

    fn subscribe(&self, listener: Listener<T>) -> Subscription {
        Observable::subscribe(self, listener)
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("id", &self.inner.id)
            .field("value", &self.inner.value.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

// =============================================================================
// CREATION
// =============================================================================

/// Create an observable holding `value`.
///
/// # Example
///
/// ```
/// use store_hooks::create_observable;
///
/// let count = create_observable(0);
/// assert_eq!(count.get(), 0);
/// ```
pub fn create_observable<T: 'static>(value: T) -> Observable<T> {
    Observable::new(value)
}

/// Create an observable whose initial value is produced by `factory`.
///
/// # Example
///
/// ```
/// use store_hooks::create_observable_with;
///
/// let names = create_observable_with(|| vec![String::from("a")]);
/// assert_eq!(names.get().len(), 1);
/// ```
pub fn create_observable_with<T: 'static>(factory: impl FnOnce() -> T) -> Observable<T> {
    Observable::new(factory())
}

// =============================================================================
// TESTS
// =============================================================================
