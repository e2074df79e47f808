// ============================================================================
// store-hooks - Store Primitive
// An observable bundled with actions bound to it
// ============================================================================

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::core::types::{Listener, ObservableId, ObservableState};
use crate::primitives::observable::Observable;
use crate::primitives::subscription::Subscription;

/// An [`Observable`] merged with a set of actions built from it.
///
/// The store dereferences to its actions, so methods on the actions type
/// are called directly on the store. State access goes through the
/// inherent `get`/`set`/`update`/`subscribe` methods.
///
/// # Example
///
/// ```
/// use store_hooks::{create_store, Observable};
///
/// #[derive(Clone)]
/// struct Counter { count: i32 }
///
/// struct CounterActions { state: Observable<Counter> }
///
/// impl CounterActions {
///     fn increment(&self) {
///         self.state.update(|s| s.count += 1);
///     }
/// }
///
/// let store = create_store(Counter { count: 0 }, |state| CounterActions {
///     state: state.clone(),
/// });
///
/// store.increment();
/// assert_eq!(store.get().count, 1);
/// ```
pub struct Store<S, A> {
    state: Observable<S>,
    actions: Rc<A>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<S: 'static, A> Store<S, A> {
    /// The observable behind this store
    pub fn observable(&self) -> &Observable<S> {
        &self.state
    }

    /// The bound actions
    pub fn actions(&self) -> &A {
        &self.actions
    }

    /// Stable identity (shared with the underlying observable)
    pub fn id(&self) -> ObservableId {
        self.state.id()
    }

    pub fn get(&self) -> S
    where
        S: Clone,
    {
        self.state.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.state.with(f)
    }

    pub fn set(&self, value: S)
    where
        S: Clone,
    {
        self.state.set(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut S))
    where
        S: Clone,
    {
        self.state.update(f);
    }

    pub fn subscribe(&self, listener: impl Fn(&S) + 'static) -> Subscription {
        self.state.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.state.listener_count()
    }
}

impl<S, A> Deref for Store<S, A> {
    type Target = A;

    fn deref(&self) -> &A {
        &self.actions
    }
}

impl<S: Clone + 'static, A> ObservableState for Store<S, A> {
    type Value = S;

    fn id(&self) -> ObservableId {
        self.state.id()
    }

    fn get(&self) -> S {
        self.state.get()
    }

    fn subscribe(&self, listener: Listener<S>) -> Subscription {
        self.state.subscribe(listener)
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("state", &self.state).finish_non_exhaustive()
    }
}

/// Create a store: build the observable from `value`, then hand it to
/// `actions` to bind the action set.
pub fn create_store<S: 'static, A>(
    value: S,
    actions: impl FnOnce(&Observable<S>) -> A,
) -> Store<S, A> {
    create_store_with(move || value, actions)
}

/// Like [`create_store`], with the initial state produced by `factory`.
pub fn create_store_with<S: 'static, A>(
    factory: impl FnOnce() -> S,
    actions: impl FnOnce(&Observable<S>) -> A,
) -> Store<S, A> {
    let state = Observable::new(factory());
    let actions = Rc::new(actions(&state));
    Store { state, actions }
}
