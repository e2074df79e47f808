// ============================================================================
// store-hooks - Type Definitions
// The observable contract the hooks consume
// ============================================================================
//
// Hooks never construct an engine of their own choosing: they only need to
// read the current value, subscribe, and tell two entities apart. Anything
// that provides those three operations can be bridged into a component.
// ============================================================================

use std::fmt;

use super::context::with_context;
use crate::primitives::subscription::Subscription;

// =============================================================================
// IDENTITY
// =============================================================================

/// Identity of an observable entity.
///
/// Identifiers are handed out per thread and never reused, so two handles
/// with the same id refer to the same entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservableId(u64);

impl ObservableId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        Self(with_context(|ctx| ctx.take_observable_id()))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObservableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observable#{}", self.0)
    }
}

// =============================================================================
// CALLBACK TYPES
// =============================================================================

/// Change listener. Receives the new value on every notification.
pub type Listener<T> = Box<dyn Fn(&T)>;

/// Equality function used by host state to decide whether a write changes
/// anything.
pub type EqualsFn<T> = fn(&T, &T) -> bool;

// =============================================================================
// OBSERVABLE CONTRACT
// =============================================================================

/// An entity exposing a current value and change notifications.
///
/// Implementations deliver notifications synchronously, in whatever order
/// they choose, until the returned [`Subscription`] is released.
pub trait ObservableState {
    /// The state type held by the entity
    type Value;

    /// Stable identity of this entity
    fn id(&self) -> ObservableId;

    /// Read the current value
    fn get(&self) -> Self::Value;

    /// Register a listener; it stays registered until the subscription is
    /// dropped or unsubscribed.
    fn subscribe(&self, listener: Listener<Self::Value>) -> Subscription;
}

// =============================================================================
// TESTS
// =============================================================================
