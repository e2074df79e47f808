// ============================================================================
// store-hooks - Value-Projection Hook
// Read a projection of an existing entity and re-render when it changes
// ============================================================================
//
// The subscription is keyed on the entity's identity only, so it survives
// re-renders. The projection function, on the other hand, is usually a fresh
// closure every render that captures that render's variables. It is kept in
// a ref cell overwritten on every render and looked up at notification time,
// so the listener always projects with the latest closure.
// ============================================================================

use std::rc::Rc;

use crate::core::types::{EqualsFn, ObservableState};
use crate::hooks::safe_effect::use_safe_effect;
use crate::reactivity::equality::equals;
use crate::runtime::effect::CleanupFn;
use crate::runtime::hooks::{use_ref, use_state_with_equals};

type Getter<S, V> = Rc<dyn Fn(&S) -> V>;

/// Current value of `entity`, re-rendering on every change.
///
/// # Example
///
/// ```
/// use store_hooks::{create_observable, use_value, Component};
///
/// let count = create_observable(1);
/// let component = Component::new({
///     let count = count.clone();
///     move || use_value(&count)
/// });
/// component.mount().unwrap();
/// component.flush().unwrap();
///
/// count.set(2);
/// assert_eq!(component.output(), Some(2));
/// ```
pub fn use_value<E>(entity: &E) -> E::Value
where
    E: ObservableState + Clone + 'static,
    E::Value: Clone + PartialEq + 'static,
{
    use_value_with(entity, <E::Value as Clone>::clone)
}

/// Projection of `entity` through `getter`, re-rendering when the projected
/// value changes (`PartialEq`).
pub fn use_value_with<E, V>(entity: &E, getter: impl Fn(&E::Value) -> V + 'static) -> V
where
    E: ObservableState + Clone + 'static,
    E::Value: 'static,
    V: Clone + PartialEq + 'static,
{
    use_value_with_equals(entity, getter, equals)
}

/// Projection of `entity` through `getter`, with a custom equality deciding
/// which projected values count as a change.
pub fn use_value_with_equals<E, V>(
    entity: &E,
    getter: impl Fn(&E::Value) -> V + 'static,
    equals: EqualsFn<V>,
) -> V
where
    E: ObservableState + Clone + 'static,
    E::Value: 'static,
    V: Clone + 'static,
{
    let getter: Getter<E::Value, V> = Rc::new(getter);

    let (value, set_value) = use_state_with_equals(|| getter(&entity.get()), equals);

    // overwritten every render; read by the listener at notification time
    let scope = use_ref(|| getter.clone());
    scope.set(getter.clone());

    let source = use_ref(|| entity.id());
    let value = if source.get() == entity.id() {
        value
    } else {
        source.set(entity.id());
        let fresh = getter(&entity.get());
        set_value.replace(fresh.clone());
        fresh
    };

    use_safe_effect(entity.id(), {
        let entity = entity.clone();
        let subscribed = entity.id();
        move || {
            let subscription = entity.subscribe(Box::new(move |state: &E::Value| {
                // a later render switched entities; this listener is on its way out
                if source.get() != subscribed {
                    return;
                }
                let getter = scope.get();
                set_value.set(getter(state));
            }));
            let cleanup: CleanupFn = Box::new(move || subscription.unsubscribe());
            Some(cleanup)
        }
    });

    value
}

// =============================================================================
// TESTS
// =============================================================================
