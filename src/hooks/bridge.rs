// ============================================================================
// store-hooks - State-Bridging Hooks
// Own an entity for the life of a component and re-render on its changes
// ============================================================================
//
// The entity lives in host state inside a small record. The entity handle
// itself never changes, so to make the host notice a change the record is
// reallocated on every notification and compared by pointer: same contents,
// new allocation, one re-render.
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::core::types::ObservableState;
use crate::hooks::safe_effect::use_safe_effect;
use crate::primitives::observable::{create_observable_with, Observable};
use crate::primitives::store::{create_store_with, Store};
use crate::reactivity::equality::rc_ptr_equals;
use crate::runtime::effect::CleanupFn;
use crate::runtime::hooks::use_state_with_equals;

/// Render-persistent record around an entity
pub struct EntitySlot<E> {
    entity: E,
}

impl<E> EntitySlot<E> {
    pub fn entity(&self) -> &E {
        &self.entity
    }
}

impl<E: fmt::Debug> fmt::Debug for EntitySlot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySlot").field("entity", &self.entity).finish()
    }
}

/// Build an entity once per component and keep the component in sync with
/// it.
///
/// `build` runs on the first render only. Each notification re-renders the
/// component exactly once, unless `no_emit_changes` is set, in which case
/// the caller reads the entity imperatively and no re-render happens. The
/// subscription is re-established when `no_emit_changes` flips and
/// released on unmount.
pub fn use_store_entity<E>(build: impl FnOnce() -> E, no_emit_changes: bool) -> E
where
    E: ObservableState + Clone + 'static,
{
    let (slot, set_slot) = use_state_with_equals(
        || Rc::new(EntitySlot { entity: build() }),
        rc_ptr_equals,
    );
    let entity = slot.entity.clone();

    use_safe_effect(no_emit_changes, {
        let entity = entity.clone();
        move || {
            let subscription = entity.subscribe(Box::new(move |_: &E::Value| {
                if !no_emit_changes {
                    set_slot.update(|record| {
                        Rc::new(EntitySlot {
                            entity: record.entity.clone(),
                        })
                    });
                }
            }));
            let cleanup: CleanupFn = Box::new(move || subscription.unsubscribe());
            Some(cleanup)
        }
    });

    entity
}

/// Create an observable owned by the component.
///
/// `value` is used on the first render only; later renders ignore it and
/// return the same observable.
///
/// # Example
///
/// ```
/// use store_hooks::{use_observable, Component};
///
/// let component = Component::new(|| use_observable(0, false));
/// component.mount().unwrap();
/// component.flush().unwrap();
///
/// let count = component.output().unwrap();
/// count.set(1);
///
/// assert_eq!(component.render_count(), 2);
/// assert_eq!(component.output().unwrap().get(), 1);
/// ```
pub fn use_observable<T>(value: T, no_emit_changes: bool) -> Observable<T>
where
    T: Clone + 'static,
{
    use_observable_with(move || value, no_emit_changes)
}

/// Like [`use_observable`], with the initial value produced by `factory`.
/// The factory runs on the first render only.
pub fn use_observable_with<T>(factory: impl FnOnce() -> T, no_emit_changes: bool) -> Observable<T>
where
    T: Clone + 'static,
{
    use_store_entity(move || create_observable_with(factory), no_emit_changes)
}

/// Create a store (state plus bound actions) owned by the component.
///
/// `actions` receives the store's observable on the first render and
/// returns the action set; it is not called again.
pub fn use_store<S, A>(
    value: S,
    actions: impl FnOnce(&Observable<S>) -> A,
    no_emit_changes: bool,
) -> Store<S, A>
where
    S: Clone + 'static,
    A: 'static,
{
    use_store_with(move || value, actions, no_emit_changes)
}

/// Like [`use_store`], with the initial state produced by `factory`.
pub fn use_store_with<S, A>(
    factory: impl FnOnce() -> S,
    actions: impl FnOnce(&Observable<S>) -> A,
    no_emit_changes: bool,
) -> Store<S, A>
where
    S: Clone + 'static,
    A: 'static,
{
    use_store_entity(move || create_store_with(factory, actions), no_emit_changes)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::component::Component;
    use std::cell::Cell;

    fn mounted<V: 'static>(component: Component<V>) -> Component<V> {
        component.mount().unwrap();
        component.flush().unwrap();
        component
    }

    #[test]
    fn observable_keeps_identity_across_renders() {
        let component = mounted(Component::new(|| use_observable(String::from("a"), false)));
        let first = component.output().unwrap();

        component.rerender().unwrap();
        component.rerender().unwrap();

        assert!(first.ptr_eq(&component.output().unwrap()));
        assert_eq!(first.get(), "a");
    }

    #[test]
    fn factory_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();

        let component = mounted(Component::new(move || {
            let calls = calls_clone.clone();
            use_observable_with(
                move || {
                    calls.set(calls.get() + 1);
                    vec![1, 2]
                },
                false,
            )
        }));

        let obs = component.output().unwrap();
        obs.update(|v| v.push(3));
        component.rerender().unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(component.render_count(), 3);
    }

    #[test]
    fn each_notification_renders_once() {
        let component = mounted(Component::new(|| use_observable(0, false)));
        let obs = component.output().unwrap();

        obs.set(0);
        obs.set(1);
        obs.set(1);

        assert_eq!(component.render_count(), 4, "one render per notification, even for equal values");
    }

    #[test]
    fn suppressed_notifications_do_not_render() {
        let component = mounted(Component::new(|| use_observable(0, true)));
        let obs = component.output().unwrap();

        for i in 0..5 {
            obs.set(i);
        }

        assert_eq!(component.render_count(), 1);
        assert_eq!(obs.get(), 4);
        assert_eq!(obs.listener_count(), 1, "still subscribed, just silent");
    }

    #[test]
    fn flipping_suppression_resubscribes() {
        let silent = Rc::new(Cell::new(false));
        let silent_clone = silent.clone();

        let component = mounted(Component::new(move || use_observable(0, silent_clone.get())));
        let obs = component.output().unwrap();

        silent.set(true);
        component.rerender().unwrap();
        component.flush().unwrap();
        assert_eq!(obs.listener_count(), 1, "old listener released before the new one");

        let renders = component.render_count();
        obs.set(5);
        assert_eq!(component.render_count(), renders);

        silent.set(false);
        component.rerender().unwrap();
        component.flush().unwrap();
        obs.set(6);
        assert_eq!(component.render_count(), renders + 2);
        assert_eq!(obs.listener_count(), 1);
    }

    #[test]
    fn store_actions_drive_renders() {
        #[derive(Clone)]
        struct Count {
            value: i32,
        }

        struct Actions {
            state: Observable<Count>,
        }

        impl Actions {
            fn bump(&self) {
                self.state.update(|c| c.value += 1);
            }
        }

        let component = mounted(Component::new(|| {
            let store = use_store(
                Count { value: 0 },
                |state| Actions {
                    state: state.clone(),
                },
                false,
            );
            (store.get().value, store)
        }));

        let (_, store) = component.output().unwrap();
        store.bump();
        store.bump();

        assert_eq!(component.output().unwrap().0, 2);
        assert_eq!(component.render_count(), 3);
    }

    #[test]
    fn unmount_releases_listener() {
        let component = mounted(Component::new(|| use_observable(0, false)));
        let obs = component.output().unwrap();
        assert_eq!(obs.listener_count(), 1);

        component.unmount();
        assert_eq!(obs.listener_count(), 0);

        obs.set(1);
        assert_eq!(component.render_count(), 1);
    }
}
