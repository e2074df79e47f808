// ============================================================================
// store-hooks - Host Hooks
// Slot-backed state, refs, and effects for component render functions
// ============================================================================
//
// These are the primitives the store hooks are written against. They follow
// the usual rules of hooks: call them unconditionally, in the same order, on
// every render of a component.
// ============================================================================

use std::cell::{Ref as CellRef, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::core::error::HookResult;
use crate::core::types::EqualsFn;
use crate::reactivity::equality::equals;
use crate::runtime::component::{current_component, ComponentInner};
use crate::runtime::effect::{CleanupFn, EffectHook, EffectTiming, PendingEffect};

// =============================================================================
// USE_HOOK
// =============================================================================

/// Claim the next hook slot of the rendering component.
///
/// `init` runs on the first render only; later renders get the same `Rc`.
pub fn try_use_hook<T: 'static>(init: impl FnOnce() -> T) -> HookResult<Rc<T>> {
    current_component()?.slot(init)
}

/// Claim the next hook slot of the rendering component.
///
/// # Panics
///
/// Panics when called outside a render or when the slot holds a different
/// hook type than on the previous render.
pub fn use_hook<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    try_use_hook(init).unwrap_or_else(|err| panic!("{err}"))
}

// =============================================================================
// USE_STATE
// =============================================================================

/// Render-persistent state stored in a hook slot
pub struct StateHook<T> {
    value: RefCell<T>,
    equals: EqualsFn<T>,
    owner: Weak<ComponentInner>,
}

/// Setter returned by [`use_state`].
///
/// Writing a value that differs from the current one (under the state's
/// equality) re-renders the owning component. The setter only holds a weak
/// reference to the component, so writes after unmount are dropped.
pub struct SetState<T> {
    hook: Rc<StateHook<T>>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            hook: self.hook.clone(),
        }
    }
}

impl<T: 'static> SetState<T> {
    /// Replace the state, re-rendering if it changed.
    pub fn set(&self, value: T) {
        let unchanged = {
            let current = self.hook.value.borrow();
            (self.hook.equals)(&*current, &value)
        };
        if unchanged {
            return;
        }
        *self.hook.value.borrow_mut() = value;
        self.schedule();
    }

    /// Derive the next state from the current one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = {
            let current = self.hook.value.borrow();
            f(&*current)
        };
        self.set(next);
    }

    /// Latest written value, which may be newer than the rendered one
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.hook.value.borrow().clone()
    }

    /// Overwrite the state without requesting a render.
    pub(crate) fn replace(&self, value: T) {
        *self.hook.value.borrow_mut() = value;
    }

    fn schedule(&self) {
        match self.hook.owner.upgrade() {
            Some(owner) => owner.schedule_render(),
            None => trace!("state write after component dropped"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("value", &self.hook.value.borrow())
            .finish()
    }
}

/// Local state with structural (`PartialEq`) change detection.
///
/// # Example
///
/// ```
/// use store_hooks::{use_state, Component};
///
/// let component = Component::new(|| use_state(|| 0));
/// component.mount().unwrap();
///
/// let (_, set_count) = component.output().unwrap();
/// set_count.set(5);
///
/// assert_eq!(component.output().unwrap().0, 5);
/// assert_eq!(component.render_count(), 2);
/// ```
pub fn use_state<T>(init: impl FnOnce() -> T) -> (T, SetState<T>)
where
    T: Clone + PartialEq + 'static,
{
    use_state_with_equals(init, equals)
}

/// Local state with a custom equality function.
///
/// # Panics
///
/// Panics when called outside a render or out of hook order.
pub fn use_state_with_equals<T>(init: impl FnOnce() -> T, equals: EqualsFn<T>) -> (T, SetState<T>)
where
    T: Clone + 'static,
{
    try_use_state_with_equals(init, equals).unwrap_or_else(|err| panic!("{err}"))
}

fn try_use_state_with_equals<T>(
    init: impl FnOnce() -> T,
    equals: EqualsFn<T>,
) -> HookResult<(T, SetState<T>)>
where
    T: Clone + 'static,
{
    let component = current_component()?;
    let owner = Rc::downgrade(&component);
    let hook = component.slot(|| StateHook {
        value: RefCell::new(init()),
        equals,
        owner,
    })?;

    let value = hook.value.borrow().clone();
    Ok((value, SetState { hook }))
}

// =============================================================================
// USE_REF
// =============================================================================

/// Mutable cell that survives re-renders without triggering them.
pub struct Ref<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Ref<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.cell.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.cell.borrow_mut() = value;
    }

    pub fn borrow(&self) -> CellRef<'_, T> {
        self.cell.borrow()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.cell.borrow())
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.cell.borrow()).finish()
    }
}

/// A render-persistent mutable cell. Writing to it never re-renders.
pub fn use_ref<T: 'static>(init: impl FnOnce() -> T) -> Ref<T> {
    let cell = use_hook(|| RefCell::new(init()));
    Ref { cell }
}

// =============================================================================
// USE_EFFECT
// =============================================================================

/// Run `effect` after commit whenever `deps` changed since the last run,
/// with the given timing. The cleanup it returns runs before the next run
/// and on unmount.
///
/// # Panics
///
/// Panics when called outside a render or out of hook order.
pub fn use_effect_with_timing<D, F>(timing: EffectTiming, deps: D, effect: F)
where
    D: PartialEq + 'static,
    F: FnOnce() -> Option<CleanupFn> + 'static,
{
    try_use_effect_with_timing(timing, deps, effect).unwrap_or_else(|err| panic!("{err}"))
}

fn try_use_effect_with_timing<D, F>(timing: EffectTiming, deps: D, effect: F) -> HookResult<()>
where
    D: PartialEq + 'static,
    F: FnOnce() -> Option<CleanupFn> + 'static,
{
    let component = current_component()?;
    let hook = component.slot(|| EffectHook::new(timing))?;

    if !hook.mark_registered() {
        component.register_effect(hook.clone());
    }
    if hook.update_deps(deps) {
        component.queue_effect(PendingEffect::new(hook, Box::new(effect)));
    }
    Ok(())
}

/// Deferred effect: runs on the next flush or before the next render.
pub fn use_effect<D, F>(deps: D, effect: F)
where
    D: PartialEq + 'static,
    F: FnOnce() -> Option<CleanupFn> + 'static,
{
    use_effect_with_timing(EffectTiming::Passive, deps, effect);
}

/// Layout effect: runs synchronously right after the render commits.
pub fn use_layout_effect<D, F>(deps: D, effect: F)
where
    D: PartialEq + 'static,
    F: FnOnce() -> Option<CleanupFn> + 'static,
{
    use_effect_with_timing(EffectTiming::Layout, deps, effect);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::RENDER_LOOP_LIMIT;
    use crate::core::error::HookError;
    use crate::reactivity::equality::never_equals;
    use crate::runtime::component::Component;
    use std::cell::Cell;

    #[test]
    fn state_setter_rerenders_on_change_only() {
        let component = Component::new(|| use_state(|| 1));
        component.mount().unwrap();
        let (_, set) = component.output().unwrap();

        set.set(1);
        assert_eq!(component.render_count(), 1, "equal value is not a change");

        set.update(|n| n + 1);
        assert_eq!(component.render_count(), 2);
        assert_eq!(component.output().unwrap().0, 2);
    }

    #[test]
    fn never_equal_state_always_rerenders() {
        let component = Component::new(|| use_state_with_equals(|| 1, never_equals));
        component.mount().unwrap();
        let (_, set) = component.output().unwrap();

        set.set(1);
        set.set(1);
        assert_eq!(component.render_count(), 3);
    }

    #[test]
    fn state_init_runs_once() {
        let inits = Rc::new(Cell::new(0));
        let inits_clone = inits.clone();

        let component = Component::new(move || {
            let inits = inits_clone.clone();
            use_state(move || {
                inits.set(inits.get() + 1);
                0
            })
            .0
        });
        component.mount().unwrap();
        component.rerender().unwrap();
        component.rerender().unwrap();

        assert_eq!(inits.get(), 1);
        assert_eq!(component.render_count(), 3);
    }

    #[test]
    fn setter_after_unmount_is_ignored() {
        let component = Component::new(|| use_state(|| 0));
        component.mount().unwrap();
        let (_, set) = component.output().unwrap();

        component.unmount();
        set.set(9);
        assert_eq!(component.render_count(), 1);

        drop(component);
        set.set(10);
    }

    #[test]
    fn ref_writes_do_not_rerender() {
        let component = Component::new(|| use_ref(|| 0));
        component.mount().unwrap();

        let cell = component.output().unwrap();
        cell.set(5);
        assert_eq!(component.render_count(), 1);

        component.rerender().unwrap();
        assert_eq!(component.output().unwrap().get(), 5);
    }

    #[test]
    fn layout_effect_runs_on_mount_passive_waits_for_flush() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();

        let component = Component::new(move || {
            let layout_log = log_clone.clone();
            use_layout_effect((), move || {
                layout_log.borrow_mut().push("layout");
                None
            });
            let passive_log = log_clone.clone();
            use_effect((), move || {
                passive_log.borrow_mut().push("passive");
                None
            });
        });

        component.mount().unwrap();
        assert_eq!(*log.borrow(), vec!["layout"]);
        assert_eq!(component.pending_effects(), 1);

        component.flush().unwrap();
        assert_eq!(*log.borrow(), vec!["layout", "passive"]);
        assert_eq!(component.pending_effects(), 0);
    }

    #[test]
    fn effect_reruns_only_when_deps_change() {
        let runs = Rc::new(Cell::new(0));
        let cleanups = Rc::new(Cell::new(0));
        let dep = Rc::new(Cell::new(0));

        let component = Component::new({
            let (runs, cleanups, dep) = (runs.clone(), cleanups.clone(), dep.clone());
            move || {
                let (runs, cleanups) = (runs.clone(), cleanups.clone());
                use_layout_effect(dep.get(), move || {
                    runs.set(runs.get() + 1);
                    let cleanup: CleanupFn = Box::new(move || cleanups.set(cleanups.get() + 1));
                    Some(cleanup)
                });
            }
        });

        component.mount().unwrap();
        component.rerender().unwrap();
        assert_eq!((runs.get(), cleanups.get()), (1, 0));

        dep.set(1);
        component.rerender().unwrap();
        assert_eq!((runs.get(), cleanups.get()), (2, 1));

        component.unmount();
        assert_eq!((runs.get(), cleanups.get()), (2, 2));
    }

    #[test]
    fn state_written_in_layout_effect_rerenders_before_returning() {
        let component = Component::new(|| {
            let (value, set) = use_state(|| 0);
            use_layout_effect((), move || {
                set.set(7);
                None
            });
            value
        });

        component.mount().unwrap();
        assert_eq!(component.output(), Some(7));
        assert_eq!(component.render_count(), 2);
    }

    #[test]
    fn endless_updates_hit_the_loop_limit() {
        let component = Component::new(|| {
            let (value, set) = use_state(|| 0u64);
            use_layout_effect(value, move || {
                set.set(value + 1);
                None
            });
        });

        let id = component.id();
        assert!(matches!(
            component.mount(),
            Err(HookError::RenderLoop { component, .. }) if component == id
        ));
    }

    #[test]
    fn loop_started_by_a_setter_is_dropped() {
        let component = Component::new(|| {
            let (value, set) = use_state(|| 0u64);
            let next = set.clone();
            use_layout_effect(value, move || {
                if value > 0 {
                    next.set(value + 1);
                }
                None
            });
            (value, set)
        });
        component.mount().unwrap();
        let (_, set) = component.output().unwrap();

        set.set(1);

        assert_eq!(component.render_count(), 1 + RENDER_LOOP_LIMIT);
        assert!(component.is_mounted());
        assert_eq!(component.pending_effects(), 0);
    }

    #[test]
    fn try_use_hook_outside_render() {
        assert_eq!(try_use_hook(|| 0).err(), Some(HookError::OutsideRender));
    }

    #[test]
    #[should_panic(expected = "hook called outside of a component render")]
    fn use_state_outside_render_panics() {
        let _ = use_state(|| 0);
    }
}
