// ============================================================================
// store-hooks - Component Host
// Render loop, hook slots, and commit phases for a single component
// ============================================================================
//
// A component owns an ordered list of hook slots. Each render resets the
// slot cursor and calls the render function; hooks claim slots in call
// order, creating them on the first render and reusing them afterwards.
//
// Render cycle:
// 1. Run passive effects left over from the previous commit
// 2. Render (hooks may queue effects)
// 3. Commit: run layout effects synchronously
// 4. Repeat while a state write marked the component dirty
//
// Passive effects from the final pass stay queued until flush() or the next
// render. State writes that arrive while a render or commit is in progress
// only mark the component dirty; the loop above picks them up.
// ============================================================================

use std::any::{type_name, Any};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, error, trace};

use crate::core::constants::RENDER_LOOP_LIMIT;
use crate::core::context::with_context;
use crate::core::error::{HookError, HookResult};
use crate::runtime::effect::{EffectHook, EffectTiming, PendingEffect};

// =============================================================================
// IDENTITY
// =============================================================================

/// Identity of a component instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    fn next() -> Self {
        Self(with_context(|ctx| ctx.take_component_id()))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

// =============================================================================
// GUARDS
// =============================================================================

/// Sets a flag for the guard's lifetime, restoring the previous value even
/// when the render function panics.
struct FlagGuard<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> FlagGuard<'a> {
    fn raise(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

/// Keeps a component on the thread-local render stack.
struct RenderGuard;

impl RenderGuard {
    fn enter(component: Rc<ComponentInner>) -> Self {
        with_context(|ctx| ctx.enter_render(component));
        RenderGuard
    }
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        with_context(|ctx| ctx.exit_render());
    }
}

// =============================================================================
// COMPONENT INNER
// =============================================================================

type RenderFn = Box<dyn FnMut()>;

struct HookSlot {
    value: Rc<dyn Any>,
    type_name: &'static str,
}

/// Shared state of a component instance
pub struct ComponentInner {
    id: ComponentId,

    /// The render function; dropped on unmount
    render_fn: RefCell<Option<RenderFn>>,

    /// Hook state in call order
    slots: RefCell<Vec<HookSlot>>,

    /// Next slot to hand out during the current render
    cursor: Cell<usize>,

    /// Every effect hook, in registration order, for unmount cleanup
    effects: RefCell<Vec<Rc<EffectHook>>>,

    pending_layout: RefCell<Vec<PendingEffect>>,
    pending_passive: RefCell<Vec<PendingEffect>>,

    mounted: Cell<bool>,
    unmounted: Cell<bool>,

    /// A render, commit, or passive flush is running
    busy: Cell<bool>,

    /// A state write requested another render
    dirty: Cell<bool>,

    render_count: Cell<usize>,

    /// Self-reference for re-entering the render loop from state setters
    self_weak: RefCell<Weak<ComponentInner>>,
}

impl ComponentInner {
    fn new(render_fn: RenderFn) -> Rc<Self> {
        let inner = Rc::new(Self {
            id: ComponentId::next(),
            render_fn: RefCell::new(Some(render_fn)),
            slots: RefCell::new(Vec::new()),
            cursor: Cell::new(0),
            effects: RefCell::new(Vec::new()),
            pending_layout: RefCell::new(Vec::new()),
            pending_passive: RefCell::new(Vec::new()),
            mounted: Cell::new(false),
            unmounted: Cell::new(false),
            busy: Cell::new(false),
            dirty: Cell::new(false),
            render_count: Cell::new(0),
            self_weak: RefCell::new(Weak::new()),
        });

        *inner.self_weak.borrow_mut() = Rc::downgrade(&inner);

        inner
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get() && !self.unmounted.get()
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted.get()
    }

    pub fn render_count(&self) -> usize {
        self.render_count.get()
    }

    // =========================================================================
    // HOOK SLOTS
    // =========================================================================

    /// Claim the next hook slot, creating it with `init` on first use.
    pub(crate) fn slot<T: 'static>(&self, init: impl FnOnce() -> T) -> HookResult<Rc<T>> {
        let index = self.cursor.get();
        self.cursor.set(index + 1);

        let existing = self
            .slots
            .borrow()
            .get(index)
            .map(|slot| (slot.value.clone(), slot.type_name));

        if let Some((value, found)) = existing {
            return value.downcast::<T>().map_err(|_| HookError::HookOrderMismatch {
                index,
                expected: type_name::<T>(),
                found,
            });
        }

        // init may run user code (entity factories); no borrow is held here
        let value = Rc::new(init());
        let mut slots = self.slots.borrow_mut();
        if slots.len() != index {
            return Err(HookError::HookOrderMismatch {
                index,
                expected: type_name::<T>(),
                found: "<missing slot>",
            });
        }
        slots.push(HookSlot {
            value: value.clone(),
            type_name: type_name::<T>(),
        });
        trace!(component = %self.id, slot = index, hook = type_name::<T>(), "hook slot created");

        Ok(value)
    }

    /// Number of hook slots claimed so far
    pub fn slot_count(&self) -> usize {
        self.slots.borrow().len()
    }

    // =========================================================================
    // EFFECTS
    // =========================================================================

    pub(crate) fn register_effect(&self, hook: Rc<EffectHook>) {
        self.effects.borrow_mut().push(hook);
    }

    pub(crate) fn queue_effect(&self, effect: PendingEffect) {
        match effect.timing() {
            EffectTiming::Layout => self.pending_layout.borrow_mut().push(effect),
            EffectTiming::Passive => self.pending_passive.borrow_mut().push(effect),
        }
    }

    /// Number of passive effects waiting for a flush
    pub fn pending_passive_count(&self) -> usize {
        self.pending_passive.borrow().len()
    }

    fn run_passive_effects(&self) {
        let passive = self.pending_passive.take();
        if passive.is_empty() {
            return;
        }

        let _busy = FlagGuard::raise(&self.busy);
        trace!(component = %self.id, count = passive.len(), "flush passive effects");
        for effect in passive {
            if self.unmounted.get() {
                break;
            }
            effect.run();
        }
    }

    // =========================================================================
    // RENDER LOOP
    // =========================================================================

    /// Request a render. Runs synchronously unless the component is already
    /// busy, not yet mounted, or gone. A render loop is logged and dropped.
    pub(crate) fn schedule_render(&self) {
        if self.unmounted.get() {
            trace!(component = %self.id, "update after unmount dropped");
            return;
        }

        self.dirty.set(true);
        if self.busy.get() || !self.mounted.get() {
            return;
        }

        let this = self.self_weak.borrow().upgrade();
        if let Some(this) = this {
            // the caller is usually an engine mid-notification, so the
            // error is reported here instead of unwinding through it
            if let Err(err) = this.process() {
                error!(component = %self.id, %err, "render dropped");
            }
        }
    }

    /// Render and commit until no further render is requested.
    fn process(self: &Rc<Self>) -> HookResult<()> {
        let mut passes = 0;
        while self.dirty.get() && !self.unmounted.get() {
            if passes == RENDER_LOOP_LIMIT {
                self.dirty.set(false);
                return Err(HookError::RenderLoop {
                    component: self.id,
                    limit: RENDER_LOOP_LIMIT,
                });
            }
            passes += 1;

            self.run_passive_effects();
            if self.unmounted.get() {
                break;
            }
            self.render_and_commit();
        }
        Ok(())
    }

    fn render_and_commit(self: &Rc<Self>) {
        let _busy = FlagGuard::raise(&self.busy);
        self.dirty.set(false);
        self.cursor.set(0);

        {
            let _render = RenderGuard::enter(self.clone());
            let mut render_fn = self.render_fn.borrow_mut();
            if let Some(render) = render_fn.as_mut() {
                render();
            }
        }

        let count = self.render_count.get() + 1;
        self.render_count.set(count);
        trace!(component = %self.id, render = count, slots = self.slot_count(), "rendered");

        let layout = self.pending_layout.take();
        for effect in layout {
            if self.unmounted.get() {
                break;
            }
            effect.run();
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    fn mount(self: &Rc<Self>) -> HookResult<()> {
        if self.unmounted.get() {
            return Err(HookError::Unmounted(self.id));
        }
        if self.mounted.replace(true) {
            return Ok(());
        }

        debug!(component = %self.id, "mount");
        self.dirty.set(true);
        self.process()
    }

    fn rerender(self: &Rc<Self>) -> HookResult<()> {
        if self.unmounted.get() {
            return Err(HookError::Unmounted(self.id));
        }

        self.dirty.set(true);
        if !self.mounted.get() || self.busy.get() {
            return Ok(());
        }
        self.process()
    }

    fn flush(self: &Rc<Self>) -> HookResult<()> {
        if self.unmounted.get() {
            return Err(HookError::Unmounted(self.id));
        }
        if !self.mounted.get() || self.busy.get() {
            return Ok(());
        }

        for _ in 0..RENDER_LOOP_LIMIT {
            self.run_passive_effects();
            if self.dirty.get() {
                self.process()?;
            }
            if !self.dirty.get() && self.pending_passive.borrow().is_empty() {
                return Ok(());
            }
        }

        Err(HookError::RenderLoop {
            component: self.id,
            limit: RENDER_LOOP_LIMIT,
        })
    }

    /// Run every effect cleanup and drop hook state. Idempotent.
    fn unmount(&self) {
        if self.unmounted.replace(true) {
            return;
        }
        debug!(component = %self.id, renders = self.render_count.get(), "unmount");

        self.pending_layout.take();
        self.pending_passive.take();
        self.dirty.set(false);

        let effects = self.effects.take();
        for effect in effects {
            effect.run_cleanup();
        }

        self.slots.take();
        if let Ok(mut render_fn) = self.render_fn.try_borrow_mut() {
            render_fn.take();
        }
    }
}

// =============================================================================
// COMPONENT (Public wrapper)
// =============================================================================

/// A component instance: a render function plus the hook state it owns.
///
/// The render function's return value is kept as the component's output.
///
/// # Example
///
/// ```
/// use store_hooks::{use_state, Component};
///
/// let component = Component::new(|| {
///     let (count, _set_count) = use_state(|| 3);
///     count * 2
/// });
///
/// component.mount().unwrap();
/// assert_eq!(component.output(), Some(6));
/// ```
pub struct Component<V = ()> {
    inner: Rc<ComponentInner>,
    output: Rc<RefCell<Option<V>>>,
}

impl<V: 'static> Component<V> {
    /// Create an unmounted component.
    pub fn new(mut render: impl FnMut() -> V + 'static) -> Self {
        let output = Rc::new(RefCell::new(None));
        let sink = output.clone();
        let inner = ComponentInner::new(Box::new(move || {
            let value = render();
            *sink.borrow_mut() = Some(value);
        }));

        Self { inner, output }
    }

    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    /// First render plus layout effects. Passive effects stay queued until
    /// [`flush`](Self::flush). Mounting twice is a no-op.
    pub fn mount(&self) -> HookResult<()> {
        self.inner.mount()
    }

    /// Run queued passive effects and any renders they trigger, until the
    /// component is stable.
    pub fn flush(&self) -> HookResult<()> {
        self.inner.flush()
    }

    /// Render again, as a parent would when passing new props.
    pub fn rerender(&self) -> HookResult<()> {
        self.inner.rerender()
    }

    /// Run every effect cleanup and release hook state.
    ///
    /// Later state writes from listeners that escaped cleanup are ignored.
    pub fn unmount(&self) {
        self.inner.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    /// Number of completed renders
    pub fn render_count(&self) -> usize {
        self.inner.render_count()
    }

    /// Number of passive effects waiting for a flush
    pub fn pending_effects(&self) -> usize {
        self.inner.pending_passive_count()
    }

    /// Output of the latest render
    pub fn output(&self) -> Option<V>
    where
        V: Clone,
    {
        self.output.borrow().clone()
    }

    /// Access the latest output without cloning
    pub fn with_output<R>(&self, f: impl FnOnce(Option<&V>) -> R) -> R {
        f(self.output.borrow().as_ref())
    }

    /// Get the shared inner state (for advanced use)
    pub fn inner(&self) -> &Rc<ComponentInner> {
        &self.inner
    }
}

impl<V> Drop for Component<V> {
    fn drop(&mut self) {
        self.inner.unmount();
    }
}

impl<V> fmt::Debug for Component<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.inner.id)
            .field("mounted", &self.inner.is_mounted())
            .field("renders", &self.inner.render_count())
            .finish()
    }
}

/// Get the component currently rendering on this thread.
pub(crate) fn current_component() -> HookResult<Rc<ComponentInner>> {
    with_context(|ctx| ctx.active_component()).ok_or(HookError::OutsideRender)
}

// =============================================================================
// TESTS
// =============================================================================
