// ============================================================================
// store-hooks - Hook Context
// Thread-local state for tracking the component currently rendering
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::runtime::component::ComponentInner;

// =============================================================================
// HOOK CONTEXT
// =============================================================================

/// Thread-local context holding the global state hooks rely on.
///
/// Hooks are plain functions, so the component they belong to is found here
/// rather than passed as an argument.
pub struct HookContext {
    /// Components currently inside their render function, innermost last
    rendering: RefCell<Vec<Rc<ComponentInner>>>,

    /// Next identifier handed out to an observable entity
    next_observable_id: Cell<u64>,

    /// Next identifier handed out to a component instance
    next_component_id: Cell<u64>,
}

impl HookContext {
    /// Create a new context with empty render stack and fresh counters
    pub fn new() -> Self {
        Self {
            rendering: RefCell::new(Vec::new()),
            next_observable_id: Cell::new(1),
            next_component_id: Cell::new(1),
        }
    }

    // =========================================================================
    // RENDER STACK
    // =========================================================================

    /// Mark a component as rendering
    pub(crate) fn enter_render(&self, component: Rc<ComponentInner>) {
        self.rendering.borrow_mut().push(component);
    }

    /// Pop the innermost rendering component
    pub(crate) fn exit_render(&self) -> Option<Rc<ComponentInner>> {
        self.rendering.borrow_mut().pop()
    }

    /// The component whose render function is currently executing
    pub(crate) fn active_component(&self) -> Option<Rc<ComponentInner>> {
        self.rendering.borrow().last().cloned()
    }

    /// Check if a render function is executing on this thread
    pub fn is_rendering(&self) -> bool {
        !self.rendering.borrow().is_empty()
    }

    // =========================================================================
    // IDENTIFIERS
    // =========================================================================

    /// Take the next observable identifier
    pub fn take_observable_id(&self) -> u64 {
        let id = self.next_observable_id.get();
        self.next_observable_id.set(id + 1);
        id
    }

    /// Take the next component identifier
    pub fn take_component_id(&self) -> u64 {
        let id = self.next_component_id.get();
        self.next_component_id.set(id + 1);
        id
    }
}

impl Default for HookContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// THREAD-LOCAL ACCESS
// =============================================================================

thread_local! {
    /// The thread-local hook context
    static CONTEXT: HookContext = HookContext::new();
}

/// Access the thread-local hook context.
///
/// # Example
///
/// ```ignore
/// let rendering = with_context(|ctx| ctx.is_rendering());
/// ```
pub fn with_context<R>(f: impl FnOnce(&HookContext) -> R) -> R {
    CONTEXT.with(f)
}

/// Check if a component render is in progress on this thread
pub fn is_rendering() -> bool {
    with_context(|ctx| ctx.is_rendering())
}

// =============================================================================
// TESTS
// =============================================================================
