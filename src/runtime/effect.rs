// ============================================================================
// store-hooks - Effect Hooks
// Lifecycle-bound side effects with dependency comparison and cleanup
// ============================================================================
//
// An effect hook remembers the dependencies it last ran with. When a render
// passes different dependencies, the effect body is queued on its component:
// layout effects run right after the render commits, passive effects run on
// the next flush (or before the next render, whichever comes first). Running
// an effect first runs the cleanup returned by its previous run.
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

// =============================================================================
// TYPE ALIASES
// =============================================================================

/// Cleanup returned by an effect, run before the next execution and on
/// unmount
pub type CleanupFn = Box<dyn FnOnce()>;

/// Effect body queued for execution
pub type EffectFn = Box<dyn FnOnce() -> Option<CleanupFn>>;

// =============================================================================
// EFFECT TIMING
// =============================================================================

/// When a queued effect runs relative to the render that queued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectTiming {
    /// Synchronously after the render commits, before control returns to
    /// the caller (before paint on a browser host).
    Layout,
    /// Deferred until the component is flushed or renders again.
    Passive,
}

impl EffectTiming {
    /// Parse a configuration value (`layout` or `passive`, any case).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "layout" => Some(EffectTiming::Layout),
            "passive" => Some(EffectTiming::Passive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffectTiming::Layout => "layout",
            EffectTiming::Passive => "passive",
        }
    }
}

impl fmt::Display for EffectTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// EFFECT HOOK
// =============================================================================

/// Per-slot effect state stored in a component.
pub struct EffectHook {
    timing: EffectTiming,
    deps: RefCell<Option<Box<dyn Any>>>,
    cleanup: RefCell<Option<CleanupFn>>,
    registered: Cell<bool>,
}

impl EffectHook {
    pub(crate) fn new(timing: EffectTiming) -> Self {
        Self {
            timing,
            deps: RefCell::new(None),
            cleanup: RefCell::new(None),
            registered: Cell::new(false),
        }
    }

    pub fn timing(&self) -> EffectTiming {
        self.timing
    }

    /// Mark the hook as registered with its component, returning whether it
    /// already was
    pub(crate) fn mark_registered(&self) -> bool {
        self.registered.replace(true)
    }

    /// Store `deps` if they differ from the last ones, returning whether the
    /// effect needs to run
    pub(crate) fn update_deps<D: PartialEq + 'static>(&self, deps: D) -> bool {
        let mut stored = self.deps.borrow_mut();
        let unchanged = stored
            .as_ref()
            .and_then(|previous| previous.downcast_ref::<D>())
            .is_some_and(|previous| *previous == deps);
        if unchanged {
            return false;
        }
        *stored = Some(Box::new(deps));
        true
    }

    /// Whether a cleanup from the last run is waiting
    pub fn has_cleanup(&self) -> bool {
        self.cleanup.borrow().is_some()
    }

    /// Run the pending cleanup, if any. Safe to call repeatedly.
    pub(crate) fn run_cleanup(&self) {
        let cleanup = self.cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }
}

// =============================================================================
// PENDING EFFECT
// =============================================================================

/// An effect body waiting for its commit phase.
pub(crate) struct PendingEffect {
    hook: Rc<EffectHook>,
    body: EffectFn,
}

impl PendingEffect {
    pub(crate) fn new(hook: Rc<EffectHook>, body: EffectFn) -> Self {
        Self { hook, body }
    }

    pub(crate) fn timing(&self) -> EffectTiming {
        self.hook.timing
    }

    /// Tear down the previous run, then run the body and keep its cleanup.
    pub(crate) fn run(self) {
        self.hook.run_cleanup();
        trace!(timing = %self.hook.timing, "run effect");
        let cleanup = (self.body)();
        *self.hook.cleanup.borrow_mut() = cleanup;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timing_values() {
        assert_eq!(EffectTiming::parse("layout"), Some(EffectTiming::Layout));
        assert_eq!(EffectTiming::parse(" PASSIVE "), Some(EffectTiming::Passive));
        assert_eq!(EffectTiming::parse("eager"), None);
        assert_eq!(EffectTiming::Layout.to_string(), "layout");
    }

    #[test]
    fn deps_compare_by_value() {
        let hook = EffectHook::new(EffectTiming::Passive);
        assert!(hook.update_deps(1u8), "first deps always run");
        assert!(!hook.update_deps(1u8));
        assert!(hook.update_deps(2u8));
        assert!(hook.update_deps((2u8, false)), "a different deps type counts as changed");
    }

    #[test]
    fn run_replaces_previous_cleanup() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hook = Rc::new(EffectHook::new(EffectTiming::Layout));

        for round in 0..2 {
            let log = log.clone();
            PendingEffect::new(
                hook.clone(),
                Box::new(move || {
                    log.borrow_mut().push(format!("run {round}"));
                    let cleanup: CleanupFn = Box::new(move || log.borrow_mut().push(format!("cleanup {round}")));
                    Some(cleanup)
                }),
            )
            .run();
        }

        hook.run_cleanup();
        hook.run_cleanup();

        assert_eq!(*log.borrow(), vec!["run 0", "cleanup 0", "run 1", "cleanup 1"]);
        assert!(!hook.has_cleanup());
    }
}
