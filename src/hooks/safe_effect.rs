// ============================================================================
// store-hooks - Environment-Aware Effect
// Pick layout or passive timing once per process
// ============================================================================
//
// Where there is a paint step, subscribing in a layout effect lets a state
// correction land before the first frame is shown. Without a paint surface
// (server rendering, headless hosts) layout timing buys nothing, so the
// ordinary deferred effect is used.
// ============================================================================

use std::env;
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::core::constants::{EFFECT_TIMING_ENV_VAR, HAS_PAINT_SURFACE};
use crate::runtime::effect::{CleanupFn, EffectTiming};
use crate::runtime::hooks::use_effect_with_timing;

static SAFE_EFFECT_TIMING: OnceLock<EffectTiming> = OnceLock::new();

/// Timing implied by the build target alone
pub const fn capability_timing() -> EffectTiming {
    if HAS_PAINT_SURFACE {
        EffectTiming::Layout
    } else {
        EffectTiming::Passive
    }
}

/// Resolve the timing from an optional configured value, falling back to
/// the build target.
pub fn resolve_effect_timing(configured: Option<&str>) -> EffectTiming {
    if let Some(value) = configured {
        match EffectTiming::parse(value) {
            Some(timing) => return timing,
            None => warn!(
                value,
                variable = EFFECT_TIMING_ENV_VAR,
                "ignoring unknown effect timing"
            ),
        }
    }
    capability_timing()
}

/// The timing used by [`use_safe_effect`].
///
/// Read from `STORE_HOOKS_EFFECT_TIMING` or the build target on first use,
/// then fixed for the life of the process.
pub fn safe_effect_timing() -> EffectTiming {
    *SAFE_EFFECT_TIMING.get_or_init(|| {
        let configured = env::var(EFFECT_TIMING_ENV_VAR).ok();
        let timing = resolve_effect_timing(configured.as_deref());
        debug!(%timing, configured = configured.is_some(), "effect timing selected");
        timing
    })
}

/// Effect with the process-wide timing: layout where frames are painted,
/// passive elsewhere.
pub fn use_safe_effect<D, F>(deps: D, effect: F)
where
    D: PartialEq + 'static,
    F: FnOnce() -> Option<CleanupFn> + 'static,
{
    use_effect_with_timing(safe_effect_timing(), deps, effect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::component::Component;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn configured_value_wins() {
        assert_eq!(resolve_effect_timing(Some("layout")), EffectTiming::Layout);
        assert_eq!(resolve_effect_timing(Some("Passive")), EffectTiming::Passive);
    }

    #[test]
    fn unknown_or_missing_value_uses_capability() {
        assert_eq!(resolve_effect_timing(Some("sometimes")), capability_timing());
        assert_eq!(resolve_effect_timing(None), capability_timing());
    }

    #[test]
    fn selection_is_stable() {
        assert_eq!(safe_effect_timing(), safe_effect_timing());
    }

    #[test]
    fn safe_effect_has_run_after_flush() {
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let component = Component::new(move || {
            let runs = runs_clone.clone();
            use_safe_effect((), move || {
                runs.set(runs.get() + 1);
                None
            });
        });

        component.mount().unwrap();
        let expected_before_flush = match safe_effect_timing() {
            EffectTiming::Layout => 1,
            EffectTiming::Passive => 0,
        };
        assert_eq!(runs.get(), expected_before_flush);

        component.flush().unwrap();
        assert_eq!(runs.get(), 1);
    }
}
