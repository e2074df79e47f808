// ============================================================================
// store-hooks - Observable Store Hooks for Component Renders
// ============================================================================
//
// Three hooks bridge an externally owned observable into a component:
// - use_observable / use_store: own an entity, re-render on its changes
// - use_value: project an existing entity, re-render when the projection
//   changes, always using the latest projection closure
//
// Subscriptions are made in an effect whose timing is chosen once per
// process (layout where frames are painted, passive elsewhere) and released
// by the effect's cleanup.
// ============================================================================

#[macro_use]
mod macros;

pub mod core;
pub mod hooks;
pub mod primitives;
pub mod reactivity;
pub mod runtime;

// Re-export core items at crate root for ergonomic access
pub use crate::core::constants;
pub use crate::core::context::{is_rendering, with_context, HookContext};
pub use crate::core::error::{HookError, HookResult};
pub use crate::core::types::{EqualsFn, Listener, ObservableId, ObservableState};

// Re-export the reference engine
pub use primitives::observable::{create_observable, create_observable_with, Observable};
pub use primitives::store::{create_store, create_store_with, Store};
pub use primitives::subscription::Subscription;

// Re-export the store hooks
pub use hooks::bridge::{
    use_observable, use_observable_with, use_store, use_store_entity, use_store_with, EntitySlot,
};
pub use hooks::safe_effect::{
    capability_timing, resolve_effect_timing, safe_effect_timing, use_safe_effect,
};
pub use hooks::value::{use_value, use_value_with, use_value_with_equals};

// Re-export the host
pub use runtime::component::{Component, ComponentId};
pub use runtime::effect::{CleanupFn, EffectTiming};
pub use runtime::hooks::{
    try_use_hook, use_effect, use_effect_with_timing, use_hook, use_layout_effect, use_ref,
    use_state, use_state_with_equals, Ref, SetState,
};

// Re-export equality functions
pub use reactivity::equality::{always_equals, equals, never_equals, rc_ptr_equals, safe_equals_f64};

// =============================================================================
// TESTS
// =============================================================================
