// ============================================================================
// store-hooks - Runtime Module
// Minimal single-threaded hook host: components, state, refs, effects
// ============================================================================

pub mod component;
pub mod effect;
pub mod hooks;

pub use component::{Component, ComponentId, ComponentInner};
pub use effect::{CleanupFn, EffectFn, EffectHook, EffectTiming};
pub use hooks::{
    try_use_hook, use_effect, use_effect_with_timing, use_hook, use_layout_effect, use_ref,
    use_state, use_state_with_equals, Ref, SetState, StateHook,
};
