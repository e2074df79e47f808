// ============================================================================
// store-hooks - Hooks Module
// Bridges between observable entities and component renders
// ============================================================================

pub mod bridge;
pub mod safe_effect;
pub mod value;

pub use bridge::{
    use_observable, use_observable_with, use_store, use_store_entity, use_store_with, EntitySlot,
};
pub use safe_effect::{capability_timing, resolve_effect_timing, safe_effect_timing, use_safe_effect};
pub use value::{use_value, use_value_with, use_value_with_equals};
