// ============================================================================
// store-hooks - Reactivity Module
// Equality functions deciding whether a state write re-renders
// ============================================================================

pub mod equality;

pub use equality::{always_equals, equals, never_equals, rc_ptr_equals, safe_equals_f64};
