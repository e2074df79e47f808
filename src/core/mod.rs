// ============================================================================
// store-hooks - Core Module
// Observable contract, host context, and error types
// ============================================================================

pub mod constants;
pub mod context;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use context::{with_context, HookContext};
pub use error::{HookError, HookResult};
pub use types::{EqualsFn, Listener, ObservableId, ObservableState};
