// ============================================================================
// store-hooks - Errors
// Host misuse errors. Entity construction and action failures are not
// represented here: they propagate to the caller unchanged.
// ============================================================================

use thiserror::Error;

use crate::runtime::component::ComponentId;

/// Errors raised by the hook host when hooks or components are misused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// A hook was called while no component was rendering.
    #[error("hook called outside of a component render")]
    OutsideRender,

    /// The hook stored at `index` has a different type than the one being
    /// requested, which means hooks were called conditionally.
    #[error("hook at slot {index} changed between renders: expected {expected}, found {found}")]
    HookOrderMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// The component has been unmounted and can no longer render.
    #[error("{0} is unmounted")]
    Unmounted(ComponentId),

    /// Updates kept scheduling renders past the loop limit.
    #[error("{component} exceeded {limit} consecutive render passes")]
    RenderLoop { component: ComponentId, limit: usize },
}

/// Result alias used by fallible host operations
pub type HookResult<T> = Result<T, HookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_slot() {
        let err = HookError::HookOrderMismatch {
            index: 2,
            expected: "u32",
            found: "alloc::string::String",
        };
        assert_eq!(
            err.to_string(),
            "hook at slot 2 changed between renders: expected u32, found alloc::string::String"
        );
    }

    #[test]
    fn outside_render_message() {
        assert_eq!(
            HookError::OutsideRender.to_string(),
            "hook called outside of a component render"
        );
    }
}
