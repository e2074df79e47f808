// ============================================================================
// store-hooks - Constants
// ============================================================================

/// Environment variable that overrides the detected effect timing.
///
/// Accepted values are `layout` and `passive` (case-insensitive).
pub const EFFECT_TIMING_ENV_VAR: &str = "STORE_HOOKS_EFFECT_TIMING";

/// Maximum number of render passes a single update may trigger before the
/// host gives up with [`HookError::RenderLoop`](crate::HookError::RenderLoop).
pub const RENDER_LOOP_LIMIT: usize = 50;

/// Whether the build target has a paint surface (a browser main thread).
///
/// `wasm32` targets other than WASI run inside a browser-like host, so layout
/// effects there run before the frame is painted.
pub const HAS_PAINT_SURFACE: bool = cfg!(all(target_arch = "wasm32", not(target_os = "wasi")));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_targets_have_no_paint_surface() {
        #[cfg(not(target_arch = "wasm32"))]
        assert!(!HAS_PAINT_SURFACE);
    }

    #[test]
    fn render_loop_limit_allows_nested_updates() {
        assert!(RENDER_LOOP_LIMIT > 1);
    }
}
