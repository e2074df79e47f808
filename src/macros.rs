// ============================================================================
// store-hooks - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// Render functions and listeners are `'static`, so every observable they use
/// has to be cloned in first. This removes that boilerplate.
///
/// # Usage
///
/// ```rust
/// use store_hooks::{cloned, create_observable, use_value, Component};
///
/// let count = create_observable(1);
///
/// let component = Component::new(cloned!(count => move || use_value(&count)));
/// component.mount().unwrap();
/// assert_eq!(component.output(), Some(1));
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Create a component with automatic variable capturing.
///
/// Wraps `Component::new(cloned!(... => move || ...))`.
///
/// # Usage
///
/// ```rust
/// use store_hooks::{component, create_observable, use_value_with};
///
/// let name = create_observable(String::from("ada"));
///
/// // Clean syntax: list captures => render body
/// let label = component!(name => use_value_with(&name, |n: &String| n.to_uppercase()));
/// label.mount().unwrap();
/// assert_eq!(label.output().as_deref(), Some("ADA"));
/// ```
#[macro_export]
macro_rules! component {
    // Case 1: With captures
    ($($deps:ident),+ => $body:expr) => {
        $crate::Component::new($crate::cloned!($($deps),+ => move || $body))
    };
    // Case 2: No captures
    ($body:expr) => {
        $crate::Component::new(move || $body)
    };
}
