// ============================================================================
// store-hooks - Equality Functions
// Decide whether a host state write counts as a change
// ============================================================================

use std::rc::Rc;

// =============================================================================
// STRUCTURAL EQUALITY (Default)
// =============================================================================

/// Default structural equality using PartialEq.
/// This is what `use_state` and `use_value` use unless told otherwise.
///
/// # Example
/// ```
/// use store_hooks::reactivity::equality::equals;
///
/// assert!(equals(&42, &42));
/// assert!(!equals(&42, &43));
/// ```
pub fn equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

/// Safe equality for f64 values.
/// Handles NaN: NaN == NaN returns true, so a projection that keeps
/// producing NaN does not re-render forever.
///
/// # Example
/// ```
/// use store_hooks::reactivity::equality::safe_equals_f64;
///
/// assert!(safe_equals_f64(&1.0, &1.0));
/// assert!(safe_equals_f64(&f64::NAN, &f64::NAN));
/// assert!(!safe_equals_f64(&f64::NAN, &1.0));
/// ```
pub fn safe_equals_f64(a: &f64, b: &f64) -> bool {
    if a.is_nan() {
        return b.is_nan();
    }
    a == b
}

// =============================================================================
// REFERENCE EQUALITY
// =============================================================================

/// Reference equality for shared allocations.
///
/// Two `Rc`s are equal only if they point at the same allocation, even when
/// their contents compare equal. Freshly allocating a wrapper around the
/// same contents is therefore always a change.
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use store_hooks::reactivity::equality::rc_ptr_equals;
///
/// let a = Rc::new(1);
/// assert!(rc_ptr_equals(&a, &a.clone()));
/// assert!(!rc_ptr_equals(&a, &Rc::new(1)));
/// ```
pub fn rc_ptr_equals<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    Rc::ptr_eq(a, b)
}

// =============================================================================
// CONSTANT EQUALITY
// =============================================================================

/// Never equal - every write is a change.
pub fn never_equals<T>(_a: &T, _b: &T) -> bool {
    false
}

/// Always equal - no write is a change.
pub fn always_equals<T>(_a: &T, _b: &T) -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EqualsFn;

    #[test]
    fn test_equals() {
        assert!(equals(&"hello", &"hello"));
        assert!(!equals(&"hello", &"world"));
        assert!(equals(&vec![1, 2], &vec![1, 2]));
    }

    #[test]
    fn test_safe_equals_f64() {
        assert!(safe_equals_f64(&-0.0, &0.0));
        assert!(safe_equals_f64(&f64::INFINITY, &f64::INFINITY));
        assert!(!safe_equals_f64(&1.0, &f64::NAN));
    }

    #[test]
    fn test_rc_ptr_equals_ignores_contents() {
        let a = Rc::new(String::from("same"));
        let b = Rc::new(String::from("same"));
        assert_eq!(a, b);
        assert!(!rc_ptr_equals(&a, &b));
        assert!(rc_ptr_equals(&a, &Rc::clone(&a)));
    }

    #[test]
    fn test_constant_equality() {
        assert!(!never_equals(&1, &1));
        assert!(always_equals(&1, &2));
    }

    #[test]
    fn test_coerce_to_equals_fn() {
        let eq: EqualsFn<i32> = equals;
        let by_ptr: EqualsFn<Rc<i32>> = rc_ptr_equals;
        assert!(eq(&3, &3));
        assert!(!by_ptr(&Rc::new(3), &Rc::new(3)));
    }
}
