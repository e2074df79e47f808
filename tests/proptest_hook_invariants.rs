//! Property tests for the store hooks.
//!
//! Invariants checked over arbitrary write sequences:
//! - the entity returned by use_observable is the one built from the seed
//! - one notification means exactly one re-render
//! - suppressed notifications never re-render
//! - use_value always shows the latest projection

use proptest::prelude::*;
use store_hooks::{use_observable, use_value_with, Component, Observable};

fn mounted<V: 'static>(component: Component<V>) -> Component<V> {
    component.mount().unwrap();
    component.flush().unwrap();
    component
}

fn owned(seed: i64, silent: bool) -> (Component<Observable<i64>>, Observable<i64>) {
    let component = mounted(Component::new(move || use_observable(seed, silent)));
    let observable = component.output().unwrap();
    (component, observable)
}

proptest! {
    #[test]
    fn seed_is_first_value(seed in any::<i64>()) {
        let (component, observable) = owned(seed, false);
        prop_assert_eq!(observable.get(), seed);

        component.rerender().unwrap();
        prop_assert!(observable.ptr_eq(&component.output().unwrap()));
    }
}

proptest! {
    #[test]
    fn renders_once_per_notification(writes in proptest::collection::vec(-3i64..=3, 0..=40)) {
        let (component, observable) = owned(0, false);

        for value in &writes {
            observable.set(*value);
        }

        prop_assert_eq!(component.render_count(), 1 + writes.len());
        prop_assert_eq!(observable.listener_count(), 1);
    }
}

proptest! {
    #[test]
    fn suppressed_never_renders(writes in proptest::collection::vec(any::<i64>(), 0..=40)) {
        let (component, observable) = owned(0, true);

        for value in &writes {
            observable.set(*value);
        }

        prop_assert_eq!(component.render_count(), 1);
        if let Some(last) = writes.last() {
            prop_assert_eq!(observable.get(), *last);
        }
    }
}

proptest! {
    #[test]
    fn projection_tracks_latest_value(writes in proptest::collection::vec(0i64..=9, 1..=40)) {
        let source = store_hooks::create_observable(0i64);
        let parity = mounted(Component::new({
            let source = source.clone();
            move || use_value_with(&source, |v: &i64| v % 2 == 0)
        }));

        let mut expected_renders = 1;
        let mut shown = true;
        for value in &writes {
            source.set(*value);
            let even = value % 2 == 0;
            if even != shown {
                expected_renders += 1;
                shown = even;
            }
            prop_assert_eq!(parity.output(), Some(even));
        }

        prop_assert_eq!(parity.render_count(), expected_renders);
    }
}
