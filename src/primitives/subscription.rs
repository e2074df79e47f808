// ============================================================================
// store-hooks - Subscription Handle
// RAII guard returned by ObservableState::subscribe
// ============================================================================

use std::fmt;

/// Handle to a registered listener.
///
/// Dropping the handle or calling [`unsubscribe`](Self::unsubscribe) removes
/// the listener. Release happens at most once.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap the function that removes a listener from its entity.
    ///
    /// Engines other than [`Observable`](crate::Observable) use this to
    /// implement [`ObservableState`](crate::ObservableState).
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
