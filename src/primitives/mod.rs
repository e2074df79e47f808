// ============================================================================
// store-hooks - Primitives Module
// Reference engine: observable, store, subscription
// ============================================================================

pub mod observable;
pub mod store;
pub mod subscription;

// Re-export for convenience
pub use observable::{create_observable, create_observable_with, Observable, ObservableInner};
pub use store::{create_store, create_store_with, Store};
pub use subscription::Subscription;
