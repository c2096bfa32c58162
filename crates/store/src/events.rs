use tracing::info;

/// Notification hooks fired by [`crate::SharedStore`].
/// Implementations must be cheap; they run inline on the calling thread.
pub trait StoreEvents: Send + Sync {
    /// Fired once, when the store is constructed.
    fn on_created(&self);
    /// Fired after every `save`, with the key rendered through `Display`.
    fn on_saved(&self, key: &str, value: &str);
}

/// Default hooks: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl StoreEvents for TracingEvents {
    fn on_created(&self) {
        info!(event = "store_created", "database connection created");
    }

    fn on_saved(&self, key: &str, value: &str) {
        info!(event = "data_saved", %key, %value, "data saved");
    }
}
