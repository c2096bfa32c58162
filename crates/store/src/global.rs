//! Process-wide store instance.
//!
//! The first caller of [`instance`] builds the store; every other caller,
//! on any thread, receives the same reference. The store lives until the
//! process exits.

use crate::instance::InstanceCell;
use crate::store::SharedStore;

static STORE: InstanceCell<SharedStore<u64>> = InstanceCell::new();

/// Return the shared store, creating it on first use.
pub fn instance() -> &'static SharedStore<u64> {
    STORE.get_or_init(SharedStore::new)
}

/// Return the shared store only if it has already been created.
pub fn try_instance() -> Option<&'static SharedStore<u64>> {
    STORE.get()
}

/// How many times the shared store has been built (0 or 1).
pub fn constructions() -> usize {
    STORE.constructions()
}
