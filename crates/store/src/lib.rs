//! In-memory key-value store exposed as a process-wide singleton.
//! - `instance` holds the one-time initialization cell.
//! - `store` owns the mapping and its `save`/`get` operations.
//! - `global` wires both into the shared accessor used by binaries.
//! - `workload` drives the store from a pool of OS threads.

pub mod errors;
pub mod events;
pub mod global;
pub mod instance;
pub mod metrics;
pub mod store;
pub mod workload;

pub use errors::StoreError;
pub use store::{Lookup, SharedStore};
