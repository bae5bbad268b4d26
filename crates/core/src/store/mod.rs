//! Store module - persistence contract and an in-memory implementation.

pub mod memory;
mod store_traits;

pub use memory::{InMemoryStoreExecutor, MemoryState};
pub use store_traits::{Erased, StoreJob, TrackingStore, TrackingStoreExecutor};
