//! SQLite storage implementation for Goaltrack.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the store traits defined in `goaltrack-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single writer actor that serializes write transactions
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!     core (domain)
//!          │
//!          ▼
//!  storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod executor;
pub mod goals;
pub mod schema;
pub mod store;
pub mod users;
pub mod utils;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, in_transaction, init, run_migrations, spawn_writer,
    DbConnection, DbPool, TransactionMode, WriteHandle,
};

pub use executor::SqliteStoreExecutor;
pub use store::SqliteTrackingStore;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from goaltrack-core for convenience
pub use goaltrack_core::errors::{DatabaseError, Error, Result};
