//! Goaltrack Core - Domain entities, services, and traits.
//!
//! This crate contains the goal day-tracking engine: day generation, the
//! toggle state machine with lazy backfill of missed days, and progress
//! calculation. It is database-agnostic and defines the store traits that
//! are implemented by the `storage-sqlite` crate.

pub mod errors;
pub mod goals;
pub mod store;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
