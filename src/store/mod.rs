//! In-memory storage module
//!
//! Provides the numbered databases, the shared `Store` that owns them, and
//! the direct API host code uses to seed and inspect data. This module is
//! independent of protocol and command handling.

mod database;
mod keyspace;
pub mod pattern;
mod value;

pub use database::{Db, Store, StoreState};
pub use keyspace::Keyspace;
pub use value::{KeyType, Value};
