//! ferrum-lite - an embeddable in-memory Redis stand-in for test suites
//!
//! Clients connect over RESP2 exactly as they would to a real server. The
//! supported surface is the generic key, connection, list, set,
//! transaction and flush commands, with per-key versioning backing
//! WATCH/EXEC.
//!
//! Modules, leaves first:
//! - `store`: numbered databases, the shared `Store` and its direct API
//! - `transaction`: per-connection `Session` and the MULTI/EXEC engine
//! - `commands`: one `Command` per verb, producing `Op`s
//! - `dispatch`: verb lookup and arity checks
//! - `protocol`: RESP2 codec
//! - `server`: TCP listener and the embeddable `Server` handle

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod server;
pub mod store;
pub mod transaction;

/// Re-export commonly used types
pub use commands::{Command, CommandContext, Op};
pub use config::ServerConfig;
pub use error::{CommandError, StoreError};
pub use protocol::{RespError, RespValue};
pub use server::Server;
pub use store::{Db, KeyType, Store};
pub use transaction::Session;
