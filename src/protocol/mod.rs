//! RESP2 protocol implementation
//!
//! Parses client requests and encodes replies. Independent of storage and
//! command handling.

mod resp;
mod types;

pub use resp::{RespEncoder, RespParser};
pub use types::{RespError, RespValue};
