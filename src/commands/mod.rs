//! Command execution module
//!
//! Provides a unified interface for all commands through the Command trait.
//! Commands are grouped by family, one file each.

mod context;
mod op;
mod registry;

// Command implementations
mod admin;
mod connection;
mod key;
mod list;
mod search;
mod set;
mod transaction;

pub use context::CommandContext;
pub use op::Op;
pub use registry::CommandRegistry;

use crate::error::CommandError;
use crate::protocol::RespValue;

/// Command execution trait
///
/// All commands implement this trait with a single execute method.
/// The dispatcher enforces `min_args` / `max_args` before calling it, so
/// `execute` may rely on the minimum. Slice patterns that need an `else`
/// arm still reply with the arity error, keeping `execute` total when it is
/// called without the dispatcher.
pub trait Command: Send + Sync {
    /// Execute the command with the given context and arguments
    ///
    /// Arguments:
    /// - ctx: the store and the calling session
    /// - args: command arguments (excluding the command name itself)
    ///
    /// Returns:
    /// - RespValue representing the response to send to the client
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue;

    /// Get the command name (for debugging/logging)
    fn name(&self) -> &'static str;

    /// Get the minimum number of arguments required
    fn min_args(&self) -> usize {
        0
    }

    /// Get the maximum number of arguments (None = unlimited)
    fn max_args(&self) -> Option<usize> {
        None
    }
}

/// Parse a decimal integer argument
pub(crate) fn parse_integer(arg: &str) -> Result<i64, CommandError> {
    arg.parse::<i64>().map_err(|_| CommandError::InvalidInteger)
}

/// Split arguments into a key and at least one value
pub(crate) fn key_and_values(args: &[String]) -> Option<(&String, &[String])> {
    match args {
        [key, values @ ..] if !values.is_empty() => Some((key, values)),
        _ => None,
    }
}
