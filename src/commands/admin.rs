//! Admin commands (FLUSHDB, FLUSHALL)

use super::{Command, CommandContext, Op};
use crate::protocol::RespValue;

/// FLUSHDB command - Remove all keys from the current database
///
/// Syntax: FLUSHDB
pub struct FlushDbCommand;

impl Command for FlushDbCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> RespValue {
        ctx.run(Op::FlushDb)
    }

    fn name(&self) -> &'static str {
        "FLUSHDB"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// FLUSHALL command - Remove all keys from every database
///
/// Syntax: FLUSHALL
pub struct FlushAllCommand;

impl Command for FlushAllCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> RespValue {
        ctx.run(Op::FlushAll)
    }

    fn name(&self) -> &'static str {
        "FLUSHALL"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}
