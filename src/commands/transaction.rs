//! Transaction commands (MULTI, EXEC, DISCARD, WATCH, UNWATCH)

use super::{Command, CommandContext};
use crate::protocol::RespValue;

/// MULTI command - Start queuing commands
///
/// Syntax: MULTI
pub struct MultiCommand;

impl Command for MultiCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> RespValue {
        if let Err(err) = ctx.authorize() {
            return err.into();
        }
        match ctx.session.multi() {
            Ok(()) => RespValue::ok(),
            Err(err) => err.into(),
        }
    }

    fn name(&self) -> &'static str {
        "MULTI"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// EXEC command - Run the queued commands
///
/// Syntax: EXEC
pub struct ExecCommand;

impl Command for ExecCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> RespValue {
        if let Err(err) = ctx.authorize() {
            return err.into();
        }
        match ctx.session.exec(ctx.store) {
            Ok(reply) => reply,
            Err(err) => err.into(),
        }
    }

    fn name(&self) -> &'static str {
        "EXEC"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// DISCARD command - Drop the queued commands
///
/// Syntax: DISCARD
pub struct DiscardCommand;

impl Command for DiscardCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> RespValue {
        if let Err(err) = ctx.authorize() {
            return err.into();
        }
        match ctx.session.discard() {
            Ok(()) => RespValue::ok(),
            Err(err) => err.into(),
        }
    }

    fn name(&self) -> &'static str {
        "DISCARD"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// WATCH command - Abort the next EXEC if any of these keys change
///
/// Syntax: WATCH key [key ...]
pub struct WatchCommand;

impl Command for WatchCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        if let Err(err) = ctx.authorize() {
            return err.into();
        }
        let state = ctx.store.lock();
        match ctx.session.watch(&state, args) {
            Ok(()) => RespValue::ok(),
            Err(err) => err.into(),
        }
    }

    fn name(&self) -> &'static str {
        "WATCH"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// UNWATCH command - Forget all watched keys
///
/// Syntax: UNWATCH
pub struct UnwatchCommand;

impl Command for UnwatchCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> RespValue {
        if let Err(err) = ctx.authorize() {
            return err.into();
        }
        ctx.session.unwatch();
        RespValue::ok()
    }

    fn name(&self) -> &'static str {
        "UNWATCH"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}
