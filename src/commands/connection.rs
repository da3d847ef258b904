//! Connection commands (PING, ECHO, AUTH, SELECT, QUIT)
//!
//! These act on the session itself and never enter a transaction queue.

use super::{Command, CommandContext};
use crate::error::CommandError;
use crate::protocol::RespValue;

/// PING command - Test the connection
///
/// Syntax: PING [message]
pub struct PingCommand;

impl Command for PingCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        if let Err(err) = ctx.authorize() {
            return err.into();
        }
        match args.first() {
            Some(message) => RespValue::bulk_string(message.clone()),
            None => RespValue::simple_string("PONG"),
        }
    }

    fn name(&self) -> &'static str {
        "PING"
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// ECHO command - Return the message
///
/// Syntax: ECHO message
pub struct EchoCommand;

impl Command for EchoCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [message] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        if let Err(err) = ctx.authorize() {
            return err.into();
        }
        RespValue::bulk_string(message.clone())
    }

    fn name(&self) -> &'static str {
        "ECHO"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// AUTH command - Authenticate the connection
///
/// Syntax: AUTH password
pub struct AuthCommand;

impl Command for AuthCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [password] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        let accepted = {
            let state = ctx.store.lock();
            if !state.requires_auth() {
                return CommandError::NoPasswordSet.into();
            }
            state.password() == password.as_str()
        };
        if !accepted {
            return CommandError::InvalidPassword.into();
        }
        ctx.session.authenticate();
        RespValue::ok()
    }

    fn name(&self) -> &'static str {
        "AUTH"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SELECT command - Change the database of this connection
///
/// Syntax: SELECT index
///
/// An index that is not a number selects database 0.
pub struct SelectCommand;

impl Command for SelectCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [index] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        if let Err(err) = ctx.authorize() {
            return err.into();
        }
        ctx.session.select(index.parse().unwrap_or(0));
        RespValue::ok()
    }

    fn name(&self) -> &'static str {
        "SELECT"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// QUIT command - Close the connection
///
/// Syntax: QUIT
pub struct QuitCommand;

impl Command for QuitCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> RespValue {
        ctx.session.request_close();
        RespValue::ok()
    }

    fn name(&self) -> &'static str {
        "QUIT"
    }
}
