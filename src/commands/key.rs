//! Key commands (DEL, EXISTS, TYPE, MOVE, RANDOMKEY, RENAME, RENAMENX)

use super::{Command, CommandContext, Op};
use crate::error::CommandError;
use crate::protocol::RespValue;

/// DEL command - Delete keys
///
/// Syntax: DEL [key ...]
pub struct DelCommand;

impl Command for DelCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        ctx.run(Op::Del(args.to_vec()))
    }

    fn name(&self) -> &'static str {
        "DEL"
    }
}

/// EXISTS command - Count how many of the keys exist
///
/// Syntax: EXISTS key [key ...]
pub struct ExistsCommand;

impl Command for ExistsCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        ctx.run(Op::Exists(args.to_vec()))
    }

    fn name(&self) -> &'static str {
        "EXISTS"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// TYPE command - Get the type of a key
///
/// Syntax: TYPE key
pub struct TypeCommand;

impl Command for TypeCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [key] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::Type(key.clone()))
    }

    fn name(&self) -> &'static str {
        "TYPE"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// MOVE command - Move a key to another database
///
/// Syntax: MOVE key db
///
/// A db that is not a number means database 0.
pub struct MoveCommand;

impl Command for MoveCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [key, target] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::Move {
            key: key.clone(),
            target: target.parse().unwrap_or(0),
        })
    }

    fn name(&self) -> &'static str {
        "MOVE"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// RANDOMKEY command - Get a random key
///
/// Syntax: RANDOMKEY
pub struct RandomKeyCommand;

impl Command for RandomKeyCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> RespValue {
        ctx.run(Op::RandomKey)
    }

    fn name(&self) -> &'static str {
        "RANDOMKEY"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// RENAME command - Rename a key, replacing the destination
///
/// Syntax: RENAME key newkey
pub struct RenameCommand;

impl Command for RenameCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [from, to] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::Rename {
            from: from.clone(),
            to: to.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "RENAME"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// RENAMENX command - Rename a key only if the destination is free
///
/// Syntax: RENAMENX key newkey
pub struct RenameNxCommand;

impl Command for RenameNxCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [from, to] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::RenameNx {
            from: from.clone(),
            to: to.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "RENAMENX"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{err, Client};

    #[test]
    fn test_del_and_exists() {
        let mut client = Client::new();
        client.run("SADD a 1");
        client.run("RPUSH b 1");
        assert_eq!(client.run("EXISTS a b c"), RespValue::integer(2));
        assert_eq!(client.run("DEL a c"), RespValue::integer(1));
        assert_eq!(client.run("EXISTS a"), RespValue::integer(0));
        assert_eq!(client.run("DEL"), RespValue::integer(0));
    }

    #[test]
    fn test_type() {
        let mut client = Client::new();
        client.run("SADD s 1");
        client.run("RPUSH l 1");
        assert_eq!(client.run("TYPE s"), RespValue::simple_string("set"));
        assert_eq!(client.run("TYPE l"), RespValue::simple_string("list"));
        assert_eq!(client.run("TYPE nope"), RespValue::simple_string("none"));
        assert_eq!(client.run("TYPE"), err(CommandError::wrong_args("type")));
    }

    #[test]
    fn test_move() {
        let mut client = Client::new();
        client.run("SADD k a");
        assert_eq!(client.run("MOVE k 0"), err(CommandError::SameObject));
        assert_eq!(client.run("MOVE missing 0"), err(CommandError::SameObject));
        assert_eq!(client.run("MOVE k 1"), RespValue::integer(1));
        assert_eq!(client.run("EXISTS k"), RespValue::integer(0));
        assert_eq!(client.run("MOVE k 1"), RespValue::integer(0));

        client.run("SADD k b");
        assert_eq!(client.run("MOVE k 1"), RespValue::integer(0));
        assert_eq!(client.store().db(1).members("k").unwrap(), vec!["a"]);
    }

    #[test]
    fn test_move_non_numeric_target_is_zero() {
        let mut client = Client::new();
        client.run("SELECT 3");
        client.run("SADD k a");
        assert_eq!(client.run("MOVE k foo"), RespValue::integer(1));
        assert!(client.store().db(0).exists("k"));
    }

    #[test]
    fn test_randomkey() {
        let mut client = Client::new();
        assert_eq!(client.run("RANDOMKEY"), RespValue::Null);
        client.run("SADD only a");
        assert_eq!(client.run("RANDOMKEY"), RespValue::bulk_string("only"));
    }

    #[test]
    fn test_rename() {
        let mut client = Client::new();
        assert_eq!(client.run("RENAME nope other"), err(CommandError::NoSuchKey));
        client.run("RPUSH from a");
        client.run("SADD to x");
        assert_eq!(client.run("RENAME from to"), RespValue::ok());
        assert_eq!(client.run("TYPE to"), RespValue::simple_string("list"));
        assert_eq!(client.run("EXISTS from"), RespValue::integer(0));
    }

    #[test]
    fn test_renamenx() {
        let mut client = Client::new();
        client.run("RPUSH a 1");
        client.run("RPUSH b 2");
        assert_eq!(client.run("RENAMENX a b"), RespValue::integer(0));
        assert_eq!(client.run("RENAMENX a c"), RespValue::integer(1));
        assert_eq!(client.run("RENAMENX a d"), err(CommandError::NoSuchKey));
    }
}
