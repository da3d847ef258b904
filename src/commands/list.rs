//! List commands (LPUSH, RPUSH, LPOP, RPOP, LLEN, LRANGE)

use super::{key_and_values, parse_integer, Command, CommandContext, Op};
use crate::error::CommandError;
use crate::protocol::RespValue;

/// LPUSH command - Prepend one or multiple values to a list
///
/// Syntax: LPUSH key value [value ...]
pub struct LPushCommand;

impl Command for LPushCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let Some((key, values)) = key_and_values(args) else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::LPush {
            key: key.clone(),
            values: values.to_vec(),
        })
    }

    fn name(&self) -> &'static str {
        "LPUSH"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// RPUSH command - Append one or multiple values to a list
///
/// Syntax: RPUSH key value [value ...]
pub struct RPushCommand;

impl Command for RPushCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let Some((key, values)) = key_and_values(args) else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::RPush {
            key: key.clone(),
            values: values.to_vec(),
        })
    }

    fn name(&self) -> &'static str {
        "RPUSH"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// LPOP command - Remove and return the first element
///
/// Syntax: LPOP key
pub struct LPopCommand;

impl Command for LPopCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [key] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::LPop(key.clone()))
    }

    fn name(&self) -> &'static str {
        "LPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// RPOP command - Remove and return the last element
///
/// Syntax: RPOP key
pub struct RPopCommand;

impl Command for RPopCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [key] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::RPop(key.clone()))
    }

    fn name(&self) -> &'static str {
        "RPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// LLEN command - Get the length of a list
///
/// Syntax: LLEN key
pub struct LLenCommand;

impl Command for LLenCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [key] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::LLen(key.clone()))
    }

    fn name(&self) -> &'static str {
        "LLEN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// LRANGE command - Get a range of elements from a list
///
/// Syntax: LRANGE key start stop
///
/// Negative indexes count from the end (-1 is the last element).
pub struct LRangeCommand;

impl LRangeCommand {
    fn parse(args: &[String]) -> Result<Op, CommandError> {
        let [key, start, stop] = args else {
            return Err(CommandError::wrong_args("lrange"));
        };
        Ok(Op::LRange {
            key: key.clone(),
            start: parse_integer(start)?,
            stop: parse_integer(stop)?,
        })
    }
}

impl Command for LRangeCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        match Self::parse(args) {
            Ok(op) => ctx.run(op),
            Err(err) => ctx.reject(err),
        }
    }

    fn name(&self) -> &'static str {
        "LRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{bulks, err, Client};

    #[test]
    fn test_lpush_lpop() {
        let mut client = Client::new();
        assert_eq!(client.run("LPUSH foo bar"), RespValue::integer(1));
        assert_eq!(client.run("LPOP foo"), RespValue::bulk_string("bar"));
        assert_eq!(client.run("EXISTS foo"), RespValue::integer(0));
        assert_eq!(client.run("LPOP foo"), RespValue::Null);
    }

    #[test]
    fn test_push_order() {
        let mut client = Client::new();
        assert_eq!(client.run("RPUSH l a b"), RespValue::integer(2));
        assert_eq!(client.run("LPUSH l x y"), RespValue::integer(4));
        assert_eq!(client.run("LRANGE l 0 -1"), bulks(&["y", "x", "a", "b"]));
        assert_eq!(client.run("RPOP l"), RespValue::bulk_string("b"));
        assert_eq!(client.run("LLEN l"), RespValue::integer(3));
        assert_eq!(client.run("LLEN nope"), RespValue::integer(0));
    }

    #[test]
    fn test_lrange() {
        let mut client = Client::new();
        client.run("RPUSH mylist a b c d e");
        assert_eq!(client.run("LRANGE mylist 1 3"), bulks(&["b", "c", "d"]));
        assert_eq!(client.run("LRANGE mylist -2 -1"), bulks(&["d", "e"]));
        assert_eq!(client.run("LRANGE mylist 5 10"), bulks(&[]));
        assert_eq!(
            client.run("LRANGE mylist one 2"),
            err(CommandError::InvalidInteger)
        );
    }

    #[test]
    fn test_wrong_type() {
        let mut client = Client::new();
        client.run("SADD s a");
        assert_eq!(client.run("LPUSH s x"), err(CommandError::WrongType));
        assert_eq!(client.run("LPOP s"), err(CommandError::WrongType));
        assert_eq!(client.run("LRANGE s 0 -1"), err(CommandError::WrongType));
    }

    #[test]
    fn test_arity() {
        let mut client = Client::new();
        assert_eq!(client.run("LPUSH k"), err(CommandError::wrong_args("lpush")));
        assert_eq!(client.run("LPOP a b"), err(CommandError::wrong_args("lpop")));
        assert!(client.session.is_dirty());
    }
}
