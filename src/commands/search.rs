//! Search commands (KEYS, SCAN)

use super::{parse_integer, Command, CommandContext, Op};
use crate::error::CommandError;
use crate::protocol::RespValue;

/// KEYS command - Find all keys matching a pattern
///
/// Syntax: KEYS pattern
///
/// Patterns support `*`, `?` and `\` escapes; see `store::pattern`.
pub struct KeysCommand;

impl Command for KeysCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [pattern] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::Keys(pattern.clone()))
    }

    fn name(&self) -> &'static str {
        "KEYS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SCAN command - Iterate the keyspace
///
/// Syntax: SCAN cursor [MATCH pattern] [COUNT count]
///
/// The whole keyspace comes back on cursor 0 with next cursor 0. COUNT is
/// validated and otherwise ignored.
pub struct ScanCommand;

impl ScanCommand {
    fn parse(args: &[String]) -> Result<Op, CommandError> {
        let (cursor, options) = args
            .split_first()
            .ok_or_else(|| CommandError::wrong_args("scan"))?;
        let cursor = cursor
            .parse::<i64>()
            .map_err(|_| CommandError::InvalidCursor)?;

        let mut pattern = None;
        let mut options = options.iter();
        while let Some(option) = options.next() {
            let value = options.next().ok_or(CommandError::Syntax)?;
            match option.to_ascii_uppercase().as_str() {
                "MATCH" => pattern = Some(value.clone()),
                "COUNT" => {
                    parse_integer(value)?;
                }
                _ => return Err(CommandError::Syntax),
            }
        }
        Ok(Op::Scan { cursor, pattern })
    }
}

impl Command for ScanCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        match Self::parse(args) {
            Ok(op) => ctx.run(op),
            Err(err) => ctx.reject(err),
        }
    }

    fn name(&self) -> &'static str {
        "SCAN"
    }

    fn min_args(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{bulks, err, Client};

    fn seeded() -> Client {
        let mut client = Client::new();
        for key in ["foo", "foobar", "barfoo", "fooooo"] {
            client.run(&format!("SADD {key} x"));
        }
        client
    }

    #[test]
    fn test_keys() {
        let mut client = seeded();
        assert_eq!(client.run("KEYS foo*"), bulks(&["foo", "foobar", "fooooo"]));
        assert_eq!(client.run("KEYS *foo"), bulks(&["barfoo", "foo"]));
        assert_eq!(client.run("KEYS f?o"), bulks(&["foo"]));
        assert_eq!(client.run("KEYS nothing"), bulks(&[]));
    }

    #[test]
    fn test_scan_returns_everything_at_once() {
        let mut client = seeded();
        assert_eq!(
            client.run("SCAN 0 MATCH foo* COUNT 1"),
            RespValue::array(vec![
                RespValue::bulk_string("0"),
                bulks(&["foo", "foobar", "fooooo"]),
            ])
        );
        assert_eq!(
            client.run("SCAN 42"),
            RespValue::array(vec![RespValue::bulk_string("0"), bulks(&[])])
        );
    }

    #[test]
    fn test_scan_validation() {
        let mut client = Client::new();
        assert_eq!(client.run("SCAN abc"), err(CommandError::InvalidCursor));
        assert_eq!(client.run("SCAN 0 MATCH"), err(CommandError::Syntax));
        assert_eq!(client.run("SCAN 0 BOGUS x"), err(CommandError::Syntax));
        assert_eq!(client.run("SCAN 0 COUNT many"), err(CommandError::InvalidInteger));
        assert!(client.session.is_dirty());
    }
}
