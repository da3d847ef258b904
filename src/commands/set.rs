//! Set commands (SADD, SREM, SMEMBERS, SISMEMBER, SCARD, SDIFF, SINTER, SUNION)

use super::{key_and_values, Command, CommandContext, Op};
use crate::error::CommandError;
use crate::protocol::RespValue;

/// SADD command - Add members to a set
///
/// Syntax: SADD key member [member ...]
pub struct SAddCommand;

impl Command for SAddCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let Some((key, members)) = key_and_values(args) else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::SAdd {
            key: key.clone(),
            members: members.to_vec(),
        })
    }

    fn name(&self) -> &'static str {
        "SADD"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SREM command - Remove members from a set
///
/// Syntax: SREM key member [member ...]
pub struct SRemCommand;

impl Command for SRemCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let Some((key, members)) = key_and_values(args) else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::SRem {
            key: key.clone(),
            members: members.to_vec(),
        })
    }

    fn name(&self) -> &'static str {
        "SREM"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SMEMBERS command - Get all members of a set, sorted
///
/// Syntax: SMEMBERS key
pub struct SMembersCommand;

impl Command for SMembersCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [key] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::SMembers(key.clone()))
    }

    fn name(&self) -> &'static str {
        "SMEMBERS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SISMEMBER command - Check set membership
///
/// Syntax: SISMEMBER key member
pub struct SIsMemberCommand;

impl Command for SIsMemberCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [key, member] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::SIsMember {
            key: key.clone(),
            member: member.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "SISMEMBER"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// SCARD command - Get the number of members in a set
///
/// Syntax: SCARD key
pub struct SCardCommand;

impl Command for SCardCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
        let [key] = args else {
            return ctx.reject(CommandError::wrong_args(self.name()));
        };
        ctx.run(Op::SCard(key.clone()))
    }

    fn name(&self) -> &'static str {
        "SCARD"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// The set algebra commands share their shape: one or more keys in, a
/// sorted member list out.
macro_rules! set_algebra_command {
    ($(#[$doc:meta])* $command:ident, $name:literal, $op:ident) => {
        $(#[$doc])*
        pub struct $command;

        impl Command for $command {
            fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> RespValue {
                ctx.run(Op::$op(args.to_vec()))
            }

            fn name(&self) -> &'static str {
                $name
            }

            fn min_args(&self) -> usize {
                1
            }
        }
    };
}

set_algebra_command!(
    /// SDIFF command - Members of the first set missing from the others
    ///
    /// Syntax: SDIFF key [key ...]
    SDiffCommand,
    "SDIFF",
    SDiff
);

set_algebra_command!(
    /// SINTER command - Members common to all sets
    ///
    /// Syntax: SINTER key [key ...]
    SInterCommand,
    "SINTER",
    SInter
);

set_algebra_command!(
    /// SUNION command - Members of any of the sets
    ///
    /// Syntax: SUNION key [key ...]
    SUnionCommand,
    "SUNION",
    SUnion
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{bulks, err, Client};

    #[test]
    fn test_sadd_smembers() {
        let mut client = Client::new();
        assert_eq!(client.run("SADD s c a b"), RespValue::integer(3));
        assert_eq!(client.run("SADD s a"), RespValue::integer(0));
        assert_eq!(client.run("SMEMBERS s"), bulks(&["a", "b", "c"]));
        assert_eq!(client.run("SCARD s"), RespValue::integer(3));
        assert_eq!(client.run("SISMEMBER s b"), RespValue::integer(1));
        assert_eq!(client.run("SISMEMBER s z"), RespValue::integer(0));
        assert_eq!(client.run("SMEMBERS nope"), bulks(&[]));
    }

    #[test]
    fn test_srem_deletes_empty_set() {
        let mut client = Client::new();
        client.run("SADD s a b");
        assert_eq!(client.run("SREM s a z"), RespValue::integer(1));
        assert_eq!(client.run("SREM s b"), RespValue::integer(1));
        assert_eq!(client.run("EXISTS s"), RespValue::integer(0));
        assert_eq!(client.run("SREM s b"), RespValue::integer(0));
    }

    #[test]
    fn test_set_algebra() {
        let mut client = Client::new();
        client.run("SADD a 1 2 3");
        client.run("SADD b 2 3 4");
        assert_eq!(client.run("SDIFF a b"), bulks(&["1"]));
        assert_eq!(client.run("SINTER a b"), bulks(&["2", "3"]));
        assert_eq!(client.run("SUNION a b"), bulks(&["1", "2", "3", "4"]));
        assert_eq!(client.run("SINTER a missing"), bulks(&[]));
    }

    #[test]
    fn test_set_algebra_wrong_type() {
        let mut client = Client::new();
        client.run("SADD a 1 2");
        client.run("RPUSH l 1");
        assert_eq!(client.run("SDIFF a l"), err(CommandError::WrongType));
        assert_eq!(client.run("SUNION l a"), err(CommandError::WrongType));
        assert_eq!(client.run("SINTER l a"), err(CommandError::WrongType));
        assert_eq!(client.run("SINTER a l"), bulks(&["1", "2"]));
        assert_eq!(client.run("SADD l x"), err(CommandError::WrongType));
    }
}
