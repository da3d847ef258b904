//! Validated data operations
//!
//! A data command turns its arguments into an `Op` once validation passes.
//! The same value is either executed on the spot or queued by MULTI and
//! executed later by EXEC, so both paths share one implementation.

use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::store::{pattern, StoreState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Del(Vec<String>),
    Exists(Vec<String>),
    Type(String),
    Keys(String),
    Move { key: String, target: i64 },
    RandomKey,
    Rename { from: String, to: String },
    RenameNx { from: String, to: String },
    Scan { cursor: i64, pattern: Option<String> },
    LPush { key: String, values: Vec<String> },
    RPush { key: String, values: Vec<String> },
    LPop(String),
    RPop(String),
    LLen(String),
    LRange { key: String, start: i64, stop: i64 },
    SAdd { key: String, members: Vec<String> },
    SRem { key: String, members: Vec<String> },
    SMembers(String),
    SIsMember { key: String, member: String },
    SCard(String),
    SDiff(Vec<String>),
    SInter(Vec<String>),
    SUnion(Vec<String>),
    FlushDb,
    FlushAll,
}

impl Op {
    /// Run against the locked store with `db` selected
    ///
    /// Failures become error replies, so one failing op inside EXEC does
    /// not stop the ones after it.
    pub fn execute(&self, state: &mut StoreState, db: i64) -> RespValue {
        self.apply(state, db).unwrap_or_else(RespValue::from)
    }

    fn apply(&self, state: &mut StoreState, db: i64) -> Result<RespValue, CommandError> {
        let reply = match self {
            Op::Del(keys) => {
                let keyspace = state.db(db);
                let mut deleted = 0;
                for key in keys {
                    if keyspace.del(key) {
                        deleted += 1;
                    }
                }
                RespValue::count(deleted)
            }
            Op::Exists(keys) => {
                let keyspace = state.db(db);
                RespValue::count(keys.iter().filter(|key| keyspace.exists(key)).count())
            }
            Op::Type(key) => match state.db(db).key_type(key) {
                Some(key_type) => RespValue::simple_string(key_type.as_str()),
                None => RespValue::simple_string("none"),
            },
            Op::Keys(pattern) => {
                RespValue::bulk_array(pattern::filter_keys(state.db(db).all_keys(), pattern))
            }
            Op::Move { key, target } => {
                if *target == db {
                    return Err(CommandError::SameObject);
                }
                RespValue::boolean(state.move_key(db, *target, key))
            }
            Op::RandomKey => RespValue::optional_bulk(state.db(db).random_key()),
            Op::Rename { from, to } => {
                let keyspace = state.db(db);
                if !keyspace.exists(from) {
                    return Err(CommandError::NoSuchKey);
                }
                keyspace.rename(from, to);
                RespValue::ok()
            }
            Op::RenameNx { from, to } => {
                let keyspace = state.db(db);
                if !keyspace.exists(from) {
                    return Err(CommandError::NoSuchKey);
                }
                if keyspace.exists(to) {
                    return Ok(RespValue::boolean(false));
                }
                keyspace.rename(from, to);
                RespValue::boolean(true)
            }
            Op::Scan { cursor, pattern } => {
                // everything is returned in one go, so any other cursor is past the end
                let keys = if *cursor == 0 {
                    let keys = state.db(db).all_keys();
                    match pattern {
                        Some(pattern) => pattern::filter_keys(keys, pattern),
                        None => keys,
                    }
                } else {
                    Vec::new()
                };
                RespValue::array(vec![RespValue::bulk_string("0"), RespValue::bulk_array(keys)])
            }
            Op::LPush { key, values } => {
                RespValue::count(state.db(db).lpush(key, values.iter().cloned())?)
            }
            Op::RPush { key, values } => {
                RespValue::count(state.db(db).rpush(key, values.iter().cloned())?)
            }
            Op::LPop(key) => RespValue::optional_bulk(state.db(db).lpop(key)?),
            Op::RPop(key) => RespValue::optional_bulk(state.db(db).rpop(key)?),
            Op::LLen(key) => RespValue::count(state.db(db).llen(key)?),
            Op::LRange { key, start, stop } => {
                RespValue::bulk_array(state.db(db).lrange(key, *start, *stop)?)
            }
            Op::SAdd { key, members } => {
                RespValue::count(state.db(db).sadd(key, members.iter().cloned())?)
            }
            Op::SRem { key, members } => RespValue::count(state.db(db).srem(key, members)?),
            Op::SMembers(key) => RespValue::bulk_array(state.db(db).smembers(key)?),
            Op::SIsMember { key, member } => {
                RespValue::boolean(state.db(db).sismember(key, member)?)
            }
            Op::SCard(key) => RespValue::count(state.db(db).scard(key)?),
            Op::SDiff(keys) => RespValue::bulk_array(state.db(db).sdiff(keys)?),
            Op::SInter(keys) => RespValue::bulk_array(state.db(db).sinter(keys)?),
            Op::SUnion(keys) => RespValue::bulk_array(state.db(db).sunion(keys)?),
            Op::FlushDb => {
                state.db(db).flush();
                RespValue::ok()
            }
            Op::FlushAll => {
                state.flush_all();
                RespValue::ok()
            }
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_move_same_database_checked_first() {
        let store = Store::new();
        let op = Op::Move {
            key: "missing".to_string(),
            target: 0,
        };
        assert_eq!(
            op.execute(&mut store.lock(), 0),
            RespValue::from(CommandError::SameObject)
        );
    }

    #[test]
    fn test_errors_become_replies() {
        let store = Store::new();
        store.set_add("s", ["a"]).unwrap();
        let op = Op::LLen("s".to_string());
        assert_eq!(
            op.execute(&mut store.lock(), 0),
            RespValue::from(CommandError::WrongType)
        );
    }

    #[test]
    fn test_scan() {
        let store = Store::new();
        store.set_add("key", ["a"]).unwrap();
        store.set_add("other", ["a"]).unwrap();
        let mut state = store.lock();

        let all = Op::Scan { cursor: 0, pattern: None };
        assert_eq!(
            all.execute(&mut state, 0),
            RespValue::array(vec![
                RespValue::bulk_string("0"),
                RespValue::bulk_array(keys(&["key", "other"])),
            ])
        );

        let later = Op::Scan { cursor: 42, pattern: None };
        assert_eq!(
            later.execute(&mut state, 0),
            RespValue::array(vec![RespValue::bulk_string("0"), RespValue::array(vec![])])
        );

        let matched = Op::Scan {
            cursor: 0,
            pattern: Some("k*".to_string()),
        };
        assert_eq!(
            matched.execute(&mut state, 0),
            RespValue::array(vec![
                RespValue::bulk_string("0"),
                RespValue::bulk_array(keys(&["key"])),
            ])
        );
    }

    #[test]
    fn test_rename_nx() {
        let store = Store::new();
        store.push("a", ["1"]).unwrap();
        store.push("b", ["2"]).unwrap();
        let mut state = store.lock();
        let op = Op::RenameNx {
            from: "a".to_string(),
            to: "b".to_string(),
        };
        assert_eq!(op.execute(&mut state, 0), RespValue::integer(0));
        let op = Op::RenameNx {
            from: "a".to_string(),
            to: "c".to_string(),
        };
        assert_eq!(op.execute(&mut state, 0), RespValue::integer(1));
        assert_eq!(
            op.execute(&mut state, 0),
            RespValue::from(CommandError::NoSuchKey)
        );
    }
}
