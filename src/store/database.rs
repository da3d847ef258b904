//! The shared store: every numbered database behind one lock

use super::keyspace::Keyspace;
use super::value::{KeyType, Value};
use crate::error::StoreError;
use parking_lot::{Mutex, MutexGuard};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::info;

/// Longest element `dump` prints before truncating
const DUMP_MAX_LEN: usize = 60;
const DUMP_INDENT: &str = "   ";

/// Everything guarded by the store lock
#[derive(Debug, Default)]
pub struct StoreState {
    dbs: HashMap<i64, Keyspace>,
    password: String,
    selected_db: i64,
    now: Option<SystemTime>,
}

impl StoreState {
    /// Get database `id`, creating it on first use
    pub fn db(&mut self, id: i64) -> &mut Keyspace {
        self.dbs.entry(id).or_default()
    }

    /// Get database `id` if it was ever used
    pub fn get_db(&self, id: i64) -> Option<&Keyspace> {
        self.dbs.get(&id)
    }

    /// Version of `key` in database `id`
    pub fn version(&self, id: i64, key: &str) -> u64 {
        self.get_db(id).map_or(0, |db| db.version(key))
    }

    /// Move `key` from database `from` to database `to`
    pub fn move_key(&mut self, from: i64, to: i64, key: &str) -> bool {
        if from == to {
            return false;
        }
        let mut source = self.dbs.remove(&from).unwrap_or_default();
        let moved = source.move_to(key, self.db(to));
        self.dbs.insert(from, source);
        moved
    }

    /// Empty every database
    pub fn flush_all(&mut self) {
        for db in self.dbs.values_mut() {
            db.flush();
        }
    }

    /// Whether clients must AUTH before running commands
    pub fn requires_auth(&self) -> bool {
        !self.password.is_empty()
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Database the direct API addresses
    pub fn selected_db(&self) -> i64 {
        self.selected_db
    }

    /// Reference time, wall clock unless pinned with `Store::set_time`
    pub fn now(&self) -> SystemTime {
        self.now.unwrap_or_else(SystemTime::now)
    }
}

/// Shared store for all connections and the host
///
/// All databases live behind a single lock, so a command (or a whole EXEC)
/// observes and mutates them atomically. Counters are kept outside the lock.
#[derive(Debug, Default)]
pub struct Store {
    state: Mutex<StoreState>,
    commands: AtomicU64,
    connections_total: AtomicU64,
    connections_current: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the store lock
    ///
    /// Never hold the guard across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock()
    }

    /// Require clients to AUTH with `password`; empty disables
    pub fn require_auth(&self, password: impl Into<String>) {
        self.lock().password = password.into();
    }

    /// Pin the reference time
    pub fn set_time(&self, now: SystemTime) {
        self.lock().now = Some(now);
    }

    pub fn now(&self) -> SystemTime {
        self.lock().now()
    }

    // Counters

    pub fn record_command(&self) {
        self.commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_current.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.connections_current.fetch_sub(1, Ordering::Relaxed);
    }

    /// Commands processed since the store was created
    pub fn command_count(&self) -> u64 {
        self.commands.load(Ordering::Relaxed)
    }

    /// Connections open right now
    pub fn current_connection_count(&self) -> u64 {
        self.connections_current.load(Ordering::Relaxed)
    }

    /// Connections accepted since the store was created
    pub fn total_connection_count(&self) -> u64 {
        self.connections_total.load(Ordering::Relaxed)
    }

    // Direct API

    /// Handle on database `id`
    pub fn db(&self, id: i64) -> Db<'_> {
        Db { store: self, id }
    }

    /// Handle on the database picked with `select`
    pub fn current(&self) -> Db<'_> {
        let id = self.lock().selected_db;
        self.db(id)
    }

    /// Change the database the direct API addresses
    ///
    /// Client sessions are unaffected; each has its own SELECT.
    pub fn select(&self, id: i64) {
        self.lock().selected_db = id;
    }

    pub fn flush_all(&self) {
        self.lock().flush_all();
    }

    pub fn flush_db(&self) {
        self.current().flush();
    }

    pub fn keys(&self) -> Vec<String> {
        self.current().keys()
    }

    pub fn dump(&self) -> String {
        self.current().dump()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.current().exists(key)
    }

    pub fn key_type(&self, key: &str) -> Option<KeyType> {
        self.current().key_type(key)
    }

    pub fn del(&self, key: &str) -> bool {
        self.current().del(key)
    }

    pub fn list(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.current().list(key)
    }

    pub fn lpush(&self, key: &str, value: impl Into<String>) -> Result<usize, StoreError> {
        self.current().lpush(key, value)
    }

    pub fn lpop(&self, key: &str) -> Result<String, StoreError> {
        self.current().lpop(key)
    }

    pub fn push<I>(&self, key: &str, values: I) -> Result<usize, StoreError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.current().push(key, values)
    }

    pub fn pop(&self, key: &str) -> Result<String, StoreError> {
        self.current().pop(key)
    }

    pub fn set_add<I>(&self, key: &str, members: I) -> Result<usize, StoreError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.current().set_add(key, members)
    }

    pub fn srem<I>(&self, key: &str, members: I) -> Result<usize, StoreError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.current().srem(key, members)
    }

    pub fn members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.current().members(key)
    }

    pub fn set_members<I>(&self, key: &str, members: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.current().set_members(key, members)
    }

    pub fn is_member(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        self.current().is_member(key, member)
    }

    /// Persistence hook, called by the binary on shutdown
    ///
    /// Nothing is written to disk; the hook only reports what would be saved.
    pub fn save(&self) -> anyhow::Result<()> {
        let state = self.lock();
        let keys: usize = state.dbs.values().map(Keyspace::len).sum();
        info!(databases = state.dbs.len(), keys, "save requested, nothing persisted");
        Ok(())
    }
}

/// Direct access to one numbered database
///
/// Every call takes the store lock for its own duration.
#[derive(Debug, Clone, Copy)]
pub struct Db<'a> {
    store: &'a Store,
    id: i64,
}

impl<'a> Db<'a> {
    pub fn id(&self) -> i64 {
        self.id
    }

    fn with<R>(&self, f: impl FnOnce(&mut Keyspace) -> R) -> R {
        let mut state = self.store.lock();
        f(state.db(self.id))
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.with(|db| db.all_keys())
    }

    /// Remove every key in this database
    pub fn flush(&self) {
        self.with(|db| db.flush())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.with(|db| db.exists(key))
    }

    pub fn key_type(&self, key: &str) -> Option<KeyType> {
        self.with(|db| db.key_type(key))
    }

    /// Delete a key, returns whether it existed
    pub fn del(&self, key: &str) -> bool {
        self.with(|db| db.del(key))
    }

    /// The whole list, like `LRANGE key 0 -1`
    pub fn list(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.with(|db| match db.list(key)? {
            Some(list) => Ok(list.iter().cloned().collect()),
            None => Err(StoreError::KeyNotFound),
        })
    }

    /// Push onto the head, returns the new length
    pub fn lpush(&self, key: &str, value: impl Into<String>) -> Result<usize, StoreError> {
        let value = value.into();
        self.with(|db| db.lpush(key, [value]))
    }

    /// Remove the head element
    pub fn lpop(&self, key: &str) -> Result<String, StoreError> {
        self.with(|db| db.lpop(key)?.ok_or(StoreError::KeyNotFound))
    }

    /// Append to the tail, returns the new length
    pub fn push<I>(&self, key: &str, values: I) -> Result<usize, StoreError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.with(|db| db.rpush(key, values))
    }

    /// Remove the tail element
    pub fn pop(&self, key: &str) -> Result<String, StoreError> {
        self.with(|db| db.rpop(key)?.ok_or(StoreError::KeyNotFound))
    }

    /// Add members, returns how many were new
    pub fn set_add<I>(&self, key: &str, members: I) -> Result<usize, StoreError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        self.with(|db| db.sadd(key, members))
    }

    /// Remove members, returns how many were present
    pub fn srem<I>(&self, key: &str, members: I) -> Result<usize, StoreError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        self.with(|db| {
            if !db.exists(key) {
                return Err(StoreError::KeyNotFound);
            }
            db.srem(key, &members)
        })
    }

    /// Replace `key` with a set of exactly `members`, whatever it held
    ///
    /// No members deletes the key.
    pub fn set_members<I>(&self, key: &str, members: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let members: BTreeSet<String> = members.into_iter().map(Into::into).collect();
        self.with(|db| db.set_replace(key, members))
    }

    /// Set members, sorted
    pub fn members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.with(|db| match db.set(key)? {
            Some(set) => Ok(set.iter().cloned().collect()),
            None => Err(StoreError::KeyNotFound),
        })
    }

    pub fn is_member(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        self.with(|db| match db.set(key)? {
            Some(set) => Ok(set.contains(member)),
            None => Err(StoreError::KeyNotFound),
        })
    }

    /// Human readable listing of every key and its contents
    ///
    /// Each key is printed as `- key`, followed by one indented, quoted
    /// line per element.
    pub fn dump(&self) -> String {
        self.with(|db| {
            let mut out = String::new();
            for (key, value) in db.entries() {
                out.push_str(&format!("- {key}\n"));
                let elements: Box<dyn Iterator<Item = &String>> = match value {
                    Value::List(list) => Box::new(list.iter()),
                    Value::Set(set) => Box::new(set.iter()),
                };
                for element in elements {
                    out.push_str(DUMP_INDENT);
                    out.push_str(&dump_element(element));
                    out.push('\n');
                }
            }
            out
        })
    }
}

fn dump_element(element: &str) -> String {
    let len = element.chars().count();
    if len <= DUMP_MAX_LEN {
        return format!("{element:?}");
    }
    let suffix = format!("...({len})");
    let head: String = element.chars().take(DUMP_MAX_LEN - suffix.len()).collect();
    format!("{head:?}{suffix}")
}
