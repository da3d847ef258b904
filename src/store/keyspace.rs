//! Storage for one numbered database

use super::value::{KeyType, Value};
use crate::error::StoreError;
use rand::seq::IteratorRandom;
use siphasher::sip::SipHasher13;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::hash::BuildHasherDefault;

/// Type alias for our hash map with SipHasher
type KeyMap<V> = HashMap<String, V, BuildHasherDefault<SipHasher13>>;

/// One database's keys, their typed values, and their mutation versions
///
/// A key is present iff it has an entry. Versions outlive the entries they
/// count: deleting a key bumps its version instead of forgetting it, so a
/// WATCH snapshot taken before a delete never matches a later re-create.
///
/// Callers reach a keyspace through the locked store state, so nothing here
/// synchronizes.
#[derive(Debug, Default)]
pub struct Keyspace {
    entries: KeyMap<Value>,
    versions: KeyMap<u64>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key exists
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the type of a key, if present
    pub fn key_type(&self, key: &str) -> Option<KeyType> {
        self.entries.get(key).map(Value::key_type)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current version of a key; 0 if it was never touched
    pub fn version(&self, key: &str) -> u64 {
        self.versions.get(key).copied().unwrap_or(0)
    }

    fn touch(&mut self, key: &str) {
        *self.versions.entry(key.to_string()).or_insert(0) += 1;
    }

    /// All keys, sorted
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// A uniformly chosen key, or None when empty
    pub fn random_key(&self) -> Option<String> {
        self.entries.keys().choose(&mut rand::thread_rng()).cloned()
    }

    /// Delete a key, returns true if the key existed
    pub fn del(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_none() {
            return false;
        }
        self.touch(key);
        true
    }

    /// Move a key into `target`
    ///
    /// Returns false without touching either side when the key is absent
    /// here or already present in `target`.
    pub fn move_to(&mut self, key: &str, target: &mut Keyspace) -> bool {
        if target.exists(key) {
            return false;
        }
        let Some(value) = self.entries.remove(key) else {
            return false;
        };
        self.touch(key);
        target.entries.insert(key.to_string(), value);
        target.touch(key);
        true
    }

    /// Rename `from` to `to`, replacing whatever `to` held
    ///
    /// Renaming a key onto itself leaves it untouched.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let Some(value) = self.entries.remove(from) else {
            return;
        };
        self.entries.insert(to.to_string(), value);
        self.touch(to);
        self.touch(from);
    }

    /// Remove every key
    pub fn flush(&mut self) {
        let keys: Vec<String> = self.entries.drain().map(|(key, _)| key).collect();
        for key in keys {
            self.touch(&key);
        }
    }

    /// Snapshot of every entry, sorted by key
    pub fn entries(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    // Lists

    /// Borrow a list, None when the key is absent
    pub fn list(&self, key: &str) -> Result<Option<&VecDeque<String>>, StoreError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(value) => value.as_list().map(Some).ok_or(StoreError::WrongType),
        }
    }

    /// Get the list at `key`, creating it if absent
    fn list_mut(&mut self, key: &str) -> Result<&mut VecDeque<String>, StoreError> {
        self.entries
            .entry(key.to_string())
            .or_insert_with(Value::empty_list)
            .as_list_mut()
            .ok_or(StoreError::WrongType)
    }

    /// Push each value onto the head of the list, in order
    ///
    /// Returns the new length.
    pub fn lpush<I>(&mut self, key: &str, values: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = String>,
    {
        self.push_with(key, values, VecDeque::push_front)
    }

    /// Append each value to the tail of the list
    ///
    /// Returns the new length.
    pub fn rpush<I>(&mut self, key: &str, values: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = String>,
    {
        self.push_with(key, values, VecDeque::push_back)
    }

    fn push_with<I>(
        &mut self,
        key: &str,
        values: I,
        push: fn(&mut VecDeque<String>, String),
    ) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return self.llen(key);
        }
        let list = self.list_mut(key)?;
        for value in values {
            push(list, value);
        }
        let len = list.len();
        self.touch(key);
        Ok(len)
    }

    /// Remove and return the first element
    pub fn lpop(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        self.pop_with(key, VecDeque::pop_front)
    }

    /// Remove and return the last element
    pub fn rpop(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        self.pop_with(key, VecDeque::pop_back)
    }

    fn pop_with(
        &mut self,
        key: &str,
        pop: fn(&mut VecDeque<String>) -> Option<String>,
    ) -> Result<Option<String>, StoreError> {
        let Some(value) = self.entries.get_mut(key) else {
            return Ok(None);
        };
        let list = value.as_list_mut().ok_or(StoreError::WrongType)?;
        let popped = pop(list);
        if list.is_empty() {
            self.entries.remove(key);
        }
        if popped.is_some() {
            self.touch(key);
        }
        Ok(popped)
    }

    /// Length of a list, 0 when absent
    pub fn llen(&self, key: &str) -> Result<usize, StoreError> {
        Ok(self.list(key)?.map_or(0, VecDeque::len))
    }

    /// Elements between `start` and `stop`, both inclusive
    ///
    /// Negative indexes count from the tail; out of range indexes are clamped.
    pub fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError> {
        let Some(list) = self.list(key)? else {
            return Ok(Vec::new());
        };
        let len = list.len() as i64;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
        if start > stop || start >= len {
            return Ok(Vec::new());
        }
        Ok(list
            .range(start as usize..=stop as usize)
            .cloned()
            .collect())
    }

    // Sets

    /// Borrow a set, None when the key is absent
    pub fn set(&self, key: &str) -> Result<Option<&BTreeSet<String>>, StoreError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(value) => value.as_set().map(Some).ok_or(StoreError::WrongType),
        }
    }

    /// Add members, returns how many were not already present
    pub fn sadd<I>(&mut self, key: &str, members: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut members = members.into_iter().peekable();
        if members.peek().is_none() {
            self.set(key)?;
            return Ok(0);
        }
        let set = self
            .entries
            .entry(key.to_string())
            .or_insert_with(Value::empty_set)
            .as_set_mut()
            .ok_or(StoreError::WrongType)?;
        let added = members.filter(|member| set.insert(member.clone())).count();
        self.touch(key);
        Ok(added)
    }

    /// Remove members, returns how many were present
    ///
    /// The key is deleted once its set is empty.
    pub fn srem<'m, I>(&mut self, key: &str, members: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = &'m String>,
    {
        let Some(value) = self.entries.get_mut(key) else {
            return Ok(0);
        };
        let set = value.as_set_mut().ok_or(StoreError::WrongType)?;
        let removed = members.into_iter().filter(|member| set.remove(*member)).count();
        if set.is_empty() {
            self.entries.remove(key);
        }
        self.touch(key);
        Ok(removed)
    }

    /// Members of a set, sorted; empty when absent
    pub fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .set(key)?
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    pub fn sismember(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        Ok(self.set(key)?.is_some_and(|set| set.contains(member)))
    }

    pub fn scard(&self, key: &str) -> Result<usize, StoreError> {
        Ok(self.set(key)?.map_or(0, BTreeSet::len))
    }

    /// Overwrite `key` with `members`, whatever it held before
    ///
    /// An empty set deletes the key.
    pub fn set_replace(&mut self, key: &str, members: BTreeSet<String>) {
        if members.is_empty() {
            self.del(key);
            return;
        }
        self.entries.insert(key.to_string(), Value::Set(members));
        self.touch(key);
    }

    /// Members of the first set not present in any of the others
    pub fn sdiff(&self, keys: &[String]) -> Result<BTreeSet<String>, StoreError> {
        let Some((first, rest)) = keys.split_first() else {
            return Ok(BTreeSet::new());
        };
        let mut result = self.set(first)?.cloned().unwrap_or_default();
        for key in rest {
            if let Some(other) = self.set(key)? {
                result.retain(|member| !other.contains(member));
            }
        }
        Ok(result)
    }

    /// Members present in every set
    ///
    /// Only the first key is type checked. Later keys that hold another type
    /// are skipped rather than narrowing the result; missing keys count as
    /// empty sets.
    pub fn sinter(&self, keys: &[String]) -> Result<BTreeSet<String>, StoreError> {
        let Some((first, rest)) = keys.split_first() else {
            return Ok(BTreeSet::new());
        };
        let mut result = self.set(first)?.cloned().unwrap_or_default();
        for key in rest {
            match self.entries.get(key) {
                None => result.clear(),
                Some(Value::Set(other)) => result.retain(|member| other.contains(member)),
                Some(_) => {}
            }
        }
        Ok(result)
    }

    /// Members present in any of the sets
    pub fn sunion(&self, keys: &[String]) -> Result<BTreeSet<String>, StoreError> {
        let mut result = BTreeSet::new();
        for key in keys {
            if let Some(set) = self.set(key)? {
                result.extend(set.iter().cloned());
            }
        }
        Ok(result)
    }
}
