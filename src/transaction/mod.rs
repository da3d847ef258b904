//! Optimistic transactions
//!
//! A session is NORMAL until MULTI, then QUEUING until EXEC or DISCARD.
//! WATCH snapshots key versions; EXEC refuses to run the queue if any
//! watched key has changed since. Conflict checking and execution happen
//! under one hold of the store lock, so nothing can slip in between.

mod session;

pub use session::{Session, WatchKey};

use crate::commands::Op;
use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::store::{Store, StoreState};
use tracing::debug;

impl Session {
    /// MULTI: start queuing
    pub fn multi(&mut self) -> Result<(), CommandError> {
        if self.in_transaction() {
            return Err(CommandError::NestedMulti);
        }
        self.transaction = Some(Vec::new());
        self.dirty = false;
        Ok(())
    }

    /// WATCH: snapshot the current version of each key
    ///
    /// Keys are watched in the selected database. Watching the same key
    /// again refreshes its snapshot.
    pub fn watch(&mut self, state: &StoreState, keys: &[String]) -> Result<(), CommandError> {
        if self.in_transaction() {
            return Err(CommandError::WatchInsideMulti);
        }
        for key in keys {
            let version = state.version(self.selected_db, key);
            self.watch.insert((self.selected_db, key.clone()), version);
        }
        Ok(())
    }

    /// UNWATCH: forget every watched key
    pub fn unwatch(&mut self) {
        self.watch.clear();
    }

    /// Append a validated op to the open transaction
    pub fn enqueue(&mut self, op: Op) {
        if let Some(queue) = self.transaction.as_mut() {
            queue.push(op);
        }
    }

    /// DISCARD: drop the queue and the watch set
    pub fn discard(&mut self) -> Result<(), CommandError> {
        if self.transaction.take().is_none() {
            return Err(CommandError::DiscardWithoutMulti);
        }
        self.end_transaction();
        Ok(())
    }

    fn end_transaction(&mut self) {
        self.transaction = None;
        self.dirty = false;
        self.watch.clear();
    }

    /// EXEC: run the queue unless it was poisoned or a watched key changed
    ///
    /// A poisoned queue is an EXECABORT error. A watch conflict is an empty
    /// array and nothing runs. Otherwise the reply holds one element per
    /// queued op. The session is back to NORMAL with no watches in every
    /// case except EXEC without MULTI.
    pub fn exec(&mut self, store: &Store) -> Result<RespValue, CommandError> {
        let Some(queue) = self.transaction.take() else {
            return Err(CommandError::ExecWithoutMulti);
        };
        let dirty = self.dirty;
        let watched = std::mem::take(&mut self.watch);
        self.end_transaction();

        if dirty {
            debug!(queued = queue.len(), "transaction aborted by earlier errors");
            return Err(CommandError::ExecAbort);
        }

        let mut state = store.lock();
        let conflict = watched
            .iter()
            .any(|((db, key), version)| state.version(*db, key) != *version);
        if conflict {
            debug!(watched = watched.len(), "watched key changed, transaction not run");
            return Ok(RespValue::array(Vec::new()));
        }

        debug!(queued = queue.len(), "executing transaction");
        let replies = queue
            .iter()
            .map(|op| op.execute(&mut state, self.selected_db))
            .collect();
        Ok(RespValue::array(replies))
    }
}
