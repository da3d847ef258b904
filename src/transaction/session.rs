//! Per-connection state

use crate::commands::Op;
use std::collections::HashMap;

/// A watched key: database id and key name
pub type WatchKey = (i64, String);

/// State one client connection carries between commands
///
/// Owned by the connection task and dropped with it, taking any queued
/// transaction and watch set along.
#[derive(Debug, Default)]
pub struct Session {
    pub(super) selected_db: i64,
    pub(super) authenticated: bool,
    /// None while NORMAL, the queued ops while QUEUING
    pub(super) transaction: Option<Vec<Op>>,
    /// A command failed validation since MULTI
    pub(super) dirty: bool,
    pub(super) watch: HashMap<WatchKey, u64>,
    pub(super) closing: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Database this connection addresses
    pub fn selected_db(&self) -> i64 {
        self.selected_db
    }

    pub fn select(&mut self, db: i64) {
        self.selected_db = db;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn authenticate(&mut self) {
        self.authenticated = true;
    }

    /// Whether MULTI was issued and not yet ended
    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Record a failed command; poisons an open transaction
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Ops queued since MULTI
    pub fn queued(&self) -> &[Op] {
        self.transaction.as_deref().unwrap_or_default()
    }

    /// Number of watched keys
    pub fn watch_count(&self) -> usize {
        self.watch.len()
    }

    /// Ask the connection to close after the current reply
    pub fn request_close(&mut self) {
        self.closing = true;
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }
}
