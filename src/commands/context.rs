//! Command execution context

use super::Op;
use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::store::Store;
use crate::transaction::Session;

/// Context provided to commands during execution
///
/// Pairs the shared store with the calling connection's session.
pub struct CommandContext<'a> {
    pub store: &'a Store,
    pub session: &'a mut Session,
}

impl<'a> CommandContext<'a> {
    pub fn new(store: &'a Store, session: &'a mut Session) -> Self {
        CommandContext { store, session }
    }

    /// Reply with a validation error
    ///
    /// Marks the session dirty, so an open transaction will abort on EXEC.
    pub fn reject(&mut self, err: CommandError) -> RespValue {
        self.session.mark_dirty();
        err.into()
    }

    /// Fail unless the session may run commands
    pub fn authorize(&self) -> Result<(), CommandError> {
        if self.store.lock().requires_auth() && !self.session.is_authenticated() {
            return Err(CommandError::AuthRequired);
        }
        Ok(())
    }

    /// Execute `op` now, or queue it when a transaction is open
    pub fn run_or_queue(&mut self, op: Op) -> RespValue {
        if self.session.in_transaction() {
            self.session.enqueue(op);
            return RespValue::simple_string("QUEUED");
        }
        let mut state = self.store.lock();
        op.execute(&mut state, self.session.selected_db())
    }

    /// Check auth, then execute or queue `op`
    pub fn run(&mut self, op: Op) -> RespValue {
        match self.authorize() {
            Ok(()) => self.run_or_queue(op),
            Err(err) => err.into(),
        }
    }
}
