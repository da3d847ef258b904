//! Command dispatcher
//!
//! Routes incoming requests to the appropriate command. Shared by every
//! connection; per-connection state travels in the `Session` each call
//! passes in.

use crate::commands::{CommandContext, CommandRegistry};
use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::store::Store;
use crate::transaction::Session;
use std::sync::Arc;
use tracing::{debug, warn};

/// Command dispatcher
///
/// Looks up the verb, enforces arity, counts the command and runs it.
pub struct Dispatcher {
    registry: CommandRegistry,
    store: Arc<Store>,
}

impl Dispatcher {
    pub fn new(store: Arc<Store>) -> Self {
        Dispatcher {
            registry: CommandRegistry::new(),
            store,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatch one request: the verb followed by its arguments
    ///
    /// Unknown verbs and arity errors mark the session dirty, so they also
    /// abort an open transaction.
    pub fn dispatch(&self, session: &mut Session, request: Vec<String>) -> RespValue {
        let Some((name, args)) = request.split_first() else {
            return RespValue::error("ERR empty command");
        };
        self.store.record_command();
        debug!(command = %name, args = args.len(), db = session.selected_db(), "dispatching");

        let Some(command) = self.registry.get(name) else {
            warn!(command = %name, "unknown command");
            session.mark_dirty();
            return CommandError::UnknownCommand(name.clone()).into();
        };

        let too_many = command.max_args().is_some_and(|max| args.len() > max);
        if args.len() < command.min_args() || too_many {
            session.mark_dirty();
            return CommandError::wrong_args(name).into();
        }

        let mut ctx = CommandContext::new(&self.store, session);
        command.execute(&mut ctx, args)
    }
}
