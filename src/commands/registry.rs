//! Command registry
//!
//! Centralized registry for all available commands.

use super::{admin, connection, key, list, search, set, transaction, Command};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all available commands, keyed by uppercase name
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a new command registry and register all commands
    pub fn new() -> Self {
        let mut registry = CommandRegistry {
            commands: HashMap::new(),
        };

        // Connection
        registry.register(Arc::new(connection::PingCommand));
        registry.register(Arc::new(connection::EchoCommand));
        registry.register(Arc::new(connection::AuthCommand));
        registry.register(Arc::new(connection::SelectCommand));
        registry.register(Arc::new(connection::QuitCommand));

        // Generic keys
        registry.register(Arc::new(key::DelCommand));
        registry.register(Arc::new(key::ExistsCommand));
        registry.register(Arc::new(key::TypeCommand));
        registry.register(Arc::new(key::MoveCommand));
        registry.register(Arc::new(key::RandomKeyCommand));
        registry.register(Arc::new(key::RenameCommand));
        registry.register(Arc::new(key::RenameNxCommand));
        registry.register(Arc::new(search::KeysCommand));
        registry.register(Arc::new(search::ScanCommand));

        // Transactions
        registry.register(Arc::new(transaction::MultiCommand));
        registry.register(Arc::new(transaction::ExecCommand));
        registry.register(Arc::new(transaction::DiscardCommand));
        registry.register(Arc::new(transaction::WatchCommand));
        registry.register(Arc::new(transaction::UnwatchCommand));

        // Lists
        registry.register(Arc::new(list::LPushCommand));
        registry.register(Arc::new(list::RPushCommand));
        registry.register(Arc::new(list::LPopCommand));
        registry.register(Arc::new(list::RPopCommand));
        registry.register(Arc::new(list::LLenCommand));
        registry.register(Arc::new(list::LRangeCommand));

        // Sets
        registry.register(Arc::new(set::SAddCommand));
        registry.register(Arc::new(set::SRemCommand));
        registry.register(Arc::new(set::SMembersCommand));
        registry.register(Arc::new(set::SIsMemberCommand));
        registry.register(Arc::new(set::SCardCommand));
        registry.register(Arc::new(set::SDiffCommand));
        registry.register(Arc::new(set::SInterCommand));
        registry.register(Arc::new(set::SUnionCommand));

        // Server
        registry.register(Arc::new(admin::FlushDbCommand));
        registry.register(Arc::new(admin::FlushAllCommand));

        registry
    }

    fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().to_uppercase();
        self.commands.insert(name, command);
    }

    /// Get a command by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(&name.to_uppercase()).cloned()
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_uppercase())
    }

    /// All command names, sorted
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = CommandRegistry::new();
        assert!(registry.has_command("lpush"));
        assert!(registry.has_command("SiNtEr"));
        assert!(!registry.has_command("GET"));
        assert_eq!(registry.get("renamenx").map(|c| c.name()), Some("RENAMENX"));
    }

    #[test]
    fn test_full_surface_registered() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.command_names().len(), 35);
    }
}
