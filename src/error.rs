//! Error types
//!
//! `StoreError` is what the embedding API hands back to host code.
//! `CommandError` is what a client sees: its `Display` text is the exact
//! error line written on the wire.

use thiserror::Error;

/// Errors returned by the direct (network-bypassing) store API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("ERR no such key")]
    KeyNotFound,

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
}

/// Errors produced while validating or executing a client command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(String),

    #[error("ERR syntax error")]
    Syntax,

    #[error("ERR value is not an integer or out of range")]
    InvalidInteger,

    #[error("ERR value is not a valid float")]
    InvalidFloat,

    #[error("ERR invalid cursor")]
    InvalidCursor,

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR no such key")]
    NoSuchKey,

    #[error("NOAUTH Authentication required.")]
    AuthRequired,

    #[error("ERR invalid password")]
    InvalidPassword,

    #[error("ERR Client sent AUTH, but no password is set")]
    NoPasswordSet,

    #[error("ERR MULTI calls can not be nested")]
    NestedMulti,

    #[error("ERR EXEC without MULTI")]
    ExecWithoutMulti,

    #[error("ERR DISCARD without MULTI")]
    DiscardWithoutMulti,

    #[error("ERR WATCH inside MULTI is not allowed")]
    WatchInsideMulti,

    #[error("EXECABORT Transaction discarded because of previous errors.")]
    ExecAbort,

    #[error("ERR source and destination objects are the same")]
    SameObject,

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),
}

impl CommandError {
    /// Arity error for `cmd`, named in lowercase the way the server reports it
    pub fn wrong_args(cmd: &str) -> Self {
        CommandError::WrongNumberOfArguments(cmd.to_lowercase())
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::KeyNotFound => CommandError::NoSuchKey,
            StoreError::WrongType => CommandError::WrongType,
        }
    }
}
