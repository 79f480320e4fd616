//! Log formatting errors

use thiserror::Error;

/// Errors raised by `KeyValueLogger` and its message types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// Level name is not one of `debug`, `info`, `warn`, `error`
    #[error("unknown log level '{0}', expected one of [debug, info, warn, error]")]
    InvalidSeverity(String),

    /// Message is neither a scalar nor a structured record
    #[error("unsupported message type: {0}")]
    UnsupportedMessageType(String),
}

pub type LogResult<T> = Result<T, LogError>;
