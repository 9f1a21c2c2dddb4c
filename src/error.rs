//! Error types for the key miner
//!
//! The search itself is pure computation, so the taxonomy is small:
//! - configuration values out of range
//! - malformed hex when parsing seeds or keys (standalone `KeyError`)
//! - failure to start a worker thread

use thiserror::Error;

/// Top-level error type for the library
#[derive(Error, Debug)]
pub enum SearchError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A worker thread could not be spawned
    #[error("Failed to spawn worker {id}: {source}")]
    Spawn {
        id: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Target of {0} leading zero bits is impossible for a 256-bit key")]
    TargetOutOfRange(u32),
}

/// Hex parsing of seeds and keys
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyError {
    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// Result type alias using SearchError
pub type Result<T> = std::result::Result<T, SearchError>;
