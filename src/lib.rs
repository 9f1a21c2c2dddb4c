//! yggdrasil-keyminer - parallel search for Yggdrasil keys with rare addresses
//!
//! Workers walk ed25519 seeds by incrementing a random starting point,
//! derive the 128-bit mesh address of each public key and score it either
//! by leading zero bits of the key or by the longest zero-group run in the
//! address. A coordinator merges worker results into one global best and
//! stops on a time limit, a quality target or external cancellation.

pub mod address;
pub mod channel;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod keys;
pub mod report;
pub mod score;
pub mod seed;
pub mod worker;

pub use address::Address;
pub use channel::ResultChannel;
pub use config::{CliArgs, Settings};
pub use coordinator::{Coordinator, SearchOutcome, Snapshot, StopHandle, StopReason};
pub use error::{ConfigError, KeyError, Result, SearchError};
pub use keys::{KeyPair, PublicKey, SecretKey};
pub use report::{ConsoleReporter, Reporter};
pub use score::{Candidate, Ranking};
pub use seed::Seed;
