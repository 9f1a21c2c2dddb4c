//! Command line arguments and search settings

use crate::error::{ConfigError, Result};
use crate::score::Ranking;
use clap::Parser;

/// Highest meaningful leading-zero target for a 256-bit key.
pub const MAX_TARGET_BITS: u32 = 256;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Search for Yggdrasil keys with rare addresses", long_about = None)]
pub struct CliArgs {
    /// Number of worker threads (0 = one per logical CPU)
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub threads: usize,

    /// Maximum execution time in seconds (0 = no limit)
    #[arg(short = 'T', long, value_name = "SEC", default_value_t = 0)]
    pub timeout: u64,

    /// Enable verbose output with additional statistics
    #[arg(short, long)]
    pub verbose: bool,

    /// Search for zero blocks in the IPv6 address
    #[arg(long)]
    pub ipv6_nice: bool,

    /// Stop once the public key has this many leading zero bits (0 = no target)
    #[arg(short = 'z', long, value_name = "BITS", default_value_t = 0)]
    pub target_zeros: u32,
}

/// Immutable search settings, shared read-only by every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub worker_count: usize,
    /// Seconds; 0 = unlimited.
    pub max_duration: u64,
    pub verbose: bool,
    pub ranking: Ranking,
    /// Leading zero bits; 0 = unlimited.
    pub target_leading_zeros: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            max_duration: 0,
            verbose: false,
            ranking: Ranking::KeyBits,
            target_leading_zeros: 0,
        }
    }
}

impl Settings {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        if args.target_zeros > MAX_TARGET_BITS {
            return Err(ConfigError::TargetOutOfRange(args.target_zeros).into());
        }

        let worker_count = if args.threads == 0 {
            num_cpus::get()
        } else {
            args.threads
        };

        Ok(Self {
            worker_count,
            max_duration: args.timeout,
            verbose: args.verbose,
            ranking: Ranking::from_address_quality(args.ipv6_nice),
            target_leading_zeros: args.target_zeros,
        })
    }
}
