//! Command-line argument definitions.

use attest_core::{Address, AttributeTypeId, AttributeValue};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "attest")]
#[command(about = "Attest - attribute registry operator tool", long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (.toml or .json); built-in defaults when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Registry state file, overriding the configured `state_path`
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,
}

/// Which hat to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Hat {
    /// Join the whitehats
    Whitehats,
    /// Join the blackhats
    Blackhats,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List the attribute type catalog
    Types,

    /// Attribute type id at a catalog index
    TypeId {
        /// Ordinal index (negative indices are out of range)
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Check whether a subject holds an attribute
    Has {
        /// Subject address
        subject: Address,
        /// Attribute type id
        attribute_type: AttributeTypeId,
    },

    /// Print the value of a held attribute
    Value {
        /// Subject address
        subject: Address,
        /// Attribute type id
        attribute_type: AttributeTypeId,
    },

    /// Print the whitehat and blackhat counters
    Totals,

    /// Print a subject's hat state and every attribution it holds
    Show {
        /// Subject address
        subject: Address,
    },

    /// Enroll the caller into a hat
    Join {
        /// Hat to join
        hat: Hat,
        /// Caller address
        #[arg(long = "as")]
        caller: Address,
    },

    /// Issue an attribute as the designated issuer
    Issue {
        /// Subject address
        subject: Address,
        /// Attribute type id
        attribute_type: AttributeTypeId,
        /// Attribute value
        value: AttributeValue,
        /// Caller address
        #[arg(long = "as")]
        caller: Address,
    },

    /// Revoke an attribute as the designated issuer
    Revoke {
        /// Subject address
        subject: Address,
        /// Attribute type id
        attribute_type: AttributeTypeId,
        /// Caller address
        #[arg(long = "as")]
        caller: Address,
    },

    /// Print the fact journal as JSON lines
    Facts {
        /// Only facts after this sequence number
        #[arg(long, default_value_t = 0)]
        since: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join() {
        let cli = Cli::try_parse_from([
            "attest",
            "join",
            "blackhats",
            "--as",
            "0x0202020202020202020202020202020202020202",
        ])
        .unwrap();
        match cli.command {
            Commands::Join { hat, caller } => {
                assert_eq!(hat, Hat::Blackhats);
                assert_eq!(caller, Address::from_seed(2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_index() {
        let cli = Cli::try_parse_from(["attest", "type-id", "-1"]).unwrap();
        assert!(matches!(cli.command, Commands::TypeId { index: -1 }));
    }

    #[test]
    fn test_rejects_bad_address() {
        assert!(Cli::try_parse_from(["attest", "has", "0x12", "8008"]).is_err());
    }
}
