//! Attest CLI Library
//!
//! Argument definitions and command handlers for the `attest` binary. The
//! binary only parses arguments, installs logging, and prints handler output.

pub mod cli;
pub mod handlers;

pub use cli::{Cli, Commands, Hat};
pub use handlers::{dispatch, exit_code, CliOutput, HandlerContext, StateLock};
