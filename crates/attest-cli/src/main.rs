//! Attest command-line interface
//!
//! Inspect and drive an attribute registry persisted in a JSON state file.

use anyhow::{Context, Result};
use attest_cli::{dispatch, exit_code, Cli, HandlerContext};
use attest_core::AttestConfig;
use attest_registry::RegistryConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RegistryConfig::load(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("failed to load config {}", path.display()),
            None => "invalid configuration".to_string(),
        })?;

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_writer(std::io::stderr)
        .init();

    let ctx = HandlerContext::new(config, cli.state.clone());
    match dispatch(&ctx, &cli.command) {
        Ok(output) => {
            if !output.lines().is_empty() {
                println!("{}", output.render());
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(exit_code(&err));
        }
    }
}
