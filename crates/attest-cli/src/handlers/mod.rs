//! # CLI Command Handlers
//!
//! Handlers sit between argument parsing and the registry:
//!
//! ```text
//! CLI Args → Handlers → AttributeRegistry → RegistrySnapshot (state file)
//! ```
//!
//! Every handler takes a `HandlerContext` and returns a `CliOutput` instead of
//! printing, so command behavior is testable without a process boundary.
//! Mutating handlers hold an exclusive lock on `<state>.lock` for their whole
//! load-change-save cycle and save the state file only when the registry
//! accepted the change.

pub mod mutate;
pub mod query;

use crate::cli::Commands;
use attest_core::{AttestError, AttestResult};
use attest_registry::{AttributeRegistry, RegistryConfig, RegistrySnapshot};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Buffered command output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOutput {
    lines: Vec<String>,
}

impl CliOutput {
    /// Empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn println(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with newlines.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Configuration and state location shared by all handlers.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    config: RegistryConfig,
    state_path: PathBuf,
}

impl HandlerContext {
    /// Context over `config`, with `state_override` replacing the configured state path.
    pub fn new(config: RegistryConfig, state_override: Option<PathBuf>) -> Self {
        let state_path = state_override.unwrap_or_else(|| config.state_path.clone());
        Self { config, state_path }
    }

    /// Effective configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// State file location.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Load the registry from the state file, or build a fresh one from config.
    ///
    /// A catalog never changes once a registry exists, so a stored catalog that
    /// differs from the configured one is `Invalid`.
    pub fn load_registry(&self) -> AttestResult<AttributeRegistry> {
        if !self.state_path.exists() {
            info!(path = %self.state_path.display(), "no state file, starting a fresh registry");
            return self.config.build_registry();
        }

        let registry = RegistrySnapshot::load_json(&self.state_path)?.restore()?;
        if registry.catalog().iter().ne(self.config.attribute_types.iter()) {
            warn!(
                path = %self.state_path.display(),
                "stored catalog differs from configuration"
            );
            return Err(AttestError::invalid(format!(
                "catalog stored in {} differs from the configured attribute types",
                self.state_path.display()
            )));
        }
        Ok(registry)
    }

    /// Take the exclusive state lock, blocking until other writers release it.
    pub fn lock_state(&self) -> AttestResult<StateLock> {
        let path = self.state_path.with_extension("lock");
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AttestError::storage(format!(
                    "failed to create state directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| AttestError::storage(format!("failed to open {}: {e}", path.display())))?;
        file.lock_exclusive()
            .map_err(|e| AttestError::storage(format!("failed to lock {}: {e}", path.display())))?;
        debug!(path = %path.display(), "state lock acquired");
        Ok(StateLock { file })
    }

    /// Persist `registry` to the state file.
    pub fn save_registry(&self, registry: &AttributeRegistry) -> AttestResult<()> {
        registry.snapshot().save_json(&self.state_path)
    }
}

/// Exclusive hold on the state lock file, released on drop.
#[derive(Debug)]
pub struct StateLock {
    file: File,
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Run one command.
pub fn dispatch(ctx: &HandlerContext, command: &Commands) -> AttestResult<CliOutput> {
    match command {
        Commands::Types => query::handle_types(ctx),
        Commands::TypeId { index } => query::handle_type_id(ctx, *index),
        Commands::Has {
            subject,
            attribute_type,
        } => query::handle_has(ctx, *subject, *attribute_type),
        Commands::Value {
            subject,
            attribute_type,
        } => query::handle_value(ctx, *subject, *attribute_type),
        Commands::Totals => query::handle_totals(ctx),
        Commands::Show { subject } => query::handle_show(ctx, *subject),
        Commands::Facts { since } => query::handle_facts(ctx, *since),
        Commands::Join { hat, caller } => mutate::handle_join(ctx, *hat, *caller),
        Commands::Issue {
            subject,
            attribute_type,
            value,
            caller,
        } => mutate::handle_issue(ctx, *subject, *attribute_type, *value, *caller),
        Commands::Revoke {
            subject,
            attribute_type,
            caller,
        } => mutate::handle_revoke(ctx, *subject, *attribute_type, *caller),
    }
}

/// Exit code for an error; 0 is success.
pub fn exit_code(err: &AttestError) -> i32 {
    match err {
        AttestError::OutOfRange { .. } | AttestError::NotFound { .. } => 2,
        AttestError::Unauthorized { .. } => 3,
        AttestError::Invalid { .. } => 4,
        AttestError::Storage { .. } | AttestError::Serialization { .. } => 5,
    }
}
