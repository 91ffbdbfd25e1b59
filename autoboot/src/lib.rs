//! Autoboot Library - Console boot orchestration
//!
//! Decides and executes what a console boots into: the native menu, a native
//! system title, the legacy-compatibility menu or a legacy loader title.
//! Platform primitives are reached through the traits in `autoboot_api`.

#![no_std]

extern crate alloc;

// ============================================================================
// MODULE HIERARCHY
// ============================================================================

/// Domain layer - Boot targets, configuration, account selection, legacy resolution
pub mod domain;

/// Application layer - Boot procedure orchestration
pub mod application;

/// Infrastructure layer - In-memory platform used on the host
pub mod infrastructure;

/// Diagnostics - Buffered boot log behind the `log` facade
pub mod diagnostics;

/// Utility library - Command line parsing
pub mod utils;

/// Orchestration-level error type
pub mod error;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use application::boot_orchestrator::{BootOrchestrator, BootOutcome, Launch};
pub use domain::account_selection::{AccountSession, AccountSelector};
pub use domain::boot_config::BootConfig;
pub use domain::boot_target::{BootTarget, LegacyCategory};
pub use domain::legacy_resolver::LegacyVolumeResolver;
pub use error::{BootError, Result};
