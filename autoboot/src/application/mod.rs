//! Application Layer - Use case orchestration
//!
//! Coordinates the domain components and the platform to run a boot attempt.

pub mod boot_orchestrator;

pub use boot_orchestrator::{BootOrchestrator, BootOutcome, Launch};
