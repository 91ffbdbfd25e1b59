//! Infrastructure Layer - Platform implementations
//!
//! The firmware bindings live outside this crate; what is here is the
//! in-memory console used by the host binary and the test suites.

pub mod simulated;

pub use simulated::{ConsoleEvent, SimulatedConsole};
