//! Autoboot API - Core types and collaborator interfaces
//!
//! This crate provides the types and abstractions shared between the boot
//! orchestration core and the platform bindings that back it. The core never
//! talks to the console firmware directly; every account, volume and launch
//! primitive is reached through one of the narrow traits defined here.
//!
//! # Architecture
//!
//! - **Core**: Slot numbers, title identifiers, account records, launch flags
//! - **Error**: Common error type and helpers for collaborator failures
//! - **Interfaces**: Collaborator traits (accounts, volumes, launchers)
//!
//! # Usage
//!
//! ```rust
//! use autoboot_api::TitleId;
//!
//! let title = TitleId::from_hex("0x0005001010040100").unwrap();
//! assert_eq!(title.as_u64(), 0x0005_0010_1004_0100);
//! assert!(TitleId::from_hex("not-hex").is_err());
//! ```

#![no_std]

extern crate alloc;

// Core modules
pub mod core;
pub mod error;
pub mod interfaces;

// Re-export commonly used types
pub use crate::core::types::*;
pub use crate::error::{Error, Result};
pub use crate::interfaces::*;
