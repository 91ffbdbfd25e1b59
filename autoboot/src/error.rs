//! Boot orchestration error handling
//!
//! Errors raised while parsing a boot intent or configuration, and the
//! failures the orchestrator records when a step falls back to a safer
//! target.

use alloc::string::String;
use autoboot_api::{SlotNo, TitleId};
use core::fmt;

/// Boot orchestration error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootError {
    /// Boot intent could not be parsed
    InvalidBootTarget(String),
    /// Title identifier is not valid hex
    InvalidTitleId(String),
    /// Configuration value rejected
    InvalidConfig(String),

    /// Account subsystem could not be opened
    AccountSubsystemUnavailable(String),
    /// Selected account could not be made active
    AccountLoadFailed(SlotNo),

    /// System application identifier has no launchable title
    TitleLookupFailed(u64),

    /// A launch primitive returned instead of transferring control
    LaunchFailed(String),
    /// Every fallback launch failed
    NoLaunchPossible,

    /// Logger could not be installed
    LoggerInitFailed,
}

impl BootError {
    /// Convert to an error code suitable for reporting
    pub fn as_error_code(&self) -> u32 {
        match self {
            BootError::InvalidBootTarget(_) => 0x1000,
            BootError::InvalidTitleId(_) => 0x1001,
            BootError::InvalidConfig(_) => 0x1002,
            BootError::AccountSubsystemUnavailable(_) => 0x2000,
            BootError::AccountLoadFailed(slot) => 0x2100 + *slot as u32,
            BootError::TitleLookupFailed(_) => 0x3001,
            BootError::LaunchFailed(_) => 0x4000,
            BootError::NoLaunchPossible => 0x4001,
            BootError::LoggerInitFailed => 0x5000,
        }
    }

    /// Get a human-readable description of the error
    pub fn description(&self) -> &'static str {
        match self {
            BootError::InvalidBootTarget(_) => "Invalid boot target",
            BootError::InvalidTitleId(_) => "Invalid title identifier",
            BootError::InvalidConfig(_) => "Invalid boot configuration",
            BootError::AccountSubsystemUnavailable(_) => "Account subsystem unavailable",
            BootError::AccountLoadFailed(_) => "Failed to load account",
            BootError::TitleLookupFailed(_) => "System title lookup failed",
            BootError::LaunchFailed(_) => "Launch failed",
            BootError::NoLaunchPossible => "No launch possible",
            BootError::LoggerInitFailed => "Logger initialization failed",
        }
    }

    /// Whether the boot can continue on a safer target after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            BootError::NoLaunchPossible
                | BootError::InvalidBootTarget(_)
                | BootError::InvalidTitleId(_)
                | BootError::InvalidConfig(_)
        )
    }

    pub fn launch_failed(title: TitleId, error: &autoboot_api::Error) -> Self {
        BootError::LaunchFailed(alloc::format!("{}: {}", title, error))
    }
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BootError: {} (code: {:#x})", self.description(), self.as_error_code())?;
        match self {
            BootError::InvalidBootTarget(detail)
            | BootError::InvalidTitleId(detail)
            | BootError::InvalidConfig(detail)
            | BootError::AccountSubsystemUnavailable(detail)
            | BootError::LaunchFailed(detail) => write!(f, ": {}", detail),
            BootError::AccountLoadFailed(slot) => write!(f, ": slot {}", slot),
            BootError::TitleLookupFailed(raw) => write!(f, ": {:#x}", raw),
            _ => Ok(()),
        }
    }
}

impl core::error::Error for BootError {}

/// Result type for boot orchestration
pub type Result<T> = core::result::Result<T, BootError>;
