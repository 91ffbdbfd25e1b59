//! Boot targets
//!
//! The classification of what the orchestrator is asked to boot into. Intent
//! strings are parsed up front; a malformed title identifier is rejected here
//! instead of being truncated into some other title.

use alloc::string::{String, ToString};
use autoboot_api::{SystemAppId, TitleId};
use core::fmt;

use crate::error::{BootError, Result};

/// Legacy volume resolution path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyCategory {
    /// Compatibility menu, never resolves a specific title
    Menu,
    /// Loader title probed from the candidate list
    Loader,
}

/// What to boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootTarget {
    NativeMenu,
    /// Native system application, identified by its raw lookup value
    NativeTitle(u64),
    /// Homebrew launcher, reached through the Mii Maker system application
    HomebrewLauncher,
    LegacyMenu,
    LegacyLoader,
}

impl BootTarget {
    /// Native title from a hex identifier, with or without `0x`
    pub fn native_title(hex: &str) -> Result<Self> {
        TitleId::from_hex(hex)
            .map(|id| BootTarget::NativeTitle(id.as_u64()))
            .map_err(|e| BootError::InvalidTitleId(e.to_string()))
    }

    pub fn system_app(app: SystemAppId) -> Self {
        BootTarget::NativeTitle(app.as_raw())
    }

    /// Parse a boot intent.
    ///
    /// Accepted forms: `native-menu` (`wiiu-menu`), `homebrew-launcher`,
    /// `legacy-menu` (`vwii-menu`), `legacy-loader` (`homebrew-channel`) and
    /// `title:<hex>`.
    pub fn parse(intent: &str) -> Result<Self> {
        let intent = intent.trim();
        if let Some(hex) = intent.strip_prefix("title:") {
            return Self::native_title(hex);
        }

        match intent {
            "native-menu" | "wiiu-menu" => Ok(BootTarget::NativeMenu),
            "homebrew-launcher" => Ok(BootTarget::HomebrewLauncher),
            "legacy-menu" | "vwii-menu" => Ok(BootTarget::LegacyMenu),
            "legacy-loader" | "homebrew-channel" => Ok(BootTarget::LegacyLoader),
            _ => Err(BootError::InvalidBootTarget(String::from(intent))),
        }
    }

    /// Resolution path for legacy targets
    pub fn legacy_category(&self) -> Option<LegacyCategory> {
        match self {
            BootTarget::LegacyMenu => Some(LegacyCategory::Menu),
            BootTarget::LegacyLoader => Some(LegacyCategory::Loader),
            _ => None,
        }
    }

    /// Raw system application identifier for native title targets
    pub fn system_app_raw(&self) -> Option<u64> {
        match self {
            BootTarget::NativeTitle(raw) => Some(*raw),
            BootTarget::HomebrewLauncher => Some(SystemAppId::MiiMaker.as_raw()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BootTarget::NativeMenu => "native-menu",
            BootTarget::NativeTitle(_) => "native-title",
            BootTarget::HomebrewLauncher => "homebrew-launcher",
            BootTarget::LegacyMenu => "legacy-menu",
            BootTarget::LegacyLoader => "legacy-loader",
        }
    }
}

impl fmt::Display for BootTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootTarget::NativeTitle(raw) => write!(f, "{}({:#x})", self.name(), raw),
            _ => f.write_str(self.name()),
        }
    }
}
