//! Core types shared by the boot core and the platform bindings

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use bitflags::bitflags;
use core::fmt;
use static_assertions::{assert_eq_size, const_assert};

use crate::error::{Error, Result};

/// Account slot number
pub type SlotNo = u8;

/// Number of account slots probed during enumeration (slots `0..SLOT_COUNT`)
pub const SLOT_COUNT: SlotNo = 13;

/// Display name used when an account's name cannot be retrieved
pub const UNKNOWN_ACCOUNT_NAME: &str = "[UNKNOWN]";

/// High-order word of every legacy title identifier
pub const LEGACY_TITLE_PREFIX: u32 = 0x0001_0001;

const_assert!(SLOT_COUNT <= 16);

/// 64-bit title identifier
///
/// Zero is reserved: it means "no specific title", and the launch step
/// interprets it as "fall back to the menu".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TitleId(u64);

assert_eq_size!(TitleId, u64);

impl TitleId {
    /// The "not found / boot the menu" sentinel
    pub const NONE: TitleId = TitleId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Combine a high-order prefix with a probed low-order value
    pub const fn from_parts(high: u32, low: u32) -> Self {
        Self(((high as u64) << 32) | low as u64)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    pub const fn high(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub const fn low(self) -> u32 {
        self.0 as u32
    }

    /// Parse a hexadecimal identifier, with or without a `0x` prefix.
    ///
    /// Anything that is not 1 to 16 hex digits is rejected; identifiers are
    /// never truncated.
    pub fn from_hex(text: &str) -> Result<Self> {
        parse_hex_u64(text, 16).map(Self)
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::LowerHex for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<TitleId> for u64 {
    fn from(title: TitleId) -> Self {
        title.0
    }
}

/// Trims whitespace and removes one `0x` or `0X` prefix
fn strip_hex_prefix(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

fn parse_hex_u64(text: &str, max_digits: usize) -> Result<u64> {
    let digits = strip_hex_prefix(text);

    if digits.is_empty() || digits.len() > max_digits {
        return Err(Error::ParseError(format!(
            "expected 1 to {} hex digits, got {:?}",
            max_digits, text
        )));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::ParseError(format!("not a hex identifier: {:?}", text)));
    }

    u64::from_str_radix(digits, 16).map_err(|e| Error::ParseError(format!("{}: {}", text, e)))
}

/// Ordered-list entry for legacy title resolution
///
/// Holds the low-order half of a legacy title identifier, written as exactly
/// eight hex digits (an optional `0x` prefix is accepted and stripped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct LegacyCandidate(u32);

impl LegacyCandidate {
    pub const fn new(low: u32) -> Self {
        Self(low)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let digits = strip_hex_prefix(text);
        if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::ParseError(format!(
                "legacy candidate must be 8 hex digits, got {:?}",
                text
            )));
        }
        u32::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|e| Error::ParseError(format!("{}: {}", text, e)))
    }

    pub const fn low(self) -> u32 {
        self.0
    }

    /// Full title identifier for this candidate under `prefix`
    pub const fn title_id(self, prefix: u32) -> TitleId {
        TitleId::from_parts(prefix, self.0)
    }
}

impl fmt::Display for LegacyCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl TryFrom<String> for LegacyCandidate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LegacyCandidate> for String {
    fn from(candidate: LegacyCandidate) -> Self {
        format!("{}", candidate)
    }
}

/// Known system applications reachable through the identifier lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SystemAppId {
    HomeMenu = 0,
    SystemSettings = 1,
    ParentalControls = 2,
    UserSettings = 3,
    MiiMaker = 4,
    AccountSettings = 5,
    DailyLog = 6,
    Notifications = 7,
    HealthAndSafety = 8,
    ElectronicManual = 9,
    WiiUChat = 10,
    SoftwareDataTransfer = 11,
}

impl SystemAppId {
    pub fn from_raw(raw: u64) -> Option<Self> {
        let app = match raw {
            0 => Self::HomeMenu,
            1 => Self::SystemSettings,
            2 => Self::ParentalControls,
            3 => Self::UserSettings,
            4 => Self::MiiMaker,
            5 => Self::AccountSettings,
            6 => Self::DailyLog,
            7 => Self::Notifications,
            8 => Self::HealthAndSafety,
            9 => Self::ElectronicManual,
            10 => Self::WiiUChat,
            11 => Self::SoftwareDataTransfer,
            _ => return None,
        };
        Some(app)
    }

    pub const fn as_raw(self) -> u64 {
        self as u64
    }
}

/// Avatar image blob returned by the account store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarImage {
    pub data: Vec<u8>,
    /// Size reported by the account store, may be smaller than the buffer
    pub size: u32,
}

/// One occupied account slot as seen during a selection pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub slot: SlotNo,
    pub display_name: String,
    pub is_network_linked: bool,
    /// Present only for network-linked accounts
    pub network_account_id: Option<String>,
    pub avatar: Option<AvatarImage>,
}

impl AccountRecord {
    /// Local account with a display name and no avatar
    pub fn new(slot: SlotNo, display_name: &str) -> Self {
        Self {
            slot,
            display_name: String::from(display_name),
            is_network_linked: false,
            network_account_id: None,
            avatar: None,
        }
    }

    /// Record whose name could not be read
    pub fn unnamed(slot: SlotNo) -> Self {
        Self::new(slot, UNKNOWN_ACCOUNT_NAME)
    }

    pub fn with_network_account(mut self, account_id: &str) -> Self {
        self.is_network_linked = true;
        self.network_account_id = Some(String::from(account_id));
        self
    }

    pub fn with_avatar(mut self, avatar: AvatarImage) -> Self {
        self.avatar = Some(avatar);
        self
    }

    pub fn has_known_name(&self) -> bool {
        self.display_name != UNKNOWN_ACCOUNT_NAME
    }
}

/// Native menu launch variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuVariant {
    /// Plain menu boot using the configured default account
    Native,
    /// Menu boot that runs the guided account check for the given slot
    NativeAccountSetup(SlotNo),
}

bitflags! {
    /// Flags passed along with a native title launch
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LaunchFlags: u32 {
        /// Skip the normal splash screen
        const NO_SPLASH = 0b0000_0001;
        /// Pass the standard argument block
        const STD_ARGS  = 0b0000_0010;
    }
}

/// Display routing for legacy-mode launches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenType {
    Both,
    Drc,
    Tv,
}

/// Identifies a storage volume and where it gets mounted
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeSpec {
    pub device: String,
    pub mount_path: String,
}

impl VolumeSpec {
    pub fn new(device: &str, mount_path: &str) -> Self {
        Self {
            device: String::from(device),
            mount_path: String::from(mount_path),
        }
    }
}

/// A mounted volume; handed back to [`crate::VolumeService::unmount`]
#[derive(Debug, PartialEq, Eq)]
pub struct MountHandle {
    pub id: u32,
    pub mount_path: String,
}

impl MountHandle {
    pub fn new(id: u32, mount_path: &str) -> Self {
        Self {
            id,
            mount_path: String::from(mount_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_id_from_parts() {
        let title = TitleId::from_parts(LEGACY_TITLE_PREFIX, 0x4f48_4243);
        assert_eq!(title.as_u64(), 0x0001_0001_4f48_4243);
        assert_eq!(title.high(), LEGACY_TITLE_PREFIX);
        assert_eq!(title.low(), 0x4f48_4243);
    }

    #[test]
    fn test_title_id_rejects_overlong_input() {
        assert!(TitleId::from_hex("00050010100401000").is_err());
        assert!(TitleId::from_hex("").is_err());
        assert!(TitleId::from_hex("0x").is_err());
        assert!(TitleId::from_hex("12g4").is_err());
    }

    #[test]
    fn test_legacy_candidate_parse() {
        assert_eq!(LegacyCandidate::parse("4f484243").unwrap().low(), 0x4f48_4243);
        assert_eq!(LegacyCandidate::parse("0x4c554c5a").unwrap().low(), 0x4c55_4c5a);
        assert!(LegacyCandidate::parse("484243").is_err());
        assert!(LegacyCandidate::parse("4f48424z").is_err());
        assert!(LegacyCandidate::parse("0X123456").is_err());
        assert!(LegacyCandidate::parse("0x0x123456").is_err());
        assert_eq!(LegacyCandidate::parse("0X4C554C5A").unwrap().low(), 0x4c55_4c5a);
    }

    #[test]
    fn test_system_app_id_round_trip() {
        assert_eq!(SystemAppId::from_raw(4), Some(SystemAppId::MiiMaker));
        assert_eq!(SystemAppId::MiiMaker.as_raw(), 4);
        assert_eq!(SystemAppId::from_raw(12), None);
    }
}
