//! Collaborator interfaces
//!
//! Each trait wraps one family of platform primitives. Implementations bind
//! to the console firmware on target and to in-memory doubles on the host.
//! Launch methods return `Result<()>` so host doubles can report what was
//! launched; firmware-backed implementations transfer control on success and
//! never return.

use alloc::string::String;
use alloc::vec::Vec;

use crate::core::types::{
    AccountRecord, AvatarImage, LaunchFlags, MenuVariant, MountHandle, SLOT_COUNT, ScreenType,
    SlotNo, TitleId, UNKNOWN_ACCOUNT_NAME, VolumeSpec,
};
use crate::error::Result;

/// Account database primitives
///
/// Every query must be bracketed by [`AccountStore::initialize`] and
/// [`AccountStore::finalize`].
pub trait AccountStore {
    /// Opens the account subsystem
    fn initialize(&mut self) -> Result<()>;

    /// Closes the account subsystem
    fn finalize(&mut self);

    fn is_slot_occupied(&mut self, slot: SlotNo) -> bool;

    fn mii_name(&mut self, slot: SlotNo) -> Result<String>;

    fn is_network_account(&mut self, slot: SlotNo) -> bool;

    fn network_account_id(&mut self, slot: SlotNo) -> Result<String>;

    fn mii_image(&mut self, slot: SlotNo) -> Result<AvatarImage>;

    /// Slot configured as the default account, if any
    fn default_account(&mut self) -> Option<SlotNo>;

    /// Slot of the account currently active on the console
    fn current_slot(&mut self) -> SlotNo;

    /// Loads `slot` as the active console account
    fn load_active(&mut self, slot: SlotNo) -> Result<()>;

    fn has_default_account(&mut self) -> bool {
        self.default_account().is_some()
    }

    /// Builds a record for every occupied slot, in slot order.
    ///
    /// Name and avatar failures are absorbed: the record keeps the
    /// [`UNKNOWN_ACCOUNT_NAME`] sentinel or an empty avatar and stays in the
    /// list.
    fn enumerate_occupied_slots(&mut self) -> Vec<AccountRecord> {
        let mut records = Vec::new();
        for slot in 0..SLOT_COUNT {
            if !self.is_slot_occupied(slot) {
                continue;
            }

            let display_name = self
                .mii_name(slot)
                .unwrap_or_else(|_| String::from(UNKNOWN_ACCOUNT_NAME));
            let is_network_linked = self.is_network_account(slot);
            let network_account_id = if is_network_linked {
                self.network_account_id(slot).ok()
            } else {
                None
            };

            records.push(AccountRecord {
                slot,
                display_name,
                is_network_linked,
                network_account_id,
                avatar: self.mii_image(slot).ok(),
            });
        }
        records
    }
}

/// Interactive account picker
pub trait InteractiveSelector {
    /// Blocks until the user picks one of `accounts` and returns its slot.
    ///
    /// Never called with an empty list.
    fn choose(&mut self, accounts: &[AccountRecord]) -> SlotNo;
}

/// Volume mount and lookup primitives
pub trait VolumeService {
    fn mount(&mut self, volume: &VolumeSpec) -> Result<MountHandle>;

    fn unmount(&mut self, handle: MountHandle);

    /// Stat-style existence check for `path` on a mounted volume
    fn stat_exists(&mut self, handle: &MountHandle, path: &str) -> bool;
}

/// Native menu and title launch primitives
pub trait TitleLauncher {
    fn launch_menu(&mut self, variant: MenuVariant) -> Result<()>;

    fn launch_title(&mut self, title: TitleId, flags: LaunchFlags) -> Result<()>;
}

/// Maps a raw system application identifier to a launchable title
pub trait SystemIdentifierLookup {
    /// Returns [`TitleId::NONE`] when the identifier is unknown
    fn resolve(&mut self, raw: u64) -> TitleId;
}

/// Legacy-compatibility mode primitives
pub trait CompatibilityLayer {
    /// Controller subsystem bring-up required before any legacy launch
    fn init_controllers(&mut self);

    fn set_screen_type(&mut self, screen: ScreenType);

    /// Whether the current screen type is usable
    fn screen_state_ok(&mut self) -> bool;

    fn launch_legacy_menu(&mut self) -> Result<()>;

    fn launch_legacy_title(&mut self, title: TitleId) -> Result<()>;
}

/// Everything the boot orchestrator needs from the platform
pub trait ConsolePlatform:
    AccountStore
    + InteractiveSelector
    + VolumeService
    + TitleLauncher
    + SystemIdentifierLookup
    + CompatibilityLayer
{
}

impl<T> ConsolePlatform for T where
    T: AccountStore
        + InteractiveSelector
        + VolumeService
        + TitleLauncher
        + SystemIdentifierLookup
        + CompatibilityLayer
{
}
