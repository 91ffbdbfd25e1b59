//! Simulated console
//!
//! In-memory implementation of every platform trait. Accounts, volume
//! contents and failure modes are set up with builder methods; each
//! primitive call is appended to an event journal that tests and the host
//! binary inspect afterwards.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use autoboot_api::error::{account_error, launch_error, not_found, volume_error};
use autoboot_api::{
    AccountRecord, AccountStore, AvatarImage, CompatibilityLayer, InteractiveSelector,
    LaunchFlags, LegacyCandidate, MenuVariant, MountHandle, ScreenType, SlotNo,
    SystemIdentifierLookup, SystemAppId, TitleId, TitleLauncher, VolumeService, VolumeSpec,
};
use hashbrown::HashSet;

use crate::domain::boot_config::BootConfig;
use crate::domain::legacy_resolver::legacy_content_path;

/// Base of the synthetic system title identifiers
pub const SYSTEM_TITLE_BASE: u64 = 0x0005_0010_1000_0000;

/// Primitive calls recorded by [`SimulatedConsole`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    AccountsOpened,
    AccountsClosed,
    SelectorShown(Vec<SlotNo>),
    AccountLoaded(SlotNo),
    VolumeMounted(String),
    VolumeUnmounted(String),
    ControllersInitialized,
    ScreenTypeSet(ScreenType),
    MenuLaunched(MenuVariant),
    TitleLaunched(TitleId, LaunchFlags),
    LegacyMenuLaunched,
    LegacyTitleLaunched(TitleId),
}

impl ConsoleEvent {
    pub fn is_launch(&self) -> bool {
        matches!(
            self,
            ConsoleEvent::MenuLaunched(_)
                | ConsoleEvent::TitleLaunched(_, _)
                | ConsoleEvent::LegacyMenuLaunched
                | ConsoleEvent::LegacyTitleLaunched(_)
        )
    }
}

#[derive(Debug, Clone)]
struct SimulatedAccount {
    name: Option<String>,
    network_id: Option<String>,
    avatar: Option<AvatarImage>,
}

/// Console double backed by in-memory state
#[derive(Debug, Clone)]
pub struct SimulatedConsole {
    accounts: BTreeMap<SlotNo, SimulatedAccount>,
    default_account: Option<SlotNo>,
    current_slot: SlotNo,
    choice: Option<SlotNo>,
    accounts_available: bool,
    accounts_open: u32,
    load_fails: bool,

    files: HashSet<String>,
    mountable: bool,
    next_mount_id: u32,
    mounted: u32,

    accepted_screens: Vec<ScreenType>,
    screen: Option<ScreenType>,
    controller_inits: u32,

    menu_fails: bool,
    title_fails: bool,
    legacy_menu_fails: bool,

    events: Vec<ConsoleEvent>,
}

impl Default for SimulatedConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedConsole {
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
            default_account: None,
            current_slot: 1,
            choice: None,
            accounts_available: true,
            accounts_open: 0,
            load_fails: false,
            files: HashSet::new(),
            mountable: true,
            next_mount_id: 1,
            mounted: 0,
            accepted_screens: [ScreenType::Both, ScreenType::Drc, ScreenType::Tv].to_vec(),
            screen: None,
            controller_inits: 0,
            menu_fails: false,
            title_fails: false,
            legacy_menu_fails: false,
            events: Vec::new(),
        }
    }

    /// Title identifier the simulated lookup returns for `raw`
    pub fn system_title(raw: u64) -> TitleId {
        TitleId::new(SYSTEM_TITLE_BASE | (raw << 8))
    }

    pub fn with_account(mut self, slot: SlotNo, name: &str) -> Self {
        self.insert_account(slot, Some(name.to_string()), None);
        self
    }

    /// Occupied slot whose name query fails
    pub fn with_unnamed_account(mut self, slot: SlotNo) -> Self {
        self.insert_account(slot, None, None);
        self
    }

    pub fn with_network_account(mut self, slot: SlotNo, name: &str, account_id: &str) -> Self {
        self.insert_account(slot, Some(name.to_string()), Some(account_id.to_string()));
        self
    }

    pub fn with_avatar(mut self, slot: SlotNo, avatar: AvatarImage) -> Self {
        if let Some(account) = self.accounts.get_mut(&slot) {
            account.avatar = Some(avatar);
        }
        self
    }

    pub fn with_default_account(mut self, slot: SlotNo) -> Self {
        self.default_account = Some(slot);
        self
    }

    pub fn with_current_slot(mut self, slot: SlotNo) -> Self {
        self.current_slot = slot;
        self
    }

    /// Slot the interactive selector answers with; the first listed slot
    /// otherwise
    pub fn with_choice(mut self, slot: SlotNo) -> Self {
        self.choice = Some(slot);
        self
    }

    pub fn with_account_subsystem_unavailable(mut self) -> Self {
        self.accounts_available = false;
        self
    }

    pub fn with_failing_account_load(mut self) -> Self {
        self.load_fails = true;
        self
    }

    /// Place the content file for `candidate` where `config` will look
    pub fn with_legacy_title(mut self, config: &BootConfig, candidate: LegacyCandidate) -> Self {
        self.files.insert(legacy_content_path(
            &config.legacy_volume.mount_path,
            config.legacy_prefix,
            candidate,
        ));
        self
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.files.insert(path.to_string());
        self
    }

    pub fn with_unmountable_volume(mut self) -> Self {
        self.mountable = false;
        self
    }

    /// Screen types for which the screen state check succeeds
    pub fn with_screen_support(mut self, screens: &[ScreenType]) -> Self {
        self.accepted_screens = screens.to_vec();
        self
    }

    pub fn with_failing_menus(mut self) -> Self {
        self.menu_fails = true;
        self.legacy_menu_fails = true;
        self
    }

    pub fn with_failing_title_launches(mut self) -> Self {
        self.title_fails = true;
        self
    }

    pub fn with_failing_legacy_menu(mut self) -> Self {
        self.legacy_menu_fails = true;
        self
    }

    pub fn events(&self) -> &[ConsoleEvent] {
        &self.events
    }

    /// Successful launch events, in order
    pub fn launches(&self) -> Vec<ConsoleEvent> {
        self.events.iter().filter(|e| e.is_launch()).cloned().collect()
    }

    /// Account sessions opened and not yet finalized
    pub fn open_account_sessions(&self) -> u32 {
        self.accounts_open
    }

    /// Volumes currently mounted
    pub fn mounted_volumes(&self) -> u32 {
        self.mounted
    }

    pub fn mount_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ConsoleEvent::VolumeMounted(_)))
            .count()
    }

    pub fn controller_inits(&self) -> u32 {
        self.controller_inits
    }

    pub fn screen_type(&self) -> Option<ScreenType> {
        self.screen
    }

    fn insert_account(&mut self, slot: SlotNo, name: Option<String>, network_id: Option<String>) {
        self.accounts.insert(
            slot,
            SimulatedAccount {
                name,
                network_id,
                avatar: None,
            },
        );
    }

    fn account(&self, slot: SlotNo) -> autoboot_api::Result<&SimulatedAccount> {
        self.accounts
            .get(&slot)
            .ok_or_else(|| account_error("slot not occupied"))
    }
}

impl AccountStore for SimulatedConsole {
    fn initialize(&mut self) -> autoboot_api::Result<()> {
        if !self.accounts_available {
            return Err(account_error("account subsystem unavailable"));
        }
        self.accounts_open += 1;
        self.events.push(ConsoleEvent::AccountsOpened);
        Ok(())
    }

    fn finalize(&mut self) {
        self.accounts_open = self.accounts_open.saturating_sub(1);
        self.events.push(ConsoleEvent::AccountsClosed);
    }

    fn is_slot_occupied(&mut self, slot: SlotNo) -> bool {
        self.accounts.contains_key(&slot)
    }

    fn mii_name(&mut self, slot: SlotNo) -> autoboot_api::Result<String> {
        self.account(slot)?
            .name
            .clone()
            .ok_or_else(|| account_error("mii name unavailable"))
    }

    fn is_network_account(&mut self, slot: SlotNo) -> bool {
        self.accounts
            .get(&slot)
            .is_some_and(|account| account.network_id.is_some())
    }

    fn network_account_id(&mut self, slot: SlotNo) -> autoboot_api::Result<String> {
        self.account(slot)?
            .network_id
            .clone()
            .ok_or_else(|| account_error("not a network account"))
    }

    fn mii_image(&mut self, slot: SlotNo) -> autoboot_api::Result<AvatarImage> {
        self.account(slot)?
            .avatar
            .clone()
            .ok_or_else(|| not_found("mii image"))
    }

    fn default_account(&mut self) -> Option<SlotNo> {
        self.default_account
    }

    fn current_slot(&mut self) -> SlotNo {
        self.current_slot
    }

    fn load_active(&mut self, slot: SlotNo) -> autoboot_api::Result<()> {
        if self.load_fails || !self.accounts.contains_key(&slot) {
            return Err(account_error("load rejected"));
        }
        self.current_slot = slot;
        self.events.push(ConsoleEvent::AccountLoaded(slot));
        Ok(())
    }
}

impl InteractiveSelector for SimulatedConsole {
    fn choose(&mut self, accounts: &[AccountRecord]) -> SlotNo {
        self.events.push(ConsoleEvent::SelectorShown(
            accounts.iter().map(|account| account.slot).collect(),
        ));
        match self.choice {
            Some(slot) => slot,
            None => accounts.first().map(|account| account.slot).unwrap_or_default(),
        }
    }
}

impl VolumeService for SimulatedConsole {
    fn mount(&mut self, volume: &VolumeSpec) -> autoboot_api::Result<MountHandle> {
        if !self.mountable {
            return Err(volume_error("mount failed"));
        }
        let handle = MountHandle::new(self.next_mount_id, &volume.mount_path);
        self.next_mount_id += 1;
        self.mounted += 1;
        self.events.push(ConsoleEvent::VolumeMounted(volume.device.clone()));
        Ok(handle)
    }

    fn unmount(&mut self, handle: MountHandle) {
        self.mounted = self.mounted.saturating_sub(1);
        self.events.push(ConsoleEvent::VolumeUnmounted(handle.mount_path));
    }

    fn stat_exists(&mut self, _handle: &MountHandle, path: &str) -> bool {
        self.files.contains(path)
    }
}

impl TitleLauncher for SimulatedConsole {
    fn launch_menu(&mut self, variant: MenuVariant) -> autoboot_api::Result<()> {
        if self.menu_fails {
            return Err(launch_error("menu launch failed"));
        }
        self.events.push(ConsoleEvent::MenuLaunched(variant));
        Ok(())
    }

    fn launch_title(&mut self, title: TitleId, flags: LaunchFlags) -> autoboot_api::Result<()> {
        if self.title_fails {
            return Err(launch_error("title launch failed"));
        }
        self.events.push(ConsoleEvent::TitleLaunched(title, flags));
        Ok(())
    }
}

impl SystemIdentifierLookup for SimulatedConsole {
    fn resolve(&mut self, raw: u64) -> TitleId {
        match SystemAppId::from_raw(raw) {
            Some(app) => Self::system_title(app.as_raw()),
            None => TitleId::NONE,
        }
    }
}

impl CompatibilityLayer for SimulatedConsole {
    fn init_controllers(&mut self) {
        self.controller_inits += 1;
        self.events.push(ConsoleEvent::ControllersInitialized);
    }

    fn set_screen_type(&mut self, screen: ScreenType) {
        self.screen = Some(screen);
        self.events.push(ConsoleEvent::ScreenTypeSet(screen));
    }

    fn screen_state_ok(&mut self) -> bool {
        self.screen
            .is_some_and(|screen| self.accepted_screens.contains(&screen))
    }

    fn launch_legacy_menu(&mut self) -> autoboot_api::Result<()> {
        if self.legacy_menu_fails {
            return Err(launch_error("legacy menu launch failed"));
        }
        self.events.push(ConsoleEvent::LegacyMenuLaunched);
        Ok(())
    }

    fn launch_legacy_title(&mut self, title: TitleId) -> autoboot_api::Result<()> {
        if self.title_fails {
            return Err(launch_error("legacy title launch failed"));
        }
        self.events.push(ConsoleEvent::LegacyTitleLaunched(title));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_uses_fallback_name() {
        let mut console = SimulatedConsole::new()
            .with_network_account(3, "Alice", "alice01")
            .with_unnamed_account(7);

        console.initialize().unwrap();
        let records = console.enumerate_occupied_slots();
        console.finalize();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].network_account_id.as_deref(), Some("alice01"));
        assert!(!records[1].has_known_name());
        assert_eq!(console.open_account_sessions(), 0);
    }

    #[test]
    fn test_unknown_system_app_has_no_title() {
        let mut console = SimulatedConsole::new();
        assert!(console.resolve(0x99).is_none());
        assert_eq!(
            console.resolve(SystemAppId::MiiMaker.as_raw()),
            SimulatedConsole::system_title(4)
        );
    }

    #[test]
    fn test_mount_bookkeeping() {
        let mut console = SimulatedConsole::new();
        let legacy_volume = BootConfig::default().legacy_volume;
        let handle = console.mount(&legacy_volume).unwrap();
        assert_eq!(console.mounted_volumes(), 1);
        console.unmount(handle);
        assert_eq!(console.mounted_volumes(), 0);
        assert_eq!(console.mount_count(), 1);
    }
}
