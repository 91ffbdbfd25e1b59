//! Boot Orchestrator - Runs one boot attempt end to end
//!
//! Composes the domain components into the boot procedures:
//! 1. Native menu (plain, or guided account check when no default exists)
//! 2. Native title (account selection, identifier lookup, no-splash launch)
//! 3. Legacy menu (compatibility prep, menu launch)
//! 4. Legacy loader (compatibility prep, candidate resolution, title or menu)
//!
//! A failing step is logged and recorded, and the attempt moves on to the
//! next-safer target. Nothing is returned to the caller as an error; the
//! [`BootOutcome`] says what was launched and what went wrong on the way.

use alloc::vec::Vec;
use autoboot_api::{ConsolePlatform, LaunchFlags, MenuVariant, SlotNo, TitleId};
use core::fmt;

use crate::domain::account_selection::{AccountSelector, AccountSession};
use crate::domain::boot_config::BootConfig;
use crate::domain::boot_target::{BootTarget, LegacyCategory};
use crate::domain::compatibility::prepare_compatibility;
use crate::error::BootError;

/// Flags used for every native title launch
pub const NATIVE_TITLE_FLAGS: LaunchFlags = LaunchFlags::NO_SPLASH.union(LaunchFlags::STD_ARGS);

/// The launch call that ended a boot attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    NativeMenu,
    NativeAccountSetup(SlotNo),
    NativeTitle(TitleId),
    LegacyMenu,
    LegacyTitle(TitleId),
}

impl fmt::Display for Launch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Launch::NativeMenu => f.write_str("native menu"),
            Launch::NativeAccountSetup(slot) => write!(f, "native menu (account check, slot {})", slot),
            Launch::NativeTitle(title) => write!(f, "native title {}", title),
            Launch::LegacyMenu => f.write_str("legacy menu"),
            Launch::LegacyTitle(title) => write!(f, "legacy title {}", title),
        }
    }
}

/// Result of one boot attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootOutcome {
    pub target: BootTarget,
    /// Launch that succeeded, `None` only if every fallback failed
    pub launched: Option<Launch>,
    /// Account loaded by the selection step
    pub selected_slot: Option<SlotNo>,
    /// Failures absorbed along the way, in order
    pub errors: Vec<BootError>,
}

impl BootOutcome {
    fn new(target: BootTarget) -> Self {
        Self {
            target,
            launched: None,
            selected_slot: None,
            errors: Vec::new(),
        }
    }

    pub fn is_launched(&self) -> bool {
        self.launched.is_some()
    }

    /// Whether something other than a clean launch of the target happened
    pub fn fell_back(&self) -> bool {
        !self.errors.is_empty()
    }

    fn record(&mut self, error: BootError) {
        if error.is_recoverable() {
            log::warn!("{}", error);
        } else {
            log::error!("{}", error);
        }
        self.errors.push(error);
    }
}

/// Boot Orchestrator
///
/// Owns the platform for the duration of the attempt. The platform is
/// handed back with [`BootOrchestrator::into_platform`] so host callers can
/// inspect it.
pub struct BootOrchestrator<P: ConsolePlatform> {
    platform: P,
    config: BootConfig,
}

impl<P: ConsolePlatform> BootOrchestrator<P> {
    pub fn new(platform: P, config: BootConfig) -> Self {
        Self { platform, config }
    }

    pub fn with_default_config(platform: P) -> Self {
        Self::new(platform, BootConfig::default())
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    /// Run one boot attempt for `target`
    pub fn boot(&mut self, target: BootTarget) -> BootOutcome {
        log::info!("Boot target: {}", target);
        let mut outcome = BootOutcome::new(target);

        match (target.legacy_category(), target.system_app_raw()) {
            (Some(category), _) => self.boot_legacy(category, &mut outcome),
            (None, Some(raw)) => self.boot_native_title(raw, &mut outcome),
            (None, None) => self.boot_native_menu(&mut outcome),
        }

        match outcome.launched {
            Some(launch) => log::info!("Launched {}", launch),
            None => outcome.record(BootError::NoLaunchPossible),
        }
        outcome
    }

    fn boot_native_menu(&mut self, outcome: &mut BootOutcome) {
        let variant = match AccountSession::acquire(&mut self.platform) {
            Ok(mut session) => {
                let current = session.current_slot();
                match session.default_account() {
                    Some(_) => MenuVariant::Native,
                    None => MenuVariant::NativeAccountSetup(current),
                }
            }
            Err(e) => {
                outcome.record(e);
                MenuVariant::Native
            }
        };

        match self.platform.launch_menu(variant) {
            Ok(()) => {
                outcome.launched = Some(match variant {
                    MenuVariant::Native => Launch::NativeMenu,
                    MenuVariant::NativeAccountSetup(slot) => Launch::NativeAccountSetup(slot),
                });
            }
            Err(e) => outcome.record(BootError::LaunchFailed(alloc::format!("{:?}: {}", variant, e))),
        }
    }

    fn boot_native_title(&mut self, raw: u64, outcome: &mut BootOutcome) {
        match AccountSelector::run(&mut self.platform) {
            Ok(slot) => outcome.selected_slot = slot,
            Err(e) => outcome.record(e),
        }

        let title = self.platform.resolve(raw);
        if title.is_none() {
            outcome.record(BootError::TitleLookupFailed(raw));
            return self.boot_native_menu(outcome);
        }

        log::debug!("Launching native title {}", title);
        match self.platform.launch_title(title, NATIVE_TITLE_FLAGS) {
            Ok(()) => outcome.launched = Some(Launch::NativeTitle(title)),
            Err(e) => {
                outcome.record(BootError::launch_failed(title, &e));
                self.boot_native_menu(outcome);
            }
        }
    }

    fn boot_legacy(&mut self, category: LegacyCategory, outcome: &mut BootOutcome) {
        prepare_compatibility(&mut self.platform);

        let title = self.config.legacy_resolver().resolve(&mut self.platform, category);
        if title.is_none() {
            if category == LegacyCategory::Loader {
                log::info!("No legacy loader installed, launching legacy menu");
            }
            return self.launch_legacy_menu(outcome);
        }

        log::debug!("Launching legacy title {}", title);
        match self.platform.launch_legacy_title(title) {
            Ok(()) => outcome.launched = Some(Launch::LegacyTitle(title)),
            Err(e) => {
                outcome.record(BootError::launch_failed(title, &e));
                self.launch_legacy_menu(outcome);
            }
        }
    }

    fn launch_legacy_menu(&mut self, outcome: &mut BootOutcome) {
        match self.platform.launch_legacy_menu() {
            Ok(()) => outcome.launched = Some(Launch::LegacyMenu),
            Err(e) => {
                outcome.record(BootError::LaunchFailed(alloc::format!("legacy menu: {}", e)));
                self.boot_native_menu(outcome);
            }
        }
    }
}
