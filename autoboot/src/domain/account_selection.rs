//! Account selection
//!
//! Runs before a native title launch. When no default account is configured
//! the user picks one of the occupied slots, and the pick is loaded as the
//! active console account. All account queries happen inside an
//! [`AccountSession`], which finalizes the account subsystem on drop.

use alloc::string::ToString;
use autoboot_api::{AccountRecord, AccountStore, InteractiveSelector, SlotNo};
use core::ops::{Deref, DerefMut};

use crate::error::{BootError, Result};

/// Scoped account subsystem access; finalizes on drop
pub struct AccountSession<'s, S: AccountStore + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: AccountStore + ?Sized> AccountSession<'s, S> {
    pub fn acquire(store: &'s mut S) -> Result<Self> {
        store
            .initialize()
            .map_err(|e| BootError::AccountSubsystemUnavailable(e.to_string()))?;
        Ok(Self { store })
    }
}

impl<S: AccountStore + ?Sized> Deref for AccountSession<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.store
    }
}

impl<S: AccountStore + ?Sized> DerefMut for AccountSession<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.store
    }
}

impl<S: AccountStore + ?Sized> Drop for AccountSession<'_, S> {
    fn drop(&mut self) {
        self.store.finalize();
    }
}

/// Account selection policy
pub struct AccountSelector;

impl AccountSelector {
    /// Decide which slot becomes active.
    ///
    /// `None` when a default account is configured or there is nothing to
    /// choose from. Otherwise the chooser is asked, and the answer is always
    /// one of the listed slots.
    pub fn select_account<C: InteractiveSelector + ?Sized>(
        accounts: &[AccountRecord],
        has_default: bool,
        chooser: &mut C,
    ) -> Option<SlotNo> {
        if has_default {
            return None;
        }
        let first = accounts.first()?;

        let chosen = chooser.choose(accounts);
        if accounts.iter().any(|account| account.slot == chosen) {
            Some(chosen)
        } else {
            log::warn!(
                "Selector returned unlisted slot {}, using slot {}",
                chosen,
                first.slot
            );
            Some(first.slot)
        }
    }

    /// Full selection step: query, prompt if needed, load the chosen slot.
    ///
    /// Returns the slot that was loaded, if any.
    pub fn run<P>(platform: &mut P) -> Result<Option<SlotNo>>
    where
        P: AccountStore + InteractiveSelector + ?Sized,
    {
        let mut session = AccountSession::acquire(platform)?;
        if session.has_default_account() {
            log::debug!("Default account configured, skipping selection");
            return Ok(None);
        }

        let accounts = session.enumerate_occupied_slots();
        let Some(slot) = Self::select_account(&accounts, false, &mut *session) else {
            log::info!("No accounts to select from");
            return Ok(None);
        };

        log::debug!("Load slot {}", slot);
        session.load_active(slot).map_err(|e| {
            log::error!("Failed to load slot {}: {}", slot, e);
            BootError::AccountLoadFailed(slot)
        })?;
        Ok(Some(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use autoboot_api::error::account_error;
    use autoboot_api::AvatarImage;

    /// Chooser that always answers the same slot and counts prompts
    struct FixedChooser {
        answer: SlotNo,
        prompts: u32,
    }

    impl InteractiveSelector for FixedChooser {
        fn choose(&mut self, _accounts: &[AccountRecord]) -> SlotNo {
            self.prompts += 1;
            self.answer
        }
    }

    fn alice_and_unknown() -> Vec<AccountRecord> {
        vec![AccountRecord::new(3, "Alice"), AccountRecord::unnamed(7)]
    }

    #[test]
    fn test_default_account_skips_prompt() {
        let mut chooser = FixedChooser { answer: 3, prompts: 0 };
        let selected = AccountSelector::select_account(&alice_and_unknown(), true, &mut chooser);
        assert_eq!(selected, None);
        assert_eq!(chooser.prompts, 0);
    }

    #[test]
    fn test_empty_list_selects_nothing() {
        let mut chooser = FixedChooser { answer: 3, prompts: 0 };
        assert_eq!(AccountSelector::select_account(&[], false, &mut chooser), None);
        assert_eq!(chooser.prompts, 0);
    }

    #[test]
    fn test_chosen_slot_is_returned() {
        let mut chooser = FixedChooser { answer: 7, prompts: 0 };
        let selected = AccountSelector::select_account(&alice_and_unknown(), false, &mut chooser);
        assert_eq!(selected, Some(7));
        assert_eq!(chooser.prompts, 1);
    }

    #[test]
    fn test_unlisted_answer_is_clamped_to_list() {
        let mut chooser = FixedChooser { answer: 9, prompts: 0 };
        let selected = AccountSelector::select_account(&alice_and_unknown(), false, &mut chooser);
        assert_eq!(selected, Some(3));
    }

    /// Account store double that records the bracketing calls
    struct FakeStore {
        occupied: Vec<SlotNo>,
        default: Option<SlotNo>,
        init_fails: bool,
        load_fails: bool,
        loaded: Option<SlotNo>,
        open: bool,
        finalized: u32,
        answer: SlotNo,
    }

    impl FakeStore {
        fn new(occupied: &[SlotNo]) -> Self {
            Self {
                occupied: occupied.to_vec(),
                default: None,
                init_fails: false,
                load_fails: false,
                loaded: None,
                open: false,
                finalized: 0,
                answer: occupied.first().copied().unwrap_or_default(),
            }
        }
    }

    impl AccountStore for FakeStore {
        fn initialize(&mut self) -> autoboot_api::Result<()> {
            if self.init_fails {
                return Err(account_error("act client unavailable"));
            }
            self.open = true;
            Ok(())
        }

        fn finalize(&mut self) {
            self.open = false;
            self.finalized += 1;
        }

        fn is_slot_occupied(&mut self, slot: SlotNo) -> bool {
            assert!(self.open, "query outside of session");
            self.occupied.contains(&slot)
        }

        fn mii_name(&mut self, _slot: SlotNo) -> autoboot_api::Result<alloc::string::String> {
            Err(account_error("no name"))
        }

        fn is_network_account(&mut self, _slot: SlotNo) -> bool {
            false
        }

        fn network_account_id(&mut self, _slot: SlotNo) -> autoboot_api::Result<alloc::string::String> {
            Err(account_error("not linked"))
        }

        fn mii_image(&mut self, _slot: SlotNo) -> autoboot_api::Result<AvatarImage> {
            Err(account_error("no image"))
        }

        fn default_account(&mut self) -> Option<SlotNo> {
            assert!(self.open, "query outside of session");
            self.default
        }

        fn current_slot(&mut self) -> SlotNo {
            1
        }

        fn load_active(&mut self, slot: SlotNo) -> autoboot_api::Result<()> {
            assert!(self.open, "load outside of session");
            if self.load_fails {
                return Err(account_error("load rejected"));
            }
            self.loaded = Some(slot);
            Ok(())
        }
    }

    impl InteractiveSelector for FakeStore {
        fn choose(&mut self, _accounts: &[AccountRecord]) -> SlotNo {
            self.answer
        }
    }

    #[test]
    fn test_run_loads_chosen_slot() {
        let mut store = FakeStore::new(&[3, 7]);
        store.answer = 7;

        assert_eq!(AccountSelector::run(&mut store), Ok(Some(7)));
        assert_eq!(store.loaded, Some(7));
        assert_eq!(store.finalized, 1);
        assert!(!store.open);
    }

    #[test]
    fn test_run_with_default_loads_nothing() {
        let mut store = FakeStore::new(&[3, 7]);
        store.default = Some(3);

        assert_eq!(AccountSelector::run(&mut store), Ok(None));
        assert_eq!(store.loaded, None);
        assert_eq!(store.finalized, 1);
    }

    #[test]
    fn test_run_finalizes_after_load_failure() {
        let mut store = FakeStore::new(&[5]);
        store.load_fails = true;

        assert_eq!(AccountSelector::run(&mut store), Err(BootError::AccountLoadFailed(5)));
        assert_eq!(store.finalized, 1);
        assert!(!store.open);
    }

    #[test]
    fn test_run_without_subsystem() {
        let mut store = FakeStore::new(&[5]);
        store.init_fails = true;

        assert!(matches!(
            AccountSelector::run(&mut store),
            Err(BootError::AccountSubsystemUnavailable(_))
        ));
        assert_eq!(store.finalized, 0);
    }
}
