//! Legacy-mode preparation
//!
//! Controller bring-up followed by screen-type negotiation. Screen types are
//! tried in a fixed order; the last one is used without checking.

use autoboot_api::{CompatibilityLayer, ScreenType};

/// Screen types checked in preference order
pub const CHECKED_SCREENS: [ScreenType; 2] = [ScreenType::Both, ScreenType::Drc];

/// Used when no checked screen type is accepted
pub const FALLBACK_SCREEN: ScreenType = ScreenType::Tv;

/// Initialize controllers and pick a screen type. Call once per legacy boot.
pub fn prepare_compatibility<C: CompatibilityLayer + ?Sized>(compat: &mut C) -> ScreenType {
    compat.init_controllers();

    for screen in CHECKED_SCREENS {
        compat.set_screen_type(screen);
        if compat.screen_state_ok() {
            log::debug!("Using screen type {:?}", screen);
            return screen;
        }
    }

    compat.set_screen_type(FALLBACK_SCREEN);
    log::debug!("Falling back to screen type {:?}", FALLBACK_SCREEN);
    FALLBACK_SCREEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use autoboot_api::TitleId;

    struct FakeCompat {
        accepted: Vec<ScreenType>,
        current: Option<ScreenType>,
        set_calls: Vec<ScreenType>,
        controller_inits: u32,
    }

    impl FakeCompat {
        fn accepting(accepted: &[ScreenType]) -> Self {
            Self {
                accepted: accepted.to_vec(),
                current: None,
                set_calls: Vec::new(),
                controller_inits: 0,
            }
        }
    }

    impl CompatibilityLayer for FakeCompat {
        fn init_controllers(&mut self) {
            self.controller_inits += 1;
        }

        fn set_screen_type(&mut self, screen: ScreenType) {
            self.current = Some(screen);
            self.set_calls.push(screen);
        }

        fn screen_state_ok(&mut self) -> bool {
            self.current.is_some_and(|screen| self.accepted.contains(&screen))
        }

        fn launch_legacy_menu(&mut self) -> autoboot_api::Result<()> {
            Ok(())
        }

        fn launch_legacy_title(&mut self, _title: TitleId) -> autoboot_api::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_both_screens_preferred() {
        let mut compat = FakeCompat::accepting(&[ScreenType::Both, ScreenType::Tv]);
        assert_eq!(prepare_compatibility(&mut compat), ScreenType::Both);
        assert_eq!(compat.set_calls, [ScreenType::Both].to_vec());
        assert_eq!(compat.controller_inits, 1);
    }

    #[test]
    fn test_drc_before_tv() {
        let mut compat = FakeCompat::accepting(&[ScreenType::Drc, ScreenType::Tv]);
        assert_eq!(prepare_compatibility(&mut compat), ScreenType::Drc);
    }

    #[test]
    fn test_tv_is_unconditional_fallback() {
        let mut compat = FakeCompat::accepting(&[]);
        assert_eq!(prepare_compatibility(&mut compat), ScreenType::Tv);
        assert_eq!(
            compat.set_calls,
            [ScreenType::Both, ScreenType::Drc, ScreenType::Tv].to_vec()
        );
    }
}
