//! Domain Layer - Boot decision core
//!
//! Pure decision components: what the user asked to boot, which account
//! becomes active, which legacy title is present. Nothing here launches
//! anything; the application layer composes these into boot procedures.

pub mod account_selection;
pub mod boot_config;
pub mod boot_target;
pub mod compatibility;
pub mod legacy_resolver;

pub use account_selection::{AccountSelector, AccountSession};
pub use boot_config::BootConfig;
pub use boot_target::{BootTarget, LegacyCategory};
pub use compatibility::prepare_compatibility;
pub use legacy_resolver::{LegacyVolumeResolver, MountGuard};
