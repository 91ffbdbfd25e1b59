// Diagnostics support

pub mod boot_log;

pub use boot_log::{BOOT_LOGGER, BootLog, dump_log, init_logger, set_sink};
