//! Boot Configuration
//!
//! Holds the legacy resolution parameters (ordered candidate list, title
//! prefix, volume) and the log level. Defaults match the console layout;
//! every field can be overridden from the command line or, with the `serde`
//! feature, from a JSON document.

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;
use autoboot_api::{LEGACY_TITLE_PREFIX, LegacyCandidate, VolumeSpec};
use log::LevelFilter;

use crate::domain::legacy_resolver::LegacyVolumeResolver;
use crate::error::{BootError, Result};
use crate::utils::cmdline::CmdLine;

/// Loader candidates in priority order: "OHBC", then "LULZ"
pub const DEFAULT_LEGACY_CANDIDATES: [LegacyCandidate; 2] = [
    LegacyCandidate::new(0x4f48_4243),
    LegacyCandidate::new(0x4c55_4c5a),
];

/// Legacy storage device node
pub const LEGACY_DEVICE: &str = "/dev/slccmpt01";

/// Mount point of the legacy storage volume
pub const LEGACY_MOUNT_PATH: &str = "/vol/storage_slccmpt01";

/// Command line keys understood by [`BootConfig::apply_cmdline`]
pub const CONFIG_KEYS: [&str; 5] = [
    "legacy.candidates",
    "legacy.prefix",
    "legacy.device",
    "legacy.mount",
    "log",
];

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BootConfig {
    /// Tried first to last; the first one present on the volume wins
    pub legacy_candidates: Vec<LegacyCandidate>,
    pub legacy_prefix: u32,
    pub legacy_volume: VolumeSpec,
    pub log_level: LevelFilter,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            legacy_candidates: DEFAULT_LEGACY_CANDIDATES.to_vec(),
            legacy_prefix: LEGACY_TITLE_PREFIX,
            legacy_volume: VolumeSpec::new(LEGACY_DEVICE, LEGACY_MOUNT_PATH),
            log_level: LevelFilter::Info,
        }
    }
}

impl BootConfig {
    /// Defaults overlaid with any `key=value` settings on `cmdline`
    pub fn from_cmdline(cmdline: &CmdLine) -> Result<Self> {
        let mut config = Self::default();
        config.apply_cmdline(cmdline)?;
        Ok(config)
    }

    /// Replace the candidate list; order is preserved
    pub fn with_candidates(mut self, candidates: &[LegacyCandidate]) -> Self {
        self.legacy_candidates = candidates.to_vec();
        self
    }

    pub fn apply_cmdline(&mut self, cmdline: &CmdLine) -> Result<()> {
        if let Some(list) = cmdline.get_key_value("legacy.candidates") {
            self.legacy_candidates = list
                .split(',')
                .filter(|item| !item.is_empty())
                .map(LegacyCandidate::parse)
                .collect::<autoboot_api::Result<Vec<_>>>()
                .map_err(|e| BootError::InvalidConfig(e.to_string()))?;
        }

        if let Some(prefix) = cmdline.get_key_value("legacy.prefix") {
            self.legacy_prefix = LegacyCandidate::parse(prefix)
                .map(LegacyCandidate::low)
                .map_err(|e| BootError::InvalidConfig(format!("legacy.prefix: {}", e)))?;
        }

        if let Some(device) = cmdline.get_key_value("legacy.device") {
            self.legacy_volume.device = device.to_string();
        }

        if let Some(mount) = cmdline.get_key_value("legacy.mount") {
            self.legacy_volume.mount_path = mount.to_string();
        }

        if let Some(level) = cmdline.get_key_value("log") {
            self.log_level = level
                .parse()
                .map_err(|_| BootError::InvalidConfig(format!("unknown log level {:?}", level)))?;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.legacy_candidates.is_empty() {
            return Err(BootError::InvalidConfig(
                "legacy candidate list is empty".to_string(),
            ));
        }
        if self.legacy_prefix == 0 {
            return Err(BootError::InvalidConfig(
                "legacy prefix must be non-zero".to_string(),
            ));
        }
        if !self.legacy_volume.mount_path.starts_with('/') {
            return Err(BootError::InvalidConfig(format!(
                "mount path must be absolute: {}",
                self.legacy_volume.mount_path
            )));
        }
        Ok(())
    }

    /// Resolver bound to this configuration's candidates and volume
    pub fn legacy_resolver(&self) -> LegacyVolumeResolver<'_> {
        LegacyVolumeResolver::new(
            &self.legacy_candidates,
            self.legacy_prefix,
            &self.legacy_volume,
        )
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let config = BootConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains(r#""legacy_candidates":["4f484243","4c554c5a"]"#));

        let parsed: BootConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let parsed: BootConfig = serde_json::from_str(
            r#"{"legacy_candidates": ["0x4c554c5a"], "log_level": "DEBUG"}"#,
        )
        .unwrap();

        assert_eq!(parsed.legacy_candidates, [LegacyCandidate::new(0x4c55_4c5a)].to_vec());
        assert_eq!(parsed.log_level, LevelFilter::Debug);
        assert_eq!(parsed.legacy_prefix, LEGACY_TITLE_PREFIX);
        assert_eq!(parsed.legacy_volume.mount_path, LEGACY_MOUNT_PATH);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_invalid_candidate_is_rejected() {
        for doc in [
            r#"{"legacy_candidates": ["4f4842"]}"#,
            r#"{"legacy_candidates": ["0X123456"]}"#,
            r#"{"legacy_candidates": [1330135619]}"#,
        ] {
            assert!(serde_json::from_str::<BootConfig>(doc).is_err(), "{}", doc);
        }
    }
}
