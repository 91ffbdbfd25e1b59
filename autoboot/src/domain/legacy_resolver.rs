//! Legacy title resolution
//!
//! Probes the legacy storage volume for each configured candidate, in order,
//! and returns the first one whose content file exists. Every probe mounts
//! the volume through a [`MountGuard`], so the volume is unmounted on every
//! path out of the probe, including the early return on a hit.

use alloc::format;
use alloc::string::String;
use autoboot_api::error::ErrorContext;
use autoboot_api::{LegacyCandidate, MountHandle, TitleId, VolumeService, VolumeSpec};

use crate::domain::boot_target::LegacyCategory;

/// Content file probed inside a legacy title directory
pub const LEGACY_CONTENT_FILE: &str = "content/00000000.app";

/// Path of the content file for `candidate` under a mounted legacy volume
pub fn legacy_content_path(mount_path: &str, prefix: u32, candidate: LegacyCandidate) -> String {
    format!(
        "{}/title/{:08x}/{}/{}",
        mount_path, prefix, candidate, LEGACY_CONTENT_FILE
    )
}

/// Scoped volume mount; unmounts on drop
pub struct MountGuard<'v, V: VolumeService + ?Sized> {
    volumes: &'v mut V,
    handle: Option<MountHandle>,
}

impl<'v, V: VolumeService + ?Sized> MountGuard<'v, V> {
    pub fn mount(volumes: &'v mut V, volume: &VolumeSpec) -> autoboot_api::Result<Self> {
        let handle = volumes.mount(volume).context(&volume.device)?;
        Ok(Self {
            volumes,
            handle: Some(handle),
        })
    }

    pub fn mount_path(&self) -> &str {
        self.handle
            .as_ref()
            .map(|handle| handle.mount_path.as_str())
            .unwrap_or_default()
    }

    pub fn stat_exists(&mut self, path: &str) -> bool {
        match &self.handle {
            Some(handle) => self.volumes.stat_exists(handle, path),
            None => false,
        }
    }
}

impl<V: VolumeService + ?Sized> Drop for MountGuard<'_, V> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.volumes.unmount(handle);
        }
    }
}

/// Resolves legacy boot targets to a title on the legacy volume
pub struct LegacyVolumeResolver<'c> {
    candidates: &'c [LegacyCandidate],
    prefix: u32,
    volume: &'c VolumeSpec,
}

impl<'c> LegacyVolumeResolver<'c> {
    pub fn new(candidates: &'c [LegacyCandidate], prefix: u32, volume: &'c VolumeSpec) -> Self {
        Self {
            candidates,
            prefix,
            volume,
        }
    }

    pub fn candidates(&self) -> &[LegacyCandidate] {
        self.candidates
    }

    /// Title to launch for `category`; [`TitleId::NONE`] means "boot the
    /// legacy menu".
    pub fn resolve<V: VolumeService + ?Sized>(
        &self,
        volumes: &mut V,
        category: LegacyCategory,
    ) -> TitleId {
        match category {
            LegacyCategory::Menu => TitleId::NONE,
            LegacyCategory::Loader => {
                for &candidate in self.candidates {
                    let title = self.probe(volumes, candidate);
                    if !title.is_none() {
                        return title;
                    }
                }
                log::debug!("No legacy loader candidate present on {}", self.volume.device);
                TitleId::NONE
            }
        }
    }

    /// Mount, stat and unmount for a single candidate
    pub fn probe<V: VolumeService + ?Sized>(
        &self,
        volumes: &mut V,
        candidate: LegacyCandidate,
    ) -> TitleId {
        let mut guard = match MountGuard::mount(volumes, self.volume) {
            Ok(guard) => guard,
            Err(e) => {
                log::error!("Failed to mount legacy volume: {}", e);
                return TitleId::NONE;
            }
        };

        let path = legacy_content_path(guard.mount_path(), self.prefix, candidate);
        if guard.stat_exists(&path) {
            let title = candidate.title_id(self.prefix);
            log::debug!("Found legacy title {}", title);
            title
        } else {
            log::debug!("Cannot find title 0x{}", candidate);
            TitleId::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use autoboot_api::error::volume_error;

    /// Volume double: a list of existing paths plus a mount/unmount tally
    struct FakeVolume {
        files: Vec<String>,
        mountable: bool,
        mounts: u32,
        unmounts: u32,
        stats: u32,
    }

    impl FakeVolume {
        fn with_files(files: &[&str]) -> Self {
            Self {
                files: files.iter().map(|f| String::from(*f)).collect(),
                mountable: true,
                mounts: 0,
                unmounts: 0,
                stats: 0,
            }
        }
    }

    impl VolumeService for FakeVolume {
        fn mount(&mut self, volume: &VolumeSpec) -> autoboot_api::Result<MountHandle> {
            if !self.mountable {
                return Err(volume_error("device busy"));
            }
            self.mounts += 1;
            Ok(MountHandle::new(self.mounts, &volume.mount_path))
        }

        fn unmount(&mut self, _handle: MountHandle) {
            self.unmounts += 1;
        }

        fn stat_exists(&mut self, _handle: &MountHandle, path: &str) -> bool {
            self.stats += 1;
            self.files.iter().any(|f| f == path)
        }
    }

    const OHBC: LegacyCandidate = LegacyCandidate::new(0x4f48_4243);
    const LULZ: LegacyCandidate = LegacyCandidate::new(0x4c55_4c5a);

    fn volume() -> VolumeSpec {
        VolumeSpec::new("/dev/slccmpt01", "/vol/storage_slccmpt01")
    }

    #[test]
    fn test_content_path_layout() {
        assert_eq!(
            legacy_content_path("/vol/storage_slccmpt01", 0x0001_0001, OHBC),
            "/vol/storage_slccmpt01/title/00010001/4f484243/content/00000000.app"
        );
    }

    #[test]
    fn test_menu_never_touches_volume() {
        let legacy_volume = volume();
        let candidates = [OHBC, LULZ];
        let resolver = LegacyVolumeResolver::new(&candidates, 0x0001_0001, &legacy_volume);
        let mut fake = FakeVolume::with_files(&[]);

        assert_eq!(resolver.resolve(&mut fake, LegacyCategory::Menu), TitleId::NONE);
        assert_eq!(fake.mounts, 0);
    }

    #[test]
    fn test_first_present_candidate_wins() {
        let legacy_volume = volume();
        let candidates = [OHBC, LULZ];
        let resolver = LegacyVolumeResolver::new(&candidates, 0x0001_0001, &legacy_volume);
        let mut fake = FakeVolume::with_files(&[
            "/vol/storage_slccmpt01/title/00010001/4f484243/content/00000000.app",
            "/vol/storage_slccmpt01/title/00010001/4c554c5a/content/00000000.app",
        ]);

        let title = resolver.resolve(&mut fake, LegacyCategory::Loader);
        assert_eq!(title.as_u64(), 0x0001_0001_4f48_4243);
        assert_eq!(fake.mounts, 1);
        assert_eq!(fake.unmounts, 1);
    }

    #[test]
    fn test_second_candidate_after_miss() {
        let legacy_volume = volume();
        let candidates = [OHBC, LULZ];
        let resolver = LegacyVolumeResolver::new(&candidates, 0x0001_0001, &legacy_volume);
        let mut fake = FakeVolume::with_files(&[
            "/vol/storage_slccmpt01/title/00010001/4c554c5a/content/00000000.app",
        ]);

        let title = resolver.resolve(&mut fake, LegacyCategory::Loader);
        assert_eq!(title.as_u64(), 0x0001_0001_4c55_4c5a);
        assert_eq!(fake.mounts, 2);
        assert_eq!(fake.unmounts, 2);
    }

    #[test]
    fn test_unmountable_volume_resolves_none() {
        let legacy_volume = volume();
        let candidates = [OHBC, LULZ];
        let resolver = LegacyVolumeResolver::new(&candidates, 0x0001_0001, &legacy_volume);
        let mut fake = FakeVolume::with_files(&[
            "/vol/storage_slccmpt01/title/00010001/4f484243/content/00000000.app",
        ]);
        fake.mountable = false;

        assert_eq!(resolver.resolve(&mut fake, LegacyCategory::Loader), TitleId::NONE);
        assert_eq!(fake.stats, 0);
        assert_eq!(fake.unmounts, 0);
    }

    #[test]
    fn test_guard_unmounts_on_drop() {
        let mut fake = FakeVolume::with_files(&[]);
        {
            let mut guard = MountGuard::mount(&mut fake, &volume()).unwrap();
            assert_eq!(guard.mount_path(), "/vol/storage_slccmpt01");
            assert!(!guard.stat_exists("/vol/storage_slccmpt01/missing"));
        }
        assert_eq!(fake.mounts, 1);
        assert_eq!(fake.unmounts, 1);
    }
}
