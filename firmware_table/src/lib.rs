//! # Firmware table
//!
//! Known system software releases and the kernel offsets needed to unlock
//! the flash partition on each of them.
#![cfg_attr(not(test), no_std)]

use data_types::addresses::KernelAddress;
use data_types::patch::PatchSet;
use data_types::version::FirmwareVersion;

pub mod firmware;

/// Everything the unlocker needs to know about one firmware release
#[derive(Debug)]
pub struct FirmwareDescriptor {
    version: FirmwareVersion,
    registry_base: KernelAddress,
    patches: &'static PatchSet,
}

impl FirmwareDescriptor {
    /// Creates a new firmware descriptor
    ///
    /// # Arguments
    /// * `version` - The release this descriptor applies to
    /// * `registry_base` - Address of the first slot of the kernel device list
    /// * `patches` - Kernel patches, terminated by a sentinel entry
    pub const fn new(
        version: FirmwareVersion,
        registry_base: KernelAddress,
        patches: &'static PatchSet,
    ) -> Self {
        FirmwareDescriptor {
            version,
            registry_base,
            patches,
        }
    }

    /// Returns the firmware release
    pub fn version(&self) -> FirmwareVersion {
        self.version
    }

    /// Returns the address of device list slot zero
    pub fn registry_base(&self) -> KernelAddress {
        self.registry_base
    }

    /// Returns the kernel patches including the trailing sentinel
    pub fn patches(&self) -> &'static PatchSet {
        self.patches
    }
}

/// All supported releases. Versions are unique.
pub static FIRMWARE_TABLE: &[FirmwareDescriptor] = &[firmware::FW_3_41];

/// Finds the descriptor of a firmware release
///
/// # Returns
/// * `Option<&FirmwareDescriptor>` - The descriptor if the release is supported, None otherwise
pub fn lookup(version: FirmwareVersion) -> Option<&'static FirmwareDescriptor> {
    lookup_in(FIRMWARE_TABLE, |firmware| firmware.version == version)
}

/// Finds the descriptor matching a raw version fingerprint read from kernel memory
pub fn lookup_fingerprint(fingerprint: u64) -> Option<&'static FirmwareDescriptor> {
    lookup_in(FIRMWARE_TABLE, |firmware| {
        firmware.version.matches_fingerprint(fingerprint)
    })
}

fn lookup_in<F>(
    table: &'static [FirmwareDescriptor],
    matches: F,
) -> Option<&'static FirmwareDescriptor>
where
    F: Fn(&FirmwareDescriptor) -> bool,
{
    table.iter().find(|firmware| matches(firmware))
}
