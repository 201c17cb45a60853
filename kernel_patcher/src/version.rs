use crate::{Error, KernelMemory, Result};
use data_types::addresses::KernelAddress;
use firmware_table::FirmwareDescriptor;
use log::{debug, info};

/// Kernel location holding the running firmware version.
///
/// This location moves between kernel builds, so reading it on a release
/// the table does not know about yields a meaningless value. That value
/// then simply fails to match any table entry.
pub const FINGERPRINT_ADDRESS: KernelAddress = KernelAddress::from_const(0x80000000002D7580);

/// Reads the version fingerprint and resolves it against the firmware table.
pub fn detect_firmware<M: KernelMemory + ?Sized>(
    memory: &M,
) -> Result<&'static FirmwareDescriptor> {
    let fingerprint = memory.peek(FINGERPRINT_ADDRESS);
    debug!("Version fingerprint at {}: {:016x}", FINGERPRINT_ADDRESS, fingerprint);

    let firmware = firmware_table::lookup_fingerprint(fingerprint)
        .ok_or(Error::UnsupportedVersion { fingerprint })?;

    info!("Detected firmware {}", firmware.version());
    Ok(firmware)
}
