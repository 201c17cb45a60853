use data_types::addresses::KernelAddress;
use thiserror_no_std::Error;

/// Access to LV2 kernel memory.
///
/// Reads and writes have no error channel: the kernel either performs
/// them or faults in a way the caller cannot observe.
pub trait KernelMemory {
    fn peek(&self, address: KernelAddress) -> u64;
    fn poke(&mut self, address: KernelAddress, value: u64);
}

impl<M: KernelMemory + ?Sized> KernelMemory for &mut M {
    fn peek(&self, address: KernelAddress) -> u64 {
        (**self).peek(address)
    }

    fn poke(&mut self, address: KernelAddress, value: u64) {
        (**self).poke(address, value)
    }
}

/// Parameters of a filesystem mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountRequest {
    pub device: &'static str,
    pub filesystem: &'static str,
    pub mount_point: &'static str,
}

impl MountRequest {
    /// The internal flash, mounted writable over its usual mount point
    pub const FLASH: MountRequest = MountRequest {
        device: "CELL_FS_IOS:BUILTIN_FLSH1",
        filesystem: "CELL_FS_FAT",
        mount_point: "/dev_flash",
    };
}

/// Status code of a failed mount, as returned by the kernel
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("mount returned {code:#010x}")]
pub struct MountError {
    pub code: u32,
}

impl MountError {
    pub const fn new(code: u32) -> Self {
        MountError { code }
    }

    /// CELL_FS_EINVAL
    pub const INVALID_ARGUMENT: MountError = MountError::new(0x80010002);
    /// CELL_FS_EBUSY
    pub const BUSY: MountError = MountError::new(0x8001000A);
}

pub trait Mount {
    fn mount(&mut self, request: &MountRequest) -> core::result::Result<(), MountError>;
}

impl<T: Mount + ?Sized> Mount for &mut T {
    fn mount(&mut self, request: &MountRequest) -> core::result::Result<(), MountError> {
        (**self).mount(request)
    }
}
