//! LV2 kernel backend, using the peek/poke syscalls of a console running
//! a kernel with those syscalls enabled.

use crate::{KernelMemory, Mount, MountError, MountRequest};
use core::arch::asm;
use data_types::addresses::KernelAddress;
use log::trace;
use std::ffi::CString;

const SYS_PEEK: u64 = 6;
const SYS_POKE: u64 = 7;
const SYS_FS_MOUNT: u64 = 837;

#[inline(always)]
unsafe fn syscall(number: u64, args: [u64; 8]) -> u64 {
    let ret: u64;
    asm!(
        "sc",
        inlateout("r3") args[0] => ret,
        inlateout("r4") args[1] => _,
        inlateout("r5") args[2] => _,
        inlateout("r6") args[3] => _,
        inlateout("r7") args[4] => _,
        inlateout("r8") args[5] => _,
        inlateout("r9") args[6] => _,
        inlateout("r10") args[7] => _,
        inlateout("r11") number => _,
        lateout("r0") _,
        lateout("r12") _,
        out("cr0") _,
        out("ctr") _,
        out("xer") _,
        out("lr") _,
        options(nostack)
    );
    ret
}

/// The running kernel.
pub struct Lv2 {
    _private: (),
}

impl Lv2 {
    /// # Safety
    /// Writes through the returned handle go straight into kernel memory.
    /// The caller must be the only one patching the kernel.
    pub unsafe fn new() -> Self {
        Lv2 { _private: () }
    }
}

impl KernelMemory for Lv2 {
    fn peek(&self, address: KernelAddress) -> u64 {
        // SAFETY: the peek syscall only reads and accepts any kernel address
        unsafe { syscall(SYS_PEEK, [address.address(), 0, 0, 0, 0, 0, 0, 0]) }
    }

    fn poke(&mut self, address: KernelAddress, value: u64) {
        trace!("poke {} <- {:016x}", address, value);
        // SAFETY: `Lv2::new` made the caller the only writer to kernel memory
        unsafe {
            syscall(SYS_POKE, [address.address(), value, 0, 0, 0, 0, 0, 0]);
        }
    }
}

impl Mount for Lv2 {
    fn mount(&mut self, request: &MountRequest) -> core::result::Result<(), MountError> {
        let device = CString::new(request.device).map_err(|_| MountError::INVALID_ARGUMENT)?;
        let filesystem =
            CString::new(request.filesystem).map_err(|_| MountError::INVALID_ARGUMENT)?;
        let mount_point =
            CString::new(request.mount_point).map_err(|_| MountError::INVALID_ARGUMENT)?;

        // dev, fs, path, unk, readonly, unk, argv, argc
        // SAFETY: the three strings outlive the call and are NUL terminated, argv is null
        let ret = unsafe {
            syscall(
                SYS_FS_MOUNT,
                [
                    device.as_ptr() as u64,
                    filesystem.as_ptr() as u64,
                    mount_point.as_ptr() as u64,
                    0,
                    0,
                    0,
                    0,
                    0,
                ],
            )
        };

        match ret as u32 {
            0 => Ok(()),
            code => Err(MountError::new(code)),
        }
    }
}
