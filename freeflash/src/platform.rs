#[cfg(any(feature = "emulation", not(target_arch = "powerpc64")))]
mod emulated {
    use kernel_patcher::emulation::EmulatedConsole;
    use log::warn;

    pub const BACKEND: &str = "emulated console";

    pub fn open() -> EmulatedConsole {
        warn!("Running against an emulated console, the real kernel is not touched");
        EmulatedConsole::stock()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use kernel_patcher::{MountSequencer, TagSet};

        #[test]
        fn emulated_console_unlocks() {
            let mut console = open();
            assert_eq!(MountSequencer::new(&mut console).run(), Ok(()));
            assert_eq!(console.count_slots(TagSet::FLASH.canonical), 2);
            assert_eq!(console.count_slots(TagSet::FLASH.final_alias), 1);
        }
    }
}

#[cfg(any(feature = "emulation", not(target_arch = "powerpc64")))]
pub use emulated::{open, BACKEND};

#[cfg(all(not(feature = "emulation"), target_arch = "powerpc64"))]
pub const BACKEND: &str = "LV2";

#[cfg(all(not(feature = "emulation"), target_arch = "powerpc64"))]
pub fn open() -> kernel_patcher::lv2::Lv2 {
    // SAFETY: this process is the only one patching the kernel for its lifetime
    unsafe { kernel_patcher::lv2::Lv2::new() }
}
