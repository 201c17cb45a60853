//! An in-memory stand-in for the console.
//!
//! Kernel memory is a sparse map of doublewords, unset memory reads as
//! zero. Every write is logged. Mounting behaves like the kernel does for
//! the flash: it fails while a device with the mounted name is listed,
//! otherwise it lists a new device under that name in the first free slot.

use crate::registry::{RegistryView, SLOT_COUNT};
use crate::version::FINGERPRINT_ADDRESS;
use crate::{KernelMemory, Mount, MountError, MountRequest};
use data_types::addresses::KernelAddress;
use data_types::tag::{Tag, TagSet};
use firmware_table::firmware::FW_3_41;
use firmware_table::FirmwareDescriptor;
use log::debug;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountBehaviour {
    /// Act like the kernel, see the module documentation
    Kernel,
    /// Always fail with the given status
    Fail(MountError),
    /// Panic inside the mount call
    Panic,
}

/// Device list of a stock console: the flash is listed twice
pub const STOCK_DEVICES: [Tag; 5] = [
    Tag::from_name(b"_hdd0"),
    TagSet::FLASH.canonical,
    TagSet::FLASH.canonical,
    Tag::from_name(b"_usb000"),
    Tag::from_name(b"_bdvd"),
];

#[derive(Debug, Clone)]
pub struct EmulatedConsole {
    memory: BTreeMap<KernelAddress, u64>,
    writes: Vec<(KernelAddress, u64)>,
    registry_base: KernelAddress,
    mounted_tag: Tag,
    behaviour: MountBehaviour,
    mounts: Vec<MountRequest>,
}

impl EmulatedConsole {
    /// A console running the given firmware with an empty device list
    pub fn new(firmware: &FirmwareDescriptor) -> Self {
        Self::with_fingerprint(u64::from(firmware.version().raw()), firmware.registry_base())
    }

    /// A stock 3.41 console
    pub fn stock() -> Self {
        Self::new(&FW_3_41).with_slots(&STOCK_DEVICES)
    }

    pub fn with_fingerprint(fingerprint: u64, registry_base: KernelAddress) -> Self {
        let mut memory = BTreeMap::new();
        memory.insert(FINGERPRINT_ADDRESS, fingerprint);
        EmulatedConsole {
            memory,
            writes: Vec::new(),
            registry_base,
            mounted_tag: TagSet::FLASH.canonical,
            behaviour: MountBehaviour::Kernel,
            mounts: Vec::new(),
        }
    }

    /// Fills the device list from slot zero on. Not logged as writes.
    #[track_caller]
    pub fn with_slots(mut self, tags: &[Tag]) -> Self {
        assert!(tags.len() <= SLOT_COUNT, "more tags than device slots");
        for (index, tag) in tags.iter().enumerate() {
            let address = self.registry_base.offset(crate::SLOT_STRIDE, index);
            self.memory.insert(address, tag.raw());
        }
        self
    }

    pub fn with_mount_behaviour(mut self, behaviour: MountBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    pub fn registry_base(&self) -> KernelAddress {
        self.registry_base
    }

    /// Contents of the device list
    pub fn slots(&mut self) -> [Tag; SLOT_COUNT] {
        let base = self.registry_base;
        RegistryView::new(self, base).tags()
    }

    pub fn count_slots(&mut self, tag: Tag) -> usize {
        self.slots().iter().filter(|slot| **slot == tag).count()
    }

    /// All writes in the order they were issued
    pub fn writes(&self) -> &[(KernelAddress, u64)] {
        &self.writes
    }

    pub fn mounts(&self) -> &[MountRequest] {
        &self.mounts
    }
}

impl KernelMemory for EmulatedConsole {
    fn peek(&self, address: KernelAddress) -> u64 {
        self.memory.get(&address).copied().unwrap_or(0)
    }

    fn poke(&mut self, address: KernelAddress, value: u64) {
        self.writes.push((address, value));
        self.memory.insert(address, value);
    }
}

impl Mount for EmulatedConsole {
    fn mount(&mut self, request: &MountRequest) -> core::result::Result<(), MountError> {
        self.mounts.push(*request);
        debug!(
            "Emulated mount of {} ({}) on {}",
            request.device, request.filesystem, request.mount_point
        );

        match self.behaviour {
            MountBehaviour::Fail(err) => Err(err),
            MountBehaviour::Panic => panic!("emulated mount crashed"),
            MountBehaviour::Kernel => {
                let (base, tag) = (self.registry_base, self.mounted_tag);
                let mut registry = RegistryView::new(self, base);
                if registry.find(tag).is_some() {
                    return Err(MountError::BUSY);
                }
                let free = registry.find(Tag::EMPTY).ok_or(MountError::BUSY)?;
                let address = registry.slot_address(free);
                drop(registry);
                self.poke(address, tag.raw());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::detect_firmware;

    const CANONICAL: Tag = TagSet::FLASH.canonical;

    #[test]
    fn mount_collides_with_listed_device() {
        let mut console = EmulatedConsole::new(&FW_3_41).with_slots(&[CANONICAL]);
        assert_eq!(console.mount(&MountRequest::FLASH), Err(MountError::BUSY));
        assert_eq!(console.count_slots(CANONICAL), 1);
    }

    #[test]
    fn mount_lists_new_device() {
        let other = Tag::from_name(b"_hdd0");
        let mut console = EmulatedConsole::new(&FW_3_41).with_slots(&[other]);
        assert_eq!(console.mount(&MountRequest::FLASH), Ok(()));
        assert_eq!(console.slots()[1], CANONICAL);
        assert_eq!(console.mounts(), &[MountRequest::FLASH]);
    }

    #[test]
    fn stock_console() {
        let mut console = EmulatedConsole::stock();
        assert_eq!(detect_firmware(&console).map(|fw| fw.version()), Ok(FW_3_41.version()));
        assert_eq!(&console.slots()[..STOCK_DEVICES.len()], &STOCK_DEVICES);
        assert_eq!(console.count_slots(CANONICAL), 2);
        assert!(console.writes().is_empty());
    }

    #[test]
    fn mount_without_free_slot() {
        let other = Tag::from_name(b"_hdd0");
        let mut console = EmulatedConsole::new(&FW_3_41).with_slots(&[other; SLOT_COUNT]);
        assert_eq!(console.mount(&MountRequest::FLASH), Err(MountError::BUSY));
    }
}
