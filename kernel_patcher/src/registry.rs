//! The kernel device list.
//!
//! The list is a fixed array of [`SLOT_COUNT`] entries, [`SLOT_STRIDE`]
//! bytes apart, whose first doubleword is the device name. Nothing else
//! about an entry is known or touched here. A slot is identified only by
//! the tag found in it at the moment it is read.

use crate::KernelMemory;
use data_types::addresses::KernelAddress;
use data_types::tag::Tag;
use log::debug;

pub const SLOT_STRIDE: u64 = 0x100;
pub const SLOT_COUNT: usize = 16;

/// A view onto the device list of the running kernel.
pub struct RegistryView<'m, M: KernelMemory + ?Sized> {
    memory: &'m mut M,
    base: KernelAddress,
}

impl<'m, M: KernelMemory + ?Sized> RegistryView<'m, M> {
    pub fn new(memory: &'m mut M, base: KernelAddress) -> Self {
        RegistryView { memory, base }
    }

    pub fn slot_address(&self, index: usize) -> KernelAddress {
        self.base.offset(SLOT_STRIDE, index)
    }

    pub fn read_slot(&self, index: usize) -> Tag {
        Tag::from_raw(self.memory.peek(self.slot_address(index)))
    }

    /// Index of the first slot holding `tag`
    pub fn find(&self, tag: Tag) -> Option<usize> {
        (0..SLOT_COUNT).find(|&index| self.read_slot(index) == tag)
    }

    /// Renames every slot holding `old` to `new`.
    ///
    /// Slots are rewritten one after another; a concurrent reader may see
    /// the list half renamed.
    ///
    /// # Returns
    /// * `usize` - How many slots were rewritten
    pub fn patch_all(&mut self, old: Tag, new: Tag) -> usize {
        let mut count = 0;
        for index in 0..SLOT_COUNT {
            if self.read_slot(index) == old {
                let address = self.slot_address(index);
                debug!("Device slot {} ({}): {} -> {}", index, address, old, new);
                self.memory.poke(address, new.raw());
                count += 1;
            }
        }
        count
    }

    /// Current contents of all slots
    pub fn tags(&self) -> [Tag; SLOT_COUNT] {
        core::array::from_fn(|index| self.read_slot(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulation::EmulatedConsole;
    use data_types::tag::TagSet;
    use firmware_table::firmware::FW_3_41;

    const CANONICAL: Tag = TagSet::FLASH.canonical;
    const TEMPORARY: Tag = TagSet::FLASH.temporary;
    const OTHER: Tag = Tag::from_name(b"_hdd0");

    #[track_caller]
    fn assert_slots(console: &mut EmulatedConsole, expected: &[Tag]) {
        let tags = RegistryView::new(console, FW_3_41.registry_base()).tags();
        assert_eq!(&tags[..expected.len()], expected);
        assert!(
            tags[expected.len()..].iter().all(|tag| *tag == Tag::EMPTY),
            "unexpected tags after slot {}: {:?}",
            expected.len(),
            tags
        );
    }

    #[test]
    fn slot_addresses() {
        let mut console = EmulatedConsole::new(&FW_3_41);
        let view = RegistryView::new(&mut console, FW_3_41.registry_base());
        assert_eq!(view.slot_address(0), FW_3_41.registry_base());
        assert_eq!(view.slot_address(3).address(), 0x80000000003EE770);
    }

    #[test]
    fn find_first_match() {
        let mut console =
            EmulatedConsole::new(&FW_3_41).with_slots(&[OTHER, CANONICAL, CANONICAL]);
        let view = RegistryView::new(&mut console, FW_3_41.registry_base());
        assert_eq!(view.find(CANONICAL), Some(1));
        assert_eq!(view.find(OTHER), Some(0));
        assert_eq!(view.find(TEMPORARY), None);
    }

    #[test]
    fn find_last_slot() {
        let mut slots = [Tag::EMPTY; SLOT_COUNT];
        slots[SLOT_COUNT - 1] = CANONICAL;
        let mut console = EmulatedConsole::new(&FW_3_41).with_slots(&slots);
        let view = RegistryView::new(&mut console, FW_3_41.registry_base());
        assert_eq!(view.find(CANONICAL), Some(SLOT_COUNT - 1));
    }

    #[test]
    fn find_is_idempotent() {
        let mut console = EmulatedConsole::new(&FW_3_41).with_slots(&[OTHER, CANONICAL]);
        let view = RegistryView::new(&mut console, FW_3_41.registry_base());
        let first = view.find(CANONICAL);
        let second = view.find(CANONICAL);
        assert_eq!(first, second);
        assert_eq!(view.find(TEMPORARY), view.find(TEMPORARY));
        drop(view);
        assert!(console.writes().is_empty());
    }

    #[test]
    fn ignores_memory_past_last_slot() {
        let mut console = EmulatedConsole::new(&FW_3_41);
        let past_end = FW_3_41.registry_base().offset(SLOT_STRIDE, SLOT_COUNT);
        console.poke(past_end, CANONICAL.raw());

        let mut view = RegistryView::new(&mut console, FW_3_41.registry_base());
        assert_eq!(view.find(CANONICAL), None);
        assert_eq!(view.patch_all(CANONICAL, TEMPORARY), 0);
        drop(view);
        assert_eq!(console.peek(past_end), CANONICAL.raw());
    }

    #[test]
    fn patch_all_renames_every_match() {
        let mut console =
            EmulatedConsole::new(&FW_3_41).with_slots(&[CANONICAL, CANONICAL, OTHER, CANONICAL]);
        let mut view = RegistryView::new(&mut console, FW_3_41.registry_base());

        assert_eq!(view.patch_all(CANONICAL, TEMPORARY), 3);
        assert_slots(&mut console, &[TEMPORARY, TEMPORARY, OTHER, TEMPORARY]);
    }

    #[test]
    fn patch_all_without_match() {
        let mut console = EmulatedConsole::new(&FW_3_41).with_slots(&[OTHER]);
        let mut view = RegistryView::new(&mut console, FW_3_41.registry_base());

        assert_eq!(view.patch_all(CANONICAL, TEMPORARY), 0);
        drop(view);
        assert!(console.writes().is_empty());
        assert_slots(&mut console, &[OTHER]);
    }

    #[test]
    fn patch_all_round_trip() {
        let original = [OTHER, CANONICAL, Tag::EMPTY, CANONICAL, OTHER];
        let mut console = EmulatedConsole::new(&FW_3_41).with_slots(&original);
        let mut view = RegistryView::new(&mut console, FW_3_41.registry_base());

        let out = view.patch_all(CANONICAL, TEMPORARY);
        let back = view.patch_all(TEMPORARY, CANONICAL);
        assert_eq!(out, back);
        assert_slots(&mut console, &[OTHER, CANONICAL, Tag::EMPTY, CANONICAL, OTHER]);
    }
}
