//! Types for representing kernel patches
//!
//! A patch set is an ordered list of 64-bit writes into kernel memory.
//! The list is terminated by [`PatchEntry::SENTINEL`], an entry whose
//! address is zero. Entries after the sentinel are never looked at.

use crate::addresses::KernelAddress;
use crate::cstd::fmt;

/// A single 64-bit write into kernel memory.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchEntry {
    /// Where to write. Zero marks the end of a patch set.
    pub address: KernelAddress,
    /// The doubleword to store at `address`
    pub value: u64,
}

/// An ordered, sentinel terminated collection of patch entries
pub type PatchSet = [PatchEntry];

impl PatchEntry {
    pub const fn new(address: u64, value: u64) -> Self {
        PatchEntry {
            address: KernelAddress::from_const(address),
            value,
        }
    }

    pub const fn is_sentinel(&self) -> bool {
        self.address.is_null()
    }

    pub const SENTINEL: PatchEntry = PatchEntry::new(0, 0);
}

impl fmt::Debug for PatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            write!(f, "PatchEntry(end)")
        } else {
            write!(f, "PatchEntry({:?} <- {:016x})", self.address, self.value)
        }
    }
}

/// Iterates the entries of a patch set up to, not including, its sentinel.
///
/// The sentinel is the last entry pulled from `patches`. A set without a
/// sentinel is walked to its end.
pub fn active_entries<'a, I>(patches: I) -> impl Iterator<Item = &'a PatchEntry>
where
    I: IntoIterator<Item = &'a PatchEntry>,
{
    patches
        .into_iter()
        .take_while(|entry| !entry.is_sentinel())
}
