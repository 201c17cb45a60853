use crate::cstd::fmt;
use core::ops::Add;

/// An address in the LV2 kernel address space.
///
/// Kernel memory on the console lives in the `0x8000_0000_0000_0000`
/// region. The zero address is reserved as the end marker of patch
/// tables, see [`crate::patch::PatchEntry::SENTINEL`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KernelAddress(u64);

impl KernelAddress {
    pub const fn from_const(value: u64) -> Self {
        KernelAddress(value)
    }

    /// Get the raw value of the address.
    pub const fn address(&self) -> u64 {
        self.0
    }

    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Address `count` strides after this one.
    #[track_caller]
    pub const fn offset(self, stride: u64, count: usize) -> Self {
        KernelAddress(self.0 + stride * count as u64)
    }

    pub const NULL: KernelAddress = KernelAddress::from_const(0);
}

impl From<u64> for KernelAddress {
    fn from(value: u64) -> Self {
        KernelAddress::from_const(value)
    }
}

impl From<KernelAddress> for u64 {
    fn from(value: KernelAddress) -> Self {
        value.0
    }
}

impl fmt::Display for KernelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl fmt::Debug for KernelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K{:016x}", self.0)
    }
}

impl Add<u64> for KernelAddress {
    type Output = Self;

    #[track_caller]
    fn add(self, other: u64) -> Self {
        KernelAddress::from_const(self.0 + other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_walks_strides() {
        let base = KernelAddress::from_const(0x80000000003EE470);
        assert_eq!(base.offset(0x100, 0), base);
        assert_eq!(base.offset(0x100, 1).address(), 0x80000000003EE570);
        assert_eq!(base.offset(0x100, 15).address(), 0x80000000003EF370);
        assert_eq!(base + 0x100, base.offset(0x100, 1));
    }

    #[test]
    fn null_address() {
        assert!(KernelAddress::NULL.is_null());
        assert!(!KernelAddress::from(0x8000000000000000).is_null());
    }

    #[test]
    fn formatting() {
        let addr = KernelAddress::from_const(0x80000000002D7580);
        assert_eq!(format!("{}", addr), "0x80000000002d7580");
        assert_eq!(format!("{:?}", addr), "K80000000002d7580");
    }
}
