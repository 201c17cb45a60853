//! Device registry tags
//!
//! The kernel identifies storage devices in its device list by an
//! eight byte name stored as a single big-endian doubleword, padded
//! with zero bytes. `"_flash"` for example is `0x5F666C6173680000`.

use crate::cstd::fmt;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u64);

impl Tag {
    /// Packs up to eight name bytes into a tag.
    #[track_caller]
    pub const fn from_name(name: &[u8]) -> Self {
        if name.len() > 8 {
            panic!("Device name longer than 8 bytes");
        }

        let mut value = 0u64;
        let mut i = 0;
        while i < 8 {
            let byte = if i < name.len() { name[i] } else { 0 };
            value = (value << 8) | byte as u64;
            i += 1;
        }
        Tag(value)
    }

    pub const fn from_raw(value: u64) -> Self {
        Tag(value)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub const fn bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Empty registry slot
    pub const EMPTY: Tag = Tag(0);
}

impl From<u64> for Tag {
    fn from(value: u64) -> Self {
        Tag(value)
    }
}

impl From<Tag> for u64 {
    fn from(value: Tag) -> Self {
        value.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.bytes();
        let printable = bytes
            .iter()
            .take_while(|b| **b != 0)
            .all(|b| b.is_ascii_graphic());
        let trailing_zeros = bytes.iter().skip_while(|b| **b != 0).all(|b| *b == 0);

        if printable && trailing_zeros && self.0 != 0 {
            for b in bytes.iter().take_while(|b| **b != 0) {
                write!(f, "{}", *b as char)?;
            }
            Ok(())
        } else {
            write!(f, "{:016x}", self.0)
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}

/// The three names a device passes through while it is remounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSet {
    /// Name the device is normally known by
    pub canonical: Tag,
    /// Parking name for the original entries while the mount runs
    pub temporary: Tag,
    /// Name given to the entry created by the mount
    pub final_alias: Tag,
}

impl TagSet {
    pub const FLASH: TagSet = TagSet {
        canonical: Tag::from_name(b"_flash"),
        temporary: Tag::from_name(b"_flashX"),
        final_alias: Tag::from_name(b"_fflash"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_tags_match_kernel_values() {
        assert_eq!(TagSet::FLASH.canonical.raw(), 0x5F666C6173680000);
        assert_eq!(TagSet::FLASH.temporary.raw(), 0x5F666C6173685800);
        assert_eq!(TagSet::FLASH.final_alias.raw(), 0x5F66666C61736800);
    }

    #[test]
    fn display_names() {
        assert_eq!(TagSet::FLASH.canonical.to_string(), "_flash");
        assert_eq!(TagSet::FLASH.final_alias.to_string(), "_fflash");
        assert_eq!(Tag::from_name(b"_dev_usb").to_string(), "_dev_usb");
        assert_eq!(Tag::EMPTY.to_string(), "0000000000000000");
        assert_eq!(Tag::from_raw(0x0102).to_string(), "0000000000000102");
    }

    #[test]
    #[should_panic]
    fn name_too_long() {
        let _ = Tag::from_name(b"_too_long");
    }
}
