use crate::cstd::fmt;

/// A system software version in the kernel's five digit encoding.
///
/// `34100` is firmware 3.41, `35502` would be 3.55.02.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmwareVersion(u32);

impl FirmwareVersion {
    pub const fn from_const(value: u32) -> Self {
        FirmwareVersion(value)
    }

    #[track_caller]
    pub const fn from_parts(major: u32, minor: u32, patch: u32) -> Self {
        if minor > 99 || patch > 99 {
            panic!("Minor and patch level must be below 100");
        }
        FirmwareVersion(major * 10000 + minor * 100 + patch)
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }

    pub const fn major(&self) -> u32 {
        self.0 / 10000
    }

    pub const fn minor(&self) -> u32 {
        (self.0 / 100) % 100
    }

    pub const fn patch(&self) -> u32 {
        self.0 % 100
    }

    /// Whether a raw fingerprint read from kernel memory denotes this version.
    pub const fn matches_fingerprint(&self, fingerprint: u64) -> bool {
        fingerprint == self.0 as u64
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major(), self.minor())?;
        if self.patch() != 0 {
            write!(f, ".{:02}", self.patch())?;
        }
        Ok(())
    }
}

impl fmt::Debug for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FW{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_parts() {
        let v = FirmwareVersion::from_const(34100);
        assert_eq!((v.major(), v.minor(), v.patch()), (3, 41, 0));
        assert_eq!(v, FirmwareVersion::from_parts(3, 41, 0));
        assert_eq!(v.to_string(), "3.41");
        assert_eq!(FirmwareVersion::from_parts(3, 55, 2).to_string(), "3.55.02");
    }

    #[test]
    fn fingerprint() {
        let v = FirmwareVersion::from_const(34100);
        assert!(v.matches_fingerprint(34100));
        assert!(!v.matches_fingerprint(34100 | (1 << 32)));
        assert!(!v.matches_fingerprint(35500));
    }
}
