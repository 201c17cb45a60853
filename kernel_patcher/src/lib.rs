#![cfg_attr(target_arch = "powerpc64", feature(asm_experimental_arch))]

pub use data_types::tag::{Tag, TagSet};
use thiserror_no_std::Error;

mod memory;
pub use memory::*;

#[cfg(target_arch = "powerpc64")]
pub mod lv2;
#[cfg(any(test, feature = "emulation"))]
pub mod emulation;

pub mod patch;
pub mod registry;
pub mod sequencer;
pub mod version;

pub use patch::apply_patches;
pub use registry::{RegistryView, SLOT_COUNT, SLOT_STRIDE};
pub use sequencer::{MountSequencer, State};
pub use version::{detect_firmware, FINGERPRINT_ADDRESS};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported firmware, version fingerprint {fingerprint:#018x}")]
    UnsupportedVersion { fingerprint: u64 },
    #[error("Already unlocked: '{tag}' present in device slot {slot}")]
    AlreadyApplied { tag: Tag, slot: usize },
    #[error("No '{tag}' device found to move out of the way")]
    NoCanonicalEntries { tag: Tag },
    #[error("Failed to mount: {0}")]
    MountFailed(MountError),
}

pub type Result<T> = core::result::Result<T, Error>;
