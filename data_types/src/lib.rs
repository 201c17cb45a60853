#![cfg_attr(all(feature = "nostd", not(test)), no_std)]

#[cfg(all(feature = "nostd", not(test)))]
extern crate core;

#[cfg(all(feature = "nostd", not(test)))]
mod nostd;
#[cfg(all(feature = "nostd", not(test)))]
use nostd as cstd;
#[cfg(any(not(feature = "nostd"), test))]
use std as cstd;

pub mod addresses;
pub mod patch;
pub mod tag;
pub mod version;

pub use addresses::KernelAddress;
pub use patch::{PatchEntry, PatchSet};
pub use tag::{Tag, TagSet};
pub use version::FirmwareVersion;
