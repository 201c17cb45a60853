use crate::FirmwareDescriptor;
use data_types::addresses::KernelAddress;
use data_types::patch::{PatchEntry, PatchSet};
use data_types::version::FirmwareVersion;

const FW_3_41_PATCHES: &PatchSet = &[
    PatchEntry::new(0x800000000018F6B0, 0x480000483C008001),
    PatchEntry::new(0x800000000018F720, 0x480001202F9F0000),
    PatchEntry::new(0x8000000000192480, 0x4800004C4092FEC4),
    PatchEntry::new(0x8000000000192520, 0x600000002FBA0000),
    PatchEntry::new(0x800000000019282C, 0x63BD06664BFFD67D),
    PatchEntry::SENTINEL,
];

pub const FW_3_41: FirmwareDescriptor = FirmwareDescriptor::new(
    FirmwareVersion::from_parts(3, 41, 0),
    KernelAddress::from_const(0x80000000003EE470),
    FW_3_41_PATCHES,
);
