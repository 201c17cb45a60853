use crate::KernelMemory;
use data_types::patch::{active_entries, PatchSet};
use log::{debug, info};

/// Writes every entry of a patch set into kernel memory, in order, up to
/// the sentinel.
///
/// Nothing is verified and nothing is rolled back. Later entries may
/// rely on earlier ones already being in place, so the order of the set
/// is kept as is.
///
/// # Returns
/// * `usize` - The number of writes issued
pub fn apply_patches<M: KernelMemory + ?Sized>(memory: &mut M, patches: &PatchSet) -> usize {
    let mut count = 0;
    for entry in active_entries(patches) {
        debug!("Patching {} <- {:016x}", entry.address, entry.value);
        memory.poke(entry.address, entry.value);
        count += 1;
    }
    info!("Applied {} kernel patches", count);
    count
}
