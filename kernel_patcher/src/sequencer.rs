//! Unlocking the flash, start to finish.
//!
//! The kernel refuses to mount a device under a name that is already
//! listed, so the listed flash entries are renamed out of the way, the
//! flash is mounted again over the patched kernel, the new entry gets an
//! alias of its own and the original entries get their name back.
//!
//! ```text
//! Init -> Detecting -> PatchingKernel -> RenamingOut -> Mounting -> RenamingIn -> Restoring
//!   |         |                             |                                       |
//!   +---------+-----------------------------+---------> Failed            Success / Failed
//! ```
//!
//! Once entries are renamed out, every path to a terminal state passes
//! through `Restoring`. Dropping a sequencer midway restores them as well.

use crate::patch::apply_patches;
use crate::registry::RegistryView;
use crate::version::detect_firmware;
use crate::{Error, KernelMemory, Mount, MountRequest, Result};
use data_types::addresses::KernelAddress;
use data_types::tag::TagSet;
use firmware_table::FirmwareDescriptor;
use log::{error, info, warn};

#[derive(Debug, Clone, Copy)]
pub enum State {
    Init,
    Detecting(&'static FirmwareDescriptor),
    PatchingKernel(&'static FirmwareDescriptor),
    RenamingOut(&'static FirmwareDescriptor),
    Mounting(&'static FirmwareDescriptor),
    RenamingIn(&'static FirmwareDescriptor),
    Restoring,
    Success,
    Failed(Error),
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::Init => "Init",
            State::Detecting(_) => "Detecting",
            State::PatchingKernel(_) => "PatchingKernel",
            State::RenamingOut(_) => "RenamingOut",
            State::Mounting(_) => "Mounting",
            State::RenamingIn(_) => "RenamingIn",
            State::Restoring => "Restoring",
            State::Success => "Success",
            State::Failed(_) => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Success | State::Failed(_))
    }
}

pub struct MountSequencer<'p, P: KernelMemory + Mount + ?Sized> {
    platform: &'p mut P,
    tags: TagSet,
    request: MountRequest,
    state: State,
    /// Device list holding entries renamed to the temporary tag
    hidden_in: Option<KernelAddress>,
    failure: Option<Error>,
}

impl<'p, P: KernelMemory + Mount + ?Sized> MountSequencer<'p, P> {
    /// Sequencer unlocking the internal flash
    pub fn new(platform: &'p mut P) -> Self {
        Self::with_target(platform, TagSet::FLASH, MountRequest::FLASH)
    }

    pub fn with_target(platform: &'p mut P, tags: TagSet, request: MountRequest) -> Self {
        MountSequencer {
            platform,
            tags,
            request,
            state: State::Init,
            hidden_in: None,
            failure: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Performs the work of the current state and moves to the next one.
    /// Terminal states stay where they are.
    pub fn step(&mut self) -> State {
        let current = self.state;
        let next = match current {
            State::Init => self.detect(),
            State::Detecting(firmware) => self.check_not_applied(firmware),
            State::PatchingKernel(firmware) => self.patch_kernel(firmware),
            State::RenamingOut(firmware) => self.rename_out(firmware),
            State::Mounting(firmware) => self.mount(firmware),
            State::RenamingIn(firmware) => self.rename_in(firmware),
            State::Restoring => self.restore(),
            terminal => return terminal,
        };

        let next = match next {
            State::Failed(err) if self.hidden_in.is_some() => {
                self.failure = self.failure.or(Some(err));
                State::Restoring
            }
            next => next,
        };

        info!("{} -> {}", current.name(), next.name());
        self.state = next;
        next
    }

    /// Steps until a terminal state is reached.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.step() {
                State::Success => return Ok(()),
                State::Failed(err) => return Err(err),
                _ => {}
            }
        }
    }

    fn registry(&mut self, base: KernelAddress) -> RegistryView<'_, P> {
        RegistryView::new(&mut *self.platform, base)
    }

    fn detect(&mut self) -> State {
        match detect_firmware(&*self.platform) {
            Ok(firmware) => State::Detecting(firmware),
            Err(err) => State::Failed(err),
        }
    }

    fn check_not_applied(&mut self, firmware: &'static FirmwareDescriptor) -> State {
        let tag = self.tags.final_alias;
        match self.registry(firmware.registry_base()).find(tag) {
            Some(slot) => State::Failed(Error::AlreadyApplied { tag, slot }),
            None => State::PatchingKernel(firmware),
        }
    }

    fn patch_kernel(&mut self, firmware: &'static FirmwareDescriptor) -> State {
        apply_patches(&mut *self.platform, firmware.patches());
        State::RenamingOut(firmware)
    }

    fn rename_out(&mut self, firmware: &'static FirmwareDescriptor) -> State {
        let TagSet {
            canonical,
            temporary,
            ..
        } = self.tags;
        let base = firmware.registry_base();

        let count = self.registry(base).patch_all(canonical, temporary);
        match count {
            0 => State::Failed(Error::NoCanonicalEntries { tag: canonical }),
            _ => {
                info!("Renamed {} '{}' entries to '{}'", count, canonical, temporary);
                self.hidden_in = Some(base);
                State::Mounting(firmware)
            }
        }
    }

    fn mount(&mut self, firmware: &'static FirmwareDescriptor) -> State {
        if let Err(err) = self.platform.mount(&self.request) {
            error!(
                "Mounting {} on {} failed: {}",
                self.request.device, self.request.mount_point, err
            );
            self.failure = self.failure.or(Some(Error::MountFailed(err)));
        }
        State::RenamingIn(firmware)
    }

    fn rename_in(&mut self, firmware: &'static FirmwareDescriptor) -> State {
        let TagSet {
            canonical,
            final_alias,
            ..
        } = self.tags;
        let count = self.registry(firmware.registry_base()).patch_all(canonical, final_alias);
        info!("Renamed {} new '{}' entries to '{}'", count, canonical, final_alias);
        State::Restoring
    }

    fn restore(&mut self) -> State {
        self.unhide();
        match self.failure.take() {
            None => State::Success,
            Some(err) => State::Failed(err),
        }
    }

    fn unhide(&mut self) {
        let Some(base) = self.hidden_in.take() else {
            return;
        };
        let TagSet {
            canonical,
            temporary,
            ..
        } = self.tags;
        let count = self.registry(base).patch_all(temporary, canonical);
        info!("Restored {} '{}' entries", count, canonical);
    }
}

impl<'p, P: KernelMemory + Mount + ?Sized> Drop for MountSequencer<'p, P> {
    fn drop(&mut self) {
        if self.hidden_in.is_some() {
            warn!("Sequencer dropped in state {}, restoring device list", self.state.name());
            self.unhide();
        }
    }
}
