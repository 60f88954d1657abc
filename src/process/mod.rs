//! Process directory facade
//!
//! The filesystem never owns process state. It asks a [`ProcessDirectory`]
//! to stream the live process table and keeps nothing from a scan except
//! what it copies out inside the callback.
//!
//! Implementations:
//! - [`ProcessTable`] - in-memory table fed by the host (kernels, tests)
//! - [`LinuxProcfs`] - the live Linux process table via `/proc` (`std` only)

use core::ops::ControlFlow;

use alloc::vec::Vec;

use crate::vfs::FsError;

#[cfg(feature = "std")]
mod linux;
mod table;

#[cfg(feature = "std")]
pub use linux::LinuxProcfs;
pub use table::{OwnedProcess, ProcessTable};

/// One live process as seen during a scan.
///
/// Borrowed from the scan; it must not outlive the callback it was passed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessRecord<'a> {
    /// Process id
    pub pid: u32,
    /// Real uid of the owner
    pub owner_uid: u32,
    /// Short command name, without arguments
    pub command_name: &'a str,
}

/// Source of live processes.
///
/// `for_each_live_process` runs the callback once per process, in the
/// source's enumeration order, under whatever consistency guarantee the
/// source provides for one scan. The callback must not block and may stop the
/// scan early by returning [`ControlFlow::Break`].
pub trait ProcessDirectory: Send + Sync {
    /// Run `f` once per live process until the scan ends or `f` breaks.
    fn for_each_live_process(
        &self,
        f: &mut dyn FnMut(&ProcessRecord<'_>) -> ControlFlow<()>,
    ) -> Result<(), FsError>;

    /// Owner uid of every live process, in enumeration order (duplicates kept).
    fn owner_uids(&self) -> Result<Vec<u32>, FsError> {
        let mut uids = Vec::new();
        self.for_each_live_process(&mut |p| {
            uids.push(p.owner_uid);
            ControlFlow::Continue(())
        })?;
        Ok(uids)
    }

    /// Whether any live process is owned by `uid`. Stops at the first match.
    fn has_owner(&self, uid: u32) -> Result<bool, FsError> {
        let mut found = false;
        self.for_each_live_process(&mut |p| {
            if p.owner_uid == uid {
                found = true;
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(found)
    }
}
