use core::ops::ControlFlow;

use alloc::string::String;
use alloc::vec::Vec;

use crate::process::{ProcessDirectory, ProcessRecord};
use crate::sync::SpinLock;
use crate::vfs::FsError;

/// Owned copy of a process entry kept by [`ProcessTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedProcess {
    /// Process id
    pub pid: u32,
    /// Real uid of the owner
    pub owner_uid: u32,
    /// Short command name
    pub command_name: String,
}

impl OwnedProcess {
    /// Copy a process entry out of borrowed parts.
    pub fn new(pid: u32, owner_uid: u32, command_name: &str) -> Self {
        Self {
            pid,
            owner_uid,
            command_name: String::from(command_name),
        }
    }
}

/// In-memory process table.
///
/// The host pushes process creation and exit into it; a scan holds the
/// table lock, so every scan sees one consistent set of processes.
/// Enumeration order is insertion order.
#[derive(Default)]
pub struct ProcessTable {
    processes: SpinLock<Vec<OwnedProcess>>,
}

impl ProcessTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding `(pid, owner_uid, command_name)` entries in the given order.
    pub fn from_processes<I>(processes: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32, &'static str)>,
    {
        let table = Self::new();
        for (pid, uid, name) in processes {
            table.spawn(pid, uid, name);
        }
        table
    }

    /// Add a process; a pid that is already present is replaced in place.
    pub fn spawn(&self, pid: u32, owner_uid: u32, command_name: &str) {
        let mut processes = self.processes.lock();
        let process = OwnedProcess::new(pid, owner_uid, command_name);
        match processes.iter_mut().find(|p| p.pid == pid) {
            Some(slot) => *slot = process,
            None => processes.push(process),
        }
    }

    /// Remove a process. Returns `false` if the pid was not present.
    pub fn exit(&self, pid: u32) -> bool {
        let mut processes = self.processes.lock();
        let before = processes.len();
        processes.retain(|p| p.pid != pid);
        processes.len() != before
    }

    /// Replace the whole table.
    pub fn replace(&self, processes: Vec<OwnedProcess>) {
        *self.processes.lock() = processes;
    }

    /// Number of live processes.
    pub fn len(&self) -> usize {
        self.processes.lock().len()
    }

    /// Whether no process is live.
    pub fn is_empty(&self) -> bool {
        self.processes.lock().is_empty()
    }
}

impl ProcessDirectory for ProcessTable {
    fn for_each_live_process(
        &self,
        f: &mut dyn FnMut(&ProcessRecord<'_>) -> ControlFlow<()>,
    ) -> Result<(), FsError> {
        let processes = self.processes.lock();
        for p in processes.iter() {
            let record = ProcessRecord {
                pid: p.pid,
                owner_uid: p.owner_uid,
                command_name: &p.command_name,
            };
            if f(&record).is_break() {
                break;
            }
        }
        Ok(())
    }
}
