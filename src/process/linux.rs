//! Live Linux process table read from procfs.
//!
//! Every numeric entry under the procfs root is a process. The owner is the
//! real uid (first field of the `Uid:` line in `status`) and the command name
//! comes from `comm`. A process that exits while the scan is reading it simply
//! drops out of the scan.

use core::ops::ControlFlow;

use std::fs;
use std::path::{Path, PathBuf};
use std::string::String;

use crate::process::{ProcessDirectory, ProcessRecord};
use crate::vfs::FsError;

/// [`ProcessDirectory`] over a procfs directory tree.
pub struct LinuxProcfs {
    root: PathBuf,
}

impl LinuxProcfs {
    /// Read the live process table from `/proc`.
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Read a procfs mounted (or mirrored) somewhere other than `/proc`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_process(dir: &Path) -> Option<(u32, String)> {
        let status = fs::read_to_string(dir.join("status")).ok()?;
        let uid = parse_real_uid(&status)?;
        let comm = fs::read_to_string(dir.join("comm")).ok()?;
        Some((uid, String::from(comm.trim_end_matches('\n'))))
    }
}

impl Default for LinuxProcfs {
    fn default() -> Self {
        Self::new()
    }
}

/// Real uid from the `Uid:` line of `/proc/<pid>/status`.
fn parse_real_uid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|uid| uid.parse().ok())
}

impl ProcessDirectory for LinuxProcfs {
    fn for_each_live_process(
        &self,
        f: &mut dyn FnMut(&ProcessRecord<'_>) -> ControlFlow<()>,
    ) -> Result<(), FsError> {
        for entry in fs::read_dir(&self.root)? {
            let Ok(entry) = entry else { continue };
            let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) else {
                continue;
            };
            let Some((owner_uid, command_name)) = Self::read_process(&entry.path()) else {
                continue;
            };
            let record = ProcessRecord {
                pid,
                owner_uid,
                command_name: &command_name,
            };
            if f(&record).is_break() {
                break;
            }
        }
        Ok(())
    }
}
