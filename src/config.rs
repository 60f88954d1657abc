//! constants for userfs
#![allow(unused)]

/// Filesystem type name used for registration and mounting
pub const USERFS_FS_TYPE: &str = "userfs";

/// Superblock magic reported by statfs
pub const USERFS_MAGIC: u64 = 0x1337_1337;

/// Root listing offset past which the listing is complete.
/// Must stay above the number of entries a single pass can emit.
pub const USERFS_DIRS_OFFSET: usize = 1 << 30;

// procs rendering
/// Default rendering budget of a `procs` file, in bytes
pub const MAX_OUTPUT_SIZE: usize = 8192;
/// Smallest accepted `max_output` mount option
pub const MIN_OUTPUT_SIZE: usize = 256;
/// Largest accepted `max_output` mount option (1MB)
pub const MAX_OUTPUT_SIZE_LIMIT: usize = 1024 * 1024;
/// Minimum width of the left-justified PID column
pub const PID_COLUMN_WIDTH: usize = 7;
/// Name of the single file in each uid directory
pub const PROCS_FILE_NAME: &str = "procs";
/// First line of every `procs` file
pub const PROCS_HEADING: &str = "PID     Nume";

/// ANSI green, wraps the heading in color mode
pub const COLOR_GREEN: &str = "\x1b[32m";
/// ANSI reset
pub const COLOR_RESET: &str = "\x1b[0m";

// superblock
/// Block size reported by statfs
pub const BLOCK_SIZE: usize = 4096;
/// Longest name statfs advertises
pub const MAX_FILENAME_LEN: usize = 255;

/// Inode number of the mount root
pub const ROOT_INODE_NO: usize = 1;
