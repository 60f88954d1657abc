//! 虚拟文件系统层
//!
//! 为文件系统实现提供宿主框架：节点（[`Inode`]）、目录树（[`Dentry`]）、
//! 分批目录迭代（[`DirContext`]）、挂载表与打开的文件句柄。
pub mod dentry;
pub mod dir_context;
pub mod error;
pub mod file;
pub mod file_system;
pub mod fs_type;
pub mod inode;
pub mod mount;
pub mod path;

pub use dentry::{Dentry, same_inode};
pub use dir_context::DirContext;
pub use error::FsError;
pub use file::{InodeFile, SeekWhence};
pub use file_system::{FileSystem, StatFs};
pub use fs_type::{FS_TYPES, FileSystemType, FsTypeRegistry};
pub use inode::{DirEntry, FileMode, Inode, InodeMetadata, InodeType, TimeSpec};
pub use mount::{MOUNT_TABLE, MountFlags, MountPoint, MountTable};
pub use path::{normalize_path, parse_path};

#[cfg(test)]
mod tests;
