//! UserFS
//!
//! 一个只读的合成文件系统：根目录下每个拥有存活进程的 uid 对应一个目录，
//! 目录中只有一个 `procs` 文件，内容为该用户的进程表（PID 与命令名）。
//!
//! 所有节点都在列目录 / 查找时按需合成，没有任何后备存储。
//!
//! # 模块
//!
//! - [`vfs`] - 宿主文件系统框架（Inode、Dentry、挂载表、目录迭代协议）
//! - [`process`] - 进程目录门面（枚举存活进程）
//! - [`fs::userfs`] - 目录合成引擎、per-uid 缓存与 procs 文件读取
//! - [`log`] - `pr_*!` 日志宏
//! - [`sync`] - 自旋锁
#![no_std]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod config;
pub mod fs;
pub mod log;
pub mod process;
pub mod sync;
#[cfg(test)]
pub mod test;
pub mod vfs;

pub use fs::userfs::{MountOptions, UserFs, register_filesystem, unregister_filesystem};
pub use process::{ProcessDirectory, ProcessRecord, ProcessTable};
pub use vfs::FsError;
