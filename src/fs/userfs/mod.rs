//! UserFS - 按用户分组的进程视图
//!
//! ```text
//! /                 根目录，列举时为每个拥有存活进程的 uid 合成一个目录
//! ├── 0/
//! │   └── procs     该 uid 的进程表
//! └── 1000/
//!     └── procs
//! ```
//!
//! - [`synth`] - 目录合成引擎（列举、查找、回收、卸载）
//! - [`cache`] - per-uid 目录缓存（代际槽表）
//! - [`generation`] - 列举代数与分批列举的续接规则
//! - [`procs`] - `procs` 文件渲染
//! - [`options`] - 挂载选项

pub mod cache;
pub mod generation;
pub mod inode;
pub mod options;
pub mod procs;
pub mod synth;
#[allow(clippy::module_inception)]
pub mod userfs;

pub use inode::UserFsInode;
pub use options::MountOptions;
pub use userfs::UserFs;

use alloc::sync::Arc;

use crate::config::USERFS_FS_TYPE;
use crate::process::ProcessDirectory;
use crate::vfs::{FS_TYPES, FileSystem, FileSystemType, FsError};
use crate::pr_info;

/// 向全局类型注册表注册 userfs，挂载实例从 `source` 读取进程
pub fn register_filesystem(source: Arc<dyn ProcessDirectory>) -> Result<(), FsError> {
    let fs_type = FileSystemType::new(USERFS_FS_TYPE, move |data| {
        let fs: Arc<dyn FileSystem> = UserFs::mount(source.clone(), data)?;
        Ok(fs)
    });
    FS_TYPES.register(fs_type)?;
    pr_info!("userfs: registered filesystem type '{}'", USERFS_FS_TYPE);
    Ok(())
}

/// 注销 userfs 类型；已挂载的实例继续工作直到卸载
pub fn unregister_filesystem() -> Result<(), FsError> {
    FS_TYPES.unregister(USERFS_FS_TYPE)?;
    pr_info!("userfs: unregistered filesystem type '{}'", USERFS_FS_TYPE);
    Ok(())
}
