//! userfs 挂载实例

use alloc::sync::Arc;

use crate::config::{USERFS_FS_TYPE, USERFS_MAGIC};
use crate::fs::userfs::MountOptions;
use crate::fs::userfs::synth::SynthesisEngine;
use crate::process::ProcessDirectory;
use crate::vfs::{Dentry, FileSystem, FsError, Inode, StatFs};
use crate::pr_info;

/// 一个 userfs 挂载实例
///
/// 每个实例拥有自己的目录缓存与列举代数，卸载时一并销毁。
pub struct UserFs {
    engine: Arc<SynthesisEngine>,
}

impl UserFs {
    /// 按挂载数据字符串创建实例
    pub fn mount(source: Arc<dyn ProcessDirectory>, data: &str) -> Result<Arc<Self>, FsError> {
        let options = MountOptions::parse(data)?;
        Ok(Self::with_options(source, options))
    }

    /// 创建新的 UserFs 实例
    pub fn new(source: Arc<dyn ProcessDirectory>) -> Arc<Self> {
        Self::with_options(source, MountOptions::default())
    }

    /// 以给定挂载选项创建实例
    pub fn with_options(source: Arc<dyn ProcessDirectory>, options: MountOptions) -> Arc<Self> {
        pr_info!(
            "userfs: new instance (color={}, max_output={})",
            options.color,
            options.max_output
        );
        Arc::new(Self {
            engine: SynthesisEngine::new(source, options),
        })
    }

    /// 挂载选项
    pub fn options(&self) -> &MountOptions {
        self.engine.options()
    }

    /// 最近一次完成的根目录列举的代数
    pub fn generation(&self) -> u64 {
        self.engine.generation()
    }

    /// 缓存中的 uid 目录数
    pub fn cached_dirs(&self) -> usize {
        self.engine.cached_dirs()
    }

    /// uid 目录最近一次被列举产出时的代数
    pub fn last_emitted(&self, uid: u32) -> Option<u64> {
        self.engine.last_emitted(uid)
    }

    /// 让下一次目录创建的内存预留失败
    #[cfg(test)]
    pub(crate) fn fail_next_reservation(&self) {
        self.engine.fail_next_reservation();
    }
}

impl FileSystem for UserFs {
    fn fs_type(&self) -> &'static str {
        USERFS_FS_TYPE
    }

    fn root_inode(&self) -> Arc<dyn Inode> {
        self.engine.root_inode()
    }

    fn root_dentry(&self) -> Arc<Dentry> {
        self.engine.root().clone()
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn statfs(&self) -> Result<StatFs, FsError> {
        // 根目录 + 每个 uid 目录及其 procs
        let inodes = self.engine.cached_dirs() * 2 + 1;
        Ok(StatFs::synthetic(USERFS_MAGIC, inodes))
    }

    fn umount(&self) -> Result<(), FsError> {
        self.engine.teardown();
        Ok(())
    }
}
