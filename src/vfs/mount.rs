//! 挂载表
//!
//! 挂载路径到文件系统实例的映射，按最长前缀匹配解析路径。

use crate::sync::SpinLock;
use crate::vfs::path::{PathComponent, parse_path, strip_mount_prefix};
use crate::vfs::fs_type::FsTypeRegistry;
use crate::vfs::{Dentry, FileSystem, FsError, normalize_path};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

bitflags::bitflags! {
    /// 挂载标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MountFlags: u32 {
        /// 只读挂载
        const READ_ONLY  = 1 << 0;
    }
}

/// 挂载点信息
pub struct MountPoint {
    /// 挂载的文件系统
    pub fs: Arc<dyn FileSystem>,

    /// 挂载点的根 dentry
    pub root: Arc<Dentry>,

    /// 挂载标志
    pub flags: MountFlags,

    /// 设备路径（如果有）
    pub device: Option<String>,

    /// 挂载路径
    pub mount_path: String,
}

impl MountPoint {
    /// 创建新的挂载点
    pub fn new(
        fs: Arc<dyn FileSystem>,
        mount_path: String,
        flags: MountFlags,
        device: Option<String>,
    ) -> Arc<Self> {
        let root = fs.root_dentry();

        Arc::new(Self {
            fs,
            root,
            flags,
            device,
            mount_path,
        })
    }
}

/// 挂载表
pub struct MountTable {
    /// 挂载路径 -> 挂载点
    mounts: SpinLock<BTreeMap<String, Arc<MountPoint>>>,
}

impl MountTable {
    /// 创建新的挂载表
    pub const fn new() -> Self {
        Self {
            mounts: SpinLock::new(BTreeMap::new()),
        }
    }

    /// 挂载文件系统
    ///
    /// 只读文件系统总是带 [`MountFlags::READ_ONLY`] 挂载。
    pub fn mount(
        &self,
        fs: Arc<dyn FileSystem>,
        path: &str,
        flags: MountFlags,
        device: Option<String>,
    ) -> Result<Arc<MountPoint>, FsError> {
        let normalized_path = normalize_path(path);
        let flags = if fs.is_read_only() {
            flags | MountFlags::READ_ONLY
        } else {
            flags
        };

        let mut mounts = self.mounts.lock();
        if mounts.contains_key(&normalized_path) {
            return Err(FsError::AlreadyExists);
        }

        let mount_point = MountPoint::new(fs, normalized_path.clone(), flags, device);
        mounts.insert(normalized_path, mount_point.clone());

        Ok(mount_point)
    }

    /// 按类型名创建实例并挂载
    pub fn mount_by_type(
        &self,
        registry: &FsTypeRegistry,
        fs_type: &str,
        path: &str,
        data: &str,
        flags: MountFlags,
    ) -> Result<Arc<MountPoint>, FsError> {
        let fs_type = registry.get(fs_type).ok_or(FsError::NotSupported)?;
        let fs = fs_type.mount(data)?;
        self.mount(fs, path, flags, None)
    }

    /// 卸载文件系统
    pub fn umount(&self, path: &str) -> Result<(), FsError> {
        let normalized_path = normalize_path(path);

        let mount_point = self
            .mounts
            .lock()
            .remove(&normalized_path)
            .ok_or(FsError::NotFound)?;

        // 同步文件系统
        mount_point.fs.sync()?;

        // 执行卸载清理（在锁外，卸载可能释放大量节点）
        mount_point.fs.umount()?;

        Ok(())
    }

    /// 查找给定路径的挂载点
    ///
    /// 返回按路径组件最长匹配的挂载点
    pub fn find_mount(&self, path: &str) -> Option<Arc<MountPoint>> {
        let normalized_path = normalize_path(path);
        let mounts = self.mounts.lock();

        mounts
            .iter()
            .filter(|(mount_path, _)| strip_mount_prefix(&normalized_path, mount_path).is_some())
            .max_by_key(|(mount_path, _)| mount_path.len())
            .map(|(_, mp)| mp.clone())
    }

    /// 把绝对路径解析为 dentry
    pub fn resolve(&self, path: &str) -> Result<Arc<Dentry>, FsError> {
        let normalized_path = normalize_path(path);
        let mount = self.find_mount(&normalized_path).ok_or(FsError::NotFound)?;
        let rest = strip_mount_prefix(&normalized_path, &mount.mount_path).ok_or(FsError::NotFound)?;

        let mut current = mount.root.clone();
        for component in parse_path(rest) {
            if let PathComponent::Normal(name) = component {
                current = current.walk(name)?;
            }
        }
        Ok(current)
    }

    /// 列出所有挂载点（路径，文件系统类型）
    pub fn list_mounts(&self) -> Vec<(String, String)> {
        let mounts = self.mounts.lock();
        mounts
            .iter()
            .map(|(path, mp)| (path.clone(), String::from(mp.fs.fs_type())))
            .collect()
    }
}

impl Default for MountTable {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    /// 全局挂载表
    pub static ref MOUNT_TABLE: MountTable = MountTable::new();
}
