//! 文件系统类型注册表
//!
//! 文件系统按类型名注册一个挂载函数；挂载时按名字找到类型，
//! 以挂载数据字符串构造一个新实例。

use crate::sync::SpinLock;
use crate::vfs::{FileSystem, FsError};
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// 挂载函数：挂载数据 -> 文件系统实例
pub type MountFn = dyn Fn(&str) -> Result<Arc<dyn FileSystem>, FsError> + Send + Sync;

/// 已注册的文件系统类型
pub struct FileSystemType {
    /// 类型名称
    pub name: &'static str,

    mount: Arc<MountFn>,
}

impl FileSystemType {
    /// 以名称和挂载函数构造类型
    pub fn new<F>(name: &'static str, mount: F) -> Arc<Self>
    where
        F: Fn(&str) -> Result<Arc<dyn FileSystem>, FsError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            name,
            mount: Arc::new(mount),
        })
    }

    /// 以挂载数据创建一个新实例
    pub fn mount(&self, data: &str) -> Result<Arc<dyn FileSystem>, FsError> {
        (self.mount)(data)
    }
}

/// 文件系统类型注册表
pub struct FsTypeRegistry {
    types: SpinLock<BTreeMap<&'static str, Arc<FileSystemType>>>,
}

impl FsTypeRegistry {
    /// 空注册表
    pub const fn new() -> Self {
        Self {
            types: SpinLock::new(BTreeMap::new()),
        }
    }

    /// 注册一个文件系统类型，同名类型已存在时返回 `AlreadyExists`
    pub fn register(&self, fs_type: Arc<FileSystemType>) -> Result<(), FsError> {
        let mut types = self.types.lock();
        if types.contains_key(fs_type.name) {
            return Err(FsError::AlreadyExists);
        }
        types.insert(fs_type.name, fs_type);
        Ok(())
    }

    /// 注销文件系统类型（已挂载的实例不受影响）
    pub fn unregister(&self, name: &str) -> Result<Arc<FileSystemType>, FsError> {
        self.types.lock().remove(name).ok_or(FsError::NotFound)
    }

    /// 按名称查找类型
    pub fn get(&self, name: &str) -> Option<Arc<FileSystemType>> {
        self.types.lock().get(name).cloned()
    }

    /// 已注册的类型名
    pub fn names(&self) -> Vec<&'static str> {
        self.types.lock().keys().copied().collect()
    }
}

impl Default for FsTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    /// 全局文件系统类型注册表
    pub static ref FS_TYPES: FsTypeRegistry = FsTypeRegistry::new();
}
