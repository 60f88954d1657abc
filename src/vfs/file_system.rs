//! 文件系统接口
//!
//! 挂载表只通过 [`FileSystem`] 与具体文件系统打交道。
//! 这里的文件系统都是合成的：没有块设备，也没有需要回写的数据，
//! 所以 `sync` 默认直接成功，[`StatFs`] 的块计数恒为 0。

use crate::config::{BLOCK_SIZE, MAX_FILENAME_LEN};
use crate::vfs::{Dentry, FsError, Inode};
use alloc::sync::Arc;

/// 文件系统 trait
///
/// 一个实现对应一个挂载实例。
pub trait FileSystem: Send + Sync {
    /// 文件系统类型名称，即注册到 [`FsTypeRegistry`](crate::vfs::FsTypeRegistry) 的名字
    fn fs_type(&self) -> &'static str;

    /// 根目录 inode
    fn root_inode(&self) -> Arc<dyn Inode>;

    /// 根 dentry
    ///
    /// 文件系统在 `iterate` / `lookup` 中自行挂接子项，
    /// 每次调用都必须返回同一个根，挂载点与路径解析共用这棵树。
    fn root_dentry(&self) -> Arc<Dentry>;

    /// 是否只读；只读文件系统总是带 [`MountFlags::READ_ONLY`](crate::vfs::MountFlags::READ_ONLY) 挂载
    fn is_read_only(&self) -> bool {
        false
    }

    /// 把未写回的数据刷到后备存储；没有后备存储时什么也不做
    fn sync(&self) -> Result<(), FsError> {
        Ok(())
    }

    /// 获取文件系统统计信息
    fn statfs(&self) -> Result<StatFs, FsError>;

    /// 卸载清理
    ///
    /// 调用时挂载点已从挂载表摘除并 `sync` 过，之后实例不再合成任何节点。
    fn umount(&self) -> Result<(), FsError>;
}

/// 文件系统统计信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatFs {
    /// 文件系统类型魔数
    pub magic: u64,

    /// 块大小（单位：字节）
    pub block_size: usize,

    /// 总块数
    pub total_blocks: usize,

    /// 空闲块数
    pub free_blocks: usize,

    /// 当前存在的 inode 数
    pub total_inodes: usize,

    /// 最大文件名长度
    pub max_filename_len: usize,
}

impl StatFs {
    /// 没有后备存储的文件系统：块计数为 0，只报告节点数
    pub fn synthetic(magic: u64, total_inodes: usize) -> Self {
        Self {
            magic,
            block_size: BLOCK_SIZE,
            total_blocks: 0,
            free_blocks: 0,
            total_inodes,
            max_filename_len: MAX_FILENAME_LEN,
        }
    }
}
