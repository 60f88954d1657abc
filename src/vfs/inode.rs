//! Inode 接口与元数据
//!
//! [`Inode`] 是无状态的存储层接口：按偏移读写、按名字查找、分批迭代目录。
//! 会话状态（偏移量、目录迭代位置）由 [`InodeFile`](crate::vfs::InodeFile) 保存。

use crate::vfs::dir_context::DirContext;
use crate::vfs::error::FsError;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Inode类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeType {
    /// 普通文件
    File,
    /// 目录
    Directory,
}

impl InodeType {
    /// 对应 `getdents64` 的 `d_type`
    pub const fn as_d_type(&self) -> u8 {
        match self {
            InodeType::File => 8,      // DT_REG
            InodeType::Directory => 4, // DT_DIR
        }
    }
}

/// 时间戳结构
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpec {
    /// 秒
    pub sec: i64,
    /// 纳秒
    pub nsec: i64,
}

impl TimeSpec {
    /// 创建当前时间戳
    ///
    /// 没有 `std` 时宿主不提供时钟，返回零时间戳。
    pub fn now() -> Self {
        #[cfg(feature = "std")]
        {
            match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
                Ok(d) => Self {
                    sec: d.as_secs() as i64,
                    nsec: d.subsec_nanos() as i64,
                },
                Err(_) => Self::zero(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            Self::zero()
        }
    }

    /// 创建零时间戳
    pub fn zero() -> Self {
        Self { sec: 0, nsec: 0 }
    }
}

bitflags::bitflags! {
    /// 文件权限和类型（与 POSIX 兼容）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileMode: u32 {
        /// 文件类型掩码
        const S_IFMT   = 0o170000;
        /// 普通文件
        const S_IFREG  = 0o100000;
        /// 目录
        const S_IFDIR  = 0o040000;

        // 用户权限
        /// 用户读
        const S_IRUSR  = 0o400;
        /// 用户写
        const S_IWUSR  = 0o200;
        /// 用户执行
        const S_IXUSR  = 0o100;

        // 组权限
        /// 组读
        const S_IRGRP  = 0o040;
        /// 组写
        const S_IWGRP  = 0o020;
        /// 组执行
        const S_IXGRP  = 0o010;

        // 其他用户权限
        /// 其他读
        const S_IROTH  = 0o004;
        /// 其他写
        const S_IWOTH  = 0o002;
        /// 其他执行
        const S_IXOTH  = 0o001;

        /// 所有人可读
        const S_IRUGO  = Self::S_IRUSR.bits() | Self::S_IRGRP.bits() | Self::S_IROTH.bits();
        /// 所有人可执行
        const S_IXUGO  = Self::S_IXUSR.bits() | Self::S_IXGRP.bits() | Self::S_IXOTH.bits();
    }
}

impl FileMode {
    /// 只读目录：`dr-xr-xr-x`
    pub const fn dir_read_only() -> Self {
        Self::from_bits_truncate(Self::S_IFDIR.bits() | Self::S_IRUGO.bits() | Self::S_IXUGO.bits())
    }

    /// 只读普通文件：`-r--r--r--`
    pub const fn file_read_only() -> Self {
        Self::from_bits_truncate(Self::S_IFREG.bits() | Self::S_IRUGO.bits())
    }

    /// 权限位（去掉类型位）
    pub fn permissions(&self) -> u32 {
        self.bits() & 0o7777
    }
}

/// 轻量级目录项（readdir 返回）
///
/// 用于数据传输，无引用关系，读取后即可丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// 文件名
    pub name: String,
    /// Inode 编号
    pub inode_no: usize,
    /// 文件类型
    pub inode_type: InodeType,
}

/// Inode 元数据
#[derive(Debug, Clone)]
pub struct InodeMetadata {
    /// Inode 编号
    pub inode_no: usize,
    /// 文件类型
    pub inode_type: InodeType,
    /// 权限位
    pub mode: FileMode,
    /// 用户 ID
    pub uid: u32,
    /// 组 ID
    pub gid: u32,
    /// 文件大小（字节）
    pub size: usize,
    /// 访问时间
    pub atime: TimeSpec,
    /// 修改时间
    pub mtime: TimeSpec,
    /// 状态改变时间
    pub ctime: TimeSpec,
    /// 硬链接数
    pub nlinks: usize,
    /// 占用的块数（512B 为单位）
    pub blocks: usize,
}

/// Inode trait - 所有文件系统必须实现
///
/// 同一 trait 覆盖文件与目录两类节点；不适用于该类节点的操作返回
/// `IsDirectory` / `NotDirectory`。
pub trait Inode: Send + Sync {
    /// 获取 inode 元数据
    fn metadata(&self) -> Result<InodeMetadata, FsError>;

    /// 打开文件时的回调
    fn open(&self) -> Result<(), FsError> {
        Ok(())
    }

    /// 从指定偏移量读取数据
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError>;

    /// 从指定偏移量写入数据
    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError>;

    /// 在目录中查找子项
    fn lookup(&self, name: &str) -> Result<Arc<dyn Inode>, FsError>;

    /// 从 `ctx.pos` 开始向 `ctx` 填充目录项
    ///
    /// `ctx` 缓冲区满时实现必须停止，并保证下次以同一 `ctx` 调用时从断点继续。
    fn iterate(&self, ctx: &mut DirContext) -> Result<(), FsError>;

    /// 列出目录内容
    fn readdir(&self) -> Result<Vec<DirEntry>, FsError> {
        let mut ctx = DirContext::new();
        self.iterate(&mut ctx)?;
        Ok(ctx.into_entries())
    }

    /// 在目录中创建文件
    fn create(&self, name: &str, mode: FileMode) -> Result<Arc<dyn Inode>, FsError>;

    /// 在目录中创建子目录
    fn mkdir(&self, name: &str, mode: FileMode) -> Result<Arc<dyn Inode>, FsError>;

    /// 删除目录项
    fn unlink(&self, name: &str) -> Result<(), FsError>;

    /// 删除子目录
    fn rmdir(&self, name: &str) -> Result<(), FsError>;

    /// 截断文件到指定大小
    fn truncate(&self, size: usize) -> Result<(), FsError>;

    /// 同步文件数据到存储设备
    fn sync(&self) -> Result<(), FsError>;

    /// 向下转型
    fn as_any(&self) -> &dyn core::any::Any;
}
