//! 打开的文件句柄
//!
//! VFS 采用两层设计：
//! - **会话层**: [`InodeFile`] - 维护会话状态（offset、目录迭代上下文）
//! - **存储层**: [`Inode`] trait - 提供无状态的随机访问
//!
//! 目录句柄把 [`DirContext`] 保存在会话层，`getdents` 分批读取时文件系统
//! 可以从上次停下的位置继续。

use crate::sync::SpinLock;
use crate::vfs::{Dentry, DirContext, DirEntry, FsError, Inode, InodeMetadata, InodeType};
use alloc::sync::Arc;
use alloc::vec::Vec;

/// 文件偏移量设置模式
///
/// 对应 POSIX 的 `SEEK_SET`、`SEEK_CUR`、`SEEK_END`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum SeekWhence {
    /// 从文件开头计算
    Set = 0,
    /// 从当前位置计算
    Cur = 1,
    /// 从文件末尾计算
    End = 2,
}

/// 基于 Inode 的只读文件句柄
pub struct InodeFile {
    /// 打开时解析到的 dentry，持有它保证节点在句柄存活期间不被回收
    pub dentry: Arc<Dentry>,
    inode: Arc<dyn Inode>,
    offset: SpinLock<usize>,
    dir_ctx: SpinLock<DirContext>,
}

impl InodeFile {
    /// 打开 dentry 对应的节点
    pub fn open(dentry: Arc<Dentry>) -> Result<Arc<Self>, FsError> {
        let inode = dentry.inode()?;
        inode.open()?;
        Ok(Arc::new(Self {
            dentry,
            inode,
            offset: SpinLock::new(0),
            dir_ctx: SpinLock::new(DirContext::new()),
        }))
    }

    /// 获取文件元数据
    pub fn metadata(&self) -> Result<InodeMetadata, FsError> {
        self.inode.metadata()
    }

    /// 从当前 offset 读取并推进 offset
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, FsError> {
        let mut offset = self.offset.lock();
        let n = self.inode.read_at(*offset, buf)?;
        *offset += n;
        Ok(n)
    }

    /// 读到 EOF 为止
    pub fn read_to_end(&self) -> Result<Vec<u8>, FsError> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 512];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }

    /// 设置文件偏移量
    ///
    /// 合成文件报告 size = 0，不支持 `End`。
    pub fn lseek(&self, offset: isize, whence: SeekWhence) -> Result<usize, FsError> {
        let mut cur = self.offset.lock();
        let base = match whence {
            SeekWhence::Set => 0,
            SeekWhence::Cur => *cur,
            SeekWhence::End => return Err(FsError::NotSupported),
        };
        let new = base.checked_add_signed(offset).ok_or(FsError::InvalidArgument)?;
        *cur = new;
        Ok(new)
    }

    /// 当前偏移量
    pub fn offset(&self) -> usize {
        *self.offset.lock()
    }

    /// 读取下一批目录项，最多 `capacity` 项；返回空表示目录已读完
    pub fn getdents(&self, capacity: usize) -> Result<Vec<DirEntry>, FsError> {
        let meta = self.inode.metadata()?;
        if meta.inode_type != InodeType::Directory {
            return Err(FsError::NotDirectory);
        }
        let mut ctx = self.dir_ctx.lock();
        ctx.set_capacity(capacity);
        self.inode.iterate(&mut ctx)?;
        Ok(ctx.take_entries())
    }

    /// 把目录迭代位置重置到开头
    pub fn rewind_dir(&self) {
        *self.dir_ctx.lock() = DirContext::new();
    }
}
