//! 目录迭代上下文
//!
//! `readdir` 一次返回全部目录项，大目录下既低效又无法分批交给调用者。
//! [`DirContext`] 把迭代位置和调用者缓冲区容量交给文件系统：
//! 每次 [`DirContext::emit`] 返回 `false` 时文件系统必须停止产出，
//! 下一次以同一个上下文调用 `iterate` 时从 `pos` 继续。
//!
//! `pos` 的含义由文件系统决定，VFS 只负责在调用之间保存它；
//! 文件系统还可以把任意私有状态挂在上下文上（[`DirContext::set_private`]），
//! 它同样随打开的目录句柄保存，句柄关闭或 rewind 时一并丢弃。

use crate::vfs::{DirEntry, InodeType};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

/// 目录迭代上下文
#[derive(Debug, Default)]
pub struct DirContext {
    /// 当前迭代位置
    pub pos: usize,

    /// 文件系统私有状态，随句柄保存
    private: Option<Box<dyn Any + Send>>,

    /// 本次调用已接收的目录项
    entries: Vec<DirEntry>,

    /// 本次调用最多接收的目录项数，`None` 表示不限
    capacity: Option<usize>,
}

impl DirContext {
    /// 创建容量不限的上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建每次调用最多接收 `capacity` 项的上下文
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// 修改每次调用的容量，保留迭代位置
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = Some(capacity);
    }

    /// 缓冲区是否已满
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.entries.len() >= cap)
    }

    /// 产出一个目录项
    ///
    /// 缓冲区已满时返回 `false`，目录项不被接收，`pos` 不变。
    pub fn emit(&mut self, name: &str, inode_no: usize, inode_type: InodeType) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.push(DirEntry {
            name: String::from(name),
            inode_no,
            inode_type,
        });
        self.pos += 1;
        true
    }

    /// 产出 `.` 和 `..`（仅当 `pos` 还未越过它们）
    pub fn emit_dots(&mut self, self_ino: usize, parent_ino: usize) -> bool {
        if self.pos == 0 && !self.emit(".", self_ino, InodeType::Directory) {
            return false;
        }
        if self.pos == 1 && !self.emit("..", parent_ino, InodeType::Directory) {
            return false;
        }
        true
    }

    /// 挂上文件系统私有状态，替换已有的
    pub fn set_private<T: Any + Send>(&mut self, state: T) {
        self.private = Some(Box::new(state));
    }

    /// 取走类型为 `T` 的私有状态
    ///
    /// 没有私有状态或类型不符时返回 `None`，类型不符的状态被丢弃。
    pub fn take_private<T: Any + Send>(&mut self) -> Option<T> {
        let state = self.private.take()?;
        state.downcast::<T>().ok().map(|b| *b)
    }

    /// 已接收的目录项
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    /// 取走本次调用接收的目录项，上下文可继续用于下一次调用
    pub fn take_entries(&mut self) -> Vec<DirEntry> {
        core::mem::take(&mut self.entries)
    }

    /// 消费上下文，返回全部目录项
    pub fn into_entries(self) -> Vec<DirEntry> {
        self.entries
    }
}
