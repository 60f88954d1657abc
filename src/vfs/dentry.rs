//! 目录项（Dentry）
//!
//! 该模块实现了 VFS 路径层的核心组件：目录树结构与名字到 Inode 的映射缓存。
//!
//! # 核心概念
//!
//! Dentry 是目录树中的一个节点，它：
//! - 缓存文件名到 Inode 的映射
//! - 维护父子关系，构成目录树
//! - 可以是**负目录项**（没有 Inode），记住 "该名字不存在"
//!
//! # 引用计数设计
//!
//! - **parent**: `Weak<Dentry>` - 弱引用父节点，避免循环
//! - **children**: `Arc<Dentry>` - 强引用子节点
//!
//! 树是节点的唯一长期持有者：从父节点摘除一个子项后，只要没有打开的句柄，
//! 它的 Inode 随之析构，文件系统借此回收节点私有状态。
//!
//! ```text
//! Arc<Dentry("/")>
//!   └─> Arc<Dentry("1000")> { parent: Weak<Dentry("/")> }
//!         └─> Arc<Dentry("procs")> { parent: Weak<Dentry("1000")> }
//! ```

use crate::sync::SpinLock;
use crate::vfs::{FsError, Inode};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::fmt;

/// 比较两个 inode 是否为同一对象（忽略 vtable）
pub fn same_inode(a: &Arc<dyn Inode>, b: &Arc<dyn Inode>) -> bool {
    core::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// 目录项（Dentry）
///
/// 表示路径中的一个组件，缓存文件名到 inode 的映射
pub struct Dentry {
    /// 文件名（不含路径）
    pub name: String,

    /// 关联的 inode；`None` 表示负目录项
    pub inode: Option<Arc<dyn Inode>>,

    /// 父目录 dentry（弱引用避免循环）
    parent: SpinLock<Weak<Dentry>>,

    /// 子 dentry 映射（文件名 -> dentry）
    children: SpinLock<BTreeMap<String, Arc<Dentry>>>,
}

impl fmt::Debug for Dentry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent_name = self.parent().map(|p| p.name.clone());
        let child_names = self.child_names();

        f.debug_struct("Dentry")
            .field("name", &self.name)
            .field("negative", &self.is_negative())
            .field("parent", &parent_name)
            .field("children", &child_names)
            .finish()
    }
}

impl Dentry {
    /// 创建新的 dentry
    pub fn new(name: String, inode: Arc<dyn Inode>) -> Arc<Self> {
        Self::alloc(name, Some(inode))
    }

    /// 创建负目录项
    pub fn new_negative(name: String) -> Arc<Self> {
        Self::alloc(name, None)
    }

    fn alloc(name: String, inode: Option<Arc<dyn Inode>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            inode,
            parent: SpinLock::new(Weak::new()),
            children: SpinLock::new(BTreeMap::new()),
        })
    }

    /// 是否为负目录项
    pub fn is_negative(&self) -> bool {
        self.inode.is_none()
    }

    /// 获取 inode，负目录项返回 `NotFound`
    pub fn inode(&self) -> Result<Arc<dyn Inode>, FsError> {
        self.inode.clone().ok_or(FsError::NotFound)
    }

    /// 设置父 dentry
    pub fn set_parent(&self, parent: &Arc<Dentry>) {
        *self.parent.lock() = Arc::downgrade(parent);
    }

    /// 获取父 dentry
    pub fn parent(&self) -> Option<Arc<Dentry>> {
        self.parent.lock().upgrade()
    }

    /// 查找子 dentry（包括负目录项）
    pub fn lookup_child(&self, name: &str) -> Option<Arc<Dentry>> {
        self.children.lock().get(name).cloned()
    }

    /// 添加子 dentry，返回被替换的旧子项
    ///
    /// 旧子项由调用者决定何时释放：它可能是最后一个持有者，
    /// 析构会触发文件系统的回收回调。
    #[must_use = "the replaced child may own the last reference to its inode"]
    pub fn add_child(self: &Arc<Self>, child: Arc<Dentry>) -> Option<Arc<Dentry>> {
        child.set_parent(self);
        self.children.lock().insert(child.name.clone(), child)
    }

    /// 删除子 dentry
    pub fn remove_child(&self, name: &str) -> Option<Arc<Dentry>> {
        self.children.lock().remove(name)
    }

    /// 摘除全部子 dentry
    pub fn clear_children(&self) -> Vec<Arc<Dentry>> {
        let children = core::mem::take(&mut *self.children.lock());
        children.into_values().collect()
    }

    /// 子项名字列表（包括负目录项）
    pub fn child_names(&self) -> Vec<String> {
        self.children.lock().keys().cloned().collect()
    }

    /// 在本目录下解析一个路径组件
    ///
    /// 先查子项缓存（负目录项直接返回 `NotFound`），未命中再调用
    /// inode 的 `lookup`；结果写回缓存，`NotFound` 缓存为负目录项。
    /// 若 `lookup` 返回 `NotFound` 时该名字已被并发挂上正目录项，返回该子项。
    pub fn walk(self: &Arc<Self>, name: &str) -> Result<Arc<Dentry>, FsError> {
        match name {
            "" | "." => return Ok(self.clone()),
            ".." => return Ok(self.parent().unwrap_or_else(|| self.clone())),
            _ => {}
        }

        if let Some(child) = self.lookup_child(name) {
            return if child.is_negative() {
                Err(FsError::NotFound)
            } else {
                Ok(child)
            };
        }

        let dir = self.inode()?;
        match dir.lookup(name) {
            Ok(inode) => {
                // 文件系统可能已在 lookup 中自行挂接了子项
                if let Some(child) = self.lookup_child(name) {
                    if child.inode.as_ref().is_some_and(|i| same_inode(i, &inode)) {
                        return Ok(child);
                    }
                }
                let child = Dentry::new(String::from(name), inode);
                let replaced = self.add_child(child.clone());
                drop(replaced);
                Ok(child)
            }
            Err(FsError::NotFound) => {
                // 只在名字仍空缺时缓存负目录项，lookup 期间并发挂上的子项保留
                let child = self
                    .children
                    .lock()
                    .entry(String::from(name))
                    .or_insert_with(|| {
                        let negative = Dentry::new_negative(String::from(name));
                        negative.set_parent(self);
                        negative
                    })
                    .clone();
                if child.is_negative() {
                    Err(FsError::NotFound)
                } else {
                    Ok(child)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// 获取完整路径（通过向上遍历父节点直到根目录）
    pub fn full_path(&self) -> String {
        let mut components = Vec::new();
        components.push(self.name.clone());

        let mut current = self.parent();
        while let Some(dentry) = current {
            if dentry.name == "/" {
                break;
            }
            components.push(dentry.name.clone());
            current = dentry.parent();
        }

        if components.len() == 1 && components[0] == "/" {
            return String::from("/");
        }

        components.reverse();
        String::from("/") + &components.join("/")
    }
}
