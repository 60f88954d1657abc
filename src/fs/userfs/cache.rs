//! per-uid 目录缓存
//!
//! 每个出现过的 uid 对应一个 [`UserDirectoryEntry`]，存放在代际槽表
//! [`SlotTable`] 中；uid -> [`SlotHandle`] 的索引负责按 uid 查找。
//!
//! 目录节点的私有数据只保存自己的 `SlotHandle`。槽被释放时代数加一，
//! 旧句柄此后不再匹配任何条目，所以一个已销毁节点的迟到回收
//! 不会误删复用了同一槽位的新条目。槽表按需增长，没有容量上限。

use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::vfs::{Dentry, FsError};

/// 槽表中条目的稳定句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    index: u32,
    generation: u32,
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// 代际槽表
pub struct SlotTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotTable<T> {
    /// 空槽表
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// 保证接下来 `additional` 次插入不需要分配
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), FsError> {
        let needed = additional.saturating_sub(self.free.len());
        self.slots.try_reserve(needed)?;
        // remove 会把槽位压回空闲表
        self.free.try_reserve(self.slots.len() + needed - self.free.len())?;
        Ok(())
    }

    /// 插入条目，优先复用空闲槽位
    pub fn insert(&mut self, value: T) -> SlotHandle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return SlotHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        SlotHandle {
            index,
            generation: 0,
        }
    }

    /// 句柄对应的条目；句柄过期时返回 `None`
    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// [`Self::get`] 的可变版本
    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// 释放句柄对应的条目；句柄过期时什么也不做
    pub fn remove(&mut self, handle: SlotHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(value)
    }

    /// 存活条目数
    pub fn len(&self) -> usize {
        self.live
    }

    /// 是否没有存活条目
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// 槽位总数（含空闲）
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// 释放全部条目，所有已发出的句柄随之过期
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.live);
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Some(value) = slot.value.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                out.push(value);
            }
        }
        self.live = 0;
        out
    }
}

/// 一个 uid 目录的缓存条目
#[derive(Debug)]
pub struct UserDirectoryEntry {
    /// 目录对应的 uid
    pub uid: u32,

    /// 目录节点的 inode 编号
    pub inode_no: usize,

    /// 目录节点；树持有强引用，缓存只持有弱引用
    pub node: Weak<Dentry>,

    /// 最近一次产出该目录的已完成列举的代数，0 表示从未产出
    pub last_emitted_epoch: u64,
}

/// uid -> 目录条目
#[derive(Default)]
pub struct UserDirCache {
    index: HashMap<u32, SlotHandle>,
    slots: SlotTable<UserDirectoryEntry>,

    /// 下一次预留直接失败
    #[cfg(test)]
    fail_next_reserve: bool,
}

impl UserDirCache {
    /// 空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 为一次插入预留空间；失败时缓存保持原样
    pub fn try_reserve_one(&mut self) -> Result<(), FsError> {
        #[cfg(test)]
        if core::mem::take(&mut self.fail_next_reserve) {
            return Err(FsError::NoMemory);
        }
        self.index.try_reserve(1)?;
        self.slots.try_reserve(1)?;
        Ok(())
    }

    /// 插入新条目（调用者先 [`Self::try_reserve_one`]，且该 uid 没有条目）
    pub fn insert(&mut self, uid: u32, inode_no: usize) -> SlotHandle {
        debug_assert!(!self.index.contains_key(&uid));
        let handle = self.slots.insert(UserDirectoryEntry {
            uid,
            inode_no,
            node: Weak::new(),
            last_emitted_epoch: 0,
        });
        self.index.insert(uid, handle);
        handle
    }

    /// 让下一次 [`Self::try_reserve_one`] 返回 `NoMemory`
    #[cfg(test)]
    pub fn fail_next_reserve(&mut self) {
        self.fail_next_reserve = true;
    }

    /// uid 的当前条目句柄
    pub fn handle_of(&self, uid: u32) -> Option<SlotHandle> {
        self.index.get(&uid).copied()
    }

    /// 句柄对应的条目
    pub fn entry(&self, handle: SlotHandle) -> Option<&UserDirectoryEntry> {
        self.slots.get(handle)
    }

    /// uid 的存活目录节点
    ///
    /// 返回的 `Arc` 可能是节点的最后一个强引用，调用者不能在持有
    /// 合成锁时释放它。
    pub fn live_node(&self, uid: u32) -> Option<(SlotHandle, Arc<Dentry>)> {
        let handle = self.handle_of(uid)?;
        let node = self.slots.get(handle)?.node.upgrade()?;
        Some((handle, node))
    }

    /// 记录条目的目录节点（弱引用）
    pub fn set_node(&mut self, handle: SlotHandle, node: &Arc<Dentry>) {
        if let Some(entry) = self.slots.get_mut(handle) {
            entry.node = Arc::downgrade(node);
        }
    }

    /// 记录条目在代数 `epoch` 的列举中被产出
    pub fn mark_emitted(&mut self, handle: SlotHandle, epoch: u64) {
        if let Some(entry) = self.slots.get_mut(handle) {
            entry.last_emitted_epoch = epoch;
        }
    }

    /// 删除 uid 的条目（不论节点是否存活）
    pub fn evict(&mut self, uid: u32) -> Option<UserDirectoryEntry> {
        let handle = self.index.remove(&uid)?;
        self.slots.remove(handle)
    }

    /// 节点销毁时的回收：仅当 `handle` 仍是该 uid 的当前条目时删除
    pub fn release(&mut self, uid: u32, handle: SlotHandle) -> Option<UserDirectoryEntry> {
        if self.index.get(&uid) != Some(&handle) {
            return None;
        }
        self.index.remove(&uid);
        self.slots.remove(handle)
    }

    /// 条目数
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 删除全部条目，所有已发出的句柄随之过期
    pub fn clear(&mut self) -> Vec<UserDirectoryEntry> {
        self.index.clear();
        self.slots.drain()
    }
}
