//! 列目录代数（epoch）
//!
//! 每完成一次根目录列举，代数恰好加一；停在半途或被放弃的列举不改变代数。
//! 列举完成时，本次产出的 uid 目录的 `last_emitted_epoch` 都记为新的代数。
//!
//! 列举内的去重不依赖代数：每个目录句柄在自己的 [`ListingPass`] 中记下
//! 已产出的 uid，缓冲区满停下后，同一句柄继续时据此跳过。
//! 因此多个句柄交错分批列举时互不影响，各自完整地列出一遍。

use hashbrown::HashSet;

use crate::vfs::FsError;

/// 代数跟踪器
#[derive(Debug, Default)]
pub struct Generation {
    /// 已完成的列举数
    current: u64,

    /// 已开始的列举数，用作列举编号
    started: u64,
}

impl Generation {
    /// 代数为 0 的跟踪器
    pub const fn new() -> Self {
        Self {
            current: 0,
            started: 0,
        }
    }

    /// 当前代数
    pub fn current(&self) -> u64 {
        self.current
    }

    /// 开始一次新列举，返回它的编号（从 1 开始）
    pub fn begin_pass(&mut self) -> u64 {
        self.started += 1;
        self.started
    }

    /// 完成一次列举，返回新的代数
    pub fn complete_pass(&mut self) -> u64 {
        self.current += 1;
        self.current
    }
}

/// 一次根目录列举在某个目录句柄上的进度
#[derive(Debug)]
pub struct ListingPass {
    /// 列举编号
    pub id: u64,

    /// 本次列举已产出的 uid
    emitted: HashSet<u32>,
}

impl ListingPass {
    /// 新的空列举
    pub fn new(id: u64) -> Self {
        Self {
            id,
            emitted: HashSet::new(),
        }
    }

    /// `uid` 是否已在本次列举中产出
    pub fn is_emitted(&self, uid: u32) -> bool {
        self.emitted.contains(&uid)
    }

    /// 为下一次 [`Self::mark_emitted`] 预留空间
    pub fn try_reserve_one(&mut self) -> Result<(), FsError> {
        self.emitted.try_reserve(1)?;
        Ok(())
    }

    /// 记录 `uid` 已产出
    pub fn mark_emitted(&mut self, uid: u32) {
        self.emitted.insert(uid);
    }

    /// 本次列举已产出的 uid
    pub fn emitted(&self) -> impl Iterator<Item = u32> + '_ {
        self.emitted.iter().copied()
    }
}
