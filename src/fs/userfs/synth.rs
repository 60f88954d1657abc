//! 目录合成引擎
//!
//! uid 目录只在两个入口被创建：列根目录（[`SynthesisEngine::list_root`]）
//! 与按名字查找（[`SynthesisEngine::lookup`]）。两者共用同一个创建例程和
//! 同一个缓存，并在同一把锁下完成“查缓存 -> 创建 -> 登记”，
//! 所以任意并发交错下一个 uid 最多只有一个存活目录。
//!
//! # 锁与析构
//!
//! uid 目录节点析构时会回调 [`SynthesisEngine::release`]，它要获取合成锁。
//! 因此持锁期间不能释放任何可能是最后一个强引用的 `Arc<Dentry>`：
//! 这些引用先收集到 `deferred`，解锁后再统一释放。

use alloc::string::{String, ToString};
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::config::{PROCS_FILE_NAME, ROOT_INODE_NO, USERFS_DIRS_OFFSET};
use crate::fs::userfs::MountOptions;
use crate::fs::userfs::cache::{SlotHandle, UserDirCache};
use crate::fs::userfs::generation::{Generation, ListingPass};
use crate::fs::userfs::inode::UserFsInode;
use crate::fs::userfs::procs::{ProcsGenerator, parse_uid};
use crate::process::ProcessDirectory;
use crate::sync::Mutex;
use crate::vfs::{Dentry, DirContext, FsError, Inode, InodeType};
use crate::{pr_debug, pr_info, pr_warn};

/// 合成锁保护的状态
struct SynthState {
    generation: Generation,
    cache: UserDirCache,
}

/// 合成引擎：按需生成 uid 目录并维护缓存
pub struct SynthesisEngine {
    this: Weak<SynthesisEngine>,
    source: Arc<dyn ProcessDirectory>,
    options: MountOptions,

    root_inode: Arc<UserFsInode>,

    /// 挂载根；uid 目录挂在它下面，树持有它们的强引用
    root: Arc<Dentry>,

    state: Mutex<SynthState>,
    next_ino: AtomicUsize,
    mounted: AtomicBool,
}

impl SynthesisEngine {
    /// 以进程来源和挂载选项创建引擎，根节点随之建立
    pub fn new(source: Arc<dyn ProcessDirectory>, options: MountOptions) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<Self>| {
            let root_inode = UserFsInode::new_root(this.clone());
            Self {
                this: this.clone(),
                source,
                options,
                root: Dentry::new(String::from("/"), root_inode.clone()),
                root_inode,
                state: Mutex::new(SynthState {
                    generation: Generation::new(),
                    cache: UserDirCache::new(),
                }),
                next_ino: AtomicUsize::new(ROOT_INODE_NO + 1),
                mounted: AtomicBool::new(true),
            }
        })
    }

    /// 根目录 inode
    pub fn root_inode(&self) -> Arc<dyn Inode> {
        self.root_inode.clone()
    }

    /// 根 dentry
    pub fn root(&self) -> &Arc<Dentry> {
        &self.root
    }

    /// 挂载选项
    pub fn options(&self) -> &MountOptions {
        &self.options
    }

    /// 是否仍处于挂载状态
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// 最近一次完成的列举的代数
    pub fn generation(&self) -> u64 {
        self.state.lock().generation.current()
    }

    /// 缓存中的 uid 目录条目数
    pub fn cached_dirs(&self) -> usize {
        self.state.lock().cache.len()
    }

    /// uid 目录最近一次被列举产出时的代数
    pub fn last_emitted(&self, uid: u32) -> Option<u64> {
        let state = self.state.lock();
        let handle = state.cache.handle_of(uid)?;
        state.cache.entry(handle).map(|e| e.last_emitted_epoch)
    }

    /// 让下一次目录创建的内存预留失败
    #[cfg(test)]
    pub(crate) fn fail_next_reservation(&self) {
        self.state.lock().cache.fail_next_reserve();
    }

    fn alloc_ino(&self) -> usize {
        self.next_ino.fetch_add(1, Ordering::Relaxed)
    }

    /// 列根目录
    ///
    /// `ctx.pos` 依次经过 `.`、`..` 与各 uid 目录；列举完成后置为
    /// `USERFS_DIRS_OFFSET + 1`，之后的调用不再产出任何目录项。
    /// 缓冲区满停下时，本次列举的进度（[`ListingPass`]）挂在 `ctx` 上，
    /// 用同一个上下文再次调用即从断点继续，已产出的 uid 不会重复出现。
    pub fn list_root(&self, ctx: &mut DirContext) -> Result<(), FsError> {
        if ctx.pos > USERFS_DIRS_OFFSET || !self.is_mounted() {
            return Ok(());
        }
        if !ctx.emit_dots(ROOT_INODE_NO, ROOT_INODE_NO) {
            return Ok(());
        }

        // 先拿到进程快照，扫描期间不持合成锁
        let uids = self.source.owner_uids()?;

        let mut deferred = Vec::new();
        let result = self.fill_root(ctx, &uids, &mut deferred);
        drop(deferred);
        result
    }

    fn fill_root(
        &self,
        ctx: &mut DirContext,
        uids: &[u32],
        deferred: &mut Vec<Arc<Dentry>>,
    ) -> Result<(), FsError> {
        let mut state = self.state.lock();

        let mut pass = match ctx.take_private::<ListingPass>() {
            Some(pass) => pass,
            None => ListingPass::new(state.generation.begin_pass()),
        };

        match self.emit_owners(&mut state, ctx, uids, &mut pass, deferred) {
            Ok(true) => {}
            Ok(false) => {
                // 缓冲区满，列举保持打开
                ctx.set_private(pass);
                return Ok(());
            }
            Err(e) => {
                ctx.set_private(pass);
                return Err(e);
            }
        }

        let epoch = state.generation.complete_pass();
        for uid in pass.emitted() {
            if let Some(handle) = state.cache.handle_of(uid) {
                state.cache.mark_emitted(handle, epoch);
            }
        }
        ctx.pos = USERFS_DIRS_OFFSET + 1;
        pr_debug!("userfs: listing pass {} complete at epoch {}", pass.id, epoch);
        Ok(())
    }

    /// 产出本次列举尚未产出的 uid 目录
    ///
    /// 全部产出返回 `true`，缓冲区满返回 `false`。
    fn emit_owners(
        &self,
        state: &mut SynthState,
        ctx: &mut DirContext,
        uids: &[u32],
        pass: &mut ListingPass,
        deferred: &mut Vec<Arc<Dentry>>,
    ) -> Result<bool, FsError> {
        for &uid in uids {
            if pass.is_emitted(uid) {
                continue;
            }

            let (handle, node) = match state.cache.live_node(uid) {
                Some(found) => found,
                None => self.create_user_dir(state, uid, deferred)?,
            };
            deferred.push(node);

            let Some(inode_no) = state.cache.entry(handle).map(|e| e.inode_no) else {
                continue;
            };
            pass.try_reserve_one().inspect_err(|_| {
                pr_warn!("userfs: out of memory listing uid {}", uid);
            })?;
            if !ctx.emit(&uid.to_string(), inode_no, InodeType::Directory) {
                return Ok(false);
            }
            pass.mark_emitted(uid);
        }
        Ok(true)
    }

    /// 按名字查找 uid 目录
    ///
    /// 名字必须是规范的十进制 uid。已有存活目录时直接返回；
    /// 否则仅当该 uid 拥有存活进程时才创建。
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Inode>, FsError> {
        if !self.is_mounted() {
            return Err(FsError::NotFound);
        }
        let Some(uid) = parse_uid(name) else {
            pr_debug!("userfs: lookup of '{}' is not a uid", name);
            return Err(FsError::NotFound);
        };

        let mut deferred = Vec::new();
        let result = self.lookup_uid(uid, &mut deferred);
        drop(deferred);
        result
    }

    fn lookup_uid(&self, uid: u32, deferred: &mut Vec<Arc<Dentry>>) -> Result<Arc<dyn Inode>, FsError> {
        {
            let state = self.state.lock();
            if let Some((_, node)) = state.cache.live_node(uid) {
                let inode = node.inode();
                deferred.push(node);
                return inode;
            }
        }

        if !self.source.has_owner(uid)? {
            pr_debug!("userfs: no live process for uid {}", uid);
            return Err(FsError::NotFound);
        }

        // 扫描期间可能已被另一条路径创建，持锁重新检查
        let mut state = self.state.lock();
        let node = match state.cache.live_node(uid) {
            Some((_, node)) => node,
            None => self.create_user_dir(&mut state, uid, deferred)?.1,
        };
        let inode = node.inode();
        deferred.push(node);
        inode
    }

    /// 创建 uid 目录及其 `procs` 文件，挂到根下并登记到缓存
    ///
    /// 调用者持有合成锁且确认该 uid 没有存活目录。失败时缓存与目录树不变。
    fn create_user_dir(
        &self,
        state: &mut SynthState,
        uid: u32,
        deferred: &mut Vec<Arc<Dentry>>,
    ) -> Result<(SlotHandle, Arc<Dentry>), FsError> {
        // 节点已销毁但回收还没执行的残留条目
        if state.cache.evict(uid).is_some() {
            pr_debug!("userfs: evicted stale entry for uid {}", uid);
        }
        state.cache.try_reserve_one().inspect_err(|_| {
            pr_warn!("userfs: out of memory creating directory for uid {}", uid);
        })?;

        let dir_ino = self.alloc_ino();
        let procs_ino = self.alloc_ino();
        let handle = state.cache.insert(uid, dir_ino);

        let procs = UserFsInode::new_procs(
            procs_ino,
            ProcsGenerator::new(uid, self.source.clone(), self.options),
        );
        let dir = UserFsInode::new_user_dir(dir_ino, uid, handle, procs.clone(), self.this.clone());

        let dir_dentry = Dentry::new(uid.to_string(), dir);
        let procs_dentry = Dentry::new(String::from(PROCS_FILE_NAME), procs);
        if let Some(old) = dir_dentry.add_child(procs_dentry) {
            deferred.push(old);
        }
        state.cache.set_node(handle, &dir_dentry);

        // 替换掉可能存在的负目录项
        if let Some(old) = self.root.add_child(dir_dentry.clone()) {
            deferred.push(old);
        }

        pr_info!("userfs: created directory for uid {} (inode {})", uid, dir_ino);
        Ok((handle, dir_dentry))
    }

    /// uid 目录节点析构时的回收
    pub(super) fn release(&self, uid: u32, handle: SlotHandle) {
        let released = self.state.lock().cache.release(uid, handle);
        if released.is_some() {
            pr_debug!("userfs: released directory for uid {}", uid);
        }
    }

    /// 卸载：摘除全部 uid 目录并清空缓存
    pub fn teardown(&self) {
        self.mounted.store(false, Ordering::Release);
        let dropped = self.state.lock().cache.clear().len();
        let children = self.root.clear_children();
        drop(children);
        pr_info!("userfs: unmounted, dropped {} cached directories", dropped);
    }
}
