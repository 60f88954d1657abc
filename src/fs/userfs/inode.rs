//! userfs 的节点
//!
//! 三种节点共用一个类型：根目录、uid 目录与 `procs` 文件。

use alloc::sync::{Arc, Weak};

use crate::config::{PROCS_FILE_NAME, ROOT_INODE_NO};
use crate::fs::userfs::cache::SlotHandle;
use crate::fs::userfs::procs::{ContentGenerator, ProcsGenerator, read_slice};
use crate::fs::userfs::synth::SynthesisEngine;
use crate::pr_debug;
use crate::vfs::{DirContext, FileMode, FsError, Inode, InodeMetadata, InodeType, TimeSpec};

enum UserFsInodeKind {
    /// 挂载根，目录项全部由合成引擎产出
    Root { engine: Weak<SynthesisEngine> },

    /// `/<uid>`
    UserDir {
        uid: u32,
        slot: SlotHandle,
        procs: Arc<UserFsInode>,
        engine: Weak<SynthesisEngine>,
    },

    /// `/<uid>/procs`
    Procs(ProcsGenerator),
}

/// userfs 的 inode：根目录、uid 目录或 `procs` 文件
pub struct UserFsInode {
    kind: UserFsInodeKind,

    /// 元数据（只读文件系统，创建后不变）
    metadata: InodeMetadata,
}

impl UserFsInode {
    fn metadata_for(inode_no: usize, inode_type: InodeType, uid: u32) -> InodeMetadata {
        let now = TimeSpec::now();
        let (mode, nlinks) = match inode_type {
            InodeType::Directory => (FileMode::dir_read_only(), 2), // . 和 ..
            InodeType::File => (FileMode::file_read_only(), 1),
        };
        InodeMetadata {
            inode_no,
            inode_type,
            mode,
            uid,
            gid: 0,
            size: 0, // 内容按需生成，大小未知
            atime: now,
            mtime: now,
            ctime: now,
            nlinks,
            blocks: 0,
        }
    }

    pub(super) fn new_root(engine: Weak<SynthesisEngine>) -> Arc<Self> {
        Arc::new(Self {
            kind: UserFsInodeKind::Root { engine },
            metadata: Self::metadata_for(ROOT_INODE_NO, InodeType::Directory, 0),
        })
    }

    pub(super) fn new_user_dir(
        inode_no: usize,
        uid: u32,
        slot: SlotHandle,
        procs: Arc<UserFsInode>,
        engine: Weak<SynthesisEngine>,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind: UserFsInodeKind::UserDir {
                uid,
                slot,
                procs,
                engine,
            },
            metadata: Self::metadata_for(inode_no, InodeType::Directory, uid),
        })
    }

    pub(super) fn new_procs(inode_no: usize, generator: ProcsGenerator) -> Arc<Self> {
        let uid = generator.uid();
        Arc::new(Self {
            kind: UserFsInodeKind::Procs(generator),
            metadata: Self::metadata_for(inode_no, InodeType::File, uid),
        })
    }

    fn engine(engine: &Weak<SynthesisEngine>) -> Result<Arc<SynthesisEngine>, FsError> {
        engine.upgrade().ok_or(FsError::NotFound)
    }
}

impl Drop for UserFsInode {
    fn drop(&mut self) {
        if let UserFsInodeKind::UserDir {
            uid, slot, engine, ..
        } = &self.kind
        {
            // 目录节点销毁：回收缓存条目
            if let Some(engine) = engine.upgrade() {
                engine.release(*uid, *slot);
            }
        }
    }
}

impl Inode for UserFsInode {
    fn metadata(&self) -> Result<InodeMetadata, FsError> {
        Ok(self.metadata.clone())
    }

    fn open(&self) -> Result<(), FsError> {
        pr_debug!("userfs: open inode {}", self.metadata.inode_no);
        Ok(())
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        match &self.kind {
            UserFsInodeKind::Procs(generator) => {
                let data = generator.generate()?;
                Ok(read_slice(&data, offset, buf))
            }
            _ => Err(FsError::IsDirectory),
        }
    }

    fn write_at(&self, _offset: usize, _buf: &[u8]) -> Result<usize, FsError> {
        Err(FsError::ReadOnlyFs)
    }

    fn lookup(&self, name: &str) -> Result<Arc<dyn Inode>, FsError> {
        match &self.kind {
            UserFsInodeKind::Root { engine } => Self::engine(engine)?.lookup(name),
            UserFsInodeKind::UserDir { procs, .. } if name == PROCS_FILE_NAME => {
                Ok(procs.clone() as Arc<dyn Inode>)
            }
            UserFsInodeKind::UserDir { .. } => Err(FsError::NotFound),
            UserFsInodeKind::Procs(_) => Err(FsError::NotDirectory),
        }
    }

    fn iterate(&self, ctx: &mut DirContext) -> Result<(), FsError> {
        match &self.kind {
            UserFsInodeKind::Root { engine } => Self::engine(engine)?.list_root(ctx),
            UserFsInodeKind::UserDir { procs, .. } => {
                if !ctx.emit_dots(self.metadata.inode_no, ROOT_INODE_NO) {
                    return Ok(());
                }
                if ctx.pos == 2 {
                    ctx.emit(PROCS_FILE_NAME, procs.metadata.inode_no, InodeType::File);
                }
                Ok(())
            }
            UserFsInodeKind::Procs(_) => Err(FsError::NotDirectory),
        }
    }

    fn create(&self, _name: &str, _mode: FileMode) -> Result<Arc<dyn Inode>, FsError> {
        Err(FsError::ReadOnlyFs)
    }

    fn mkdir(&self, _name: &str, _mode: FileMode) -> Result<Arc<dyn Inode>, FsError> {
        Err(FsError::ReadOnlyFs)
    }

    fn unlink(&self, _name: &str) -> Result<(), FsError> {
        Err(FsError::ReadOnlyFs)
    }

    fn rmdir(&self, _name: &str) -> Result<(), FsError> {
        Err(FsError::ReadOnlyFs)
    }

    fn truncate(&self, _size: usize) -> Result<(), FsError> {
        Err(FsError::ReadOnlyFs)
    }

    fn sync(&self) -> Result<(), FsError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }
}
