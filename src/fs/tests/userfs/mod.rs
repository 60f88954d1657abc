use crate::fs::userfs::{MountOptions, UserFs};
use crate::process::{ProcessDirectory, ProcessTable};
use crate::vfs::{Dentry, DirEntry, FileSystem, FsError, Inode, InodeFile, InodeType};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

// 测试辅助函数 (fixtures)

/// 三个进程、两个用户
pub fn create_test_process_table() -> Arc<ProcessTable> {
    Arc::new(ProcessTable::from_processes([
        (10, 1000, "bash"),
        (11, 1000, "vim"),
        (20, 0, "init"),
    ]))
}

/// 在给定进程表上创建一个 UserFS 实例
pub fn create_test_userfs(table: &Arc<ProcessTable>) -> Arc<UserFs> {
    UserFs::new(table.clone())
}

/// 在任意进程来源上创建一个 UserFS 实例
pub fn create_test_userfs_with_source(source: Arc<dyn ProcessDirectory>) -> Arc<UserFs> {
    UserFs::new(source)
}

pub fn create_test_userfs_with_options(table: &Arc<ProcessTable>, options: MountOptions) -> Arc<UserFs> {
    UserFs::with_options(table.clone(), options)
}

/// 目录项名字（去掉 `.` 和 `..`）
pub fn entry_names(entries: &[DirEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.name != "." && e.name != "..")
        .map(|e| e.name.clone())
        .collect()
}

/// 完整列一次根目录，返回排序后的 uid 目录名
pub fn list_root_sorted(fs: &Arc<UserFs>) -> Vec<String> {
    let mut names = entry_names(&fs.root_inode().readdir().unwrap());
    names.sort();
    names
}

/// 按路径组件逐级解析
pub fn walk_path(fs: &Arc<UserFs>, path: &str) -> Result<Arc<Dentry>, FsError> {
    let mut current = fs.root_dentry();
    for name in path.split('/').filter(|s| !s.is_empty()) {
        current = current.walk(name)?;
    }
    Ok(current)
}

/// 打开路径并读出全部内容
pub fn read_file(fs: &Arc<UserFs>, path: &str) -> Result<String, FsError> {
    let file = InodeFile::open(walk_path(fs, path)?)?;
    let data = file.read_to_end()?;
    String::from_utf8(data).map_err(|_| FsError::IoError)
}

/// inode 编号
pub fn inode_no(inode: &Arc<dyn Inode>) -> usize {
    inode.metadata().unwrap().inode_no
}

pub fn is_dir(inode: &Arc<dyn Inode>) -> bool {
    inode.metadata().unwrap().inode_type == InodeType::Directory
}

pub mod userfs_concurrency;
pub mod userfs_lifecycle;
pub mod userfs_lookup;
