use super::*;
use crate::fs::userfs::UserFs;
use crate::process::ProcessTable;
use alloc::string::String;
use alloc::sync::Arc;

// 测试辅助函数 (fixtures)

/// 创建一个测试用 UserFS 实例（uid 0 与 uid 1000 各有进程）
pub fn create_test_fs() -> Arc<UserFs> {
    let table = Arc::new(ProcessTable::from_processes([
        (1, 0, "init"),
        (100, 1000, "bash"),
    ]));
    UserFs::new(table)
}

/// 从 Inode 创建一个 Dentry (用于测试)
pub fn create_test_dentry(name: &str, inode: Arc<dyn Inode>) -> Arc<Dentry> {
    Dentry::new(String::from(name), inode)
}
