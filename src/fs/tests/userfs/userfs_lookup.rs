//! 按名字查找 uid 目录

use super::*;
use crate::process::{ProcessDirectory, ProcessRecord};
use crate::sync::SpinLock;
use crate::vfs::same_inode;
use crate::{kassert, test_case};
use alloc::sync::Weak;
use core::ops::ControlFlow;
use core::sync::atomic::{AtomicBool, Ordering};

/// 第一次扫描时先完成一次根目录列举，再报告没有任何进程
///
/// 复现查找的进程扫描与并发列举交错：列举看到了 uid，查找没看到。
struct ListingDuringScan {
    table: Arc<ProcessTable>,
    fs: SpinLock<Weak<UserFs>>,
    armed: AtomicBool,
}

impl ProcessDirectory for ListingDuringScan {
    fn for_each_live_process(
        &self,
        f: &mut dyn FnMut(&ProcessRecord<'_>) -> ControlFlow<()>,
    ) -> Result<(), FsError> {
        if self.armed.swap(false, Ordering::SeqCst) {
            let fs = self.fs.lock().upgrade();
            if let Some(fs) = fs {
                let _ = fs.root_inode().readdir();
            }
            return Ok(());
        }
        self.table.for_each_live_process(f)
    }
}

test_case!(test_lookup_before_listing, {
    let fs = create_test_userfs(&create_test_process_table());

    let dir = fs.root_inode().lookup("1000").unwrap();
    kassert!(is_dir(&dir));
    kassert!(fs.cached_dirs() == 1);
    // 查找不推进代数，也不标记为已列举
    kassert!(fs.generation() == 0);
    kassert!(fs.last_emitted(1000) == Some(0));

    // 查找结果被挂到根下
    kassert!(fs.root_dentry().child_names() == ["1000"]);
});

test_case!(test_lookup_then_listing_reuses_node, {
    let fs = create_test_userfs(&create_test_process_table());

    let looked_up = fs.root_inode().lookup("0").unwrap();
    let entries = fs.root_inode().readdir().unwrap();
    let listed = entries.iter().find(|e| e.name == "0").unwrap();

    kassert!(listed.inode_no == inode_no(&looked_up));
    kassert!(fs.cached_dirs() == 2);
    kassert!(same_inode(&looked_up, &fs.root_inode().lookup("0").unwrap()));
});

test_case!(test_listing_then_lookup_reuses_node, {
    let fs = create_test_userfs(&create_test_process_table());
    let entries = fs.root_inode().readdir().unwrap();
    let listed = entries.iter().find(|e| e.name == "1000").unwrap();

    let dir = fs.root_inode().lookup("1000").unwrap();
    kassert!(inode_no(&dir) == listed.inode_no);
    kassert!(fs.cached_dirs() == 2);
});

test_case!(test_lookup_unknown_uid, {
    let fs = create_test_userfs(&create_test_process_table());
    let root = fs.root_inode();

    kassert!(root.lookup("4242").err() == Some(FsError::NotFound));
    kassert!(fs.cached_dirs() == 0);
    kassert!(fs.root_dentry().child_names().is_empty());
});

test_case!(test_lookup_non_numeric_and_non_canonical, {
    let fs = create_test_userfs(&create_test_process_table());
    let root = fs.root_inode();

    for name in ["procs", "root", "", "-1", "+0", "01000", "1000x", "99999999999"] {
        kassert!(root.lookup(name).err() == Some(FsError::NotFound));
    }
    kassert!(fs.cached_dirs() == 0);
});

test_case!(test_lookup_procs_in_user_dir, {
    let fs = create_test_userfs(&create_test_process_table());
    let dir = fs.root_inode().lookup("0").unwrap();

    let procs = dir.lookup("procs").unwrap();
    kassert!(!is_dir(&procs));
    kassert!(same_inode(&procs, &dir.lookup("procs").unwrap()));
    kassert!(dir.lookup("status").err() == Some(FsError::NotFound));
});

test_case!(test_walk_caches_negative_dentry, {
    let table = create_test_process_table();
    let fs = create_test_userfs(&table);

    kassert!(walk_path(&fs, "33").err() == Some(FsError::NotFound));
    let negative = fs.root_dentry().lookup_child("33").unwrap();
    kassert!(negative.is_negative());

    // uid 出现后，列举会用正目录项替换负目录项
    table.spawn(40, 33, "nginx");
    kassert!(list_root_sorted(&fs).contains(&String::from("33")));
    let dentry = walk_path(&fs, "33").unwrap();
    kassert!(!dentry.is_negative());
    kassert!(read_file(&fs, "33/procs").unwrap() == "PID     Nume\n40      nginx\n");
});

test_case!(test_walk_dot_components, {
    let fs = create_test_userfs(&create_test_process_table());

    let dir = walk_path(&fs, "1000").unwrap();
    kassert!(Arc::ptr_eq(&dir.walk(".").unwrap(), &dir));
    kassert!(Arc::ptr_eq(&dir.walk("..").unwrap(), &fs.root_dentry()));
    kassert!(walk_path(&fs, "1000/procs").unwrap().full_path() == "/1000/procs");
});

test_case!(test_lookup_survives_process_exit, {
    let table = create_test_process_table();
    let fs = create_test_userfs(&table);
    let dir = fs.root_inode().lookup("0").unwrap();

    // 目录不会因为进程退出而被删除
    table.exit(20);
    let again = fs.root_inode().lookup("0").unwrap();
    kassert!(same_inode(&dir, &again));
    kassert!(read_file(&fs, "0/procs").unwrap() == "PID     Nume\n");
});

test_case!(test_missed_lookup_keeps_concurrently_listed_dir, {
    let source = Arc::new(ListingDuringScan {
        table: create_test_process_table(),
        fs: SpinLock::new(Weak::new()),
        armed: AtomicBool::new(false),
    });
    let fs = create_test_userfs_with_source(source.clone());
    *source.fs.lock() = Arc::downgrade(&fs);
    source.armed.store(true, Ordering::SeqCst);

    // 查找没看到 uid 1000，但扫描期间的列举已经创建了它
    let dentry = walk_path(&fs, "1000").unwrap();
    kassert!(!dentry.is_negative());
    kassert!(fs.cached_dirs() == 2);

    let dir = dentry.inode().unwrap();
    let entries = fs.root_inode().readdir().unwrap();
    let listed = entries.iter().find(|e| e.name == "1000").unwrap();
    kassert!(listed.inode_no == inode_no(&dir));
    kassert!(same_inode(&dir, &walk_path(&fs, "1000").unwrap().inode().unwrap()));
    kassert!(fs.cached_dirs() == 2);
});
