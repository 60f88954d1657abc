//! 并发创建的幂等性
//!
//! 断言放在主线程：`kassert!` 只记录本线程的失败。

use super::*;
use crate::{kassert, test_case};
use std::thread;

const THREADS: usize = 8;

test_case!(test_concurrent_lookup_single_node, {
    let fs = create_test_userfs(&create_test_process_table());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let fs = fs.clone();
            thread::spawn(move || fs.root_inode().lookup("1000").map(|inode| inode_no(&inode)))
        })
        .collect();
    let inos: Vec<_> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();

    kassert!(inos.iter().all(|&ino| ino == inos[0]));
    kassert!(fs.cached_dirs() == 1);
    kassert!(fs.root_dentry().child_names() == ["1000"]);
});

test_case!(test_concurrent_listing_and_lookup, {
    let fs = create_test_userfs(&create_test_process_table());

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let fs = fs.clone();
            thread::spawn(move || -> Result<usize, FsError> {
                let root = fs.root_inode();
                if i % 2 == 0 {
                    let entries = root.readdir()?;
                    entries
                        .iter()
                        .find(|e| e.name == "1000")
                        .map(|e| e.inode_no)
                        .ok_or(FsError::NotFound)
                } else {
                    Ok(inode_no(&root.lookup("1000")?))
                }
            })
        })
        .collect();
    let inos: Vec<_> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();

    kassert!(inos.iter().all(|&ino| ino == inos[0]));
    kassert!(fs.cached_dirs() == 2);
    kassert!(list_root_sorted(&fs) == ["0", "1000"]);
});

test_case!(test_concurrent_listings_do_not_duplicate, {
    let table = Arc::new(ProcessTable::new());
    for pid in 0..64u32 {
        table.spawn(pid, pid % 16, "w");
    }
    let fs = create_test_userfs(&table);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let fs = fs.clone();
            thread::spawn(move || fs.root_inode().readdir().map(|entries| entry_names(&entries)))
        })
        .collect();

    for handle in handles {
        let mut names = handle.join().unwrap().unwrap();
        let total = names.len();
        names.sort();
        names.dedup();
        // 每次列举内部没有重复项
        kassert!(names.len() == total);
    }
    kassert!(fs.cached_dirs() == 16);
    kassert!(list_root_sorted(&fs).len() == 16);
});

test_case!(test_concurrent_reads_and_process_churn, {
    let table = create_test_process_table();
    let fs = create_test_userfs(&table);
    let procs = walk_path(&fs, "1000/procs").unwrap().inode().unwrap();

    let writer = {
        let table = table.clone();
        thread::spawn(move || {
            for pid in 100..300u32 {
                table.spawn(pid, 1000, "job");
                table.exit(pid);
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let procs = procs.clone();
            thread::spawn(move || {
                let mut buf = [0u8; 512];
                (0..200).all(|_| {
                    procs
                        .read_at(0, &mut buf)
                        .is_ok_and(|n| buf[..n].starts_with(b"PID     Nume\n"))
                })
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        kassert!(reader.join().unwrap());
    }
    kassert!(read_file(&fs, "1000/procs").unwrap() == "PID     Nume\n10      bash\n11      vim\n");
});
