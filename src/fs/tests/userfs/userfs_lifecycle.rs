//! 节点回收、卸载与类型注册

use super::*;
use crate::fs::userfs::{register_filesystem, unregister_filesystem};
use crate::vfs::{FS_TYPES, FileSystemType, FsTypeRegistry, MountFlags, MountTable, same_inode};
use crate::{kassert, test_case};

test_case!(test_release_on_node_destruction, {
    let fs = create_test_userfs(&create_test_process_table());
    let _ = list_root_sorted(&fs);
    kassert!(fs.cached_dirs() == 2);

    // 从树上摘下后没有其他持有者，节点析构并回收缓存条目
    let removed = fs.root_dentry().remove_child("1000");
    kassert!(removed.is_some());
    drop(removed);
    kassert!(fs.cached_dirs() == 1);
    kassert!(fs.last_emitted(1000).is_none());
});

test_case!(test_recreate_after_release, {
    let fs = create_test_userfs(&create_test_process_table());
    let old_ino = inode_no(&fs.root_inode().lookup("1000").unwrap());

    drop(fs.root_dentry().remove_child("1000"));
    kassert!(fs.cached_dirs() == 0);

    let names = list_root_sorted(&fs);
    kassert!(names == ["0", "1000"]);
    let new_ino = inode_no(&walk_path(&fs, "1000").unwrap().inode().unwrap());
    kassert!(new_ino != old_ino);
    kassert!(fs.cached_dirs() == 2);
});

test_case!(test_detached_node_is_replaced, {
    let fs = create_test_userfs(&create_test_process_table());
    let file = InodeFile::open(walk_path(&fs, "0/procs").unwrap()).unwrap();
    let old_dir = walk_path(&fs, "0").unwrap().inode().unwrap();

    drop(fs.root_dentry().remove_child("0"));
    // 句柄仍持有摘下的节点，文件照常可读
    kassert!(file.read_to_end().unwrap() == b"PID     Nume\n20      init\n");

    // 摘下的节点不再属于目录树，查找会合成新的目录
    let new_dir = fs.root_inode().lookup("0").unwrap();
    kassert!(!same_inode(&old_dir, &new_dir));
    kassert!(fs.cached_dirs() == 1);

    // 旧节点迟到的析构不影响新条目
    drop(file);
    drop(old_dir);
    kassert!(fs.cached_dirs() == 1);
    kassert!(same_inode(&new_dir, &fs.root_inode().lookup("0").unwrap()));
});

test_case!(test_umount_teardown, {
    let fs = create_test_userfs(&create_test_process_table());
    let _ = list_root_sorted(&fs);
    let procs = walk_path(&fs, "1000/procs").unwrap().inode().unwrap();
    kassert!(fs.cached_dirs() == 2);

    kassert!(fs.umount().is_ok());
    kassert!(fs.cached_dirs() == 0);
    kassert!(fs.root_dentry().child_names().is_empty());

    // 卸载后不再合成任何节点
    kassert!(fs.root_inode().lookup("0").err() == Some(FsError::NotFound));
    kassert!(fs.root_inode().readdir().unwrap().is_empty());
    kassert!(fs.cached_dirs() == 0);

    // 已打开的文件仍可读取
    let mut buf = [0u8; 64];
    kassert!(procs.read_at(0, &mut buf).unwrap() > 0);
});

test_case!(test_mount_table_resolve, {
    let table = MountTable::new();
    let fs = create_test_userfs(&create_test_process_table());
    kassert!(table.mount(fs.clone(), "/users", MountFlags::READ_ONLY, None).is_ok());

    let dentry = table.resolve("/users/1000/procs").unwrap();
    kassert!(dentry.name == "procs");
    kassert!(table.resolve("/users/./1000/../0").unwrap().name == "0");
    kassert!(table.resolve("/users/77").err() == Some(FsError::NotFound));
    kassert!(table.resolve("/elsewhere").err() == Some(FsError::NotFound));

    kassert!(table.umount("/users").is_ok());
    kassert!(fs.cached_dirs() == 0);
    kassert!(table.umount("/users").err() == Some(FsError::NotFound));
});

test_case!(test_registry_mount_by_type, {
    let registry = FsTypeRegistry::new();
    let processes = create_test_process_table();
    let source = processes.clone();
    let fs_type = FileSystemType::new("userfs", move |data| {
        let fs: Arc<dyn FileSystem> = UserFs::mount(source.clone(), data)?;
        Ok(fs)
    });
    kassert!(registry.register(fs_type.clone()).is_ok());
    kassert!(registry.register(fs_type).err() == Some(FsError::AlreadyExists));
    kassert!(registry.names() == ["userfs"]);

    let table = MountTable::new();
    let mp = table.mount_by_type(&registry, "userfs", "/u", "color", MountFlags::READ_ONLY).unwrap();
    kassert!(mp.fs.fs_type() == "userfs");
    kassert!(mp.mount_path == "/u");
    kassert!(table.list_mounts() == [(String::from("/u"), String::from("userfs"))]);

    let bad = table.mount_by_type(&registry, "userfs", "/v", "nope", MountFlags::READ_ONLY);
    kassert!(bad.err() == Some(FsError::InvalidArgument));
    let missing = table.mount_by_type(&registry, "ext4", "/w", "", MountFlags::empty());
    kassert!(missing.err() == Some(FsError::NotSupported));

    kassert!(registry.unregister("userfs").is_ok());
    kassert!(registry.unregister("userfs").err() == Some(FsError::NotFound));
    // 注销类型不影响已挂载的实例
    kassert!(table.resolve("/u/0/procs").is_ok());
});

test_case!(test_global_register_filesystem, {
    let processes = create_test_process_table();
    kassert!(register_filesystem(processes.clone()).is_ok());
    kassert!(register_filesystem(processes).err() == Some(FsError::AlreadyExists));

    let fs = FS_TYPES.get("userfs").unwrap().mount("max_output=1024").unwrap();
    kassert!(fs.fs_type() == "userfs");

    kassert!(unregister_filesystem().is_ok());
    kassert!(FS_TYPES.get("userfs").is_none());
    kassert!(unregister_filesystem().err() == Some(FsError::NotFound));
});

test_case!(test_allocation_failure_leaves_no_partial_state, {
    let fs = create_test_userfs(&create_test_process_table());

    fs.fail_next_reservation();
    kassert!(walk_path(&fs, "1000").err() == Some(FsError::NoMemory));
    kassert!(fs.cached_dirs() == 0);
    // 没有节点，也没有缓存负目录项
    kassert!(fs.root_dentry().child_names().is_empty());

    fs.fail_next_reservation();
    kassert!(fs.root_inode().readdir().err() == Some(FsError::NoMemory));
    kassert!(fs.cached_dirs() == 0);
    kassert!(fs.generation() == 0);

    // 失败的操作不留痕迹，重试成功
    kassert!(list_root_sorted(&fs) == ["0", "1000"]);
    kassert!(fs.generation() == 1);
    kassert!(read_file(&fs, "1000/procs").unwrap() == "PID     Nume\n10      bash\n11      vim\n");
});
