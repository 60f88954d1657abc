//! VFS 错误类型
//!
//! 定义了与 POSIX 兼容的文件系统错误码，可通过 [`FsError::to_errno()`] 转换为系统调用错误码。

use core::fmt;

/// VFS 错误类型
///
/// 各错误码对应标准 POSIX errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    // 文件/目录相关
    /// -ENOENT(2): 文件不存在
    NotFound,
    /// -EEXIST(17): 文件已存在
    AlreadyExists,
    /// -ENOTDIR(20): 不是目录
    NotDirectory,
    /// -EISDIR(21): 是目录
    IsDirectory,

    // 权限相关
    /// -EACCES(13): 权限被拒绝
    PermissionDenied,

    // 参数相关
    /// -EINVAL(22): 无效参数
    InvalidArgument,

    // 文件系统相关
    /// -EROFS(30): 只读文件系统
    ReadOnlyFs,
    /// -ENOMEM(12): 节点/缓存分配失败
    NoMemory,
    /// -EIO(5): I/O 错误
    IoError,

    // 其他
    /// -ENOTSUP(95): 操作不支持
    NotSupported,
}

impl FsError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            FsError::NotFound => -2,
            FsError::IoError => -5,
            FsError::NoMemory => -12,
            FsError::PermissionDenied => -13,
            FsError::AlreadyExists => -17,
            FsError::NotDirectory => -20,
            FsError::IsDirectory => -21,
            FsError::InvalidArgument => -22,
            FsError::ReadOnlyFs => -30,
            FsError::NotSupported => -95,
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FsError::NotFound => "no such file or directory",
            FsError::AlreadyExists => "file exists",
            FsError::NotDirectory => "not a directory",
            FsError::IsDirectory => "is a directory",
            FsError::PermissionDenied => "permission denied",
            FsError::InvalidArgument => "invalid argument",
            FsError::ReadOnlyFs => "read-only file system",
            FsError::NoMemory => "out of memory",
            FsError::IoError => "input/output error",
            FsError::NotSupported => "operation not supported",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for FsError {}

impl From<hashbrown::TryReserveError> for FsError {
    fn from(_: hashbrown::TryReserveError) -> Self {
        FsError::NoMemory
    }
}

impl From<alloc::collections::TryReserveError> for FsError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        FsError::NoMemory
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound,
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied,
            std::io::ErrorKind::OutOfMemory => FsError::NoMemory,
            _ => FsError::IoError,
        }
    }
}
