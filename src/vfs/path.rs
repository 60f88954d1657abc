//! 路径解析与规范化

use alloc::string::String;
use alloc::vec::Vec;

/// 路径中的一个组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathComponent<'a> {
    /// "/"
    Root,
    /// "."
    Current,
    /// ".."
    Parent,
    /// 正常的文件名
    Normal(&'a str),
}

/// 将路径字符串解析为组件列表
pub fn parse_path(path: &str) -> Vec<PathComponent<'_>> {
    let mut components = Vec::new();

    // 绝对路径以 Root 开始
    if path.starts_with('/') {
        components.push(PathComponent::Root);
    }

    components.extend(path.split('/').filter(|s| !s.is_empty()).map(|part| match part {
        "." => PathComponent::Current,
        ".." => PathComponent::Parent,
        name => PathComponent::Normal(name),
    }));

    components
}

/// 规范化为绝对路径（处理 ".." 和 "."）
///
/// 相对路径按根目录解释；".." 不会越过根目录。
pub fn normalize_path(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();

    for component in parse_path(path) {
        match component {
            PathComponent::Root | PathComponent::Current => {}
            PathComponent::Parent => {
                stack.pop();
            }
            PathComponent::Normal(name) => stack.push(name),
        }
    }

    String::from("/") + &stack.join("/")
}

/// 若 `path` 位于 `prefix` 之下，返回剩余部分（不含前导 '/'）
///
/// 两者都必须是规范化后的绝对路径。
pub fn strip_mount_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix == "/" {
        return Some(path.trim_start_matches('/'));
    }
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}
