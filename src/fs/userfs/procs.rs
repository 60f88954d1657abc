//! `procs` 文件内容生成
//!
//! 内容不缓存：每次读取都重新扫描进程目录，再按偏移量切片。
//! 同一个句柄的两次读取之间进程表可能已经变化，这是预期行为。

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Write;
use core::ops::ControlFlow;

use crate::config::{COLOR_GREEN, COLOR_RESET, PID_COLUMN_WIDTH, PROCS_HEADING};
use crate::fs::userfs::MountOptions;
use crate::process::ProcessDirectory;
use crate::vfs::FsError;
use crate::pr_debug;

/// 动态内容生成器 trait
pub trait ContentGenerator: Send + Sync {
    /// 生成文件内容（每次调用时重新生成）
    fn generate(&self) -> Result<Vec<u8>, FsError>;
}

/// 解析 uid 目录名
///
/// 只接受规范的十进制写法：没有符号、没有前导零（"0" 本身除外）、
/// 不超出 u32。其余名字都不是 uid 目录。
pub fn parse_uid(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if name.len() > 1 && name.starts_with('0') {
        return None;
    }
    name.parse().ok()
}

/// 某个 uid 的 `procs` 内容生成器
pub struct ProcsGenerator {
    uid: u32,
    source: Arc<dyn ProcessDirectory>,
    options: MountOptions,
}

impl ProcsGenerator {
    /// `uid` 的生成器
    pub fn new(uid: u32, source: Arc<dyn ProcessDirectory>, options: MountOptions) -> Self {
        Self {
            uid,
            source,
            options,
        }
    }

    /// 所属 uid
    pub fn uid(&self) -> u32 {
        self.uid
    }
}

impl ContentGenerator for ProcsGenerator {
    fn generate(&self) -> Result<Vec<u8>, FsError> {
        render_procs(self.source.as_ref(), self.uid, &self.options)
    }
}

/// 渲染 uid 的进程表
///
/// 标题行之后每个属于该 uid 的进程一行：PID 左对齐占 7 列，一个空格，命令名。
/// 总长度不超过 `max_output`；放不下的行连同其后的进程都被省略。
pub fn render_procs(
    source: &dyn ProcessDirectory,
    uid: u32,
    options: &MountOptions,
) -> Result<Vec<u8>, FsError> {
    let budget = options.max_output;
    let mut out = String::new();
    out.try_reserve(budget.min(1024))?;

    if options.color {
        out.push_str(COLOR_GREEN);
        out.push_str(PROCS_HEADING);
        out.push('\n');
        out.push_str(COLOR_RESET);
    } else {
        out.push_str(PROCS_HEADING);
        out.push('\n');
    }

    let mut line = String::new();
    let mut truncated = false;
    source.for_each_live_process(&mut |p| {
        if p.owner_uid != uid {
            return ControlFlow::Continue(());
        }
        line.clear();
        // 写入 String 不会失败
        let _ = writeln!(line, "{:<width$} {}", p.pid, p.command_name, width = PID_COLUMN_WIDTH);
        if out.len() + line.len() > budget {
            truncated = true;
            return ControlFlow::Break(());
        }
        out.push_str(&line);
        ControlFlow::Continue(())
    })?;

    if truncated {
        pr_debug!("userfs: procs for uid {} truncated at {} bytes", uid, out.len());
    }

    Ok(out.into_bytes())
}

/// 从 `data` 的 `offset` 处复制到 `buf`，越过末尾返回 0
pub fn read_slice(data: &[u8], offset: usize, buf: &mut [u8]) -> usize {
    if offset >= data.len() {
        return 0;
    }
    let to_read = (data.len() - offset).min(buf.len());
    buf[..to_read].copy_from_slice(&data[offset..offset + to_read]);
    to_read
}
