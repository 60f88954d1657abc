//! 同步原语
//!
//! 向文件系统各模块提供基本的锁
//! - [`SpinLock`]：短临界区（元数据、子项表）
//! - [`Mutex`]：目录合成的串行化域
mod spin_lock;

pub use spin::Mutex;
pub use spin_lock::*;
