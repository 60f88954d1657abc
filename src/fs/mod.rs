//! 文件系统实现
pub mod userfs;

#[cfg(test)]
mod tests;
