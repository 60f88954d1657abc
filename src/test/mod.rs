//! 测试工具
//!
//! `test_case!` / `kassert!`：软断言风格的测试用例，失败断言在用例结束时统一报告。
