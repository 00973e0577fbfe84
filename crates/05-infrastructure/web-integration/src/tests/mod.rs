//! Web 集成测试
