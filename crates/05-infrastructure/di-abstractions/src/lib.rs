//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentRegistry`] - 组件注册表接口（注册接收端）
//! - [`Container`] - 依赖注入容器接口
//! - [`CodeModule`] - 可扫描的代码模块接口
//! - [`ResolveContext`] - 解析上下文，检测循环依赖

pub mod container;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use container::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
