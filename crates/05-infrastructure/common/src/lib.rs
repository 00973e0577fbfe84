//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 平台基础设施层的公共 traits 和工具。
//!
//! ## 核心组件
//!
//! - [`TypeDescriptor`] - 类型描述符，替代运行时反射
//! - [`ContractId`] - 容器查找组件使用的契约标识
//! - [`ConventionRule`] - 组件发现约定规则
//! - [`ServiceProvider`] / [`Injectable`] - 组件解析与依赖注入
//! - [`Lifetime`] - 组件生命周期
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 约定优于配置
//! - 显式声明的类型注册表代替反射扫描

pub mod component;
pub mod conventions;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use component::*;
pub use conventions::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
