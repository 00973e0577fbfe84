//! # Web Abstractions
//!
//! Web 框架的扩展点定义，依赖注入容器通过这些扩展点接入框架。
//!
//! ## 扩展点
//!
//! - [`Controller`] - 请求处理器契约
//! - [`DependencyResolver`] - 解析框架自身未构造的对象
//! - [`FilterProvider`] / [`FilterProviderCollection`] - 为动作提供过滤器
//! - [`ActionFilter`] / [`FilterPipeline`] - 横切行为及其执行

pub mod controller;
pub mod filters;
pub mod providers;
pub mod resolver;

pub use controller::*;
pub use filters::*;
pub use providers::*;
pub use resolver::*;
