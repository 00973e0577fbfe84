//! # Web 集成层
//!
//! 将依赖注入容器接入 Web 框架：按约定发现并注册控制器，
//! 替换框架的依赖解析器，并用基于容器的过滤器提供者替换内置的特性过滤器提供者。
//!
//! ## 主要功能
//!
//! - **控制器扫描**: 从代码模块中发现 `*Controller` 类型并注册到容器
//! - **依赖解析器**: 框架通过容器解析自身未构造的对象
//! - **过滤器注入**: 过滤器由容器创建，依赖由容器注入
//! - **集成构建器**: 一次完成上述全部接入
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::StaticModule;
//! use web_integration::WebIntegrationBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let module = StaticModule::new("app::controllers");
//!
//!     let integration = WebIntegrationBuilder::new()
//!         .with_default_container()
//!         .add_module(module)
//!         .build()?;
//!
//!     println!("已注册: {:?}", integration.scan_report().registered);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod controller_scanner;
pub mod filter_provider;
pub mod integration;
pub mod options;
pub mod resolver_adapter;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use builder::{LoggingConfig, WebIntegration, WebIntegrationBuilder};
pub use controller_scanner::{
    controller_convention, discover_controllers, register_controllers, register_controllers_with,
    ScanReport, CONTROLLER_SUFFIX,
};
pub use filter_provider::ContainerFilterProvider;
pub use integration::{
    register_attribute_filter_provider, register_dependency_resolver, resolve_filter_providers,
};
pub use options::IntegrationOptions;
pub use resolver_adapter::ContainerDependencyResolver;

// 重新导出错误类型
pub use infrastructure_common::IntegrationError;
