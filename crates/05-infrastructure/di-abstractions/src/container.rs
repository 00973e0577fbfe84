//! 依赖注入容器抽象接口

use crate::registry::ComponentRegistry;
use infrastructure_common::{DependencyError, ServiceProvider};

/// 依赖注入容器 trait
///
/// 同时具备注册（写入侧）和解析（读取侧）能力。
/// `as_registry` / `as_provider` 用于在不支持 trait 向上转换的编译器上取得父 trait 对象。
pub trait Container: ComponentRegistry + ServiceProvider + Send + Sync {
    /// 作为注册表使用
    fn as_registry(&self) -> &dyn ComponentRegistry;

    /// 作为服务提供者使用
    fn as_provider(&self) -> &dyn ServiceProvider;

    /// 验证容器状态，返回所有激活失败的注册
    fn verify(&self) -> Result<(), Vec<DependencyError>> {
        Ok(())
    }
}

/// 容器配置
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// 最大解析深度
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 100,
        }
    }
}
