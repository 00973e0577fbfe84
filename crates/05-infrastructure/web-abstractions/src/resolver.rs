//! 依赖解析器钩子
//!
//! 框架在需要自身未构造的对象时，通过进程级的依赖解析器获取实例

use infrastructure_common::{downcast_instance, ContractId, DependencyResult, Instance};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// 依赖解析器 trait
pub trait DependencyResolver: Send + Sync {
    /// 解析单个实例，未注册时返回 `None`
    fn get_service(&self, contract: &ContractId) -> DependencyResult<Option<Instance>>;

    /// 解析契约的所有实例，未注册时返回空列表
    fn get_services(&self, contract: &ContractId) -> DependencyResult<Vec<Instance>>;

    /// 解析器名称
    fn name(&self) -> &str;
}

impl dyn DependencyResolver {
    /// 解析具体类型
    pub fn get<T: Send + Sync + 'static>(&self) -> DependencyResult<Option<Arc<T>>> {
        self.get_service(&ContractId::of::<T>())?
            .map(downcast_instance::<T>)
            .transpose()
    }
}

/// 默认依赖解析器，不解析任何对象
#[derive(Debug, Default)]
pub struct DefaultDependencyResolver;

impl DependencyResolver for DefaultDependencyResolver {
    fn get_service(&self, _contract: &ContractId) -> DependencyResult<Option<Instance>> {
        Ok(None)
    }

    fn get_services(&self, _contract: &ContractId) -> DependencyResult<Vec<Instance>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "DefaultDependencyResolver"
    }
}

/// 全局依赖解析器
static DEPENDENCY_RESOLVER: Lazy<RwLock<Arc<dyn DependencyResolver>>> =
    Lazy::new(|| RwLock::new(Arc::new(DefaultDependencyResolver)));

/// 替换全局依赖解析器
///
/// 应在启动阶段、并发请求开始之前调用一次
pub fn set_resolver(resolver: Arc<dyn DependencyResolver>) {
    info!("设置依赖解析器: {}", resolver.name());
    *DEPENDENCY_RESOLVER.write() = resolver;
}

/// 获取当前的全局依赖解析器
pub fn current_resolver() -> Arc<dyn DependencyResolver> {
    DEPENDENCY_RESOLVER.read().clone()
}
