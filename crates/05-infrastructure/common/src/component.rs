//! 组件基础接口定义
//!
//! 提供组件实例化与解析的基础 trait

use crate::errors::{DependencyError, DependencyResult};
use crate::lifecycle::Lifetime;
use crate::metadata::ContractId;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除后的组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 组件激活函数类型
///
/// 接收一个服务提供者用于解析依赖，返回新创建的实例。
pub type Activator = Arc<dyn Fn(&dyn ServiceProvider) -> DependencyResult<Instance> + Send + Sync>;

/// 服务提供者 trait
///
/// 容器的读取侧：按契约解析组件实例
pub trait ServiceProvider {
    /// 解析契约对应的实例（多个注册时取最后一个）
    fn get_instance(&self, contract: &ContractId) -> DependencyResult<Instance>;

    /// 解析契约对应的所有实例，按注册顺序返回
    fn get_all_instances(&self, contract: &ContractId) -> DependencyResult<Vec<Instance>>;

    /// 检查是否可以解析指定契约
    fn can_resolve(&self, contract: &ContractId) -> bool;
}

/// 服务提供者的类型化扩展
pub trait ServiceProviderExt: ServiceProvider {
    /// 解析具体类型
    fn resolve<T: Send + Sync + 'static>(&self) -> DependencyResult<Arc<T>> {
        let contract = ContractId::of::<T>();
        downcast_instance(self.get_instance(&contract)?)
    }

    /// 解析具体类型的所有注册
    fn resolve_all<T: Send + Sync + 'static>(&self) -> DependencyResult<Vec<Arc<T>>> {
        let contract = ContractId::of::<T>();
        self.get_all_instances(&contract)?
            .into_iter()
            .map(downcast_instance)
            .collect()
    }
}

impl<P: ServiceProvider + ?Sized> ServiceProviderExt for P {}

/// 将类型擦除的实例转换为具体类型
pub fn downcast_instance<T: Send + Sync + 'static>(instance: Instance) -> DependencyResult<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| DependencyError::TypeMismatch {
            expected: std::any::type_name::<T>().to_string(),
        })
}

/// 可注入组件 trait
///
/// 支持依赖注入的组件实现此 trait，从服务提供者中取出依赖并构建自身
pub trait Injectable: Sized + Send + Sync + 'static {
    /// 使用依赖注入构建组件实例
    fn inject(provider: &dyn ServiceProvider) -> DependencyResult<Self>;
}

/// 组件描述符
///
/// 记录一条容器注册：契约、实现类型名称和生命周期
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// 注册使用的契约
    pub contract: ContractId,
    /// 实现类型名称
    pub implementation: String,
    /// 组件生命周期
    pub lifetime: Lifetime,
}

impl ComponentDescriptor {
    /// 创建新的组件描述符
    pub fn new(contract: ContractId, implementation: impl Into<String>, lifetime: Lifetime) -> Self {
        Self {
            contract,
            implementation: implementation.into(),
            lifetime,
        }
    }

    /// 组件名称（契约的简短名称）
    pub fn name(&self) -> &'static str {
        self.contract.short_name()
    }
}
