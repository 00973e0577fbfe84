//! 组件注册表抽象接口

use infrastructure_common::{
    Activator, ComponentDescriptor, ContractId, DependencyError, DependencyResult, Injectable,
    Instance, Lifetime, ServiceProvider, TypeDescriptor,
};
use std::sync::Arc;

/// 组件注册表 trait
///
/// 容器的写入侧。注册是累加的：同一类型注册两次会得到两条注册记录，
/// 去重不是调用方的责任。
pub trait ComponentRegistry: Send + Sync {
    /// 将类型描述符以自身作为契约注册（契约与实现为同一类型）
    fn register_type(&self, descriptor: &TypeDescriptor, lifetime: Lifetime) -> DependencyResult<()> {
        let activator = descriptor
            .activator()
            .cloned()
            .ok_or_else(|| DependencyError::RegistrationError {
                type_name: descriptor.full_name.to_string(),
                message: "抽象类型无法注册为实现".to_string(),
            })?;

        self.register_activator(descriptor.contract(), descriptor.full_name, activator, lifetime)
    }

    /// 使用激活函数注册契约
    fn register_activator(
        &self,
        contract: ContractId,
        implementation: &str,
        activator: Activator,
        lifetime: Lifetime,
    ) -> DependencyResult<()>;

    /// 注册已创建的实例（单例）
    fn register_instance(&self, contract: ContractId, instance: Instance) -> DependencyResult<()>;

    /// 检查契约是否已注册
    fn is_registered(&self, contract: &ContractId) -> bool;

    /// 获取所有注册记录，按注册顺序返回
    fn registered_components(&self) -> Vec<ComponentDescriptor>;

    /// 注册记录总数
    fn registration_count(&self) -> usize {
        self.registered_components().len()
    }

    /// 清理所有注册
    fn clear(&self);
}

/// 组件注册表的类型化扩展
pub trait ComponentRegistryExt: ComponentRegistry {
    /// 注册可注入组件
    fn register<T: Injectable>(&self, lifetime: Lifetime) -> DependencyResult<()> {
        self.register_type(&TypeDescriptor::concrete::<T>(), lifetime)
    }

    /// 注册单例实例
    fn register_singleton<T: Send + Sync + 'static>(&self, instance: T) -> DependencyResult<()> {
        self.register_instance(ContractId::of::<T>(), Arc::new(instance))
    }

    /// 注册组件工厂
    fn register_factory<T, F>(&self, factory: F, lifetime: Lifetime) -> DependencyResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> DependencyResult<T> + Send + Sync + 'static,
    {
        let activator: Activator =
            Arc::new(move |provider: &dyn ServiceProvider| Ok(Arc::new(factory(provider)?) as Instance));
        self.register_activator(
            ContractId::of::<T>(),
            std::any::type_name::<T>(),
            activator,
            lifetime,
        )
    }
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistryExt for R {}
