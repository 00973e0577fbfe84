//! Web 框架接入点
//!
//! 将依赖注入容器接入框架的两个扩展点：依赖解析器钩子和过滤器提供者集合

use crate::filter_provider::ContainerFilterProvider;
use crate::resolver_adapter::ContainerDependencyResolver;
use di_abstractions::Container;
use infrastructure_common::{
    downcast_instance, ContractId, DependencyResult, Instance, IntegrationError,
    IntegrationResult, ServiceProvider,
};
use std::sync::Arc;
use tracing::info;
use web_abstractions::{set_resolver, AttributeFilterProvider, FilterProvider, FilterProviderCollection};

/// 将容器设置为框架的全局依赖解析器
///
/// 容器为 `None` 时返回 `InvalidArgument`，全局解析器保持不变
pub fn register_dependency_resolver(container: Option<Arc<dyn Container>>) -> IntegrationResult<()> {
    let container = container.ok_or_else(|| IntegrationError::invalid_argument("container"))?;

    set_resolver(Arc::new(ContainerDependencyResolver::new(container)));
    info!("依赖解析器已替换为容器解析器");
    Ok(())
}

/// 使用基于容器的过滤器提供者替换内置的特性过滤器提供者
///
/// 移除集合中所有 [`AttributeFilterProvider`]，并添加一个 [`ContainerFilterProvider`]。
/// 新的提供者同时以单例注册到容器中。返回被移除的内置提供者数量。
pub fn register_attribute_filter_provider(
    container: Option<Arc<dyn Container>>,
    providers: &mut FilterProviderCollection,
) -> IntegrationResult<usize> {
    let container = container.ok_or_else(|| IntegrationError::invalid_argument("container"))?;

    let provider: Arc<dyn FilterProvider> = Arc::new(ContainerFilterProvider::new(&container));
    container.register_instance(
        ContractId::of::<dyn FilterProvider>(),
        Arc::new(Arc::clone(&provider)) as Instance,
    )?;

    let removed = providers.remove_all_of::<AttributeFilterProvider>();
    providers.add(provider);

    info!("特性过滤器提供者已替换，移除 {} 个内置提供者", removed);
    Ok(removed)
}

/// 从服务提供者中取出所有注册为 `dyn FilterProvider` 的过滤器提供者
pub fn resolve_filter_providers(
    provider: &dyn ServiceProvider,
) -> DependencyResult<Vec<Arc<dyn FilterProvider>>> {
    let contract = ContractId::of::<dyn FilterProvider>();
    if !provider.can_resolve(&contract) {
        return Ok(Vec::new());
    }

    provider
        .get_all_instances(&contract)?
        .into_iter()
        .map(|instance| {
            downcast_instance::<Arc<dyn FilterProvider>>(instance).map(|p| Arc::clone(&*p))
        })
        .collect()
}
