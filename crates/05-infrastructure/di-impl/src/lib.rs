//! # 依赖注入具体实现
//!
//! 提供具体的依赖注入容器：组件注册、实例解析和容器验证

use di_abstractions::{ComponentRegistry, Container, ContainerConfig, ResolveContext, ResolveOptions};
use infrastructure_common::{
    Activator, ComponentDescriptor, ContractId, DependencyError, DependencyResult, Instance,
    Lifetime, ServiceProvider,
};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 单条组件注册信息
struct ComponentRegistration {
    /// 组件描述符
    descriptor: ComponentDescriptor,
    /// 激活函数
    activator: Activator,
    /// 单例实例（仅单例生命周期使用）
    singleton: OnceCell<Instance>,
}

impl ComponentRegistration {
    fn new(descriptor: ComponentDescriptor, activator: Activator) -> Self {
        Self {
            descriptor,
            activator,
            singleton: OnceCell::new(),
        }
    }

    fn activate(&self, provider: &dyn ServiceProvider) -> DependencyResult<Instance> {
        match self.descriptor.lifetime {
            Lifetime::Singleton => self
                .singleton
                .get_or_try_init(|| (self.activator)(provider))
                .cloned(),
            Lifetime::Transient => (self.activator)(provider),
        }
    }
}

#[derive(Default)]
struct Registrations {
    /// 按契约分组的注册
    by_contract: HashMap<ContractId, Vec<Arc<ComponentRegistration>>>,
    /// 按注册顺序排列的全部注册
    ordered: Vec<Arc<ComponentRegistration>>,
}

/// 具体的依赖注入容器实现
///
/// 注册是累加的，同一契约多次注册时 `get_instance` 返回最后一次注册，
/// `get_all_instances` 按注册顺序返回全部实例。
pub struct DiContainerImpl {
    /// 组件注册信息
    registrations: RwLock<Registrations>,
    /// 容器配置
    config: ContainerConfig,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registrations: RwLock::new(Registrations::default()),
            config,
        }
    }

    /// 获取容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    fn add_registration(&self, registration: ComponentRegistration) {
        let registration = Arc::new(registration);
        let mut registrations = self.registrations.write();
        registrations
            .by_contract
            .entry(registration.descriptor.contract)
            .or_default()
            .push(Arc::clone(&registration));
        registrations.ordered.push(registration);
    }

    /// 取出契约的注册列表，不持有锁
    fn registrations_for(&self, contract: &ContractId) -> Vec<Arc<ComponentRegistration>> {
        self.registrations
            .read()
            .by_contract
            .get(contract)
            .cloned()
            .unwrap_or_default()
    }

    fn new_scope(&self) -> ResolutionScope<'_> {
        ResolutionScope {
            container: self,
            context: RefCell::new(ResolveContext::with_options(ResolveOptions {
                max_depth: self.config.max_resolution_depth,
            })),
        }
    }

    fn resolve_in(
        &self,
        contract: &ContractId,
        scope: &ResolutionScope<'_>,
    ) -> DependencyResult<Instance> {
        let registration = self
            .registrations_for(contract)
            .pop()
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: contract.type_name.to_string(),
            })?;

        Self::activate_in(&registration, scope)
    }

    fn resolve_all_in(
        &self,
        contract: &ContractId,
        scope: &ResolutionScope<'_>,
    ) -> DependencyResult<Vec<Instance>> {
        self.registrations_for(contract)
            .iter()
            .map(|registration| Self::activate_in(registration, scope))
            .collect()
    }

    fn activate_in(
        registration: &ComponentRegistration,
        scope: &ResolutionScope<'_>,
    ) -> DependencyResult<Instance> {
        scope
            .context
            .borrow_mut()
            .push_contract(registration.descriptor.contract)?;
        let result = registration.activate(scope);
        scope.context.borrow_mut().pop_contract();

        if let Err(e) = &result {
            debug!(
                "激活组件失败: {} - {}",
                registration.descriptor.implementation, e
            );
        }
        result
    }
}

impl Default for DiContainerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiContainerImpl")
            .field("registrations", &self.registrations.read().ordered.len())
            .field("config", &self.config)
            .finish()
    }
}

impl ComponentRegistry for DiContainerImpl {
    fn register_activator(
        &self,
        contract: ContractId,
        implementation: &str,
        activator: Activator,
        lifetime: Lifetime,
    ) -> DependencyResult<()> {
        info!(
            "注册组件: {} -> {} ({})",
            contract.short_name(),
            implementation,
            lifetime
        );

        let descriptor = ComponentDescriptor::new(contract, implementation, lifetime);
        self.add_registration(ComponentRegistration::new(descriptor, activator));
        Ok(())
    }

    fn register_instance(&self, contract: ContractId, instance: Instance) -> DependencyResult<()> {
        info!("注册单例实例: {}", contract.short_name());

        let descriptor = ComponentDescriptor::new(contract, contract.type_name, Lifetime::Singleton);
        let shared = Arc::clone(&instance);
        let activator: Activator = Arc::new(move |_: &dyn ServiceProvider| Ok(Arc::clone(&shared)));
        let registration = ComponentRegistration::new(descriptor, activator);
        // 预先填充单例，解析时不再调用激活函数
        let _ = registration.singleton.set(instance);
        self.add_registration(registration);
        Ok(())
    }

    fn is_registered(&self, contract: &ContractId) -> bool {
        self.registrations
            .read()
            .by_contract
            .get(contract)
            .is_some_and(|list| !list.is_empty())
    }

    fn registered_components(&self) -> Vec<ComponentDescriptor> {
        self.registrations
            .read()
            .ordered
            .iter()
            .map(|registration| registration.descriptor.clone())
            .collect()
    }

    fn registration_count(&self) -> usize {
        self.registrations.read().ordered.len()
    }

    fn clear(&self) {
        let mut registrations = self.registrations.write();
        let count = registrations.ordered.len();
        registrations.by_contract.clear();
        registrations.ordered.clear();
        info!("清理容器，移除 {} 条注册", count);
    }
}

impl ServiceProvider for DiContainerImpl {
    fn get_instance(&self, contract: &ContractId) -> DependencyResult<Instance> {
        debug!("解析组件: {}", contract.short_name());
        self.resolve_in(contract, &self.new_scope())
    }

    fn get_all_instances(&self, contract: &ContractId) -> DependencyResult<Vec<Instance>> {
        debug!("解析所有组件: {}", contract.short_name());
        self.resolve_all_in(contract, &self.new_scope())
    }

    fn can_resolve(&self, contract: &ContractId) -> bool {
        self.is_registered(contract)
    }
}

impl Container for DiContainerImpl {
    fn as_registry(&self) -> &dyn ComponentRegistry {
        self
    }

    fn as_provider(&self) -> &dyn ServiceProvider {
        self
    }

    fn verify(&self) -> Result<(), Vec<DependencyError>> {
        info!("验证容器状态");

        let registrations = self.registrations.read().ordered.clone();
        let errors: Vec<DependencyError> = registrations
            .iter()
            .filter_map(|registration| Self::activate_in(registration, &self.new_scope()).err())
            .collect();

        if errors.is_empty() {
            info!("容器验证通过，共 {} 条注册", registrations.len());
            Ok(())
        } else {
            warn!("容器验证失败，{} 条注册无法激活", errors.len());
            Err(errors)
        }
    }
}

/// 单次解析的作用域
///
/// 激活函数通过它解析依赖，解析链在整个作用域内共享
struct ResolutionScope<'a> {
    container: &'a DiContainerImpl,
    context: RefCell<ResolveContext>,
}

impl ServiceProvider for ResolutionScope<'_> {
    fn get_instance(&self, contract: &ContractId) -> DependencyResult<Instance> {
        self.container.resolve_in(contract, self)
    }

    fn get_all_instances(&self, contract: &ContractId) -> DependencyResult<Vec<Instance>> {
        self.container.resolve_all_in(contract, self)
    }

    fn can_resolve(&self, contract: &ContractId) -> bool {
        self.container.is_registered(contract)
    }
}
