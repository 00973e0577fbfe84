//! 容器依赖解析器适配

use di_abstractions::Container;
use infrastructure_common::{ContractId, DependencyResult, Instance};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use web_abstractions::DependencyResolver;

/// 基于依赖注入容器的依赖解析器
///
/// 未注册的契约返回 `None` / 空列表，交由框架使用自身的默认行为
pub struct ContainerDependencyResolver {
    container: Arc<dyn Container>,
}

impl ContainerDependencyResolver {
    /// 创建新的容器依赖解析器
    pub fn new(container: Arc<dyn Container>) -> Self {
        Self { container }
    }

    /// 底层容器
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }
}

impl DependencyResolver for ContainerDependencyResolver {
    fn get_service(&self, contract: &ContractId) -> DependencyResult<Option<Instance>> {
        if !self.container.is_registered(contract) {
            debug!("契约 {} 未注册，交由框架处理", contract);
            return Ok(None);
        }

        self.container.get_instance(contract).map(Some)
    }

    fn get_services(&self, contract: &ContractId) -> DependencyResult<Vec<Instance>> {
        if !self.container.is_registered(contract) {
            return Ok(Vec::new());
        }

        self.container.get_all_instances(contract)
    }

    fn name(&self) -> &str {
        "ContainerDependencyResolver"
    }
}

impl fmt::Debug for ContainerDependencyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerDependencyResolver")
            .field("registrations", &self.container.registration_count())
            .finish()
    }
}
