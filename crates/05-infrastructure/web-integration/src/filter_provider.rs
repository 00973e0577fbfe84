//! 基于容器的过滤器提供者
//!
//! 替代框架内置的特性过滤器提供者：过滤器类型在容器中注册时由容器创建，
//! 其依赖由容器注入；未注册时退回到过滤器的默认构造。

use di_abstractions::Container;
use infrastructure_common::{DependencyError, DependencyResult};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};
use web_abstractions::{ActionDescriptor, ActionFilter, Filter, FilterAttribute, FilterProvider};

/// 基于容器的过滤器提供者
///
/// 提供者本身也注册在容器中，因此只持有容器的弱引用
pub struct ContainerFilterProvider {
    container: Weak<dyn Container>,
}

impl ContainerFilterProvider {
    /// 创建新的容器过滤器提供者
    pub fn new(container: &Arc<dyn Container>) -> Self {
        Self {
            container: Arc::downgrade(container),
        }
    }

    fn create_filter(&self, attribute: &FilterAttribute) -> DependencyResult<Arc<dyn ActionFilter>> {
        let contract = attribute.contract();

        let Some(container) = self.container.upgrade() else {
            warn!("容器已释放，过滤器 {} 使用默认构造", contract);
            return Ok(attribute.create_default());
        };

        if !container.is_registered(&contract) {
            debug!("过滤器 {} 未在容器中注册，使用默认构造", contract);
            return Ok(attribute.create_default());
        }

        let instance = container.get_instance(&contract)?;
        attribute.cast(instance).ok_or_else(|| DependencyError::TypeMismatch {
            expected: contract.type_name.to_string(),
        })
    }
}

impl FilterProvider for ContainerFilterProvider {
    fn name(&self) -> &str {
        "ContainerFilterProvider"
    }

    fn get_filters(&self, action: &ActionDescriptor) -> DependencyResult<Vec<Filter>> {
        action
            .filter_attributes()
            .map(|(scope, attribute)| {
                let instance = self.create_filter(attribute)?;
                Ok(Filter::new(instance, scope, attribute.order()))
            })
            .collect()
    }
}

impl fmt::Debug for ContainerFilterProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerFilterProvider")
            .field("container_alive", &(self.container.strong_count() > 0))
            .finish()
    }
}
