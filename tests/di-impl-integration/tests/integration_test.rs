//! Centralized integration tests: container behind the web integration
use async_trait::async_trait;
use di_abstractions::{CodeModule, ComponentRegistryExt, Container, StaticModule};
use di_impl::DiContainerImpl;
use infrastructure_common::{
    ContractId, DependencyError, DependencyResult, EnumerationError, EnumerationResult,
    Injectable, Lifetime, ServiceProvider, ServiceProviderExt, TypeDescriptor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use web_abstractions::{
    controller_descriptor, current_resolver, ActionContext, ActionDescriptor, ActionFilter,
    Controller, FilterAttribute, FilterError,
};
use web_integration::{IntegrationOptions, WebIntegrationBuilder};

/// 计数服务，记录被创建的次数
#[derive(Debug)]
struct Counter {
    id: usize,
}

static CREATED: AtomicUsize = AtomicUsize::new(0);

impl Injectable for Counter {
    fn inject(_provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        Ok(Self {
            id: CREATED.fetch_add(1, Ordering::SeqCst),
        })
    }
}

struct OrdersController {
    counter: Arc<Counter>,
}

impl Controller for OrdersController {}

impl Injectable for OrdersController {
    fn inject(provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        Ok(Self {
            counter: provider.resolve::<Counter>()?,
        })
    }
}

struct ReportsController;

impl Controller for ReportsController {}

impl Injectable for ReportsController {
    fn inject(_provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        Ok(Self)
    }
}

/// 需要在容器中才能正确构造的过滤器
#[derive(Default)]
struct TenantFilter {
    tenant: Option<Arc<Tenant>>,
}

#[derive(Debug)]
struct Tenant(&'static str);

impl Injectable for TenantFilter {
    fn inject(provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        Ok(Self {
            tenant: Some(provider.resolve::<Tenant>()?),
        })
    }
}

#[async_trait]
impl ActionFilter for TenantFilter {
    async fn on_action_executing(&self, context: &mut ActionContext) -> Result<(), FilterError> {
        match &self.tenant {
            Some(tenant) => {
                context
                    .items
                    .insert("tenant".to_string(), tenant.0.to_string());
                Ok(())
            }
            None => Err(FilterError::Rejected {
                filter: self.name().to_string(),
                reason: "缺少租户".to_string(),
            }),
        }
    }
}

struct PluginModule;

impl CodeModule for PluginModule {
    fn name(&self) -> &str {
        "plugins::generated"
    }

    fn exported_types(&self) -> EnumerationResult<Vec<TypeDescriptor>> {
        Err(EnumerationError::not_supported(self.name()))
    }
}

fn controllers_module() -> StaticModule {
    StaticModule::new("shop::controllers")
        .export(controller_descriptor::<OrdersController>())
        .export(controller_descriptor::<ReportsController>())
        .export(TypeDescriptor::concrete::<Counter>())
}

/// 本测试二进制中唯一修改全局解析器的测试
#[tokio::test]
async fn test_end_to_end_web_integration() -> anyhow::Result<()> {
    let container: Arc<dyn Container> = Arc::new(DiContainerImpl::new());
    container.register::<Counter>(Lifetime::Singleton)?;
    container.register_singleton(Tenant("acme"))?;
    container.register::<TenantFilter>(Lifetime::Transient)?;

    let integration = WebIntegrationBuilder::new()
        .with_container(Arc::clone(&container))
        .add_module(controllers_module())
        .add_module(PluginModule)
        .build()?;

    let report = integration.scan_report();
    assert_eq!(report.registered.len(), 2);
    assert_eq!(report.skipped_modules, vec!["plugins::generated".to_string()]);

    // 框架通过全局解析器取得控制器
    let resolver = current_resolver();
    let orders = resolver
        .get::<OrdersController>()?
        .ok_or_else(|| anyhow::anyhow!("控制器未解析"))?;
    let again = resolver
        .get::<OrdersController>()?
        .ok_or_else(|| anyhow::anyhow!("控制器未解析"))?;
    assert!(!Arc::ptr_eq(&orders, &again));
    assert_eq!(orders.counter.id, again.counter.id);
    assert!(resolver.get::<Tenant>()?.is_some());

    // 过滤器依赖由容器注入
    let action = ActionDescriptor::new("OrdersController", "list")
        .with_controller_filter(FilterAttribute::of::<TenantFilter>());
    let pipeline = integration.filters_for(&action)?;
    let mut context = action.context();
    pipeline.before_action(&mut context).await?;
    assert_eq!(context.items.get("tenant").map(String::as_str), Some("acme"));

    Ok(())
}

#[tokio::test]
async fn test_default_constructed_filter_without_container_registration() {
    let options = IntegrationOptions {
        register_dependency_resolver: false,
        ..IntegrationOptions::default()
    };
    let integration = WebIntegrationBuilder::new()
        .with_options(options)
        .with_default_container()
        .build()
        .unwrap();

    let action = ActionDescriptor::new("OrdersController", "list")
        .with_action_filter(FilterAttribute::of::<TenantFilter>());
    let pipeline = integration.filters_for(&action).unwrap();
    let mut context = action.context();

    let err = pipeline.before_action(&mut context).await.unwrap_err();
    assert!(matches!(err, FilterError::Rejected { .. }));
}

#[test]
fn test_singleton_shared_across_threads() {
    let container: Arc<dyn Container> = Arc::new(DiContainerImpl::new());
    container.register::<Counter>(Lifetime::Singleton).unwrap();

    let ids: Vec<usize> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            std::thread::spawn(move || container.as_provider().resolve::<Counter>().map(|c| c.id))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap().unwrap())
        .collect();

    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_verify_reports_missing_dependencies() {
    let container = DiContainerImpl::new();
    container
        .register::<OrdersController>(Lifetime::Transient)
        .unwrap();
    container
        .register::<ReportsController>(Lifetime::Transient)
        .unwrap();

    let errors = container.verify().unwrap_err();

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        DependencyError::ComponentNotRegistered { .. }
    ));

    container.register::<Counter>(Lifetime::Singleton).unwrap();
    assert!(container.verify().is_ok());
    assert!(container.can_resolve(&ContractId::of::<OrdersController>()));
}
