//! # 示例应用程序
//!
//! 演示如何将 Lorn ADSP 依赖注入容器接入 Web 层：
//! 控制器自动注册、通过依赖解析器取得控制器、过滤器依赖注入

use async_trait::async_trait;
use clap::Parser;
use di_abstractions::{CodeModule, ComponentRegistryExt, Container, StaticModule};
use di_impl::DiContainerImpl;
use infrastructure_common::{
    DependencyResult, EnumerationError, EnumerationResult, Injectable, Lifetime, ServiceProvider,
    ServiceProviderExt, TypeDescriptor,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use web_abstractions::{
    controller_descriptor, current_resolver, ActionContext, ActionDescriptor, ActionFilter,
    Controller, FilterAttribute, FilterError,
};
use web_integration::{LoggingConfig, WebIntegration, WebIntegrationBuilder};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn ADSP Web 集成示例应用")]
struct Args {
    /// 集成选项文件路径（.toml 或 .json）
    #[arg(short, long, default_value = "config/integration.toml")]
    config: String,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let integration = build_integration(&args)?;
    print_report(&integration);

    handle_request(&integration, "HomeController", "index").await?;
    handle_request(&integration, "ProductsController", "list").await?;

    info!("示例应用运行结束");
    Ok(())
}

/// 构建 Web 集成
fn build_integration(args: &Args) -> anyhow::Result<WebIntegration> {
    let logging = LoggingConfig::default().with_level_name(&args.log_level)?;

    let container: Arc<dyn Container> = Arc::new(DiContainerImpl::new());
    container.register_singleton(Greeter::new("Lorn ADSP"))?;
    container.register_singleton(RequestCounter::default())?;
    container.register::<RequestLogFilter>(Lifetime::Transient)?;

    let mut builder = WebIntegrationBuilder::new()
        .with_logging(logging)
        .with_container(container)
        .add_module(controllers_module())
        .add_module(GeneratedModule);

    // 添加选项文件（如果存在）
    let config = Path::new(&args.config);
    if config.exists() {
        builder = match config.extension().and_then(|ext| ext.to_str()) {
            Some("json") => builder.load_options_json(config)?,
            _ => builder.load_options_toml(config)?,
        };
    } else {
        info!("选项文件 {} 不存在，使用默认选项", args.config);
    }

    Ok(builder.build()?)
}

fn print_report(integration: &WebIntegration) {
    let report = integration.scan_report();
    println!("扫描模块: {}", report.modules_scanned);
    for name in &report.registered {
        println!("  已注册: {}", name);
    }
    for name in &report.skipped_modules {
        println!("  已跳过: {}", name);
    }
    println!("过滤器提供者: {:?}", integration.filter_providers());
}

/// 模拟框架处理一次请求
async fn handle_request(
    integration: &WebIntegration,
    controller: &str,
    action: &str,
) -> anyhow::Result<()> {
    let descriptor = ActionDescriptor::new(controller, action)
        .with_controller_filter(FilterAttribute::of::<RequestLogFilter>())
        .with_action_filter(FilterAttribute::of::<TimingFilter>().with_order(1));

    let pipeline = integration.filters_for(&descriptor)?;
    let mut context = descriptor.context();
    pipeline.before_action(&mut context).await?;

    let resolver = current_resolver();
    let body = match controller {
        "HomeController" => match resolver.get::<HomeController>()? {
            Some(home) => home.index(),
            None => fallback(controller),
        },
        "ProductsController" => match resolver.get::<ProductsController>()? {
            Some(products) => products.list(),
            None => fallback(controller),
        },
        _ => fallback(controller),
    };
    println!("{}.{} -> {}", controller, action, body);

    pipeline.after_action(&mut context).await?;
    Ok(())
}

fn fallback(controller: &str) -> String {
    warn!("控制器 {} 未由容器提供", controller);
    "404".to_string()
}

fn controllers_module() -> StaticModule {
    StaticModule::new("example_app::controllers")
        .export(controller_descriptor::<HomeController>())
        .export(controller_descriptor::<ProductsController>())
        .export(TypeDescriptor::concrete::<Greeter>())
}

// 示例服务

/// 问候服务
#[derive(Debug)]
pub struct Greeter {
    site: String,
}

impl Greeter {
    /// 创建新的问候服务
    pub fn new(site: impl Into<String>) -> Self {
        Self { site: site.into() }
    }

    /// 问候语
    pub fn greet(&self) -> String {
        format!("欢迎访问 {}", self.site)
    }
}

impl Injectable for Greeter {
    fn inject(_provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        Ok(Self::new("default"))
    }
}

/// 请求计数
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: AtomicU64,
}

impl RequestCounter {
    fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }
}

// 示例控制器

/// 首页控制器
pub struct HomeController {
    greeter: Arc<Greeter>,
}

impl HomeController {
    fn index(&self) -> String {
        self.greeter.greet()
    }
}

impl Controller for HomeController {}

impl Injectable for HomeController {
    fn inject(provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        Ok(Self {
            greeter: provider.resolve::<Greeter>()?,
        })
    }
}

/// 商品控制器
pub struct ProductsController;

impl ProductsController {
    fn list(&self) -> String {
        "[\"键盘\", \"鼠标\"]".to_string()
    }
}

impl Controller for ProductsController {}

impl Injectable for ProductsController {
    fn inject(_provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        Ok(Self)
    }
}

// 示例过滤器

/// 请求日志过滤器，依赖容器中的请求计数
#[derive(Default)]
pub struct RequestLogFilter {
    counter: Arc<RequestCounter>,
}

impl Injectable for RequestLogFilter {
    fn inject(provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        Ok(Self {
            counter: provider.resolve::<RequestCounter>()?,
        })
    }
}

#[async_trait]
impl ActionFilter for RequestLogFilter {
    async fn on_action_executing(&self, context: &mut ActionContext) -> Result<(), FilterError> {
        let number = self.counter.increment();
        info!("第 {} 个请求: {}.{}", number, context.controller, context.action);
        Ok(())
    }
}

/// 计时过滤器
#[derive(Default)]
pub struct TimingFilter;

#[async_trait]
impl ActionFilter for TimingFilter {
    async fn on_action_executing(&self, context: &mut ActionContext) -> Result<(), FilterError> {
        context
            .items
            .insert("started_at".to_string(), format!("{:?}", std::time::Instant::now()));
        Ok(())
    }

    async fn on_action_executed(&self, context: &mut ActionContext) -> Result<(), FilterError> {
        if let Some(started) = context.items.get("started_at") {
            info!("{}.{} 开始于 {}", context.controller, context.action, started);
        }
        Ok(())
    }
}

/// 运行时生成的模块，无法枚举导出类型
struct GeneratedModule;

impl CodeModule for GeneratedModule {
    fn name(&self) -> &str {
        "example_app::generated"
    }

    fn exported_types(&self) -> EnumerationResult<Vec<TypeDescriptor>> {
        Err(EnumerationError::not_supported(self.name()))
    }
}
