//! Web 集成构建器

use crate::controller_scanner::{controller_convention, register_controllers_with, ScanReport};
use crate::integration::{register_attribute_filter_provider, register_dependency_resolver};
use crate::options::IntegrationOptions;
use di_abstractions::{CodeModule, Container, ContainerConfig};
use di_impl::DiContainerImpl;
use infrastructure_common::{
    DependencyResult, Injectable, IntegrationError, IntegrationResult, ServiceProviderExt,
};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};
use web_abstractions::{ActionDescriptor, Controller, FilterPipeline, FilterProviderCollection};

/// Web 集成构建器
///
/// 使用建造者模式完成容器与 Web 框架的接入：
/// 扫描控制器、替换依赖解析器、替换特性过滤器提供者
pub struct WebIntegrationBuilder {
    /// 依赖注入容器
    container: Option<Arc<dyn Container>>,
    /// 是否在构建时创建默认容器
    use_default_container: bool,
    /// 待扫描的代码模块
    modules: Vec<Arc<dyn CodeModule>>,
    /// 过滤器提供者集合
    filter_providers: Option<FilterProviderCollection>,
    /// 集成选项
    options: IntegrationOptions,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl WebIntegrationBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            container: None,
            use_default_container: false,
            modules: Vec::new(),
            filter_providers: None,
            options: IntegrationOptions::default(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 使用指定的容器
    pub fn with_container(mut self, container: Arc<dyn Container>) -> Self {
        self.container = Some(container);
        self.use_default_container = false;
        self
    }

    /// 构建时按选项创建默认容器
    pub fn with_default_container(mut self) -> Self {
        self.container = None;
        self.use_default_container = true;
        self
    }

    /// 添加待扫描的模块
    pub fn add_module<M: CodeModule + 'static>(mut self, module: M) -> Self {
        debug!("添加扫描模块: {}", module.name());
        self.modules.push(Arc::new(module));
        self
    }

    /// 添加共享的模块
    pub fn add_shared_module(mut self, module: Arc<dyn CodeModule>) -> Self {
        debug!("添加扫描模块: {}", module.name());
        self.modules.push(module);
        self
    }

    /// 使用指定的过滤器提供者集合，未指定时使用框架默认集合
    pub fn with_filter_providers(mut self, providers: FilterProviderCollection) -> Self {
        self.filter_providers = Some(providers);
        self
    }

    /// 设置集成选项
    pub fn with_options(mut self, options: IntegrationOptions) -> Self {
        self.options = options;
        self
    }

    /// 从 TOML 文件加载集成选项
    pub fn load_options_toml<P: AsRef<Path>>(mut self, path: P) -> IntegrationResult<Self> {
        let path = path.as_ref();
        info!("加载 TOML 集成选项: {}", path.display());
        self.options = IntegrationOptions::from_toml_file(path)?;
        Ok(self)
    }

    /// 从 JSON 文件加载集成选项
    pub fn load_options_json<P: AsRef<Path>>(mut self, path: P) -> IntegrationResult<Self> {
        let path = path.as_ref();
        info!("加载 JSON 集成选项: {}", path.display());
        self.options = IntegrationOptions::from_json_file(path)?;
        Ok(self)
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 当前的集成选项
    pub fn options(&self) -> &IntegrationOptions {
        &self.options
    }

    /// 构建集成
    pub fn build(self) -> IntegrationResult<WebIntegration> {
        // 只有在明确配置了日志时才初始化日志，避免在测试中重复初始化
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        info!("开始构建 Web 集成");
        self.options.validate()?;

        let container = match self.container {
            Some(container) => container,
            None if self.use_default_container => {
                let config = ContainerConfig {
                    max_resolution_depth: self.options.max_resolution_depth,
                };
                Arc::new(DiContainerImpl::with_config(config)) as Arc<dyn Container>
            }
            None => return Err(IntegrationError::invalid_argument("container")),
        };

        let convention = controller_convention(
            &self.options.controller_suffix,
            self.options.controller_lifetime,
        );
        let report = register_controllers_with(
            Some(container.as_registry()),
            Some(self.modules.as_slice()),
            &convention,
        )?;

        if self.options.register_dependency_resolver {
            register_dependency_resolver(Some(Arc::clone(&container)))?;
        }

        let mut filter_providers = self
            .filter_providers
            .unwrap_or_else(FilterProviderCollection::with_defaults);
        if self.options.replace_attribute_filter_provider {
            register_attribute_filter_provider(Some(Arc::clone(&container)), &mut filter_providers)?;
        }

        info!(
            "Web 集成构建完成，共 {} 个注册，{} 个过滤器提供者",
            container.registration_count(),
            filter_providers.len()
        );

        Ok(WebIntegration {
            container,
            filter_providers,
            report,
            options: self.options,
        })
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> IntegrationResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.logging_config.level)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| IntegrationError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for WebIntegrationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 构建完成的 Web 集成
pub struct WebIntegration {
    container: Arc<dyn Container>,
    filter_providers: FilterProviderCollection,
    report: ScanReport,
    options: IntegrationOptions,
}

impl WebIntegration {
    /// 依赖注入容器
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// 过滤器提供者集合
    pub fn filter_providers(&self) -> &FilterProviderCollection {
        &self.filter_providers
    }

    /// 控制器扫描报告
    pub fn scan_report(&self) -> &ScanReport {
        &self.report
    }

    /// 生效的集成选项
    pub fn options(&self) -> &IntegrationOptions {
        &self.options
    }

    /// 从容器中解析控制器
    pub fn resolve_controller<T: Controller + Injectable>(&self) -> DependencyResult<Arc<T>> {
        self.container.as_provider().resolve::<T>()
    }

    /// 为动作创建过滤器管道
    pub fn filters_for(&self, action: &ActionDescriptor) -> DependencyResult<FilterPipeline> {
        let filters = self.filter_providers.get_filters(action)?;
        debug!(
            "动作 {}.{} 共 {} 个过滤器",
            action.controller,
            action.action,
            filters.len()
        );
        Ok(FilterPipeline::new(filters))
    }
}

impl std::fmt::Debug for WebIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebIntegration")
            .field("registrations", &self.container.registration_count())
            .field("filter_providers", &self.filter_providers)
            .field("report", &self.report)
            .field("options", &self.options)
            .finish()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 按名称设置日志级别（trace/debug/info/warn/error）
    pub fn with_level_name(mut self, level: &str) -> IntegrationResult<Self> {
        self.level = tracing::Level::from_str(level).map_err(|_| {
            IntegrationError::BootstrapFailed {
                message: format!("无效的日志级别: {}", level),
            }
        })?;
        Ok(self)
    }
}
