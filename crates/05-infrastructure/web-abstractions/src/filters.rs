//! 动作过滤器
//!
//! 过滤器是应用在请求处理器动作上的横切行为。过滤器以特性（attribute）的形式
//! 声明在控制器或动作上，由过滤器提供者转换为可执行的过滤器实例。

use async_trait::async_trait;
use infrastructure_common::{simple_type_name, ContractId, Instance};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// 过滤器默认顺序
pub const DEFAULT_FILTER_ORDER: i32 = -1;

/// 过滤器错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("过滤器 {filter} 拒绝了请求: {reason}")]
    Rejected { filter: String, reason: String },
}

/// 过滤器作用域，决定执行顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterScope {
    /// 最先执行
    First,
    /// 全局过滤器
    Global,
    /// 声明在控制器上
    Controller,
    /// 声明在动作上
    Action,
    /// 最后执行
    Last,
}

/// 动作执行上下文
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    /// 控制器名称
    pub controller: String,
    /// 动作名称
    pub action: String,
    /// 过滤器之间共享的数据
    pub items: HashMap<String, String>,
}

impl ActionContext {
    /// 创建新的动作上下文
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            items: HashMap::new(),
        }
    }
}

/// 动作过滤器 trait
#[async_trait]
pub trait ActionFilter: Send + Sync + 'static {
    /// 过滤器名称
    fn name(&self) -> &'static str {
        simple_type_name(std::any::type_name::<Self>())
    }

    /// 动作执行前调用，返回错误会中止后续过滤器和动作
    async fn on_action_executing(&self, _context: &mut ActionContext) -> Result<(), FilterError> {
        Ok(())
    }

    /// 动作执行后调用
    async fn on_action_executed(&self, _context: &mut ActionContext) -> Result<(), FilterError> {
        Ok(())
    }
}

/// 过滤器实例及其排序信息
#[derive(Clone)]
pub struct Filter {
    /// 过滤器实例
    pub instance: Arc<dyn ActionFilter>,
    /// 作用域
    pub scope: FilterScope,
    /// 同一作用域内的顺序
    pub order: i32,
}

impl Filter {
    /// 创建新的过滤器
    pub fn new(instance: Arc<dyn ActionFilter>, scope: FilterScope, order: i32) -> Self {
        Self {
            instance,
            scope,
            order,
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("instance", &self.instance.name())
            .field("scope", &self.scope)
            .field("order", &self.order)
            .finish()
    }
}

/// 按作用域和顺序稳定排序
pub fn sort_filters(filters: &mut [Filter]) {
    filters.sort_by_key(|filter| (filter.scope, filter.order));
}

/// 过滤器特性
///
/// 声明在控制器或动作上，记录过滤器类型以及如何创建它
#[derive(Clone, Copy)]
pub struct FilterAttribute {
    contract: ContractId,
    order: i32,
    create: fn() -> Arc<dyn ActionFilter>,
    cast: fn(Instance) -> Option<Arc<dyn ActionFilter>>,
}

impl FilterAttribute {
    /// 为过滤器类型 `F` 创建特性
    pub fn of<F: ActionFilter + Default>() -> Self {
        Self {
            contract: ContractId::of::<F>(),
            order: DEFAULT_FILTER_ORDER,
            create: create_default::<F>,
            cast: cast_instance::<F>,
        }
    }

    /// 设置顺序
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// 过滤器类型的契约
    pub fn contract(&self) -> ContractId {
        self.contract
    }

    /// 顺序
    pub fn order(&self) -> i32 {
        self.order
    }

    /// 使用默认构造创建过滤器实例（不经过容器）
    pub fn create_default(&self) -> Arc<dyn ActionFilter> {
        (self.create)()
    }

    /// 将容器解析出的实例转换为过滤器，类型不符时返回 `None`
    pub fn cast(&self, instance: Instance) -> Option<Arc<dyn ActionFilter>> {
        (self.cast)(instance)
    }
}

impl fmt::Debug for FilterAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterAttribute")
            .field("filter", &self.contract.short_name())
            .field("order", &self.order)
            .finish()
    }
}

fn create_default<F: ActionFilter + Default>() -> Arc<dyn ActionFilter> {
    Arc::new(F::default())
}

fn cast_instance<F: ActionFilter>(instance: Instance) -> Option<Arc<dyn ActionFilter>> {
    instance
        .downcast::<F>()
        .ok()
        .map(|filter| filter as Arc<dyn ActionFilter>)
}

/// 动作描述符
#[derive(Debug, Clone, Default)]
pub struct ActionDescriptor {
    /// 控制器名称
    pub controller: String,
    /// 动作名称
    pub action: String,
    /// 声明在控制器上的过滤器
    pub controller_filters: Vec<FilterAttribute>,
    /// 声明在动作上的过滤器
    pub action_filters: Vec<FilterAttribute>,
}

impl ActionDescriptor {
    /// 创建新的动作描述符
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            controller_filters: Vec::new(),
            action_filters: Vec::new(),
        }
    }

    /// 添加控制器级过滤器
    pub fn with_controller_filter(mut self, attribute: FilterAttribute) -> Self {
        self.controller_filters.push(attribute);
        self
    }

    /// 添加动作级过滤器
    pub fn with_action_filter(mut self, attribute: FilterAttribute) -> Self {
        self.action_filters.push(attribute);
        self
    }

    /// 按声明顺序遍历所有过滤器特性：先控制器级，后动作级
    pub fn filter_attributes(&self) -> impl Iterator<Item = (FilterScope, &FilterAttribute)> + '_ {
        self.controller_filters
            .iter()
            .map(|attribute| (FilterScope::Controller, attribute))
            .chain(
                self.action_filters
                    .iter()
                    .map(|attribute| (FilterScope::Action, attribute)),
            )
    }

    /// 创建对应的动作上下文
    pub fn context(&self) -> ActionContext {
        ActionContext::new(self.controller.clone(), self.action.clone())
    }
}

/// 过滤器管道
///
/// 执行前钩子按顺序运行，执行后钩子按相反顺序运行
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    filters: Vec<Filter>,
}

impl FilterPipeline {
    /// 创建过滤器管道
    pub fn new(mut filters: Vec<Filter>) -> Self {
        sort_filters(&mut filters);
        Self { filters }
    }

    /// 管道中的过滤器
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// 运行所有执行前钩子，遇到拒绝立即返回
    pub async fn before_action(&self, context: &mut ActionContext) -> Result<(), FilterError> {
        for filter in &self.filters {
            debug!("执行过滤器 {} (执行前)", filter.instance.name());
            filter.instance.on_action_executing(context).await?;
        }
        Ok(())
    }

    /// 逆序运行所有执行后钩子
    pub async fn after_action(&self, context: &mut ActionContext) -> Result<(), FilterError> {
        for filter in self.filters.iter().rev() {
            debug!("执行过滤器 {} (执行后)", filter.instance.name());
            filter.instance.on_action_executed(context).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Audit;

    #[async_trait]
    impl ActionFilter for Audit {
        async fn on_action_executing(&self, context: &mut ActionContext) -> Result<(), FilterError> {
            let trail = context.items.entry("trail".to_string()).or_default();
            trail.push_str("audit>");
            Ok(())
        }

        async fn on_action_executed(&self, context: &mut ActionContext) -> Result<(), FilterError> {
            let trail = context.items.entry("trail".to_string()).or_default();
            trail.push_str("<audit");
            Ok(())
        }
    }

    #[derive(Default)]
    struct Timing;

    #[async_trait]
    impl ActionFilter for Timing {
        async fn on_action_executing(&self, context: &mut ActionContext) -> Result<(), FilterError> {
            let trail = context.items.entry("trail".to_string()).or_default();
            trail.push_str("timing>");
            Ok(())
        }

        async fn on_action_executed(&self, context: &mut ActionContext) -> Result<(), FilterError> {
            let trail = context.items.entry("trail".to_string()).or_default();
            trail.push_str("<timing");
            Ok(())
        }
    }

    #[derive(Default)]
    struct Deny;

    #[async_trait]
    impl ActionFilter for Deny {
        async fn on_action_executing(&self, _context: &mut ActionContext) -> Result<(), FilterError> {
            Err(FilterError::Rejected {
                filter: self.name().to_string(),
                reason: "未授权".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_pipeline_order() {
        let pipeline = FilterPipeline::new(vec![
            Filter::new(Arc::new(Timing), FilterScope::Action, 0),
            Filter::new(Arc::new(Audit), FilterScope::Global, 0),
        ]);
        let mut context = ActionContext::new("HomeController", "index");

        pipeline.before_action(&mut context).await.unwrap();
        pipeline.after_action(&mut context).await.unwrap();

        assert_eq!(context.items["trail"], "audit>timing><timing<audit");
    }

    #[tokio::test]
    async fn test_pipeline_rejection_stops_execution() {
        let pipeline = FilterPipeline::new(vec![
            Filter::new(Arc::new(Deny), FilterScope::Controller, 0),
            Filter::new(Arc::new(Timing), FilterScope::Action, 0),
        ]);
        let mut context = ActionContext::new("AdminController", "delete");

        let err = pipeline.before_action(&mut context).await.unwrap_err();

        assert_eq!(
            err,
            FilterError::Rejected {
                filter: "Deny".to_string(),
                reason: "未授权".to_string(),
            }
        );
        assert!(!context.items.contains_key("trail"));
    }

    #[test]
    fn test_filter_attribute_creation_and_cast() {
        let attribute = FilterAttribute::of::<Audit>().with_order(3);

        assert_eq!(attribute.order(), 3);
        assert_eq!(attribute.contract(), ContractId::of::<Audit>());
        assert_eq!(attribute.create_default().name(), "Audit");

        let instance: Instance = Arc::new(Audit);
        assert!(attribute.cast(instance).is_some());

        let wrong: Instance = Arc::new(Timing);
        assert!(attribute.cast(wrong).is_none());
    }

    #[test]
    fn test_filter_attributes_scopes() {
        let action = ActionDescriptor::new("AdminController", "index")
            .with_action_filter(FilterAttribute::of::<Timing>())
            .with_controller_filter(FilterAttribute::of::<Audit>());

        let scopes: Vec<(FilterScope, &'static str)> = action
            .filter_attributes()
            .map(|(scope, attribute)| (scope, attribute.contract().short_name()))
            .collect();

        assert_eq!(
            scopes,
            vec![
                (FilterScope::Controller, "Audit"),
                (FilterScope::Action, "Timing"),
            ]
        );
    }
}
