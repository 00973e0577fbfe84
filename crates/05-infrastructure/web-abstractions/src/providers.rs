//! 过滤器提供者
//!
//! 框架从过滤器提供者集合中收集某个动作的全部过滤器。
//! 集合由调用方持有，在启动阶段显式配置。

use crate::filters::{sort_filters, ActionDescriptor, ActionFilter, Filter, FilterScope};
use infrastructure_common::DependencyResult;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 过滤器提供者 trait
pub trait FilterProvider: Send + Sync + 'static {
    /// 提供者名称
    fn name(&self) -> &str;

    /// 为指定动作生成过滤器
    fn get_filters(&self, action: &ActionDescriptor) -> DependencyResult<Vec<Filter>>;

    /// 提供者的具体类型，用于按类型匹配移除
    fn provider_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// 内置的特性过滤器提供者
///
/// 直接使用过滤器特性的默认构造创建实例，不进行依赖注入
#[derive(Debug, Default)]
pub struct AttributeFilterProvider;

impl AttributeFilterProvider {
    /// 创建新的特性过滤器提供者
    pub fn new() -> Self {
        Self
    }
}

impl FilterProvider for AttributeFilterProvider {
    fn name(&self) -> &str {
        "AttributeFilterProvider"
    }

    fn get_filters(&self, action: &ActionDescriptor) -> DependencyResult<Vec<Filter>> {
        Ok(action
            .filter_attributes()
            .map(|(scope, attribute)| Filter::new(attribute.create_default(), scope, attribute.order()))
            .collect())
    }
}

/// 全局过滤器提供者
///
/// 对所有动作返回同一组全局过滤器
#[derive(Debug, Default, Clone)]
pub struct GlobalFilterProvider {
    filters: Vec<Filter>,
}

impl GlobalFilterProvider {
    /// 创建新的全局过滤器提供者
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加全局过滤器
    pub fn with_filter(mut self, filter: Arc<dyn ActionFilter>, order: i32) -> Self {
        self.filters.push(Filter::new(filter, FilterScope::Global, order));
        self
    }

    /// 全局过滤器数量
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// 是否没有全局过滤器
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl FilterProvider for GlobalFilterProvider {
    fn name(&self) -> &str {
        "GlobalFilterProvider"
    }

    fn get_filters(&self, _action: &ActionDescriptor) -> DependencyResult<Vec<Filter>> {
        Ok(self.filters.clone())
    }
}

/// 过滤器提供者集合
#[derive(Default, Clone)]
pub struct FilterProviderCollection {
    providers: Vec<Arc<dyn FilterProvider>>,
}

impl FilterProviderCollection {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建包含默认提供者的集合：全局过滤器和特性过滤器
    pub fn with_defaults() -> Self {
        let mut collection = Self::new();
        collection.add(Arc::new(GlobalFilterProvider::new()));
        collection.add(Arc::new(AttributeFilterProvider::new()));
        collection
    }

    /// 添加提供者
    pub fn add(&mut self, provider: Arc<dyn FilterProvider>) {
        debug!("添加过滤器提供者: {}", provider.name());
        self.providers.push(provider);
    }

    /// 移除所有满足条件的提供者，返回移除数量
    pub fn remove_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&dyn FilterProvider) -> bool,
    {
        let before = self.providers.len();
        self.providers.retain(|provider| !predicate(provider.as_ref()));
        before - self.providers.len()
    }

    /// 按类型移除所有 `P` 类型的提供者，返回移除数量
    pub fn remove_all_of<P: FilterProvider>(&mut self) -> usize {
        let target = TypeId::of::<P>();
        let removed = self.remove_where(|provider| provider.provider_type_id() == target);
        if removed > 0 {
            info!(
                "移除 {} 个过滤器提供者: {}",
                removed,
                std::any::type_name::<P>()
            );
        }
        removed
    }

    /// 统计 `P` 类型的提供者数量
    pub fn count_of<P: FilterProvider>(&self) -> usize {
        let target = TypeId::of::<P>();
        self.providers
            .iter()
            .filter(|provider| provider.provider_type_id() == target)
            .count()
    }

    /// 是否包含 `P` 类型的提供者
    pub fn contains_kind<P: FilterProvider>(&self) -> bool {
        self.count_of::<P>() > 0
    }

    /// 提供者数量
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// 集合是否为空
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// 遍历提供者
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn FilterProvider>> {
        self.providers.iter()
    }

    /// 收集所有提供者为动作生成的过滤器，按作用域和顺序排序
    pub fn get_filters(&self, action: &ActionDescriptor) -> DependencyResult<Vec<Filter>> {
        let mut filters = Vec::new();
        for provider in &self.providers {
            filters.extend(provider.get_filters(action)?);
        }
        sort_filters(&mut filters);
        Ok(filters)
    }
}

impl fmt::Debug for FilterProviderCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|provider| provider.name()))
            .finish()
    }
}
