//! 代码模块抽象接口
//!
//! 扫描器从代码模块中枚举导出类型。Rust 没有运行时反射，
//! 模块以显式维护的类型注册表形式提供导出类型。

use infrastructure_common::{EnumerationResult, TypeDescriptor};
use tracing::trace;

/// 代码模块 trait
///
/// 已加载的代码单元，可以枚举其公开导出的类型描述符。
/// 无法内省的模块应返回 [`EnumerationError::NotSupported`]，
/// 其他错误会中止整个扫描。
///
/// [`EnumerationError::NotSupported`]: infrastructure_common::EnumerationError::NotSupported
pub trait CodeModule: Send + Sync {
    /// 模块名称
    fn name(&self) -> &str;

    /// 枚举导出类型，保持声明顺序
    fn exported_types(&self) -> EnumerationResult<Vec<TypeDescriptor>>;
}

/// 静态模块
///
/// 由调用方手工维护的类型注册表
#[derive(Debug, Clone)]
pub struct StaticModule {
    name: String,
    types: Vec<TypeDescriptor>,
}

impl StaticModule {
    /// 创建新的静态模块
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// 导出类型
    pub fn export(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    /// 批量导出类型
    pub fn export_all<I: IntoIterator<Item = TypeDescriptor>>(mut self, descriptors: I) -> Self {
        self.types.extend(descriptors);
        self
    }

    /// 导出类型数量
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// 是否没有导出任何类型
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl CodeModule for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn exported_types(&self) -> EnumerationResult<Vec<TypeDescriptor>> {
        trace!("枚举模块 {} 的 {} 个导出类型", self.name, self.types.len());
        Ok(self.types.clone())
    }
}
