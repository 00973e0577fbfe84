//! 控制器契约

use infrastructure_common::{simple_type_name, Injectable, TypeDescriptor};

/// 请求处理器（控制器）标记 trait
///
/// 实现此 trait 的具体类型可以被控制器扫描器自动注册
pub trait Controller: Send + Sync + 'static {
    /// 控制器名称，默认取类型的简短名称
    fn name(&self) -> &'static str {
        simple_type_name(std::any::type_name::<Self>())
    }
}

/// 为控制器类型创建描述符，契约一致性由编译器保证
pub fn controller_descriptor<T: Controller + Injectable>() -> TypeDescriptor {
    TypeDescriptor::concrete::<T>().implements::<dyn Controller>()
}
