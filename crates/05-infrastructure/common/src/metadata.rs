//! 元数据定义
//!
//! 提供类型描述符和契约标识。Rust 没有运行时反射，
//! 类型描述符由模块显式声明，再交给扫描器按约定过滤。

use crate::component::{Activator, Injectable, Instance};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 契约标识
///
/// 用于在容器中查找组件的键，可以是具体类型，也可以是 trait object。
#[derive(Clone, Copy)]
pub struct ContractId {
    /// 类型ID
    pub type_id: TypeId,
    /// 完整类型名称
    pub type_name: &'static str,
}

impl ContractId {
    /// 获取指定类型的契约标识
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &'static str {
        simple_type_name(self.type_name)
    }
}

impl PartialEq for ContractId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ContractId {}

impl Hash for ContractId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractId({})", self.type_name)
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// 从完整类型名称中提取简短名称
///
/// `my_app::controllers::AdminController` -> `AdminController`，
/// `dyn my_app::Base + Send` -> `Base`，泛型参数会被去掉。
pub fn simple_type_name(full_name: &str) -> &str {
    let trimmed = full_name.strip_prefix("dyn ").unwrap_or(full_name);
    let base = trimmed.split('<').next().unwrap_or(trimmed);
    let base = base.split(" +").next().unwrap_or(base);
    base.rsplit("::").next().unwrap_or(base).trim()
}

/// 类型种类
#[derive(Clone)]
pub enum TypeKind {
    /// 可实例化的具体类型
    Concrete(Activator),
    /// 抽象类型（trait object 等），不能直接实例化
    Abstract,
}

/// 类型描述符
///
/// 描述一个导出类型的名称、可实例化性以及满足的契约集合。
#[derive(Clone)]
pub struct TypeDescriptor {
    /// 简短类型名称
    pub name: String,
    /// 完整类型名称
    pub full_name: &'static str,
    /// 类型ID
    pub type_id: TypeId,
    /// 类型种类
    pub kind: TypeKind,
    /// 满足的契约列表
    pub capabilities: Vec<ContractId>,
}

impl TypeDescriptor {
    /// 为可注入的具体类型创建描述符
    pub fn concrete<T: Injectable>() -> Self {
        Self::with_activator::<T, _>(|provider| {
            let instance = T::inject(provider)?;
            Ok(Arc::new(instance) as Instance)
        })
    }

    /// 使用自定义激活函数创建具体类型描述符
    pub fn with_activator<T, F>(activator: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn crate::component::ServiceProvider) -> crate::errors::DependencyResult<Instance>
            + Send
            + Sync
            + 'static,
    {
        let full_name = std::any::type_name::<T>();
        Self {
            name: simple_type_name(full_name).to_string(),
            full_name,
            type_id: TypeId::of::<T>(),
            kind: TypeKind::Concrete(Arc::new(activator)),
            capabilities: Vec::new(),
        }
    }

    /// 为抽象类型创建描述符
    pub fn abstract_type<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: simple_type_name(full_name).to_string(),
            full_name,
            type_id: TypeId::of::<T>(),
            kind: TypeKind::Abstract,
            capabilities: Vec::new(),
        }
    }

    /// 覆盖简短名称
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 声明该类型满足契约 `C`
    pub fn implements<C: ?Sized + 'static>(self) -> Self {
        self.with_capability(ContractId::of::<C>())
    }

    /// 添加契约
    pub fn with_capability(mut self, contract: ContractId) -> Self {
        if !self.capabilities.contains(&contract) {
            self.capabilities.push(contract);
        }
        self
    }

    /// 类型自身作为契约的标识
    pub fn contract(&self) -> ContractId {
        ContractId {
            type_id: self.type_id,
            type_name: self.full_name,
        }
    }

    /// 是否为抽象类型
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Abstract)
    }

    /// 是否满足指定契约
    pub fn conforms_to(&self, contract: &ContractId) -> bool {
        self.capabilities.contains(contract)
    }

    /// 获取激活函数（抽象类型没有）
    pub fn activator(&self) -> Option<&Activator> {
        match &self.kind {
            TypeKind::Concrete(activator) => Some(activator),
            TypeKind::Abstract => None,
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("full_name", &self.full_name)
            .field("is_abstract", &self.is_abstract())
            .field("capabilities", &self.capabilities)
            .field("activator", &"<function>")
            .finish()
    }
}
