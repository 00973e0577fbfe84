//! 约定规范定义
//!
//! 提供组件发现的约定规则：名称模式、必需契约和可实例化性

use crate::lifecycle::Lifetime;
use crate::metadata::{ContractId, TypeDescriptor};

/// 约定规则
///
/// 类型必须同时满足三个条件才会被接受：
/// 简短名称匹配模式、满足必需契约、不是抽象类型。
#[derive(Debug, Clone)]
pub struct ConventionRule {
    /// 名称模式，支持一个 `*` 通配符，例如 `*Controller`
    pub pattern: String,
    /// 默认生命周期
    pub lifetime: Lifetime,
    /// 必需的契约（可选）
    pub required_contract: Option<ContractId>,
}

impl ConventionRule {
    /// 创建新的约定规则
    pub fn new(pattern: impl Into<String>, lifetime: Lifetime) -> Self {
        Self {
            pattern: pattern.into(),
            lifetime,
            required_contract: None,
        }
    }

    /// 创建后缀约定规则，例如 `suffix("Controller")` 等价于 `*Controller`
    pub fn suffix(suffix: impl AsRef<str>, lifetime: Lifetime) -> Self {
        Self::new(format!("*{}", suffix.as_ref()), lifetime)
    }

    /// 设置必需的契约
    pub fn with_required_contract(mut self, contract: ContractId) -> Self {
        self.required_contract = Some(contract);
        self
    }

    /// 设置生命周期
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// 检查类型是否满足全部约定
    pub fn accepts(&self, descriptor: &TypeDescriptor) -> bool {
        self.name_matches(&descriptor.name)
            && self.conforms(descriptor)
            && Self::is_instantiable(descriptor)
    }

    /// 检查名称是否匹配模式
    pub fn name_matches(&self, name: &str) -> bool {
        if self.pattern.contains('*') {
            let pattern_parts: Vec<&str> = self.pattern.split('*').collect();

            if pattern_parts.len() == 2 {
                let prefix = pattern_parts[0];
                let suffix = pattern_parts[1];

                name.len() >= prefix.len() + suffix.len()
                    && name.starts_with(prefix)
                    && name.ends_with(suffix)
            } else {
                false
            }
        } else {
            name == self.pattern
        }
    }

    /// 检查是否满足必需契约，未设置契约时总是满足
    pub fn conforms(&self, descriptor: &TypeDescriptor) -> bool {
        self.required_contract
            .as_ref()
            .map_or(true, |contract| descriptor.conforms_to(contract))
    }

    /// 检查类型是否可实例化
    pub fn is_instantiable(descriptor: &TypeDescriptor) -> bool {
        !descriptor.is_abstract()
    }
}
