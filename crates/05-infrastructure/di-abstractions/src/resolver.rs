//! 组件解析上下文
//!
//! 跟踪当前解析链，用于检测循环依赖和限制解析深度

use infrastructure_common::{ContractId, DependencyError, DependencyResult};

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<ContractId>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::with_options(ResolveOptions::default())
    }

    /// 使用指定选项创建解析上下文
    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加契约到解析链
    pub fn push_contract(&mut self, contract: ContractId) -> DependencyResult<()> {
        if self.resolution_chain.contains(&contract) {
            let chain = self
                .resolution_chain
                .iter()
                .map(|c| c.short_name())
                .chain(std::iter::once(contract.short_name()))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DependencyError::CircularDependency {
                dependency_chain: chain,
            });
        }

        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::DependencyResolutionFailed {
                type_name: contract.type_name.to_string(),
                message: format!("超过最大解析深度 {}", self.options.max_depth),
            });
        }

        self.resolution_chain.push(contract);
        Ok(())
    }

    /// 从解析链中移除最后一个契约
    pub fn pop_contract(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn test_circular_dependency_detected() {
        let mut context = ResolveContext::new();
        context.push_contract(ContractId::of::<A>()).unwrap();
        context.push_contract(ContractId::of::<B>()).unwrap();

        let err = context.push_contract(ContractId::of::<A>()).unwrap_err();
        match err {
            DependencyError::CircularDependency { dependency_chain } => {
                assert_eq!(dependency_chain, "A -> B -> A");
            }
            other => panic!("意外的错误: {other:?}"),
        }
    }

    #[test]
    fn test_max_depth() {
        let mut context = ResolveContext::with_options(ResolveOptions { max_depth: 1 });
        context.push_contract(ContractId::of::<A>()).unwrap();

        assert!(matches!(
            context.push_contract(ContractId::of::<B>()),
            Err(DependencyError::DependencyResolutionFailed { .. })
        ));

        context.pop_contract();
        assert_eq!(context.depth(), 0);
        assert!(context.push_contract(ContractId::of::<B>()).is_ok());
    }
}
