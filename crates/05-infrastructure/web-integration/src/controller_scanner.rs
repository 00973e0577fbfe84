//! 控制器扫描与注册
//!
//! 从代码模块中枚举导出类型，按约定过滤出控制器，并以自身为契约注册到容器。

use di_abstractions::{CodeModule, ComponentRegistry};
use infrastructure_common::{
    ContractId, ConventionRule, EnumerationError, EnumerationResult, IntegrationError,
    IntegrationResult, Lifetime, TypeDescriptor,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use web_abstractions::Controller;

/// 控制器名称后缀
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// 扫描报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// 已扫描的模块数量（包括被跳过的）
    pub modules_scanned: usize,
    /// 不支持类型枚举而被跳过的模块
    pub skipped_modules: Vec<String>,
    /// 已注册的类型（完整类型名称），按发现顺序
    pub registered: Vec<String>,
}

/// 控制器约定：名称以 `suffix` 结尾、实现 [`Controller`]、不是抽象类型
pub fn controller_convention(suffix: &str, lifetime: Lifetime) -> ConventionRule {
    ConventionRule::suffix(suffix, lifetime).with_required_contract(ContractId::of::<dyn Controller>())
}

/// 注册模块中所有控制器
///
/// 使用默认约定（`*Controller`，瞬时生命周期）。`None` 表示调用方未提供对应参数。
pub fn register_controllers(
    container: Option<&dyn ComponentRegistry>,
    modules: Option<&[Arc<dyn CodeModule>]>,
) -> IntegrationResult<ScanReport> {
    let convention = controller_convention(CONTROLLER_SUFFIX, Lifetime::Transient);
    register_controllers_with(container, modules, &convention)
}

/// 使用指定约定注册模块中所有满足约定的类型
///
/// 遇到不支持枚举的模块时跳过该模块；其他枚举错误原样返回，
/// 此前已完成的注册不会回滚。
pub fn register_controllers_with(
    container: Option<&dyn ComponentRegistry>,
    modules: Option<&[Arc<dyn CodeModule>]>,
    convention: &ConventionRule,
) -> IntegrationResult<ScanReport> {
    let container = container.ok_or_else(|| IntegrationError::invalid_argument("container"))?;
    let modules = modules.ok_or_else(|| IntegrationError::invalid_argument("modules"))?;

    info!(
        "开始扫描 {} 个模块，约定: {}",
        modules.len(),
        convention.pattern
    );

    let mut report = ScanReport::default();
    scan_modules(modules, convention, &mut report, |descriptor| {
        container.register_type(&descriptor, convention.lifetime)?;
        Ok::<(), IntegrationError>(())
    })?;

    info!(
        "扫描完成，注册了 {} 个类型，跳过 {} 个模块",
        report.registered.len(),
        report.skipped_modules.len()
    );
    Ok(report)
}

/// 发现满足约定的类型，不进行注册
pub fn discover_controllers(
    modules: &[Arc<dyn CodeModule>],
    convention: &ConventionRule,
) -> EnumerationResult<Vec<TypeDescriptor>> {
    let mut candidates = Vec::new();
    let mut report = ScanReport::default();

    scan_modules(modules, convention, &mut report, |descriptor| {
        candidates.push(descriptor);
        Ok::<(), EnumerationError>(())
    })?;

    Ok(candidates)
}

/// 顺序遍历模块和类型，对每个满足约定的类型调用 `visit`
fn scan_modules<E, F>(
    modules: &[Arc<dyn CodeModule>],
    convention: &ConventionRule,
    report: &mut ScanReport,
    mut visit: F,
) -> Result<(), E>
where
    E: From<EnumerationError>,
    F: FnMut(TypeDescriptor) -> Result<(), E>,
{
    for module in modules {
        report.modules_scanned += 1;

        let Some(types) = exported_types_from(module.as_ref())? else {
            report.skipped_modules.push(module.name().to_string());
            continue;
        };

        debug!("模块 {} 导出 {} 个类型", module.name(), types.len());

        for descriptor in types {
            if !convention.accepts(&descriptor) {
                debug!("跳过类型: {}", descriptor.full_name);
                continue;
            }

            let full_name = descriptor.full_name;
            visit(descriptor)?;
            report.registered.push(full_name.to_string());
        }
    }
    Ok(())
}

/// 获取模块导出类型，不支持枚举的模块返回 `None`
fn exported_types_from(module: &dyn CodeModule) -> EnumerationResult<Option<Vec<TypeDescriptor>>> {
    match module.exported_types() {
        Ok(types) => Ok(Some(types)),
        Err(EnumerationError::NotSupported { module: name }) => {
            // 运行时动态生成的模块无法内省，可以安全跳过
            warn!("模块 {} 不支持类型枚举，已跳过", name);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
