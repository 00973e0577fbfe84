//! 集成选项
//!
//! 支持从 TOML 或 JSON 加载，缺省字段使用默认值

use infrastructure_common::{ConfigError, ConfigResult, Lifetime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::controller_scanner::CONTROLLER_SUFFIX;

/// 集成选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationOptions {
    /// 控制器名称后缀
    pub controller_suffix: String,
    /// 控制器注册的生命周期
    pub controller_lifetime: Lifetime,
    /// 是否替换框架的依赖解析器
    pub register_dependency_resolver: bool,
    /// 是否替换内置的特性过滤器提供者
    pub replace_attribute_filter_provider: bool,
    /// 容器的最大解析深度
    pub max_resolution_depth: usize,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            controller_suffix: CONTROLLER_SUFFIX.to_string(),
            controller_lifetime: Lifetime::Transient,
            register_dependency_resolver: true,
            replace_attribute_filter_provider: true,
            max_resolution_depth: 100,
        }
    }
}

impl IntegrationOptions {
    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let options: Self = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// 从 JSON 字符串解析
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let options: Self = serde_json::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// 从 TOML 文件加载
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = read_file(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = read_file(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// 按扩展名选择格式加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// 验证选项
    pub fn validate(&self) -> ConfigResult<()> {
        if self.controller_suffix.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "controller_suffix 不能为空".to_string(),
            });
        }

        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }

        Ok(())
    }
}

fn read_file(path: &Path) -> ConfigResult<String> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    debug!("加载集成选项文件: {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = IntegrationOptions::default();

        assert_eq!(options.controller_suffix, "Controller");
        assert_eq!(options.controller_lifetime, Lifetime::Transient);
        assert!(options.register_dependency_resolver);
        assert!(options.replace_attribute_filter_provider);
        assert_eq!(options.max_resolution_depth, 100);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let options = IntegrationOptions::from_toml_str(
            r#"
            controller_lifetime = "singleton"
            register_dependency_resolver = false
            "#,
        )
        .unwrap();

        assert_eq!(options.controller_suffix, "Controller");
        assert_eq!(options.controller_lifetime, Lifetime::Singleton);
        assert!(!options.register_dependency_resolver);
        assert_eq!(options.max_resolution_depth, 100);
    }

    #[test]
    fn test_json() {
        let options =
            IntegrationOptions::from_json_str(r#"{"controller_suffix": "Handler", "max_resolution_depth": 8}"#)
                .unwrap();

        assert_eq!(options.controller_suffix, "Handler");
        assert_eq!(options.max_resolution_depth, 8);
    }

    #[test]
    fn test_validation() {
        let err = IntegrationOptions::from_toml_str(r#"controller_suffix = """#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));

        let err = IntegrationOptions::from_json_str(r#"{"max_resolution_depth": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_parse_errors() {
        let err = IntegrationOptions::from_toml_str("controller_lifetime = 3").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseError { .. }));

        let err = IntegrationOptions::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::JsonParseError { .. }));
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let err = IntegrationOptions::from_file("/nonexistent/options.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let err = IntegrationOptions::from_file("options.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }
}
