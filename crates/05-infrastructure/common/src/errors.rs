//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("TOML 配置解析失败: {source}")]
    TomlParseError {
        #[from]
        source: toml::de::Error,
    },

    #[error("JSON 配置解析失败: {source}")]
    JsonParseError {
        #[from]
        source: serde_json::Error,
    },

    #[error("不支持的配置文件格式: {path}")]
    UnsupportedFormat { path: String },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("依赖解析失败: {type_name}, 原因: {message}")]
    DependencyResolutionFailed { type_name: String, message: String },

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },

    #[error("组件类型不匹配: 期望 {expected}")]
    TypeMismatch { expected: String },
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }
}

/// 模块类型枚举错误
///
/// `NotSupported` 表示模块无法被内省（例如运行时动态生成的模块），
/// 扫描器会跳过这类模块；其余错误一律中止扫描。
#[derive(Error, Debug)]
pub enum EnumerationError {
    #[error("模块不支持类型枚举: {module}")]
    NotSupported { module: String },

    #[error("模块类型枚举失败: {module}, 原因: {source}")]
    Failed {
        module: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EnumerationError {
    /// 创建不支持枚举错误
    pub fn not_supported(module: impl Into<String>) -> Self {
        Self::NotSupported {
            module: module.into(),
        }
    }

    /// 创建枚举失败错误
    pub fn failed(
        module: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Failed {
            module: module.into(),
            source: source.into(),
        }
    }

    /// 出错的模块名称
    pub fn module(&self) -> &str {
        match self {
            Self::NotSupported { module } | Self::Failed { module, .. } => module,
        }
    }

    /// 是否为可容忍的“不支持枚举”错误
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported { .. })
    }
}

/// 集成错误类型
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("参数缺失: {param_name}")]
    InvalidArgument { param_name: &'static str },

    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error("组件注册失败: {0}")]
    Registration(#[from] DependencyError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("集成启动失败: {message}")]
    BootstrapFailed { message: String },
}

impl IntegrationError {
    /// 创建参数缺失错误
    pub fn invalid_argument(param_name: &'static str) -> Self {
        Self::InvalidArgument { param_name }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type EnumerationResult<T> = Result<T, EnumerationError>;
pub type IntegrationResult<T> = Result<T, IntegrationError>;
