//! 组件生命周期

use serde::{Deserialize, Serialize};

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 单例模式 - 整个容器生命周期内只创建一个实例
    Singleton,
    /// 瞬时模式 - 每次请求都创建新实例
    #[default]
    Transient,
}

impl Lifetime {
    /// 生命周期名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Transient => "transient",
        }
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
