//! 容器统一错误类型
//!
//! 所有错误都同步传播给 `get_bean` 的调用方，容器内部没有任何重试逻辑。

use thiserror::Error;

/// 容器错误
#[derive(Debug, Error)]
pub enum BeansError {
    /// 请求的名称或类型没有对应的 Bean 定义
    #[error("no bean definition registered for {0}")]
    DefinitionNotFound(String),

    /// Bean 实例化失败（没有可用的零参构造路径，或类型未解析）
    #[error("failed to instantiate bean '{name}': {reason}")]
    Instantiation { name: String, reason: String },

    /// 属性注入的目标字段不存在
    #[error("type '{type_name}' has no injectable field named '{field}'")]
    MissingProperty { type_name: String, field: String },

    /// Bean 引用指向了未注册的定义
    #[error("bean '{bean}' references '{target}', which is not registered")]
    UnresolvedReference { bean: String, target: String },

    /// 检测到循环依赖
    #[error("circular dependency detected: {0}")]
    CircularDependency(String),

    /// 类型不匹配（downcast 失败或字面量无法转换）
    #[error("type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    /// 配置文档本身不合法
    #[error("invalid bean configuration: {0}")]
    Configuration(String),

    /// 读取配置文件失败
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// 其他错误
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BeansError {
    /// 针对类型查找失败的 DefinitionNotFound
    pub fn type_not_found(type_name: &str) -> Self {
        BeansError::DefinitionNotFound(format!("type '{}'", type_name))
    }

    /// 针对名称查找失败的 DefinitionNotFound
    pub fn name_not_found(name: &str) -> Self {
        BeansError::DefinitionNotFound(format!("name '{}'", name))
    }

    pub fn instantiation(name: impl Into<String>, reason: impl Into<String>) -> Self {
        BeansError::Instantiation {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// 容器统一 Result 类型
pub type BeansResult<T> = std::result::Result<T, BeansError>;
