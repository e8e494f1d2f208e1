// sprig-core: 最小化的 Bean 容器
//
// 把声明式的 Bean 定义（TOML 配置文档或组件标记）变成装配完成的
// 对象图，支持：
// - 单例和原型作用域
// - 字面量与引用两种属性注入
// - 前向引用与晚注册（动态注册 + refresh）

pub mod bean;
pub mod component;
pub mod context;
pub mod error;
pub mod factory;
pub mod logging;
pub mod reader;
pub mod registry;
pub mod scope;
pub mod utils;

// 重新导出常用类型
pub use bean::{
    Autowired, BeanDefinition, BeanInstance, BeanReference, FieldValue, FieldWriter,
    PropertyAssignment, PropertyValue, TypeDescriptor,
};
pub use component::{lookup_descriptor, Component, ComponentRegistration, TypeRegistration};
pub use context::{ApplicationContext, Container};
pub use error::{BeansError, BeansResult};
pub use factory::{AutowireCapableBeanFactory, BeanFactory};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use reader::{BeanDefinitionReader, LoadedDefinitions, TomlBeanDefinitionReader};
pub use registry::BeanDefinitionRegistry;
pub use scope::Scope;

// 导出 inventory，供宏使用
pub use inventory;

/// Prelude 模块，包含常用的 traits 和类型
pub mod prelude {
    pub use crate::bean::{
        Autowired, BeanDefinition, BeanInstance, BeanReference, PropertyAssignment,
        PropertyValue,
    };
    pub use crate::component::Component;
    pub use crate::context::{ApplicationContext, Container};
    pub use crate::error::{BeansError, BeansResult};
    pub use crate::factory::BeanFactory;
    pub use crate::logging::{LogFormat, LogLevel, LoggingConfig};
    pub use crate::scope::Scope;
    pub use crate::utils;
}
