//! 应用上下文
//!
//! 上下文是对外的薄门面：持有定义来源的产出和 Bean 工厂，向引导代码
//! 和请求分发层暴露按名/按类型的 Bean 获取。全局可变状态被建模成
//! 一个显式传递的上下文实例，而不是进程级全局变量。

use std::any::{Any, TypeId};
use std::path::Path;
use std::sync::Arc;

use crate::bean::{BeanDefinition, BeanInstance};
use crate::error::BeansResult;
use crate::factory::{AutowireCapableBeanFactory, BeanFactory};
use crate::reader::{LoadedDefinitions, TomlBeanDefinitionReader};
use crate::registry::BeanDefinitionRegistry;

/// 容器 trait - 定义依赖注入容器的核心接口
pub trait Container: Send + Sync {
    /// 注册 Bean 定义（运行期晚注册也走这里）
    fn add_definition(&self, definition: BeanDefinition);

    /// 通过名称获取 Bean
    fn get_bean(&self, name: &str) -> BeansResult<BeanInstance>;

    /// 检查是否包含指定名称的 Bean
    fn contains_bean(&self, name: &str) -> bool;

    /// 获取所有 Bean 的名称（插入顺序）
    fn get_bean_names(&self) -> Vec<String>;
}

/// 应用上下文 - Container 的默认实现
pub struct ApplicationContext {
    /// Bean 工厂 - 负责 Bean 的创建和管理
    factory: AutowireCapableBeanFactory,
}

impl ApplicationContext {
    /// 创建空的应用上下文
    pub fn new() -> Self {
        Self {
            factory: AutowireCapableBeanFactory::new(Arc::new(BeanDefinitionRegistry::new())),
        }
    }

    /// 从 TOML 配置文档文件创建上下文并完成物化
    pub fn from_toml_file(path: impl AsRef<Path>) -> BeansResult<Self> {
        let mut reader = TomlBeanDefinitionReader::new();
        reader.load_from_file(path)?;
        Self::from_loaded(reader.into_loaded())
    }

    /// 从 TOML 配置文档字符串创建上下文并完成物化
    pub fn from_toml_str(content: &str) -> BeansResult<Self> {
        let mut reader = TomlBeanDefinitionReader::new();
        reader.load_from_str(content)?;
        Self::from_loaded(reader.into_loaded())
    }

    fn from_loaded(loaded: LoadedDefinitions) -> BeansResult<Self> {
        let context = Self::new();

        if loaded.component_scan {
            context.scan_components()?;
        } else {
            for definition in loaded.definitions {
                context.add_definition(definition);
            }
        }

        context.refresh()?;
        tracing::info!(
            "ApplicationContext initialized with {} bean definition(s)",
            context.get_bean_names().len()
        );
        Ok(context)
    }

    /// 通过类型获取 Bean
    ///
    /// 命中第一个可赋值的定义；返回的是未定型句柄，调用方按具体类型
    /// downcast 访问。
    pub fn get_bean_by_type<T: Any + ?Sized>(&self) -> BeansResult<BeanInstance> {
        self.factory
            .get_bean_by_type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// 物化所有已注册的定义
    ///
    /// 晚注册（`add_definition`）之后调用，使新加入的单例立即被饿汉
    /// 构造，与启动时的策略一致。
    pub fn refresh(&self) -> BeansResult<()> {
        self.factory.materialize_all()
    }

    /// 内部注册表（测试与诊断用）
    pub fn registry(&self) -> &Arc<BeanDefinitionRegistry> {
        self.factory.registry()
    }
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for ApplicationContext {
    fn add_definition(&self, definition: BeanDefinition) {
        self.factory.registry().register(definition);
    }

    fn get_bean(&self, name: &str) -> BeansResult<BeanInstance> {
        self.factory.get_bean(name)
    }

    fn contains_bean(&self, name: &str) -> bool {
        self.factory.contains_bean(name)
    }

    fn get_bean_names(&self) -> Vec<String> {
        self.factory.registry().bean_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean::{FieldValue, TypeDescriptor};
    use crate::component::TypeRegistration;
    use crate::error::BeansError;
    use std::any::Any;

    #[derive(Default)]
    struct Clock {
        ticks: u32,
    }

    static CLOCK: TypeDescriptor = TypeDescriptor {
        type_name: "sprig_core::context::tests::Clock",
        type_id: || TypeId::of::<Clock>(),
        construct: || Box::new(Clock::default()),
        write_field: |target: &mut dyn Any, field, value: FieldValue<'_>| {
            let this = target.downcast_mut::<Clock>().expect("clock");
            match (field, value) {
                ("ticks", FieldValue::Literal(raw)) => {
                    this.ticks = raw.parse().map_err(|_| BeansError::TypeMismatch {
                        expected: "u32".to_string(),
                        found: raw.to_string(),
                    })?;
                    Ok(())
                }
                _ => Err(BeansError::MissingProperty {
                    type_name: "Clock".to_string(),
                    field: field.to_string(),
                }),
            }
        },
        assignable_to: |id| id == TypeId::of::<Clock>(),
    };

    inventory::submit! {
        TypeRegistration { descriptor: &CLOCK }
    }

    #[test]
    fn test_context_from_toml_str() {
        let context = ApplicationContext::from_toml_str(
            r#"
            [[bean]]
            id = "clock"
            class = "sprig_core::context::tests::Clock"

              [[bean.property]]
              name = "ticks"
              value = "7"
            "#,
        )
        .unwrap();

        let clock = context.get_bean("clock").unwrap();
        assert_eq!(clock.with::<Clock, _>(|c| c.ticks).unwrap(), 7);

        let by_type = context.get_bean_by_type::<Clock>().unwrap();
        assert!(by_type.ptr_eq(&clock));
    }

    #[test]
    fn test_dynamic_registration_then_refresh() {
        let context = ApplicationContext::new();
        context.add_definition(
            BeanDefinition::new("lateClock", CLOCK.type_name).with_descriptor(&CLOCK),
        );
        context.refresh().unwrap();

        // refresh 已经饿汉构造，get_bean 只是取缓存
        let definition = context.registry().lookup("lateClock").unwrap();
        let cached = definition.cached_instance().unwrap();
        let fetched = context.get_bean("lateClock").unwrap();
        assert!(cached.ptr_eq(&fetched));
    }

    #[test]
    fn test_missing_bean_is_an_error_not_a_panic() {
        let context = ApplicationContext::new();
        assert!(matches!(
            context.get_bean("nope").unwrap_err(),
            BeansError::DefinitionNotFound(_)
        ));
        assert!(matches!(
            context.get_bean_by_type::<Clock>().unwrap_err(),
            BeansError::DefinitionNotFound(_)
        ));
    }
}
