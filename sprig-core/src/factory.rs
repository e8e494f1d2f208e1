//! Bean 工厂 - 构造、作用域与引用解析
//!
//! 参考 Spring 的 BeanFactory 架构设计：对外是对象安全的 `BeanFactory`
//! 接口，背后由 `AutowireCapableBeanFactory` 消费注册表完成真正的工作。

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::bean::{BeanDefinition, BeanInstance, FieldValue, PropertyValue, TypeDescriptor};
use crate::error::{BeansError, BeansResult};
use crate::registry::BeanDefinitionRegistry;
use crate::utils::dependency::CreationStack;
use crate::Scope;

/// BeanFactory - 最基础的容器接口
///
/// 注意：此 trait 不包含泛型方法，因此可以作为 trait object 使用
pub trait BeanFactory: Send + Sync {
    /// 通过名称获取 Bean
    fn get_bean(&self, name: &str) -> BeansResult<BeanInstance>;

    /// 检查是否包含指定名称的 Bean
    fn contains_bean(&self, name: &str) -> bool;
}

/// 具备自动装配能力的 Bean 工厂
///
/// 单例构造由按名称划分的互斥锁保护：双重检查缓存保证并发的首次
/// 请求不会构造两次。缓存写在注入之前，因此递归回到同名单例时直接
/// 命中缓存，不会再碰这把锁。
pub struct AutowireCapableBeanFactory {
    /// 定义注册表
    registry: Arc<BeanDefinitionRegistry>,

    /// 单例构造锁，按 Bean 名称划分
    singleton_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AutowireCapableBeanFactory {
    /// 基于给定注册表创建工厂
    pub fn new(registry: Arc<BeanDefinitionRegistry>) -> Self {
        Self {
            registry,
            singleton_locks: Mutex::new(HashMap::new()),
        }
    }

    /// 工厂消费的注册表
    pub fn registry(&self) -> &Arc<BeanDefinitionRegistry> {
        &self.registry
    }

    /// 通过类型获取 Bean
    ///
    /// 命中插入顺序上第一个可赋值的定义；`requested_name` 仅用于错误信息。
    pub fn get_bean_by_type(
        &self,
        requested: TypeId,
        requested_name: &str,
    ) -> BeansResult<BeanInstance> {
        tracing::trace!("Requesting bean by type: '{}'", requested_name);

        let definition = self.registry.lookup_by_type(requested).ok_or_else(|| {
            tracing::debug!("No bean definition assignable to '{}'", requested_name);
            BeansError::type_not_found(requested_name)
        })?;

        self.resolve(definition)
    }

    /// 按插入顺序物化所有已注册的定义
    ///
    /// 没有声明具体类型的定义是空操作；原型定义也会被构造一次，产物
    /// 直接丢弃（与启动时的饿汉实例化策略一致）。
    pub fn materialize_all(&self) -> BeansResult<()> {
        let names = self.registry.bean_names();
        tracing::debug!("Materializing {} bean definition(s)", names.len());

        for name in names {
            let Some(definition) = self.registry.lookup(&name) else {
                continue;
            };
            if !definition.has_concrete_type() {
                tracing::debug!("Skipping definition '{}': no concrete type declared", name);
                continue;
            }
            self.resolve(definition)?;
        }

        Ok(())
    }

    /// 作用域分派
    fn resolve(&self, definition: Arc<BeanDefinition>) -> BeansResult<BeanInstance> {
        match definition.scope {
            Scope::Singleton => {
                if let Some(instance) = definition.cached_instance() {
                    tracing::debug!(
                        "Returning cached instance of singleton bean '{}'",
                        definition.name
                    );
                    return Ok(instance);
                }

                let lock = self.singleton_lock(&definition.name);
                let _guard = lock.lock();

                // 拿到锁后再检查一次，输掉竞争的一方直接复用胜者的实例
                if let Some(instance) = definition.cached_instance() {
                    return Ok(instance);
                }

                tracing::info!(
                    "Creating shared instance of singleton bean '{}'",
                    definition.name
                );
                self.create_bean(&definition)
            }
            Scope::Prototype => {
                tracing::debug!(
                    "Creating new instance of prototype bean '{}'",
                    definition.name
                );
                self.create_bean(&definition)
            }
        }
    }

    fn singleton_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.singleton_locks.lock();
        Arc::clone(
            locks
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// 创建 Bean：零参构造，单例先缓存，再按声明顺序注入属性
    fn create_bean(&self, definition: &BeanDefinition) -> BeansResult<BeanInstance> {
        let descriptor = definition.resolve_descriptor().ok_or_else(|| {
            let reason = if definition.has_concrete_type() {
                format!("type '{}' is not registered", definition.type_name)
            } else {
                "definition declares no concrete type".to_string()
            };
            BeansError::instantiation(&definition.name, reason)
        })?;

        let _guard = CreationStack::enter(&definition.name).map_err(|chain| {
            tracing::error!(
                "Circular dependency detected while creating '{}'",
                definition.name
            );
            BeansError::CircularDependency(chain.join(" -> "))
        })?;

        let instance = descriptor.new_instance();

        // 先缓存再注入：环里的引用方拿到的是部分构造的实例而不是无限
        // 递归。这只是针对简单环的捷径；注入中途失败时残缺的单例会留在
        // 缓存里。
        if definition.scope == Scope::Singleton {
            definition.cache_instance(instance.clone());
        }

        self.apply_property_values(definition, descriptor, &instance)?;

        tracing::debug!("Bean '{}' created and wired", definition.name);
        Ok(instance)
    }

    /// 为新创建的 Bean 注入属性
    fn apply_property_values(
        &self,
        definition: &BeanDefinition,
        descriptor: &TypeDescriptor,
        instance: &BeanInstance,
    ) -> BeansResult<()> {
        for assignment in &definition.properties {
            match &assignment.value {
                PropertyValue::Literal(raw) => {
                    tracing::trace!(
                        "Injecting literal into '{}.{}'",
                        definition.name,
                        assignment.field
                    );
                    instance.write_raw(|target| {
                        (descriptor.write_field)(target, &assignment.field, FieldValue::Literal(raw))
                    })?;
                }
                PropertyValue::Reference(reference) => {
                    if !self.registry.contains(&reference.target) {
                        return Err(BeansError::UnresolvedReference {
                            bean: definition.name.clone(),
                            target: reference.target.clone(),
                        });
                    }
                    tracing::trace!(
                        "Injecting bean '{}' into '{}.{}'",
                        reference.target,
                        definition.name,
                        assignment.field
                    );
                    // 引用解析递归回到 get_bean，这是多 Bean 对象图唯一的
                    // 装配路径，前向引用因此天然成立
                    let dependency = self.get_bean(&reference.target)?;
                    instance.write_raw(|target| {
                        (descriptor.write_field)(
                            target,
                            &assignment.field,
                            FieldValue::Bean(dependency),
                        )
                    })?;
                }
            }
        }
        Ok(())
    }
}

impl BeanFactory for AutowireCapableBeanFactory {
    fn get_bean(&self, name: &str) -> BeansResult<BeanInstance> {
        tracing::trace!("Requesting bean: '{}'", name);

        let definition = self.registry.lookup(name).ok_or_else(|| {
            tracing::debug!("Bean '{}' not found in registry", name);
            BeansError::name_not_found(name)
        })?;

        self.resolve(definition)
    }

    fn contains_bean(&self, name: &str) -> bool {
        self.registry.contains(name)
    }
}
