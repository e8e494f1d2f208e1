//! Bean 定义注册表
//!
//! 持有名称到定义的权威映射，注册和查找都在这里串行化。

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::bean::BeanDefinition;

/// Bean 定义注册表
///
/// 定义一经注册就不再删除；重复注册同名定义时后写覆盖前写，不做
/// 唯一性检查。遍历顺序是插入顺序，保证 `materialize_all` 在单次
/// 进程运行内是确定的。
pub struct BeanDefinitionRegistry {
    /// 名称到定义的映射
    definitions: RwLock<HashMap<String, Arc<BeanDefinition>>>,

    /// 插入顺序，新名称追加在尾部
    order: RwLock<Vec<String>>,
}

impl BeanDefinitionRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
        }
    }

    /// 注册或覆盖一条定义
    pub fn register(&self, definition: BeanDefinition) {
        let name = definition.name.clone();

        tracing::trace!(
            "Registering bean definition: name='{}', type='{}', scope={:?}",
            name,
            definition.type_name,
            definition.scope
        );

        let mut definitions = self.definitions.write();
        let mut order = self.order.write();
        if definitions
            .insert(name.clone(), Arc::new(definition))
            .is_some()
        {
            tracing::warn!("Bean definition '{}' overwritten, last write wins", name);
        } else {
            order.push(name.clone());
        }
        drop(order);
        drop(definitions);

        tracing::debug!("Bean definition registered: '{}'", name);
    }

    /// 按名称查找
    pub fn lookup(&self, name: &str) -> Option<Arc<BeanDefinition>> {
        self.definitions.read().get(name).cloned()
    }

    /// 按类型查找
    ///
    /// 返回插入顺序上第一个可赋值给请求类型的定义。多个定义匹配同一
    /// 类型时不做消歧，先注册者胜出，这是有记录的限制。
    pub fn lookup_by_type(&self, requested: TypeId) -> Option<Arc<BeanDefinition>> {
        let definitions = self.definitions.read();
        let order = self.order.read();
        for name in order.iter() {
            if let Some(definition) = definitions.get(name) {
                if let Some(descriptor) = definition.resolve_descriptor() {
                    if descriptor.is_assignable_to(requested) {
                        return Some(Arc::clone(definition));
                    }
                }
            }
        }
        None
    }

    /// 是否包含指定名称的定义
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.read().contains_key(name)
    }

    /// 按插入顺序返回所有 Bean 名称
    pub fn bean_names(&self) -> Vec<String> {
        self.order.read().clone()
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }
}

impl Default for BeanDefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scope;

    #[test]
    fn test_register_and_lookup() {
        let registry = BeanDefinitionRegistry::new();
        registry.register(BeanDefinition::new("svc", "tests::Svc"));

        assert!(registry.contains("svc"));
        assert!(registry.lookup("missing").is_none());
        assert_eq!(registry.lookup("svc").unwrap().type_name, "tests::Svc");
    }

    #[test]
    fn test_last_write_wins_keeps_order_slot() {
        let registry = BeanDefinitionRegistry::new();
        registry.register(BeanDefinition::new("a", "tests::A"));
        registry.register(BeanDefinition::new("b", "tests::B"));
        registry.register(BeanDefinition::new("a", "tests::A2").with_scope(Scope::Prototype));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.bean_names(), vec!["a".to_string(), "b".to_string()]);
        let replaced = registry.lookup("a").unwrap();
        assert_eq!(replaced.type_name, "tests::A2");
        assert_eq!(replaced.scope, Scope::Prototype);
    }

    #[test]
    fn test_bean_names_are_insertion_ordered() {
        let registry = BeanDefinitionRegistry::new();
        for name in ["z", "m", "a"] {
            registry.register(BeanDefinition::new(name, ""));
        }
        assert_eq!(
            registry.bean_names(),
            vec!["z".to_string(), "m".to_string(), "a".to_string()]
        );
    }
}
