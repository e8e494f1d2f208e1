//! 组件标记与编译期注册
//!
//! 组件不靠运行时类路径扫描发现：`#[derive(Component)]` 在编译期把
//! 类型描述符和组件条目提交到 inventory 注册表，扫描只是遍历注册表。

use crate::bean::{BeanDefinition, PropertyAssignment, TypeDescriptor};
use crate::context::{ApplicationContext, Container};
use crate::error::BeansResult;
use crate::Scope;

/// 类型注册表条目
///
/// 每个派生了 `Component` 的类型都会把自己的描述符提交到这里，
/// 声明式文档里的类型名由此解析（`Class.forName` 的容器内对应物）。
pub struct TypeRegistration {
    pub descriptor: &'static TypeDescriptor,
}

inventory::collect!(TypeRegistration);

/// 按完整类型路径查找描述符
pub fn lookup_descriptor(type_name: &str) -> Option<&'static TypeDescriptor> {
    inventory::iter::<TypeRegistration>()
        .find(|registration| registration.descriptor.type_name == type_name)
        .map(|registration| registration.descriptor)
}

/// 组件注册表条目 - 组件扫描模式下注册的 Bean
pub struct ComponentRegistration {
    /// Bean 名称
    pub name: &'static str,

    /// 组装一份完整的 Bean 定义
    pub definition: fn() -> BeanDefinition,
}

inventory::collect!(ComponentRegistration);

/// Component trait - 用于标记可以自动注册到容器的组件
///
/// 通过 `#[derive(Component)]` 宏自动实现
///
/// # 示例
///
/// ```ignore
/// use sprig_core::prelude::*;
/// use sprig_core_macros::Component;
///
/// #[derive(Component, Default)]
/// #[component("userService")]
/// #[scope("singleton")]
/// struct UserService {
///     #[value("42")]
///     limit: u32,
///     #[autowired]
///     database_service: Autowired<DatabaseService>,
/// }
/// ```
pub trait Component: Sized + Send + Sync + 'static {
    /// 获取 Bean 名称
    fn bean_name() -> &'static str;

    /// 获取作用域
    fn scope() -> Scope {
        Scope::Singleton
    }

    /// 类型描述符
    fn descriptor() -> &'static TypeDescriptor;

    /// 由字段标记推导出的属性赋值
    fn property_assignments() -> Vec<PropertyAssignment> {
        Vec::new()
    }

    /// 组装 Bean 定义
    ///
    /// 两种定义来源（文档与组件标记）产出同一形状，工厂对来源无感。
    fn definition() -> BeanDefinition {
        BeanDefinition::new(Self::bean_name(), Self::descriptor().type_name)
            .with_scope(Self::scope())
            .with_properties(Self::property_assignments())
            .with_descriptor(Self::descriptor())
    }
}

impl ApplicationContext {
    /// 扫描并注册所有带组件标记的类型
    ///
    /// 只注册定义，不触发物化；调用方随后用 `refresh` 统一物化。
    pub fn scan_components(&self) -> BeansResult<()> {
        let components: Vec<_> = inventory::iter::<ComponentRegistration>().collect();
        let total = components.len();

        if total == 0 {
            tracing::warn!("No component-annotated beans found");
            return Ok(());
        }

        tracing::info!("Found {} component-annotated bean(s) to register", total);

        for (idx, component) in components.iter().enumerate() {
            tracing::debug!(
                "Registering component [{}/{}]: '{}'",
                idx + 1,
                total,
                component.name
            );
            self.add_definition((component.definition)());
        }

        tracing::info!("Component scan completed, registered {} bean(s)", total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean::FieldValue;
    use crate::error::BeansError;
    use std::any::{Any, TypeId};

    #[derive(Default)]
    struct Probe;

    static PROBE: TypeDescriptor = TypeDescriptor {
        type_name: "sprig_core::component::tests::Probe",
        type_id: || TypeId::of::<Probe>(),
        construct: || Box::new(Probe),
        write_field: |_target: &mut dyn Any, field, _value: FieldValue<'_>| {
            Err(BeansError::MissingProperty {
                type_name: "Probe".to_string(),
                field: field.to_string(),
            })
        },
        assignable_to: |id| id == TypeId::of::<Probe>(),
    };

    inventory::submit! {
        TypeRegistration { descriptor: &PROBE }
    }

    impl Component for Probe {
        fn bean_name() -> &'static str {
            "probe"
        }

        fn scope() -> Scope {
            Scope::Prototype
        }

        fn descriptor() -> &'static TypeDescriptor {
            &PROBE
        }
    }

    #[test]
    fn test_lookup_descriptor_by_type_name() {
        let found = lookup_descriptor("sprig_core::component::tests::Probe").unwrap();
        assert_eq!(found.type_name, PROBE.type_name);
        assert!(lookup_descriptor("no::such::Type").is_none());
    }

    #[test]
    fn test_component_definition_shape() {
        let definition = Probe::definition();
        assert_eq!(definition.name, "probe");
        assert_eq!(definition.scope, Scope::Prototype);
        assert_eq!(definition.type_name, PROBE.type_name);
        assert!(definition.properties.is_empty());
        assert!(definition.resolve_descriptor().is_some());
    }
}
