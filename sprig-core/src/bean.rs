use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::error::{BeansError, BeansResult};
use crate::Scope;

/// 已构造 Bean 的共享句柄
///
/// 工厂在注入属性之前就会把单例句柄缓存到定义上，因此字段写入必须穿过
/// 一把锁进行。句柄的同一性就是 `Arc` 的同一性（`ptr_eq`）。
#[derive(Clone)]
pub struct BeanInstance {
    inner: Arc<RwLock<Box<dyn Any + Send + Sync>>>,
    type_name: &'static str,
}

impl BeanInstance {
    /// 包装一个已有的值
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_boxed(Box::new(value), std::any::type_name::<T>())
    }

    pub(crate) fn from_boxed(boxed: Box<dyn Any + Send + Sync>, type_name: &'static str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(boxed)),
            type_name,
        }
    }

    /// 实例的具体类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 两个句柄是否指向同一个实例
    pub fn ptr_eq(&self, other: &BeanInstance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// 实例是否为类型 `T`
    pub fn is<T: Any>(&self) -> bool {
        self.inner.read().downcast_ref::<T>().is_some()
    }

    /// 以只读方式访问具体类型
    pub fn with<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> BeansResult<R> {
        let guard = self.inner.read();
        let target = guard
            .downcast_ref::<T>()
            .ok_or_else(|| BeansError::TypeMismatch {
                expected: std::any::type_name::<T>().to_string(),
                found: self.type_name.to_string(),
            })?;
        Ok(f(target))
    }

    /// 以可写方式访问具体类型
    pub fn with_mut<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> BeansResult<R> {
        let mut guard = self.inner.write();
        let target = guard
            .downcast_mut::<T>()
            .ok_or_else(|| BeansError::TypeMismatch {
                expected: std::any::type_name::<T>().to_string(),
                found: self.type_name.to_string(),
            })?;
        Ok(f(target))
    }

    /// 持写锁访问未定型实例，供字段写入器使用
    pub(crate) fn write_raw<R>(&self, f: impl FnOnce(&mut dyn Any) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut **guard)
    }
}

impl fmt::Debug for BeanInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanInstance")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// 注入时传递给字段写入器的值
pub enum FieldValue<'a> {
    /// 字面量，由写入器按目标字段类型转换
    Literal(&'a str),
    /// 已解析的 Bean 引用
    Bean(BeanInstance),
}

/// 字段写入能力：给定实例和字段名写入一个值，字段不存在时报错
///
/// 具体实现由派生宏按类型生成（每个类型一张注入表）。
pub type FieldWriter = fn(&mut dyn Any, &str, FieldValue<'_>) -> BeansResult<()>;

/// 类型描述符 - 容器对具体类型的全部认知
///
/// 零参构造路径、字段写入器和可赋值性查询都以函数指针表的形式由
/// `#[derive(Component)]` 生成，并通过 inventory 注册到全局类型注册表。
pub struct TypeDescriptor {
    /// 完整限定的类型路径
    pub type_name: &'static str,

    /// 具体类型的 TypeId
    pub type_id: fn() -> TypeId,

    /// 零参构造路径（类型的 `Default` 实现）
    pub construct: fn() -> Box<dyn Any + Send + Sync>,

    /// 字段写入器
    pub write_field: FieldWriter,

    /// 可赋值性查询：请求的类型是否能由本类型满足
    pub assignable_to: fn(TypeId) -> bool,
}

impl TypeDescriptor {
    pub fn is_assignable_to(&self, requested: TypeId) -> bool {
        (self.assignable_to)(requested)
    }

    /// 走零参构造路径创建一个新实例
    pub fn new_instance(&self) -> BeanInstance {
        BeanInstance::from_boxed((self.construct)(), self.type_name)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// 引用注入的类型化字段槽
///
/// 容器通过字段写入器把解析好的 Bean 句柄绑定进来；在注入发生之前
/// 处于未绑定状态，这样类型的零参构造路径才能成立。
pub struct Autowired<T> {
    slot: Option<BeanInstance>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> Autowired<T> {
    /// 创建未绑定的槽
    pub fn unbound() -> Self {
        Self {
            slot: None,
            _marker: PhantomData,
        }
    }

    /// 绑定一个 Bean 句柄（由字段写入器调用）
    pub fn bind(&mut self, instance: BeanInstance) {
        self.slot = Some(instance);
    }

    /// 是否已注入
    pub fn is_bound(&self) -> bool {
        self.slot.is_some()
    }

    /// 底层句柄
    pub fn instance(&self) -> BeansResult<&BeanInstance> {
        self.slot.as_ref().ok_or_else(|| {
            BeansError::Configuration(format!(
                "autowired field of type '{}' accessed before injection",
                std::any::type_name::<T>()
            ))
        })
    }

    /// 以只读方式访问注入的 Bean
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> BeansResult<R> {
        self.instance()?.with(f)
    }

    /// 以可写方式访问注入的 Bean
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> BeansResult<R> {
        self.instance()?.with_mut(f)
    }
}

impl<T: Any> Default for Autowired<T> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<T> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Autowired<{}>({})",
            std::any::type_name::<T>(),
            if self.slot.is_some() { "bound" } else { "unbound" }
        )
    }
}

/// Bean 属性赋值：目标字段加一个字面量或引用
#[derive(Debug, Clone)]
pub struct PropertyAssignment {
    /// 目标字段名
    pub field: String,
    /// 注入值
    pub value: PropertyValue,
}

impl PropertyAssignment {
    pub fn literal(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: PropertyValue::Literal(value.into()),
        }
    }

    pub fn reference(field: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: PropertyValue::Reference(BeanReference::new(target)),
        }
    }
}

/// 属性值：字面量或对另一个 Bean 的引用
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Literal(String),
    Reference(BeanReference),
}

/// 对另一个 Bean 定义的命名引用，注入时解析
#[derive(Debug, Clone)]
pub struct BeanReference {
    /// 被引用定义的名称
    pub target: String,
}

impl BeanReference {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

/// Bean 定义 - 描述如何创建和管理 Bean
///
/// 定义在注册后不可变，唯一的例外是单例缓存：它在首次构造成功时
/// 写入一次。缓存非空当且仅当作用域为单例且构造已经发生；原型定义
/// 永远不会写缓存。
pub struct BeanDefinition {
    /// Bean 的名称
    pub name: String,

    /// 待实例化的完整类型路径，空串表示"有元数据但刻意不解析"
    pub type_name: String,

    /// Bean 的作用域
    pub scope: Scope,

    /// 属性赋值，按声明顺序注入
    pub properties: Vec<PropertyAssignment>,

    /// 解析后的类型描述符（注册时写入或首次构造时懒解析）
    descriptor: OnceLock<&'static TypeDescriptor>,

    /// 单例实例缓存，至多写入一次
    instance: OnceLock<BeanInstance>,
}

impl BeanDefinition {
    /// 创建新的 Bean 定义
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            scope: Scope::default(),
            properties: Vec::new(),
            descriptor: OnceLock::new(),
            instance: OnceLock::new(),
        }
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// 追加一条属性赋值
    pub fn with_property(mut self, assignment: PropertyAssignment) -> Self {
        self.properties.push(assignment);
        self
    }

    /// 设置全部属性赋值
    pub fn with_properties(mut self, properties: Vec<PropertyAssignment>) -> Self {
        self.properties = properties;
        self
    }

    /// 注册时直接给定描述符，跳过按名懒解析
    pub fn with_descriptor(self, descriptor: &'static TypeDescriptor) -> Self {
        let _ = self.descriptor.set(descriptor);
        self
    }

    /// 定义是否声明了具体类型
    pub fn has_concrete_type(&self) -> bool {
        !self.type_name.is_empty()
    }

    /// 解析类型描述符
    ///
    /// 先看注册时给定的描述符，否则按类型名在全局类型注册表里查找，
    /// 命中后记住结果。类型名为空或未注册时返回 `None`。
    pub fn resolve_descriptor(&self) -> Option<&'static TypeDescriptor> {
        if let Some(descriptor) = self.descriptor.get() {
            return Some(descriptor);
        }
        if self.type_name.is_empty() {
            return None;
        }
        let descriptor = crate::component::lookup_descriptor(&self.type_name)?;
        let _ = self.descriptor.set(descriptor);
        Some(descriptor)
    }

    /// 已缓存的单例实例
    pub fn cached_instance(&self) -> Option<BeanInstance> {
        self.instance.get().cloned()
    }

    /// 缓存单例实例（仅首次调用生效）
    pub(crate) fn cache_instance(&self, instance: BeanInstance) {
        let _ = self.instance.set(instance);
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("scope", &self.scope)
            .field("properties", &self.properties.len())
            .field("materialized", &self.instance.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_identity_and_access() {
        let a = BeanInstance::new(41_i32);
        let b = a.clone();
        let c = BeanInstance::new(41_i32);

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));

        b.with_mut::<i32, _>(|v| *v += 1).unwrap();
        assert_eq!(a.with::<i32, _>(|v| *v).unwrap(), 42);
    }

    #[test]
    fn test_instance_downcast_mismatch() {
        let a = BeanInstance::new(String::from("hello"));
        let err = a.with::<i32, _>(|_| ()).unwrap_err();
        assert!(matches!(err, BeansError::TypeMismatch { .. }));
    }

    #[test]
    fn test_autowired_unbound_access_fails() {
        let slot: Autowired<String> = Autowired::default();
        assert!(!slot.is_bound());
        assert!(slot.with(|_| ()).is_err());
    }

    #[test]
    fn test_autowired_bind_and_read() {
        let mut slot: Autowired<String> = Autowired::default();
        slot.bind(BeanInstance::new(String::from("wired")));
        assert_eq!(slot.with(|s| s.clone()).unwrap(), "wired");
    }

    #[test]
    fn test_definition_singleton_cache_is_write_once() {
        let definition = BeanDefinition::new("svc", "tests::Svc");
        assert!(definition.cached_instance().is_none());

        let first = BeanInstance::new(1_u8);
        definition.cache_instance(first.clone());
        definition.cache_instance(BeanInstance::new(2_u8));

        let cached = definition.cached_instance().unwrap();
        assert!(cached.ptr_eq(&first));
    }

    #[test]
    fn test_blank_type_name_has_no_descriptor() {
        let definition = BeanDefinition::new("ghost", "");
        assert!(!definition.has_concrete_type());
        assert!(definition.resolve_descriptor().is_none());
    }
}
