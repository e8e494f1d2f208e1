mod attribute_helpers;
mod component_impl;

use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;

/// Component派生宏
///
/// 为类型生成组件标记实现：Bean 名称、作用域、类型描述符（零参构造
/// 路径 + 字段注入表 + 可赋值性）以及由字段标记推导出的属性赋值，
/// 并通过 inventory 提交到类型注册表和组件注册表。
///
/// 类型必须实现 `Default` 作为零参构造路径。
///
/// 用法：
/// ```ignore
/// #[derive(Component, Default)]
/// #[component("helloWorldService")]   // 可选：指定bean名称（默认类型名的camelCase）
/// #[scope("prototype")]               // 可选：指定作用域 (singleton/prototype)
/// #[implements(dyn HelloWorldService)] // 可选：额外的可赋值目标类型
/// struct HelloWorldServiceImpl {
///     #[value("hi")]                  // 字面量注入，标记值为组件扫描时的默认值
///     text: String,
///
///     #[autowired]                    // 引用注入，目标名默认为字段名的camelCase
///     wrap_service: Autowired<WrapService>,
///
///     #[autowired("customName")]      // 显式指定引用目标
///     other: Autowired<OtherService>,
/// }
/// ```
#[proc_macro_error]
#[proc_macro_derive(Component, attributes(component, scope, value, autowired, implements))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    component_impl::derive_component_impl(input)
}
