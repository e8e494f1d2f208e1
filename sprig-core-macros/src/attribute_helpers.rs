//! 属性解析辅助函数

use proc_macro_error::abort;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Lit, MetaNameValue, Token, Type};

/// 从 `#[component("name")]` 或 `#[component(name = "name")]` 中提取 Bean 名称
pub fn get_bean_name(attrs: &[Attribute]) -> Option<String> {
    for attr in attrs {
        if !attr.path().is_ident("component") {
            continue;
        }
        match &attr.meta {
            syn::Meta::Path(_) => return None,
            _ => {}
        }
        // 简写形式 #[component("name")]
        if let Ok(lit) = attr.parse_args::<syn::LitStr>() {
            return Some(lit.value());
        }
        // 完整形式 #[component(name = "name")]
        if let Ok(name_value) = attr.parse_args::<MetaNameValue>() {
            if name_value.path.is_ident("name") {
                if let Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }) = &name_value.value
                {
                    return Some(lit.value());
                }
            }
        }
        abort!(
            attr,
            "invalid component attribute";
            help = "use #[component(\"beanName\")] or #[component(name = \"beanName\")]"
        );
    }
    None
}

/// 从 `#[scope("...")]` 中提取作用域字符串
pub fn get_scope(attrs: &[Attribute]) -> Option<String> {
    for attr in attrs {
        if !attr.path().is_ident("scope") {
            continue;
        }
        match attr.parse_args::<syn::LitStr>() {
            Ok(lit) => return Some(lit.value()),
            Err(_) => abort!(
                attr,
                "invalid scope attribute";
                help = "use #[scope(\"singleton\")] or #[scope(\"prototype\")]"
            ),
        }
    }
    None
}

/// 字段上的 `#[value]` 标记
///
/// 返回 `Some(None)` 表示裸标记（字段可注入但扫描时没有默认字面量），
/// `Some(Some(lit))` 表示带字面量的标记。
pub fn get_value_marker(attrs: &[Attribute]) -> Option<Option<String>> {
    for attr in attrs {
        if !attr.path().is_ident("value") {
            continue;
        }
        if matches!(attr.meta, syn::Meta::Path(_)) {
            return Some(None);
        }
        match attr.parse_args::<syn::LitStr>() {
            Ok(lit) => return Some(Some(lit.value())),
            Err(_) => abort!(
                attr,
                "invalid value attribute";
                help = "use #[value] or #[value(\"literal\")]"
            ),
        }
    }
    None
}

/// 字段上的 `#[autowired]` 标记
///
/// 返回 `Some(None)` 表示使用默认引用目标（字段名的 camelCase），
/// `Some(Some(name))` 表示显式限定的目标。
pub fn get_autowired_marker(attrs: &[Attribute]) -> Option<Option<String>> {
    for attr in attrs {
        if !attr.path().is_ident("autowired") {
            continue;
        }
        if matches!(attr.meta, syn::Meta::Path(_)) {
            return Some(None);
        }
        match attr.parse_args::<syn::LitStr>() {
            Ok(lit) => {
                if lit.value().is_empty() {
                    abort!(attr, "autowired qualifier must not be empty");
                }
                return Some(Some(lit.value()));
            }
            Err(_) => abort!(
                attr,
                "invalid autowired attribute";
                help = "use #[autowired] or #[autowired(\"beanName\")]"
            ),
        }
    }
    None
}

/// 从 `#[implements(dyn Trait, ...)]` 中提取额外的可赋值目标类型
pub fn get_implements(attrs: &[Attribute]) -> Vec<Type> {
    let mut types = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("implements") {
            continue;
        }
        match attr.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated) {
            Ok(parsed) => types.extend(parsed),
            Err(_) => abort!(
                attr,
                "invalid implements attribute";
                help = "use #[implements(dyn SomeTrait)]"
            ),
        }
    }
    types
}

/// 类型名转 camelCase，作为默认 Bean 名称
///
/// 与 sprig_core::utils::naming::to_camel_case 的逻辑保持一致
pub fn to_camel_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// 字段名 snake_case 转 camelCase，作为默认引用目标
///
/// 与 sprig_core::utils::naming::snake_to_camel 的逻辑保持一致
pub fn snake_to_camel(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut upper_next = false;
    for ch in s.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}
