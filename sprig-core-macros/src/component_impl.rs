use proc_macro::TokenStream;
use proc_macro_error::abort;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields};

use crate::attribute_helpers::{
    get_autowired_marker, get_bean_name, get_implements, get_scope, get_value_marker,
    snake_to_camel, to_camel_case,
};

/// 每个可注入字段的分类结果
enum Injection {
    /// 字面量字段，可选携带组件扫描时的默认字面量
    Literal(Option<String>),
    /// 引用字段，携带引用目标 Bean 名称
    Reference(String),
}

pub(crate) fn derive_component_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        abort!(ident, "Component cannot be derived for generic types");
    }

    let bean_name = get_bean_name(&input.attrs).unwrap_or_else(|| {
        // 默认使用类型名的 camelCase 形式，例如 UserService -> userService
        to_camel_case(&ident.to_string())
    });

    let scope_tokens = match get_scope(&input.attrs).as_deref() {
        None | Some("singleton") => quote! { ::sprig_core::Scope::Singleton },
        Some("prototype") => quote! { ::sprig_core::Scope::Prototype },
        Some(other) => abort!(
            ident,
            "invalid scope '{}': expected \"singleton\" or \"prototype\"",
            other
        ),
    };

    let implements = get_implements(&input.attrs);

    // 收集带注入标记的字段
    let fields: Vec<&Field> = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                abort!(ident, "Component requires named fields")
            }
        },
        _ => abort!(ident, "Component can only be derived for structs"),
    };

    let mut injectable = Vec::new();
    for field in fields {
        let field_ident = field.ident.as_ref().expect("named field");
        let value_marker = get_value_marker(&field.attrs);
        let autowired_marker = get_autowired_marker(&field.attrs);

        match (value_marker, autowired_marker) {
            (Some(_), Some(_)) => abort!(
                field_ident,
                "field cannot be both #[value] and #[autowired]"
            ),
            (Some(literal), None) => {
                injectable.push((field, Injection::Literal(literal)));
            }
            (None, Some(qualifier)) => {
                let target =
                    qualifier.unwrap_or_else(|| snake_to_camel(&field_ident.to_string()));
                injectable.push((field, Injection::Reference(target)));
            }
            (None, None) => {}
        }
    }

    // 字段注入表的 match 分支
    let write_arms = injectable.iter().map(|(field, injection)| {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_name = field_ident.to_string();
        let field_ty = &field.ty;

        match injection {
            Injection::Literal(_) => quote! {
                #field_name => match value {
                    ::sprig_core::FieldValue::Literal(raw) => {
                        this.#field_ident = raw.parse().map_err(|_| {
                            ::sprig_core::BeansError::TypeMismatch {
                                expected: ::std::any::type_name::<#field_ty>().to_string(),
                                found: raw.to_string(),
                            }
                        })?;
                        Ok(())
                    }
                    ::sprig_core::FieldValue::Bean(_) => {
                        Err(::sprig_core::BeansError::TypeMismatch {
                            expected: "literal value".to_string(),
                            found: "bean reference".to_string(),
                        })
                    }
                },
            },
            Injection::Reference(_) => quote! {
                #field_name => match value {
                    ::sprig_core::FieldValue::Bean(handle) => {
                        this.#field_ident.bind(handle);
                        Ok(())
                    }
                    ::sprig_core::FieldValue::Literal(raw) => {
                        Err(::sprig_core::BeansError::TypeMismatch {
                            expected: "bean reference".to_string(),
                            found: raw.to_string(),
                        })
                    }
                },
            },
        }
    });

    // 组件扫描模式下的属性赋值
    let assignments = injectable.iter().filter_map(|(field, injection)| {
        let field_name = field.ident.as_ref().expect("named field").to_string();
        match injection {
            Injection::Literal(Some(literal)) => Some(quote! {
                ::sprig_core::PropertyAssignment::literal(#field_name, #literal)
            }),
            Injection::Literal(None) => None,
            Injection::Reference(target) => Some(quote! {
                ::sprig_core::PropertyAssignment::reference(#field_name, #target)
            }),
        }
    });

    let ident_str = ident.to_string();
    let assignable_extra = implements.iter().map(|ty| {
        quote! { || id == ::std::any::TypeId::of::<#ty>() }
    });

    // 没有可注入字段的类型不需要 downcast，任何字段名都是未知字段
    let write_field_body = if injectable.is_empty() {
        quote! {
            let _ = (target, value);
            Err(::sprig_core::BeansError::MissingProperty {
                type_name: ::std::any::type_name::<#ident>().to_string(),
                field: field.to_string(),
            })
        }
    } else {
        quote! {
            let this = target.downcast_mut::<#ident>().ok_or_else(|| {
                ::sprig_core::BeansError::TypeMismatch {
                    expected: ::std::any::type_name::<#ident>().to_string(),
                    found: "unknown".to_string(),
                }
            })?;
            match field {
                #(#write_arms)*
                _ => Err(::sprig_core::BeansError::MissingProperty {
                    type_name: ::std::any::type_name::<#ident>().to_string(),
                    field: field.to_string(),
                }),
            }
        }
    };

    let expanded = quote! {
        const _: () = {
            static DESCRIPTOR: ::sprig_core::TypeDescriptor = ::sprig_core::TypeDescriptor {
                type_name: ::std::concat!(::std::module_path!(), "::", #ident_str),
                type_id: || ::std::any::TypeId::of::<#ident>(),
                construct: || ::std::boxed::Box::new(<#ident as ::std::default::Default>::default()),
                write_field: __sprig_write_field,
                assignable_to: |id| id == ::std::any::TypeId::of::<#ident>() #(#assignable_extra)*,
            };

            fn __sprig_write_field(
                target: &mut dyn ::std::any::Any,
                field: &str,
                value: ::sprig_core::FieldValue<'_>,
            ) -> ::sprig_core::BeansResult<()> {
                #write_field_body
            }

            impl ::sprig_core::Component for #ident {
                fn bean_name() -> &'static str {
                    #bean_name
                }

                fn scope() -> ::sprig_core::Scope {
                    #scope_tokens
                }

                fn descriptor() -> &'static ::sprig_core::TypeDescriptor {
                    &DESCRIPTOR
                }

                fn property_assignments() -> ::std::vec::Vec<::sprig_core::PropertyAssignment> {
                    ::std::vec![#(#assignments),*]
                }
            }

            // 自动向 inventory 注册类型描述符与组件
            ::sprig_core::inventory::submit! {
                ::sprig_core::TypeRegistration { descriptor: &DESCRIPTOR }
            }

            ::sprig_core::inventory::submit! {
                ::sprig_core::ComponentRegistration {
                    name: #bean_name,
                    definition: <#ident as ::sprig_core::Component>::definition,
                }
            }
        };
    };

    TokenStream::from(expanded)
}
