//! 控制器支持
//!
//! 控制器是普通的容器 Bean；路由表是静态数据，由 inventory 在编译期
//! 收集，分发器据此建表并在请求时从上下文解析控制器实例。

use std::collections::HashMap;

use sprig_core::{BeanDefinition, BeanInstance, BeansResult};

/// 请求参数：查询串解析出的键值对
pub type RequestParams = HashMap<String, String>;

/// 路由处理函数
///
/// 入参是已解析的控制器 Bean 和请求参数，返回响应体。
pub type RouteHandler = fn(&BeanInstance, &RequestParams) -> BeansResult<String>;

/// 单条路由
pub struct RouteSpec {
    /// HTTP 方法（"GET" / "POST"）
    pub method: &'static str,

    /// 控制器基础路径下的相对路径
    pub path: &'static str,

    /// 处理函数
    pub handler: RouteHandler,
}

/// 控制器注册信息
///
/// 用于自动发现控制器并把它们作为 Bean 晚注册进容器
pub struct ControllerRegistration {
    /// 控制器类型名称
    pub type_name: &'static str,

    /// 控制器在容器中的 Bean 名称
    pub bean_name: fn() -> &'static str,

    /// 组装控制器的 Bean 定义
    pub definition: fn() -> BeanDefinition,

    /// 基础路径
    pub base_path: &'static str,

    /// 路由表
    pub routes: &'static [RouteSpec],
}

impl ControllerRegistration {
    /// 拼出路由的完整路径（基础路径 + 相对路径，折叠重复的斜杠）
    pub fn full_path(&self, route: &RouteSpec) -> String {
        let mut joined = String::new();
        if !self.base_path.is_empty() {
            if !self.base_path.starts_with('/') {
                joined.push('/');
            }
            joined.push_str(self.base_path);
        }
        if !route.path.is_empty() {
            if !route.path.starts_with('/') {
                joined.push('/');
            }
            joined.push_str(route.path);
        }
        if joined.is_empty() {
            joined.push('/');
        }

        // 把连续的 '/' 折叠成一个
        let mut collapsed = String::with_capacity(joined.len());
        let mut previous_slash = false;
        for ch in joined.chars() {
            if ch == '/' {
                if !previous_slash {
                    collapsed.push(ch);
                }
                previous_slash = true;
            } else {
                collapsed.push(ch);
                previous_slash = false;
            }
        }
        collapsed
    }
}

// 使用 inventory 收集所有控制器
sprig_core::inventory::collect!(ControllerRegistration);

/// 获取所有注册的控制器
pub fn all_controllers() -> impl Iterator<Item = &'static ControllerRegistration> {
    sprig_core::inventory::iter::<ControllerRegistration>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(base_path: &'static str) -> ControllerRegistration {
        ControllerRegistration {
            type_name: "tests::Dummy",
            bean_name: || "dummy",
            definition: || BeanDefinition::new("dummy", ""),
            base_path,
            routes: &[],
        }
    }

    #[test]
    fn test_full_path_joining() {
        let route = RouteSpec {
            method: "GET",
            path: "/hello",
            handler: |_, _| Ok(String::new()),
        };

        assert_eq!(registration("/test").full_path(&route), "/test/hello");
        assert_eq!(registration("test").full_path(&route), "/test/hello");
        assert_eq!(registration("").full_path(&route), "/hello");
        assert_eq!(registration("/test/").full_path(&route), "/test/hello");
    }

    #[test]
    fn test_full_path_without_relative_part() {
        let route = RouteSpec {
            method: "GET",
            path: "",
            handler: |_, _| Ok(String::new()),
        };
        assert_eq!(registration("/test").full_path(&route), "/test");
        assert_eq!(registration("").full_path(&route), "/");
    }
}
