//! # Sprig Web
//!
//! 容器之上的请求分发层：控制器是容器管理的 Bean，路由表在编译期
//! 通过 inventory 收集，分发器在启动后把控制器定义晚注册进上下文并
//! 统一物化，再把 URL 映射到控制器方法。

pub mod controller;
pub mod server;

pub use controller::{
    all_controllers, ControllerRegistration, RequestParams, RouteHandler, RouteSpec,
};
pub use server::{DispatcherServer, ServerProperties};

pub mod prelude {
    //! 预导入模块

    pub use crate::controller::*;
    pub use crate::server::*;

    pub use axum;
}
