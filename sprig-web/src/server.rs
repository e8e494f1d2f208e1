//! 分发服务器
//!
//! 启动流程：扫描到的控制器先作为 Bean 晚注册进上下文并统一物化，
//! 再按路由表建 Router，请求到来时从上下文解析控制器实例并调用
//! 处理函数。

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use sprig_core::{ApplicationContext, BeansResult, Container};
use tokio::net::TcpListener;

use crate::controller::all_controllers;

/// Web 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerProperties {
    /// 服务器监听地址
    pub host: String,

    /// 服务器监听端口
    pub port: u16,
}

impl Default for ServerProperties {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerProperties {
    /// 获取服务器地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 分发服务器
pub struct DispatcherServer {
    /// 应用上下文
    context: Arc<ApplicationContext>,

    /// 服务器配置
    properties: ServerProperties,
}

impl DispatcherServer {
    /// 基于已有上下文创建分发服务器
    pub fn new(context: Arc<ApplicationContext>) -> Self {
        Self {
            context,
            properties: ServerProperties::default(),
        }
    }

    /// 指定服务器配置
    pub fn with_properties(mut self, properties: ServerProperties) -> Self {
        self.properties = properties;
        self
    }

    /// 把扫描到的控制器晚注册进上下文并刷新
    ///
    /// 控制器是启动后才发现的组件，走动态注册路径：先 `add_definition`
    /// 再 `refresh`，让新加入的单例控制器立即被饿汉构造。
    pub fn register_controllers(&self) -> BeansResult<()> {
        let mut registered = 0;
        for registration in all_controllers() {
            let bean_name = (registration.bean_name)();
            if self.context.contains_bean(bean_name) {
                continue;
            }
            tracing::debug!(
                "Registering controller bean '{}' ({})",
                bean_name,
                registration.type_name
            );
            self.context.add_definition((registration.definition)());
            registered += 1;
        }

        if registered > 0 {
            tracing::info!("Registered {} controller bean(s)", registered);
            self.context.refresh()?;
        } else {
            tracing::debug!("No new controller beans to register");
        }

        Ok(())
    }

    /// 按路由表构建 Router
    pub fn build_router(&self) -> Router {
        let mut router = Router::new();

        for registration in all_controllers() {
            for route in registration.routes {
                let path = registration.full_path(route);
                let context = Arc::clone(&self.context);
                let bean_name = (registration.bean_name)();
                let handler_fn = route.handler;

                let handler = move |Query(params): Query<HashMap<String, String>>| {
                    let context = Arc::clone(&context);
                    async move {
                        match context
                            .get_bean(bean_name)
                            .and_then(|bean| handler_fn(&bean, &params))
                        {
                            Ok(body) => (StatusCode::OK, body),
                            Err(e) => {
                                tracing::error!("Handler for '{}' failed: {}", bean_name, e);
                                (
                                    StatusCode::INTERNAL_SERVER_ERROR,
                                    "500!! Server Exception".to_string(),
                                )
                            }
                        }
                    }
                };

                let method_router = match route.method {
                    "GET" => get(handler),
                    "POST" => post(handler),
                    other => {
                        tracing::warn!("Unsupported method '{}' for route '{}'", other, path);
                        continue;
                    }
                };

                tracing::info!("Mapped {} {}", route.method, path);
                router = router.route(&path, method_router);
            }
        }

        router.fallback(|| async { (StatusCode::NOT_FOUND, "404 NOT FOUND!") })
    }

    /// 启动服务器
    pub async fn run(self) -> BeansResult<()> {
        self.register_controllers()?;

        let app = self.build_router().into_make_service();
        let addr = self.properties.address();

        tracing::info!("Starting dispatcher on {}", addr);
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Dispatcher listening on http://{}", addr);

        axum::serve(listener, app).await?;
        Ok(())
    }
}
