use std::sync::Arc;

use sprig_core::prelude::*;
use sprig_core::Component as ComponentTrait;
use sprig_core_macros::Component;
use sprig_web::prelude::*;

// ==================== 业务服务 ====================

/// 问候服务 - 字面量由配置文档注入
#[derive(Component, Default)]
#[component("helloWorldService")]
struct HelloWorldService {
    #[value]
    text: String,
}

impl HelloWorldService {
    fn text(&self) -> String {
        self.text.clone()
    }
}

// ==================== 控制器 ====================

/// 演示控制器 - 由分发器晚注册进容器
#[derive(Component, Default)]
#[component("demoController")]
struct DemoController {
    #[autowired]
    hello_world_service: Autowired<HelloWorldService>,
}

impl DemoController {
    fn hello(&self, params: &RequestParams) -> BeansResult<String> {
        let param = params.get("param").cloned().unwrap_or_default();
        let text = self.hello_world_service.with(|service| service.text())?;
        Ok(format!("{} and the param is {}", text, param))
    }
}

sprig_core::inventory::submit! {
    ControllerRegistration {
        type_name: "web_demo::DemoController",
        bean_name: <DemoController as ComponentTrait>::bean_name,
        definition: <DemoController as ComponentTrait>::definition,
        base_path: "/demo",
        routes: &[RouteSpec {
            method: "GET",
            path: "/hello",
            handler: |bean, params| bean.with::<DemoController, _>(|c| c.hello(params))?,
        }],
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::from_env().init()?;

    let context = Arc::new(ApplicationContext::from_toml_str(include_str!(
        "../application.toml"
    ))?);
    tracing::info!("ApplicationContext ready");

    let properties = ServerProperties {
        host: "127.0.0.1".to_string(),
        port: 8080,
    };

    DispatcherServer::new(context)
        .with_properties(properties)
        .run()
        .await?;

    Ok(())
}
