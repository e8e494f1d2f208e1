//! 分发层端到端测试：控制器晚注册 + 路由分发

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use sprig_core::prelude::*;
use sprig_core::Component as ComponentTrait;
use sprig_core_macros::Component;
use sprig_web::{ControllerRegistration, DispatcherServer, RequestParams, RouteSpec};

/// 控制器依赖的业务服务
#[derive(Component, Default)]
#[component("echoService")]
struct EchoService {
    #[value("hello from container")]
    text: String,
}

impl EchoService {
    fn text(&self) -> String {
        self.text.clone()
    }
}

/// 测试控制器 - 也是一个容器 Bean
#[derive(Component, Default)]
#[component("testController")]
struct TestController {
    #[autowired]
    echo_service: Autowired<EchoService>,
}

impl TestController {
    fn hello(&self, params: &RequestParams) -> BeansResult<String> {
        let param = params.get("param").cloned().unwrap_or_default();
        let text = self.echo_service.with(|service| service.text())?;
        Ok(format!("{} and the param is {}", text, param))
    }
}

sprig_core::inventory::submit! {
    ControllerRegistration {
        type_name: "dispatch::TestController",
        bean_name: <TestController as ComponentTrait>::bean_name,
        definition: <TestController as ComponentTrait>::definition,
        base_path: "/test",
        routes: &[RouteSpec {
            method: "GET",
            path: "/hello",
            handler: |bean, params| bean.with::<TestController, _>(|c| c.hello(params))?,
        }],
    }
}

fn dispatcher() -> DispatcherServer {
    let context = Arc::new(ApplicationContext::new());
    // 服务先就位，控制器由分发器晚注册
    context.add_definition(<EchoService as ComponentTrait>::definition());
    DispatcherServer::new(context)
}

#[tokio::test]
async fn controller_is_registered_dynamically() {
    let context = Arc::new(ApplicationContext::new());
    context.add_definition(<EchoService as ComponentTrait>::definition());
    let server = DispatcherServer::new(Arc::clone(&context));

    assert!(!context.contains_bean("testController"));
    server.register_controllers().unwrap();
    assert!(context.contains_bean("testController"));

    // 晚注册触发统一物化：控制器单例已经装配完成
    let controller = context.get_bean("testController").unwrap();
    let greeting = controller
        .with::<TestController, _>(|c| c.hello(&RequestParams::new()))
        .unwrap()
        .unwrap();
    assert_eq!(greeting, "hello from container and the param is ");

    // 再次注册是幂等的
    server.register_controllers().unwrap();
}

#[tokio::test]
async fn dispatch_resolves_controller_and_params() {
    let server = dispatcher();
    server.register_controllers().unwrap();
    let router = server.build_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/test/hello?param=world")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(body, "hello from container and the param is world");
}

#[tokio::test]
async fn unknown_path_falls_back_to_404() {
    let server = dispatcher();
    server.register_controllers().unwrap();
    let router = server.build_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/no/such/route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(body, "404 NOT FOUND!");
}
