use sprig_core::prelude::*;
use sprig_core_macros::Component;

// ==================== 业务服务 ====================

/// 问候服务 - 原型作用域，字面量注入
#[derive(Component, Default)]
#[component("helloWorldService")]
#[scope("prototype")]
struct HelloWorldService {
    #[value("hi")]
    text: String,
}

impl HelloWorldService {
    fn say_something(&self) {
        println!("{}", self.text);
    }
}

/// 包装服务 - 单例，引用注入
#[derive(Component, Default)]
#[component("wrapService")]
struct WrapService {
    #[autowired]
    hello_world_service: Autowired<HelloWorldService>,
}

impl WrapService {
    fn say(&self) -> BeansResult<()> {
        self.hello_world_service
            .with(|service| service.say_something())
    }
}

fn main() -> anyhow::Result<()> {
    LoggingConfig::from_env().init()?;

    let context = ApplicationContext::from_toml_str(include_str!("../application.toml"))?;
    tracing::info!("ApplicationContext ready");

    let wrap_service = context.get_bean("wrapService")?;
    wrap_service.with::<WrapService, _>(|w| w.say())??;

    let hello1 = context.get_bean("helloWorldService")?;
    let hello2 = context.get_bean("helloWorldService")?;
    println!("prototype check: distinct = {}", !hello1.ptr_eq(&hello2));

    let wrap_service2 = context.get_bean("wrapService")?;
    println!(
        "singleton check: shared = {}",
        wrap_service.ptr_eq(&wrap_service2)
    );

    Ok(())
}
