//! 声明式 Bean 配置文档读取
//!
//! 文档格式为 TOML：`[[bean]]` 条目声明 id、class、可选 scope 和若干
//! 属性（字面量 `value` 或引用 `ref`）；`[component-scan]` 表把文档
//! 切换到组件扫描模式。两种来源产出完全相同的 `BeanDefinition` 形状。

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::bean::{BeanDefinition, PropertyAssignment};
use crate::component::lookup_descriptor;
use crate::error::{BeansError, BeansResult};
use crate::Scope;

/// Bean 定义读取接口
pub trait BeanDefinitionReader {
    /// 从某个位置读取 Bean 配置
    fn load_bean_definitions(&mut self, location: &str) -> BeansResult<()>;
}

/// 解析后的文档产出
#[derive(Debug, Default)]
pub struct LoadedDefinitions {
    /// 文档是否要求组件扫描
    pub component_scan: bool,

    /// 按文档顺序排列的 Bean 定义
    pub definitions: Vec<BeanDefinition>,
}

/// TOML 配置文档形式的 Bean 定义读取器
#[derive(Debug, Default)]
pub struct TomlBeanDefinitionReader {
    loaded: LoadedDefinitions,
}

impl TomlBeanDefinitionReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从文件读取
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> BeansResult<()> {
        let path = path.as_ref();
        tracing::debug!("Loading bean definitions from: {}", path.display());
        let content = fs::read_to_string(path)?;
        self.load_from_str(&content)
    }

    /// 从字符串读取
    pub fn load_from_str(&mut self, content: &str) -> BeansResult<()> {
        let document: BeanDocument = toml::from_str(content)
            .map_err(|e| BeansError::Configuration(format!("malformed bean document: {e}")))?;

        if let Some(scan) = document.component_scan {
            if scan.enabled {
                tracing::debug!("Bean document requests component scan");
                self.loaded.component_scan = true;
                return Ok(());
            }
        }

        for entry in document.beans {
            let definition = entry.into_definition()?;
            tracing::debug!("Bean definition read from document: {:?}", definition);
            self.loaded.definitions.push(definition);
        }

        Ok(())
    }

    /// 取出解析结果
    pub fn into_loaded(self) -> LoadedDefinitions {
        self.loaded
    }
}

impl BeanDefinitionReader for TomlBeanDefinitionReader {
    fn load_bean_definitions(&mut self, location: &str) -> BeansResult<()> {
        self.load_from_file(location)
    }
}

#[derive(Debug, Deserialize)]
struct BeanDocument {
    #[serde(rename = "component-scan")]
    component_scan: Option<ComponentScan>,

    #[serde(default, rename = "bean")]
    beans: Vec<BeanEntry>,
}

#[derive(Debug, Deserialize)]
struct ComponentScan {
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct BeanEntry {
    id: String,

    #[serde(default)]
    class: String,

    scope: Option<String>,

    #[serde(default, rename = "property")]
    properties: Vec<PropertyEntry>,
}

#[derive(Debug, Deserialize)]
struct PropertyEntry {
    name: String,

    value: Option<String>,

    #[serde(rename = "ref")]
    reference: Option<String>,
}

impl BeanEntry {
    fn into_definition(self) -> BeansResult<BeanDefinition> {
        let scope = match &self.scope {
            Some(raw) => raw.parse::<Scope>().map_err(|e| {
                BeansError::Configuration(format!("bean '{}': {}", self.id, e))
            })?,
            None => Scope::default(),
        };

        let mut definition =
            BeanDefinition::new(self.id.clone(), self.class.clone()).with_scope(scope);

        // 空 class 的条目照常记录，工厂永远不会构造它
        if !self.class.is_empty() {
            let descriptor = lookup_descriptor(&self.class).ok_or_else(|| {
                tracing::error!("Cannot resolve bean class '{}'", self.class);
                BeansError::Configuration(format!(
                    "bean '{}': class '{}' is not a registered component type",
                    self.id, self.class
                ))
            })?;
            definition = definition.with_descriptor(descriptor);
        }

        for property in self.properties {
            definition = definition.with_property(property.into_assignment(&self.id)?);
        }

        Ok(definition)
    }
}

impl PropertyEntry {
    fn into_assignment(self, bean_id: &str) -> BeansResult<PropertyAssignment> {
        // 优先值注入，空串视同缺省
        if let Some(value) = self.value.filter(|v| !v.is_empty()) {
            return Ok(PropertyAssignment::literal(self.name, value));
        }
        if let Some(reference) = self.reference.filter(|r| !r.is_empty()) {
            return Ok(PropertyAssignment::reference(self.name, reference));
        }
        Err(BeansError::Configuration(format!(
            "bean '{}': property '{}' must specify a ref or value",
            bean_id, self.name
        )))
    }
}
