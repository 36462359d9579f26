//! UI-facing property provider.

use log::debug;
use serde_json::Value;
use socgen_expr::{eval_nested_template_literals, ExprError};
use socgen_model::{ControlMap, FeatureScope, PluginInfo, PluginProperty, SocDataModel};

use crate::override_engine::SocControlsOverride;

/// Adjusts the property list of a scope after the provider has filtered it
/// and resolved its defaults.
///
/// Post-processors run with and without a context. Adjustments that read
/// context fields must leave the list alone when `context` is `None`.
pub trait PropertyPostProcessor {
    fn process(&self, scope: FeatureScope, context: Option<&Value>, properties: &mut Vec<PluginProperty>);
}

/// Exposes a plugin's per-scope properties and control overrides.
pub struct PropertyProvider<'p> {
    plugin: &'p PluginInfo,
    controls: SocControlsOverride<'p>,
    post_processors: Vec<Box<dyn PropertyPostProcessor>>,
}

impl<'p> PropertyProvider<'p> {
    pub fn new(plugin: &'p PluginInfo) -> Self {
        Self {
            plugin,
            controls: SocControlsOverride::new(plugin),
            post_processors: Vec::new(),
        }
    }

    /// Add a post-processor; they run in registration order.
    pub fn with_post_processor(mut self, processor: impl PropertyPostProcessor + 'static) -> Self {
        self.post_processors.push(Box::new(processor));
        self
    }

    pub fn plugin(&self) -> &PluginInfo {
        self.plugin
    }

    /// Properties of `scope` whose condition holds for `context`.
    ///
    /// With a context, string defaults are evaluated as templates and an
    /// `undefined` result becomes the empty string. Without one, conditions
    /// see an empty object and defaults are returned unevaluated.
    pub fn get_properties(
        &self,
        scope: FeatureScope,
        context: Option<&Value>,
    ) -> Result<Vec<PluginProperty>, ExprError> {
        let Some(declared) = self.plugin.properties.properties(scope) else {
            return Ok(Vec::new());
        };

        let empty = Value::Object(serde_json::Map::new());
        let condition_context = context.unwrap_or(&empty);

        let mut properties = Vec::with_capacity(declared.len());
        for property in declared {
            if let Some(condition) = &property.condition {
                if eval_nested_template_literals(condition, condition_context)? != "true" {
                    debug!("property {} hidden by its condition", property.id);
                    continue;
                }
            }
            properties.push(property.clone());
        }

        if let Some(context) = context {
            for property in &mut properties {
                let Some(template) = property.default_str().filter(|s| !s.is_empty()) else {
                    continue;
                };
                let resolved = eval_nested_template_literals(template, context)?;
                let resolved = if resolved == "undefined" {
                    String::new()
                } else {
                    resolved
                };
                property.default = Some(Value::String(resolved));
            }
        }

        for processor in &self.post_processors {
            processor.process(scope, context, &mut properties);
        }
        Ok(properties)
    }

    /// See [`SocControlsOverride::override_controls`].
    pub fn override_controls(&self, scope: FeatureScope, soc: &SocDataModel) -> ControlMap {
        self.controls.override_controls(scope, soc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plugin() -> PluginInfo {
        serde_json::from_value(json!({
            "pluginId": "test",
            "properties": {
                "project": [
                    { "id": "Name", "name": "Name", "type": "string", "default": "${context.name}" },
                    { "id": "Static", "name": "Static", "type": "string", "default": "fixed" },
                    { "id": "Missing", "name": "Missing", "type": "string", "default": "${context.nothing}" },
                    { "id": "Empty", "name": "Empty", "type": "string", "default": "" },
                    { "id": "Count", "name": "Count", "type": "number", "default": 3 },
                    {
                        "id": "CoreDump",
                        "name": "Core dump",
                        "type": "boolean",
                        "condition": "${context.soc === 'MAX32690'}"
                    }
                ]
            }
        }))
        .unwrap()
    }

    fn ids(properties: &[PluginProperty]) -> Vec<&str> {
        properties.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn without_context_defaults_are_raw() {
        let info = plugin();
        let result = PropertyProvider::new(&info)
            .get_properties(FeatureScope::Project, None)
            .unwrap();
        assert_eq!(ids(&result), ["Name", "Static", "Missing", "Empty", "Count"]);
        assert_eq!(result[0].default, Some(json!("${context.name}")));
    }

    #[test]
    fn with_context_defaults_are_resolved() {
        let info = plugin();
        let context = json!({ "name": "blinky", "soc": "MAX32690" });
        let result = PropertyProvider::new(&info)
            .get_properties(FeatureScope::Project, Some(&context))
            .unwrap();
        assert_eq!(ids(&result), ["Name", "Static", "Missing", "Empty", "Count", "CoreDump"]);
        assert_eq!(result[0].default, Some(json!("blinky")));
        assert_eq!(result[1].default, Some(json!("fixed")));
        assert_eq!(result[2].default, Some(json!("")));
        assert_eq!(result[3].default, Some(json!("")));
        assert_eq!(result[4].default, Some(json!(3)));
    }

    #[test]
    fn condition_must_render_true() {
        let info = plugin();
        let context = json!({ "soc": "MAX78000" });
        let result = PropertyProvider::new(&info)
            .get_properties(FeatureScope::Project, Some(&context))
            .unwrap();
        assert!(!ids(&result).contains(&"CoreDump"));
    }

    #[test]
    fn undeclared_scope_is_empty() {
        let info = plugin();
        let provider = PropertyProvider::new(&info);
        assert!(provider.get_properties(FeatureScope::Workspace, None).unwrap().is_empty());
        assert!(provider.get_properties(FeatureScope::Peripheral, None).unwrap().is_empty());
    }

    #[test]
    fn evaluation_errors_propagate() {
        let info: PluginInfo = serde_json::from_value(json!({
            "pluginId": "test",
            "properties": {
                "workspace": [{ "id": "Bad", "name": "Bad", "type": "string", "condition": "${context.}" }]
            }
        }))
        .unwrap();
        assert!(PropertyProvider::new(&info)
            .get_properties(FeatureScope::Workspace, None)
            .is_err());
    }

    struct Upper;

    impl PropertyPostProcessor for Upper {
        fn process(&self, _scope: FeatureScope, _context: Option<&Value>, properties: &mut Vec<PluginProperty>) {
            for property in properties {
                property.name = property.name.to_uppercase();
            }
        }
    }

    #[test]
    fn post_processors_run_last() {
        let info = plugin();
        let result = PropertyProvider::new(&info)
            .with_post_processor(Upper)
            .get_properties(FeatureScope::Project, None)
            .unwrap();
        assert_eq!(result[1].name, "STATIC");
    }

    #[test]
    fn post_processors_without_context() {
        let info: PluginInfo = serde_json::from_value(json!({
            "pluginId": "zephyr",
            "properties": {
                "project": [
                    { "id": "ZephyrBoardName", "name": "Board", "type": "string", "default": "" },
                    {
                        "id": "BuildSystem",
                        "name": "Build system",
                        "type": "enum",
                        "enum": [{ "label": "CMake", "value": "cmake" }, { "label": "Make", "value": "make" }]
                    }
                ]
            }
        }))
        .unwrap();

        let result = PropertyProvider::new(&info)
            .with_post_processor(crate::ZephyrBoardName)
            .with_post_processor(crate::BuildSystemFilter::new(true))
            .get_properties(FeatureScope::Project, None)
            .unwrap();

        assert_eq!(result[0].default, Some(json!("")));
        let options = result[1].options.as_deref().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "cmake");
    }
}
