//! Host-dependent build system choices.

use serde_json::Value;
use socgen_model::{FeatureScope, PluginProperty};

use crate::provider::PropertyPostProcessor;

const PROPERTY_ID: &str = "BuildSystem";
const MAKE: &str = "make";

/// Drops the `make` option of the project `BuildSystem` property on
/// Windows hosts.
#[derive(Debug, Clone, Copy)]
pub struct BuildSystemFilter {
    windows_host: bool,
}

impl BuildSystemFilter {
    pub fn new(windows_host: bool) -> Self {
        Self { windows_host }
    }

    /// A filter for the host this binary runs on.
    pub fn for_host() -> Self {
        Self::new(cfg!(windows))
    }
}

impl Default for BuildSystemFilter {
    fn default() -> Self {
        Self::for_host()
    }
}

impl PropertyPostProcessor for BuildSystemFilter {
    fn process(&self, scope: FeatureScope, _context: Option<&Value>, properties: &mut Vec<PluginProperty>) {
        if !self.windows_host || scope != FeatureScope::Project {
            return;
        }
        let options = properties
            .iter_mut()
            .find(|p| p.id == PROPERTY_ID)
            .and_then(|p| p.options.as_mut());
        if let Some(options) = options {
            options.retain(|option| option.value != MAKE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build_system() -> Vec<PluginProperty> {
        vec![serde_json::from_value(json!({
            "id": "BuildSystem",
            "name": "Build system",
            "type": "enum",
            "default": "cmake",
            "enum": [
                { "label": "CMake", "value": "cmake" },
                { "label": "Make", "value": "make" }
            ]
        }))
        .unwrap()]
    }

    fn values(properties: &[PluginProperty]) -> Vec<&str> {
        properties[0]
            .options
            .iter()
            .flatten()
            .map(|o| o.value.as_str())
            .collect()
    }

    #[test]
    fn windows_drops_make() {
        let mut properties = build_system();
        BuildSystemFilter::new(true).process(FeatureScope::Project, None, &mut properties);
        assert_eq!(values(&properties), ["cmake"]);
    }

    #[test]
    fn other_hosts_keep_every_option() {
        let mut properties = build_system();
        BuildSystemFilter::new(false).process(FeatureScope::Project, None, &mut properties);
        assert_eq!(values(&properties), ["cmake", "make"]);
    }

    #[test]
    fn only_project_scope_is_filtered() {
        let mut properties = build_system();
        BuildSystemFilter::new(true).process(FeatureScope::Workspace, None, &mut properties);
        assert_eq!(values(&properties), ["cmake", "make"]);
    }
}
