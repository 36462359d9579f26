//! Workspace, project and code generators.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::Value;
use socgen_model::{FeatureScope, PluginInfo};

use crate::copy::copy_files;
use crate::error::{GenerateError, Result};
use crate::render::render_templates;

/// Runs the features of one plugin.
///
/// Feature sources, both plain files and templates, resolve against the
/// plugin directory.
pub struct Generator<'p> {
    plugin: &'p PluginInfo,
    plugin_dir: PathBuf,
}

impl<'p> Generator<'p> {
    /// A generator for a manifest loaded from disk.
    pub fn new(plugin: &'p PluginInfo) -> Result<Self> {
        let plugin_dir = plugin.plugin_dir().ok_or_else(|| GenerateError::NoPluginDir {
            plugin_id: plugin.plugin_id.clone(),
        })?;
        Ok(Self { plugin, plugin_dir })
    }

    /// A generator resolving sources against an explicit directory.
    pub fn with_plugin_dir(plugin: &'p PluginInfo, plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin,
            plugin_dir: plugin_dir.into(),
        }
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    /// Run the feature declared for `scope` into `base_dir`: files first,
    /// then templates. A scope without a feature writes nothing.
    pub fn generate(&self, scope: FeatureScope, base_dir: &Path, context: &Value) -> Result<Vec<PathBuf>> {
        let Some(feature) = self.plugin.feature(scope) else {
            debug!("plugin {} declares no {scope} feature", self.plugin.plugin_id);
            return Ok(Vec::new());
        };

        let mut written = copy_files(&feature.files, &self.plugin_dir, base_dir, context)?;
        written.extend(render_templates(&feature.templates, &self.plugin_dir, base_dir, context)?);
        info!(
            "{scope} generation by {} wrote {} file(s) under {}",
            self.plugin.plugin_id,
            written.len(),
            base_dir.display()
        );
        Ok(written)
    }

    pub fn generate_workspace(&self, base_dir: &Path, context: &Value) -> Result<Vec<PathBuf>> {
        self.generate(FeatureScope::Workspace, base_dir, context)
    }

    pub fn generate_project(&self, base_dir: &Path, context: &Value) -> Result<Vec<PathBuf>> {
        self.generate(FeatureScope::Project, base_dir, context)
    }

    pub fn generate_code(&self, base_dir: &Path, context: &Value) -> Result<Vec<PathBuf>> {
        self.generate(FeatureScope::CodeGen, base_dir, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn plugin(features: Value) -> PluginInfo {
        serde_json::from_value(json!({ "pluginId": "com.example.gen", "features": features })).unwrap()
    }

    #[test]
    fn needs_a_plugin_directory() {
        let info = plugin(json!({}));
        assert!(matches!(Generator::new(&info), Err(GenerateError::NoPluginDir { .. })));

        let mut loaded = info.clone();
        loaded.plugin_path = Some(PathBuf::from("/plugins/gen/.cfsplugin"));
        assert_eq!(Generator::new(&loaded).unwrap().plugin_dir(), Path::new("/plugins/gen"));
    }

    #[test]
    fn missing_feature_writes_nothing() {
        let info = plugin(json!({}));
        let out = tempfile::tempdir().unwrap();
        let written = Generator::with_plugin_dir(&info, "/nowhere")
            .generate_code(out.path(), &json!({}))
            .unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn files_then_templates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("z.txt"), "static").unwrap();
        fs::write(dir.path().join("a.txt.eta"), "{{ context.name }}").unwrap();
        let info = plugin(json!({
            "project": {
                "files": [{ "src": "z.txt", "dst": "out/" }],
                "templates": [{ "src": "a.txt.eta", "dst": "out/" }]
            }
        }));
        let out = tempfile::tempdir().unwrap();

        let written = Generator::with_plugin_dir(&info, dir.path())
            .generate_project(out.path(), &json!({ "name": "blinky" }))
            .unwrap();

        assert_eq!(written, [out.path().join("out/z.txt"), out.path().join("out/a.txt")]);
        assert_eq!(fs::read_to_string(out.path().join("out/a.txt")).unwrap(), "blinky");
    }
}
