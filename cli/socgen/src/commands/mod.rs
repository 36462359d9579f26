//! CLI command implementations.

pub mod controls;
pub mod gen_code;
pub mod generate;
pub mod init;
pub mod properties;
pub mod rpn;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;
use serde_json::Value;
use socgen_model::parse::{load_plugin, load_soc_model};
use socgen_model::{FeatureScope, PluginInfo, SocDataModel};

use crate::config::SocgenConfig;

/// Where the command runs: the configuration found upward from the working
/// directory, if any, and the directory its relative paths resolve against.
pub struct Workspace {
    pub config: Option<SocgenConfig>,
    pub dir: PathBuf,
}

impl Workspace {
    /// A path given on the command line wins; otherwise the configured one,
    /// relative to the configuration directory.
    pub fn input(&self, flag: Option<&str>, key: &str) -> Option<PathBuf> {
        if let Some(path) = flag {
            return Some(PathBuf::from(path));
        }
        let inputs = &self.config.as_ref()?.inputs;
        let configured = match key {
            "plugin" => inputs.plugin.as_deref(),
            "datamodel" => inputs.datamodel.as_deref(),
            "context" => inputs.context.as_deref(),
            _ => None,
        };
        configured.map(|p| self.dir.join(p))
    }

    fn required_input(&self, flag: Option<&str>, key: &str) -> Result<PathBuf> {
        match self.input(flag, key) {
            Some(path) => Ok(path),
            None => bail!("no {key} given (pass --{key} or set inputs.{key} in socgen.toml)"),
        }
    }

    pub fn plugin(&self, flag: Option<&str>) -> Result<PluginInfo> {
        let path = self.required_input(flag, "plugin")?;
        let plugin = load_plugin(&path).with_context(|| format!("loading plugin {}", path.display()))?;
        plugin
            .validate()
            .with_context(|| format!("validating plugin {}", path.display()))?;
        debug!("loaded plugin {} from {}", plugin.plugin_id, path.display());
        Ok(plugin)
    }

    pub fn datamodel(&self, flag: Option<&str>) -> Result<SocDataModel> {
        let path = self.required_input(flag, "datamodel")?;
        let soc = load_soc_model(&path).with_context(|| format!("loading data model {}", path.display()))?;
        debug!("loaded data model {} from {}", soc.name, path.display());
        Ok(soc)
    }

    /// The generation context, or `None` when none is given or configured.
    pub fn context(&self, flag: Option<&str>) -> Result<Option<Value>> {
        let Some(path) = self.input(flag, "context") else {
            return Ok(None);
        };
        read_json(&path).map(Some)
    }
}

pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_scope(name: &str) -> Result<FeatureScope> {
    name.parse::<FeatureScope>().with_context(|| {
        let known: Vec<&str> = FeatureScope::ALL.iter().map(|s| s.as_str()).collect();
        format!("expected one of: {}", known.join(", "))
    })
}
