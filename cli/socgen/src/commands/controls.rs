//! `socgen controls`: the override engine's view of one scope.

use anyhow::{bail, Result};
use socgen_controls::SocControlsOverride;
use socgen_model::{FeatureScope, PluginInfo, SocDataModel};

use super::{parse_scope, Workspace};

pub fn run(ws: &Workspace, scope: &str, plugin: Option<&str>, datamodel: Option<&str>) -> Result<()> {
    let scope = parse_scope(scope)?;
    let plugin = ws.plugin(plugin)?;
    let soc = ws.datamodel(datamodel)?;
    println!("{}", render(&plugin, scope, &soc)?);
    Ok(())
}

/// Overridden controls of `scope` as pretty-printed JSON.
pub(crate) fn render(plugin: &PluginInfo, scope: FeatureScope, soc: &SocDataModel) -> Result<String> {
    if !scope.is_control_scope() {
        bail!("'{scope}' has no controls; use one of memory, peripheral, pinConfig, clockConfig, dfg");
    }
    let controls = SocControlsOverride::new(plugin).override_controls(scope, soc);
    Ok(serde_json::to_string_pretty(&controls)?)
}
