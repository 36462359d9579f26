//! `socgen properties`: UI properties of a scope.

use anyhow::{Context, Result};
use serde_json::Value;
use socgen_controls::{BuildSystemFilter, PropertyProvider, ZephyrBoardName};
use socgen_model::{FeatureScope, PluginInfo};

use super::{parse_scope, Workspace};

pub fn run(ws: &Workspace, scope: &str, plugin: Option<&str>, context: Option<&str>) -> Result<()> {
    let scope = parse_scope(scope)?;
    let plugin = ws.plugin(plugin)?;
    let context = ws.context(context)?;
    println!("{}", render(&plugin, scope, context.as_ref())?);
    Ok(())
}

pub(crate) fn render(plugin: &PluginInfo, scope: FeatureScope, context: Option<&Value>) -> Result<String> {
    let provider = PropertyProvider::new(plugin)
        .with_post_processor(ZephyrBoardName)
        .with_post_processor(BuildSystemFilter::for_host());
    let properties = provider
        .get_properties(scope, context)
        .with_context(|| format!("evaluating {scope} properties of {}", plugin.plugin_id))?;
    Ok(serde_json::to_string_pretty(&properties)?)
}
