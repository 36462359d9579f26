//! `socgen generate`: run a plugin's workspace, project or codegen feature.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use socgen_generate::Generator;
use socgen_model::{FeatureScope, PluginInfo};

use super::{parse_scope, Workspace};

pub fn run(
    ws: &Workspace,
    kind: &str,
    plugin: Option<&str>,
    context: Option<&str>,
    output: Option<&str>,
) -> Result<()> {
    let scope = parse_scope(kind)?;
    let plugin = ws.plugin(plugin)?;
    let context = ws.context(context)?.unwrap_or_else(|| Value::Object(Default::default()));
    let output = match (output, &ws.config) {
        (Some(dir), _) => PathBuf::from(dir),
        (None, Some(config)) => config.output_dir(&ws.dir),
        (None, None) => ws.dir.join("out"),
    };

    let written = generate(&plugin, scope, &output, &context)?;
    for path in &written {
        println!("  {}", path.display());
    }
    println!("Generated {} file(s) into {}", written.len(), output.display());
    Ok(())
}

pub(crate) fn generate(plugin: &PluginInfo, scope: FeatureScope, output: &Path, context: &Value) -> Result<Vec<PathBuf>> {
    if !matches!(scope, FeatureScope::Workspace | FeatureScope::Project | FeatureScope::CodeGen) {
        bail!("'{scope}' is not a generator; use workspace, project or codegen");
    }
    std::fs::create_dir_all(output).with_context(|| format!("creating {}", output.display()))?;
    let generator = Generator::new(plugin)?;
    generator
        .generate(scope, output, context)
        .with_context(|| format!("{scope} generation with {}", plugin.plugin_id))
}
