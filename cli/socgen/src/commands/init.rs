//! `socgen init`: project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::json;

use crate::config::{SocgenConfig, CONFIG_FILE};

/// Create a new project directory `name` relative to the working directory.
pub fn run(name: &str) -> Result<()> {
    create_project(Path::new(name), name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }
    fs::create_dir_all(project_dir).with_context(|| format!("creating {}", project_dir.display()))?;

    fs::write(project_dir.join(CONFIG_FILE), SocgenConfig::template(name)).context("writing socgen.toml")?;

    let context = json!({ "projectName": name });
    fs::write(project_dir.join("context.json"), serde_json::to_string_pretty(&context)? + "\n")
        .context("writing context.json")?;

    fs::write(project_dir.join(".gitignore"), "out/\n").context("writing .gitignore")?;

    println!("Created project '{name}'");
    println!("  {name}/{CONFIG_FILE}");
    println!("  {name}/context.json");
    println!("  {name}/.gitignore");
    Ok(())
}
