//! `socgen.toml` project configuration.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "socgen.toml";

/// The top-level configuration of a socgen project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocgenConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

/// Input documents, relative to the directory holding `socgen.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Plugin manifest (`.cfsplugin`).
    #[serde(default)]
    pub plugin: Option<String>,
    /// SoC data model.
    #[serde(default)]
    pub datamodel: Option<String>,
    /// Generation context.
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    #[serde(default)]
    pub level: Option<String>,
}

impl SocgenConfig {
    /// Search upward from `start_dir` for a `socgen.toml`, returning it with
    /// the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config: SocgenConfig =
                    toml::from_str(&content).with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing socgen.toml")
    }

    /// The configured log level, if any. Unknown names are an error.
    pub fn log_level(&self) -> Result<Option<LevelFilter>> {
        self.logging
            .level
            .as_deref()
            .map(|level| {
                level
                    .parse::<LevelFilter>()
                    .map_err(|_| anyhow!("invalid logging.level '{level}' in {CONFIG_FILE}"))
            })
            .transpose()
    }

    /// Output directory, defaulting to `out` next to the configuration.
    pub fn output_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(self.output.dir.as_deref().unwrap_or("out"))
    }

    /// The starter configuration written by `socgen init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"

[inputs]
# plugin = "plugins/zephyr/.cfsplugin"
# datamodel = "datamodels/max32690.json"
context = "context.json"

[output]
dir = "out"

[logging]
level = "warn"
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config = SocgenConfig::from_str(
            r#"
[project]
name = "blinky"

[inputs]
plugin = "plugins/zephyr/.cfsplugin"
datamodel = "datamodels/max32690.json"
context = "context.json"

[output]
dir = "generated"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.project.name, "blinky");
        assert_eq!(config.inputs.plugin.as_deref(), Some("plugins/zephyr/.cfsplugin"));
        assert_eq!(config.inputs.datamodel.as_deref(), Some("datamodels/max32690.json"));
        assert_eq!(config.output_dir(Path::new("/p")), Path::new("/p/generated"));
        assert_eq!(config.log_level().unwrap(), Some(LevelFilter::Debug));
    }

    #[test]
    fn parse_minimal_config() {
        let config = SocgenConfig::from_str("[project]\nname = \"minimal\"\n").unwrap();
        assert!(config.inputs.plugin.is_none());
        assert_eq!(config.output_dir(Path::new("/p")), Path::new("/p/out"));
        assert_eq!(config.log_level().unwrap(), None);
    }

    #[test]
    fn reject_missing_project() {
        assert!(SocgenConfig::from_str("[output]\ndir = \"x\"\n").is_err());
        assert!(SocgenConfig::from_str("not toml [[[").is_err());
    }

    #[test]
    fn reject_unknown_level() {
        let config = SocgenConfig::from_str("[project]\nname = \"x\"\n[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.log_level().is_err());
    }

    #[test]
    fn template_is_valid_toml() {
        let config = SocgenConfig::from_str(&SocgenConfig::template("demo")).unwrap();
        assert_eq!(config.project.name, "demo");
        assert_eq!(config.inputs.context.as_deref(), Some("context.json"));
        assert_eq!(config.log_level().unwrap(), Some(LevelFilter::Warn));
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[project]\nname = \"parent\"\n").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, found) = SocgenConfig::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(config.project.name, "parent");
        assert_eq!(found, dir.path());
    }

    #[test]
    fn find_and_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[project\n").unwrap();
        let err = SocgenConfig::find_and_load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
