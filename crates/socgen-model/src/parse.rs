//! JSON loading and validation for data models and plugin manifests.

use std::path::Path;

use crate::error::{ModelError, Result};
use crate::plugin::PluginInfo;
use crate::soc::SocDataModel;

/// A validation issue found in a plugin manifest.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Load a SoC data model from a JSON file.
pub fn load_soc_model(path: &Path) -> Result<SocDataModel> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_soc_model(&content)
}

/// Parse a SoC data model from a JSON string.
pub fn parse_soc_model(json: &str) -> Result<SocDataModel> {
    let soc: SocDataModel = serde_json::from_str(json)?;
    Ok(soc)
}

/// Load a plugin manifest from a `.cfsplugin` file and record its location.
pub fn load_plugin(path: &Path) -> Result<PluginInfo> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let mut info = parse_plugin(&content)?;
    info.plugin_path = Some(path.to_path_buf());
    Ok(info)
}

/// Parse a plugin manifest from a JSON string.
pub fn parse_plugin(json: &str) -> Result<PluginInfo> {
    let info: PluginInfo = serde_json::from_str(json)?;
    Ok(info)
}

/// Check a manifest for problems the override engine would otherwise
/// swallow silently.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
pub fn validate_plugin(info: &PluginInfo) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if info.plugin_id.trim().is_empty() {
        issues.push(ValidationIssue {
            severity: "error",
            message: "pluginId is empty".into(),
        });
    }

    for (label, directive) in info.properties.all_directives() {
        for pattern in directive.part_patterns() {
            if let Err(e) = regex::Regex::new(pattern) {
                issues.push(ValidationIssue {
                    severity: "error",
                    message: format!("{label}: invalid partRegexp '{pattern}': {e}"),
                });
            }
        }

        let ids = directive
            .added_controls
            .iter()
            .flatten()
            .map(|a| a.control.id.as_str())
            .chain(
                directive
                    .supported_controls
                    .iter()
                    .chain(directive.removed_controls.iter())
                    .flatten()
                    .map(|r| r.id.as_str()),
            );
        for id in ids {
            if id.trim().is_empty() {
                issues.push(ValidationIssue {
                    severity: "error",
                    message: format!("{label}: control with empty Id"),
                });
            }
        }

        if directive.supported_controls.is_some() && directive.removed_controls.is_some() {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!(
                    "{label}: both supportedControls and removedControls are set; removedControls is ignored"
                ),
            });
        }
    }

    for (scope, feature) in &info.features {
        for map in feature.files.iter().chain(feature.templates.iter()) {
            if map.src.trim().is_empty() || map.dst.trim().is_empty() {
                issues.push(ValidationIssue {
                    severity: "error",
                    message: format!("{scope}: file mapping with empty src or dst"),
                });
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

impl PluginInfo {
    /// Validate the manifest, failing on the first error-severity issue.
    ///
    /// Warnings are not fatal.
    pub fn validate(&self) -> Result<()> {
        match validate_plugin(self) {
            Ok(()) => Ok(()),
            Err(issues) => match issues.into_iter().find(|i| i.severity == "error") {
                Some(issue) => Err(ModelError::Validation {
                    detail: issue.message,
                }),
                None => Ok(()),
            },
        }
    }
}
