//! Plugin manifest (`.cfsplugin`) types.
//!
//! A manifest declares, per feature scope, either UI properties or control
//! directives, plus the files and templates each generator feature emits.
//! Directive field names (`supportedControls`, `removedControls`,
//! `addedControls`, `modifiedControls`, `defaultOverrides`, `partRegexp`) are
//! part of the manifest format and must not change.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scope::FeatureScope;
use crate::soc::{Control, EnumValue};

/// A reference to a control by id, optionally restricted to matching parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRef {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(default, rename = "partRegexp", skip_serializing_if = "Option::is_none")]
    pub part_regexp: Option<String>,
}

/// A control a plugin appends to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedControl {
    #[serde(default, rename = "partRegexp", skip_serializing_if = "Option::is_none")]
    pub part_regexp: Option<String>,
    #[serde(flatten)]
    pub control: Control,
}

/// Partial control: every field that is present replaces the target's field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControlPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "Type", skip_serializing_if = "Option::is_none")]
    pub control_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<EnumValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_option: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ControlPatch {
    /// Shallow-merge this patch over `control`; patch fields win.
    pub fn apply_to(&self, control: &mut Control) {
        if let Some(description) = &self.description {
            control.description = description.clone();
        }
        if let Some(control_type) = &self.control_type {
            control.control_type = control_type.clone();
        }
        if let Some(enum_values) = &self.enum_values {
            control.enum_values = enum_values.clone();
        }
        if let Some(default) = &self.default {
            control.default = Some(default.clone());
        }
        if let Some(minimum) = &self.minimum_value {
            control.minimum_value = Some(minimum.clone());
        }
        if let Some(maximum) = &self.maximum_value {
            control.maximum_value = Some(maximum.clone());
        }
        if let Some(condition) = &self.condition {
            control.condition = Some(condition.clone());
        }
        if let Some(plugin_option) = self.plugin_option {
            control.plugin_option = plugin_option;
        }
        for (key, value) in &self.extra {
            control.extra.insert(key.clone(), value.clone());
        }
    }
}

/// A patch addressed to an existing control by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedControl {
    #[serde(rename = "Id")]
    pub id: String,
    /// Accepted for manifest compatibility; modifications are not part-gated.
    #[serde(default, rename = "partRegexp", skip_serializing_if = "Option::is_none")]
    pub part_regexp: Option<String>,
    #[serde(flatten)]
    pub patch: ControlPatch,
}

/// Replacement default value for a control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultOverride {
    #[serde(rename = "Id")]
    pub id: String,
    /// String or number.
    #[serde(rename = "Value")]
    pub value: Value,
    #[serde(default, rename = "partRegexp", skip_serializing_if = "Option::is_none")]
    pub part_regexp: Option<String>,
}

/// A transformation rule for one control group or clock node.
///
/// `supported_controls` takes precedence over `removed_controls` when both
/// are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDirective {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_controls: Option<Vec<ControlRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_controls: Option<Vec<ControlRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_controls: Option<Vec<AddedControl>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_controls: Option<Vec<ModifiedControl>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_overrides: Option<Vec<DefaultOverride>>,
}

impl ControlDirective {
    /// True when no directive kind is declared at all.
    ///
    /// A declared but empty list still counts: `supportedControls: []`
    /// filters every control out.
    pub fn is_empty(&self) -> bool {
        self.supported_controls.is_none()
            && self.removed_controls.is_none()
            && self.added_controls.is_none()
            && self.modified_controls.is_none()
            && self.default_overrides.is_none()
    }

    /// Every `partRegexp` pattern declared anywhere in the directive.
    pub fn part_patterns(&self) -> Vec<&str> {
        let refs = self
            .supported_controls
            .iter()
            .chain(self.removed_controls.iter())
            .flatten()
            .filter_map(|r| r.part_regexp.as_deref());
        let added = self
            .added_controls
            .iter()
            .flatten()
            .filter_map(|a| a.part_regexp.as_deref());
        let defaults = self
            .default_overrides
            .iter()
            .flatten()
            .filter_map(|d| d.part_regexp.as_deref());
        refs.chain(added).chain(defaults).collect()
    }
}

/// One selectable option of an enumerated property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOption {
    pub label: String,
    pub value: String,
}

/// A UI-exposed plugin property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginProperty {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Usually a string, possibly holding a `${...}` template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, rename = "type")]
    pub property_type: String,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PropertyOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Expression that must evaluate to `"true"` for the property to be shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PluginProperty {
    /// The default as a string, when it is one.
    pub fn default_str(&self) -> Option<&str> {
        self.default.as_ref().and_then(Value::as_str)
    }
}

/// The `properties` table of a manifest, typed by scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Vec<PluginProperty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Vec<PluginProperty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codegen: Option<Vec<PluginProperty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<ControlDirective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peripheral: Option<BTreeMap<String, ControlDirective>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_config: Option<ControlDirective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_config: Option<BTreeMap<String, ControlDirective>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dfg: Option<BTreeMap<String, ControlDirective>>,
}

impl ScopedProperties {
    /// UI properties declared for a property scope.
    ///
    /// `None` when the scope declares nothing or is a control scope.
    pub fn properties(&self, scope: FeatureScope) -> Option<&[PluginProperty]> {
        match scope {
            FeatureScope::Workspace => self.workspace.as_deref(),
            FeatureScope::Project => self.project.as_deref(),
            FeatureScope::CodeGen => self.codegen.as_deref(),
            _ => None,
        }
    }

    /// The single directive of a single-group scope (`memory`, `pinConfig`).
    pub fn directive(&self, scope: FeatureScope) -> Option<&ControlDirective> {
        match scope {
            FeatureScope::Memory => self.memory.as_ref(),
            FeatureScope::PinConfig => self.pin_config.as_ref(),
            _ => None,
        }
    }

    /// Per-group directives of a multi-group scope (`peripheral`, `clockConfig`, `dfg`).
    pub fn directives(&self, scope: FeatureScope) -> Option<&BTreeMap<String, ControlDirective>> {
        match scope {
            FeatureScope::Peripheral => self.peripheral.as_ref(),
            FeatureScope::ClockConfig => self.clock_config.as_ref(),
            FeatureScope::Dfg => self.dfg.as_ref(),
            _ => None,
        }
    }

    /// Every directive in the table, labelled `scope` or `scope.group`.
    pub fn all_directives(&self) -> Vec<(String, &ControlDirective)> {
        let mut out = Vec::new();
        for scope in FeatureScope::ALL {
            if let Some(directive) = self.directive(scope) {
                out.push((scope.to_string(), directive));
            }
            if let Some(map) = self.directives(scope) {
                for (group, directive) in map {
                    out.push((format!("{scope}.{group}"), directive));
                }
            }
        }
        out
    }
}

/// A source → destination mapping of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMap {
    /// Glob relative to the plugin (files) or template search (templates) directory.
    pub src: String,
    /// Destination path template; a trailing separator marks a directory.
    pub dst: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Files copied verbatim and templates rendered for one scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub files: Vec<FileMap>,
    #[serde(default)]
    pub templates: Vec<FileMap>,
}

/// A SoC supported by a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocInfo {
    pub name: String,
    #[serde(default)]
    pub data_model: String,
    #[serde(default)]
    pub board: String,
    #[serde(default)]
    pub package: String,
}

/// Contents of a `.cfsplugin` manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    /// Location of the manifest; set by the loader, not read from the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_path: Option<PathBuf>,
    pub plugin_id: String,
    #[serde(default)]
    pub plugin_name: String,
    #[serde(default)]
    pub plugin_description: String,
    #[serde(default)]
    pub plugin_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_api_version: Option<u32>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub firmware_platform: String,
    #[serde(default)]
    pub supported_socs: Vec<SocInfo>,
    #[serde(default)]
    pub features: BTreeMap<FeatureScope, Feature>,
    #[serde(default)]
    pub properties: ScopedProperties,
}

impl PluginInfo {
    /// An otherwise empty manifest with the given id.
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_path: None,
            plugin_id: plugin_id.into(),
            plugin_name: String::new(),
            plugin_description: String::new(),
            plugin_version: String::new(),
            plugin_api_version: None,
            author: String::new(),
            firmware_platform: String::new(),
            supported_socs: Vec::new(),
            features: BTreeMap::new(),
            properties: ScopedProperties::default(),
        }
    }

    /// The feature declared for a scope, if any.
    pub fn feature(&self, scope: FeatureScope) -> Option<&Feature> {
        self.features.get(&scope)
    }

    /// Directory containing the manifest, used to resolve feature `src` globs.
    pub fn plugin_dir(&self) -> Option<PathBuf> {
        self.plugin_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
    }
}
